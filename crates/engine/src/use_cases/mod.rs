//! Use cases - hook orchestration over the infrastructure ports.

pub mod sync_marker_tags;

pub use sync_marker_tags::{SyncMarkerTags, SyncOutcome};
