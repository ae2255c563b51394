//! Domain types for the marker tag sync hook.
//!
//! Everything here is pure: identifiers, the ordered tag set, the marker
//! event that triggered the hook, and the rule that turns a scene's current
//! tags plus an event into a tag update.

pub mod error;
pub mod ids;
pub mod marker_event;
pub mod tag_set;
pub mod tag_update;

pub use error::DomainError;
pub use ids::{SceneId, TagId};
pub use marker_event::MarkerTagEvent;
pub use tag_set::TagSet;
pub use tag_update::{plan_tag_update, TagUpdate};
