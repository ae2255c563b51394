//! Marker tag sync hook.
//!
//! Invoked by the catalog server whenever a scene marker is written: merges
//! the marker's tags into the scene it belongs to.
//!
//! ## Structure
//!
//! - `api/` - stdin payload and stdout result contract with the host
//! - `use_cases/` - the tag sync orchestration
//! - `infrastructure/` - GraphQL client, settings, host log format
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod error;
pub mod infrastructure;
pub mod use_cases;

pub use app::{run_hook, App};
pub use error::HookError;
