//! API layer - the host-facing stdin/stdout contract.

pub mod payload;
pub mod report;

pub use payload::HookPayload;
pub use report::{report, HookResult, Stopwatch};
