//! Asynchronous stroke probing.
//!
//! On every eligible pointer-down the interaction core asks whether an
//! existing freehand stroke sits under the pointer. The answer arrives later
//! on a channel, tagged with the session that asked.

pub mod index;
pub mod types;

mod dependencies;
mod service;

pub use dependencies::StrokeIndex;
pub use index::{PageStrokeIndex, StrokeRecord};
pub use service::{ProbeService, probe_fail_open};
pub use types::{ProbeError, ProbeOutcome, StrokeHit};
