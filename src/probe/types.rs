//! Data types for stroke probing.

use crate::draw::StrokeId;
use crate::input::SessionId;
use serde::Serialize;
use thiserror::Error;

/// An existing freehand stroke found under the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrokeHit {
    /// Zero-based page index
    pub page: u32,
    pub stroke: StrokeId,
}

/// Result of a probe, tagged with the session that started it.
///
/// Failures never show up here: by the time an outcome exists they have
/// already been folded into `hit: None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub session: SessionId,
    pub hit: Option<StrokeHit>,
}

/// Errors a stroke index can report.
///
/// These never leave the probe service; see [`crate::probe::probe_fail_open`].
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("stroke data for page {0} is unavailable")]
    PageUnavailable(u32),

    #[error("failed to decode stroke data for page {page}: {reason}")]
    Decode { page: u32, reason: String },

    #[error("probe task failed: {0}")]
    Task(String),
}
