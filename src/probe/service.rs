use std::sync::Arc;

use tokio::sync::mpsc;

use crate::geometry;
use crate::input::{PointerSample, SessionId};
use crate::probe::{
    dependencies::StrokeIndex,
    types::{ProbeOutcome, StrokeHit},
};

/// Runs stroke probes in the background and reports their outcomes.
///
/// Every probe is tagged with the session that started it. The service does
/// not know which session is current; the receiver of the outcome channel
/// compares session ids and drops stale results.
#[derive(Clone)]
pub struct ProbeService {
    /// Index the probes run against.
    index: Arc<dyn StrokeIndex>,
    /// Channel outcomes are delivered on.
    outcome_tx: mpsc::UnboundedSender<ProbeOutcome>,
    /// Runtime probes are spawned onto.
    runtime: tokio::runtime::Handle,
}

impl ProbeService {
    /// Create a new probe service.
    ///
    /// Returns the service together with the receiving end of its outcome channel.
    ///
    /// # Arguments
    /// * `runtime_handle` - Tokio runtime handle for spawning probe tasks
    /// * `index` - Stroke index to hit-test against
    pub fn new(
        runtime_handle: &tokio::runtime::Handle,
        index: Arc<dyn StrokeIndex>,
    ) -> (Self, mpsc::UnboundedReceiver<ProbeOutcome>) {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        (
            Self {
                index,
                outcome_tx,
                runtime: runtime_handle.clone(),
            },
            outcome_rx,
        )
    }

    /// Start probing `sample` for `session`.
    ///
    /// This is non-blocking and returns immediately. The outcome arrives on
    /// the outcome channel whenever the index answers; there is no timeout.
    ///
    /// # Arguments
    /// * `session` - Session the probe belongs to
    /// * `sample` - Pointer-down sample, pixel space
    /// * `scale` - Render scale of the sample's page
    pub fn start(&self, session: SessionId, sample: PointerSample, scale: f64) {
        let index = Arc::clone(&self.index);
        let outcome_tx = self.outcome_tx.clone();

        log::debug!(
            "Starting probe for session {} at page {} ({:.1}, {:.1})",
            session,
            sample.page,
            sample.x,
            sample.y
        );

        self.runtime.spawn(async move {
            let hit = probe_fail_open(index.as_ref(), &sample, scale).await;
            if outcome_tx.send(ProbeOutcome { session, hit }).is_err() {
                log::debug!("Probe outcome for session {} dropped: receiver gone", session);
            }
        });
    }
}

/// Hit-tests `sample` against `index`, treating every failure as "no hit".
///
/// The pointer interaction must never block or error out because the stroke
/// data could not be read, so errors are logged at debug level and swallowed.
pub async fn probe_fail_open(
    index: &dyn StrokeIndex,
    sample: &PointerSample,
    scale: f64,
) -> Option<StrokeHit> {
    let point = geometry::normalize_point(sample.position(), scale);
    match index.hit_test(sample.page, point).await {
        Ok(hit) => hit,
        Err(err) => {
            log::debug!("Probe failed, treating as no hit: {}", err);
            None
        }
    }
}
