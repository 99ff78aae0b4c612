use crate::probe::StrokeHit;
use crate::viewer::ViewerEvent;

use super::core::{Effect, InputState, InteractionState, SessionId, StrokeDrag};

impl InputState {
    /// Applies the outcome of a stroke probe.
    ///
    /// # Arguments
    /// * `session` - Session the probe was started for
    /// * `hit` - Stroke under the origin, `None` on a miss or a failed probe
    ///
    /// # Behavior
    /// - Outcome for any session other than the one currently probing: dropped
    /// - Miss: the origin is forwarded as an ordinary press, then every
    ///   buffered move as an ordinary move
    /// - Hit: buffered moves are replayed into a stroke drag starting at the
    ///   origin
    /// - If the session already ended, its release (or cancel) is replayed
    ///   next, followed by any hover moves that arrived after it
    ///
    /// The emitted sequence is the one a probe that settled instantly would
    /// have produced.
    pub fn on_probe_settled(&mut self, session: SessionId, hit: Option<StrokeHit>) -> Vec<Effect> {
        let probe = match std::mem::take(&mut self.state) {
            InteractionState::Probing(probe) if probe.id == session => probe,
            other => {
                log::debug!("Dropping stale probe outcome for session {}", session);
                self.state = other;
                return Vec::new();
            }
        };

        let mut effects = Vec::new();
        let buffered = probe.buffer.drain_in_order();
        log::debug!(
            "Probe for session {} settled ({}); replaying {} buffered moves",
            session,
            if hit.is_some() { "hit" } else { "miss" },
            buffered.len()
        );

        match hit {
            Some(hit) => {
                self.state = InteractionState::DraggingStroke(StrokeDrag::new(probe.origin, hit));
            }
            None => {
                effects.push(Effect::Forward(ViewerEvent::Press {
                    sample: probe.origin,
                    ctrl: probe.ctrl,
                }));
                self.state = InteractionState::Forwarding;
            }
        }

        for sample in buffered {
            self.route_move(sample, &mut effects);
        }

        if let Some(end) = probe.ended {
            self.end_gesture(end, &mut effects);
            for sample in probe.trailing {
                self.route_move(sample, &mut effects);
            }
        }

        effects
    }
}
