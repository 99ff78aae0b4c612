use crate::draw::AnnotationId;
use crate::geometry;
use crate::input::{
    events::{PointOnPage, PointerSample},
    modifiers::Modifiers,
    tool::Tool,
};
use crate::probe::StrokeHit;
use crate::viewer::{PageMetrics, ViewerEvent};

use super::core::{Effect, InputState, InteractionState, ProbeSession, SessionEnd, StrokeDrag};
use super::draft::{DraftOutcome, ShapeDraft};

impl InputState {
    /// Processes a pointer-down.
    ///
    /// # Arguments
    /// * `point` - Resolved position, `None` outside every page
    /// * `modifiers` - Modifier state at the time of the press
    ///
    /// # Behavior
    /// - Always ends the previous session first; its probe and buffer are dropped
    /// - Creation mode armed: starts a draft and shows its preview
    /// - Ctrl-click or stroke editing disabled: forwards the press to the viewer
    /// - Otherwise: starts a stroke probe and buffers moves until it settles
    pub fn on_pointer_down(
        &mut self,
        point: Option<PointOnPage>,
        modifiers: Modifiers,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.abandon_session(&mut effects);

        let Some(point) = point else {
            log::debug!("Pointer down outside every page");
            return effects;
        };

        let sample = self.stamp(point);
        let session = self.begin_session();
        let ctrl = modifiers.is_selection_click();

        if let Some(kind) = self.tool.creation_kind() {
            log::debug!(
                "Session {} drafting {:?} on page {} at ({:.1}, {:.1})",
                session,
                kind,
                sample.page,
                sample.x,
                sample.y
            );
            let draft = ShapeDraft::new(kind, sample, self.style);
            effects.push(Effect::ShowPreview(draft.preview()));
            self.state = InteractionState::Drafting(draft);
        } else if ctrl || !self.stroke_editing {
            log::debug!("Session {} forwarded to viewer (ctrl: {})", session, ctrl);
            effects.push(Effect::Forward(ViewerEvent::Press { sample, ctrl }));
            self.state = InteractionState::Forwarding;
        } else {
            effects.push(Effect::StartProbe { session, sample });
            self.state = InteractionState::Probing(ProbeSession::new(session, sample, ctrl));
        }

        effects
    }

    /// Processes a pointer move, pressed or hovering.
    ///
    /// # Behavior
    /// - Drafting: same-page moves reshape the draft; a move onto another
    ///   page cancels it and the rest of the gesture is swallowed
    /// - Probing: the move is buffered until the probe settles
    /// - Otherwise: forwarded to the viewer (or fed to a stroke drag)
    pub fn on_pointer_move(
        &mut self,
        point: Option<PointOnPage>,
        metrics: &(impl PageMetrics + ?Sized),
    ) -> Vec<Effect> {
        let mut effects = Vec::new();

        if let InteractionState::Drafting(draft) = &mut self.state {
            match point {
                Some(point) if point.page == draft.anchor.page => {
                    let container = self
                        .limits
                        .clamp_preview_to_page
                        .then(|| metrics.page_size(point.page));
                    draft.update(geometry::Point::new(point.x, point.y), container);
                    effects.push(Effect::UpdatePreview(draft.preview()));
                }
                Some(point) => {
                    log::debug!(
                        "Draft on page {} left for page {}; cancelling",
                        draft.anchor.page,
                        point.page
                    );
                    effects.push(Effect::RemovePreview);
                    self.state = InteractionState::DiscardingDraft;
                    self.tool = Tool::Select;
                }
                None => {}
            }
            return effects;
        }

        let Some(point) = point else {
            return effects;
        };
        let sample = self.stamp(point);
        self.route_move(sample, &mut effects);
        effects
    }

    /// Processes a pointer-up.
    ///
    /// # Behavior
    /// - Drafting: finalizes the draft into a commit, or discards it when it
    ///   is degenerate or released off its page; the tool is disarmed
    /// - Probing: records that the session ended; the release is replayed once
    ///   the probe settles
    /// - Cancelled draft: the release is swallowed
    /// - Otherwise: completes the forwarded gesture
    pub fn on_pointer_up(
        &mut self,
        point: Option<PointOnPage>,
        metrics: &(impl PageMetrics + ?Sized),
    ) -> Vec<Effect> {
        let mut effects = Vec::new();

        match std::mem::take(&mut self.state) {
            InteractionState::Drafting(mut draft) => {
                self.tool = Tool::Select;
                match point {
                    Some(point) if point.page == draft.anchor.page => {
                        let page = draft.anchor.page;
                        let outcome = draft.finalize(
                            geometry::Point::new(point.x, point.y),
                            metrics.scale_of(page),
                            metrics.page_size(page),
                            &self.limits,
                        );
                        match outcome {
                            DraftOutcome::Commit { preview, request } => {
                                effects.push(Effect::UpdatePreview(preview));
                                effects.push(Effect::Commit(request));
                            }
                            DraftOutcome::Degenerate => effects.push(Effect::RemovePreview),
                        }
                    }
                    _ => {
                        log::debug!("Draft released off its page; discarding");
                        effects.push(Effect::RemovePreview);
                    }
                }
                return effects;
            }
            other => self.state = other,
        }

        let sample = point.map(|point| self.stamp(point));
        self.end_gesture(SessionEnd::Released(sample), &mut effects);
        effects
    }

    /// Processes a platform pointer cancel.
    pub fn on_pointer_cancel(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.end_gesture(SessionEnd::Cancelled, &mut effects);
        effects
    }

    /// Processes a double-click.
    ///
    /// # Arguments
    /// * `point` - Resolved position, `None` outside every page
    /// * `modifiers` - Modifier state
    /// * `target` - Text box under the pointer, if the caller found one
    ///
    /// # Behavior
    /// Ctrl held or no target: forwarded as a generic double-click. A
    /// double-click on a text box is reserved for in-place editing and
    /// produces no effect.
    pub fn on_double_click(
        &mut self,
        point: Option<PointOnPage>,
        modifiers: Modifiers,
        target: Option<&AnnotationId>,
    ) -> Vec<Effect> {
        let ctrl = modifiers.is_selection_click();
        match target {
            Some(id) if !ctrl => {
                log::debug!("Double-click on text box {}; reserved", id);
                Vec::new()
            }
            _ => vec![Effect::Forward(ViewerEvent::DoubleClick { point, ctrl })],
        }
    }

    /// Routes a stamped move according to the current mode.
    ///
    /// Shared by live moves and by replay after a probe settles.
    pub(super) fn route_move(&mut self, sample: PointerSample, effects: &mut Vec<Effect>) {
        let threshold = self.limits.drag_select_threshold_px;
        match &mut self.state {
            InteractionState::Idle | InteractionState::Forwarding => {
                effects.push(Effect::Forward(ViewerEvent::Move { sample }));
            }
            InteractionState::Drafting(_) => {
                log::warn!("Stamped move routed while drafting; ignoring");
            }
            InteractionState::DiscardingDraft => {}
            InteractionState::Probing(probe) => {
                if probe.ended.is_some() {
                    probe.trailing.push(sample);
                } else {
                    probe.buffer.push(sample);
                }
            }
            InteractionState::DraggingStroke(drag) => drag.advance(sample, threshold, effects),
        }
    }

    /// Ends the current gesture.
    ///
    /// Shared by live pointer-up/cancel and by replay after a probe settles.
    pub(super) fn end_gesture(&mut self, end: SessionEnd, effects: &mut Vec<Effect>) {
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => {
                if let SessionEnd::Released(Some(sample)) = end {
                    effects.push(Effect::Forward(ViewerEvent::Release {
                        sample: Some(sample),
                    }));
                }
            }
            InteractionState::Drafting(_) => {
                log::debug!("Draft cancelled");
                self.tool = Tool::Select;
                effects.push(Effect::RemovePreview);
            }
            InteractionState::DiscardingDraft => {
                log::debug!("Swallowing end of a cancelled draft gesture");
            }
            InteractionState::Probing(mut probe) => {
                if probe.ended.is_none() {
                    log::debug!("Session {} ended before its probe settled", probe.id);
                    probe.ended = Some(end);
                }
                self.state = InteractionState::Probing(probe);
            }
            InteractionState::Forwarding => effects.push(Effect::Forward(match end {
                SessionEnd::Released(sample) => ViewerEvent::Release { sample },
                SessionEnd::Cancelled => ViewerEvent::Cancel,
            })),
            InteractionState::DraggingStroke(drag) => drag.finish(end, effects),
        }
    }
}

impl StrokeDrag {
    pub fn new(origin: PointerSample, hit: StrokeHit) -> Self {
        Self {
            origin,
            hit,
            dragging: false,
            held: Vec::new(),
        }
    }

    /// Feeds one move into the drag.
    ///
    /// Moves within the threshold are held back. The first move beyond it
    /// starts a drag-select at the origin and releases everything held.
    fn advance(&mut self, sample: PointerSample, threshold: f64, effects: &mut Vec<Effect>) {
        if self.dragging {
            effects.push(Effect::Forward(ViewerEvent::Move { sample }));
            return;
        }

        let travelled = sample.page != self.origin.page
            || geometry::distance_squared(self.origin.position(), sample.position())
                > threshold * threshold;
        if !travelled {
            self.held.push(sample);
            return;
        }

        log::debug!("Drag-select started on stroke {}", self.hit.stroke);
        self.dragging = true;
        effects.push(Effect::Forward(ViewerEvent::DragSelectStart {
            origin: self.origin,
            stroke: self.hit.stroke.clone(),
        }));
        for held in self.held.drain(..) {
            effects.push(Effect::Forward(ViewerEvent::Move { sample: held }));
        }
        effects.push(Effect::Forward(ViewerEvent::Move { sample }));
    }

    /// Completes the gesture: a drag releases, a click selects the stroke.
    fn finish(self, end: SessionEnd, effects: &mut Vec<Effect>) {
        match (self.dragging, end) {
            (true, SessionEnd::Released(sample)) => {
                effects.push(Effect::Forward(ViewerEvent::Release { sample }));
            }
            (true, SessionEnd::Cancelled) => effects.push(Effect::Forward(ViewerEvent::Cancel)),
            (false, SessionEnd::Released(_)) => {
                log::debug!("Stroke {} selected", self.hit.stroke);
                effects.push(Effect::Forward(ViewerEvent::StrokeSelected {
                    page: self.hit.page,
                    stroke: self.hit.stroke,
                }));
            }
            (false, SessionEnd::Cancelled) => {}
        }
    }
}
