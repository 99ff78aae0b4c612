//! Async driver that wires the interaction state machine to its collaborators.
//!
//! The state machine in [`crate::input`] is synchronous and returns effects.
//! The controller performs those effects: it forwards events to the viewer,
//! places previews on the drawing surface, starts stroke probes and spawns
//! commits. Probe outcomes come back on a channel and are fed into the state
//! machine in arrival order, interleaved with pointer events.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{Id, JoinSet};

use crate::commit::{CommitError, CommitGateway, CreateRequest, DeleteOutcome};
use crate::draw::{AnnotationColor, CommittedAnnotation, StrokeId};
use crate::geometry::{self, Point};
use crate::input::{
    Effect, InputState, PointerEvent, PointerEventKind, RawPointerEvent, Tool,
};
use crate::probe::{ProbeOutcome, ProbeService, StrokeIndex};
use crate::viewer::{DocumentViewer, DrawingSurface, PreviewHandle};

/// Result of one spawned create.
#[derive(Debug)]
pub struct CommitReport {
    pub request: CreateRequest,
    pub result: Result<CommittedAnnotation, CommitError>,
}

/// Drives one document view.
pub struct InteractionController {
    input: InputState,
    viewer: Arc<dyn DocumentViewer>,
    surface: Arc<dyn DrawingSurface>,
    probes: ProbeService,
    probe_rx: mpsc::UnboundedReceiver<ProbeOutcome>,
    gateway: CommitGateway,
    runtime: tokio::runtime::Handle,
    /// Preview of the current draft, if one is on the surface
    live_preview: Option<PreviewHandle>,
    /// Probes started but not yet received
    outstanding_probes: usize,
    commits: JoinSet<CommitReport>,
    commit_requests: HashMap<Id, CreateRequest>,
}

impl InteractionController {
    /// Create a new controller.
    ///
    /// # Arguments
    /// * `runtime_handle` - Tokio runtime handle for spawning probes and commits
    /// * `input` - Initial input state
    /// * `viewer` - Document viewer collaborator
    /// * `surface` - Drawing surface shared by previews and committed annotations
    /// * `index` - Stroke index probes run against
    /// * `gateway` - Commit gateway for finalized drafts
    pub fn new(
        runtime_handle: &tokio::runtime::Handle,
        input: InputState,
        viewer: Arc<dyn DocumentViewer>,
        surface: Arc<dyn DrawingSurface>,
        index: Arc<dyn StrokeIndex>,
        gateway: CommitGateway,
    ) -> Self {
        let (probes, probe_rx) = ProbeService::new(runtime_handle, index);
        Self {
            input,
            viewer,
            surface,
            probes,
            probe_rx,
            gateway,
            runtime: runtime_handle.clone(),
            live_preview: None,
            outstanding_probes: 0,
            commits: JoinSet::new(),
            commit_requests: HashMap::new(),
        }
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn gateway(&self) -> &CommitGateway {
        &self.gateway
    }

    /// Number of probes whose outcome has not been processed yet.
    pub fn pending_probes(&self) -> usize {
        self.outstanding_probes
    }

    /// Switches tools; disarming mid-draft removes the preview.
    pub fn set_tool(&mut self, tool: Tool) {
        let effects = self.input.set_tool(tool);
        self.apply(effects);
    }

    /// Sets the color used for new shapes.
    pub fn set_color(&mut self, color: AnnotationColor) {
        self.input.set_color(color);
    }

    /// Enables or disables picking up existing strokes.
    pub fn set_stroke_editing(&mut self, enabled: bool) {
        self.input.set_stroke_editing(enabled);
    }

    /// Processes a raw pointer callback by resolving it onto a page first.
    pub async fn handle_raw(&mut self, raw: RawPointerEvent) {
        let point = self.viewer.resolve(raw.client_x, raw.client_y);
        let event = PointerEvent::new(raw.kind, point).with_modifiers(raw.modifiers);
        self.handle_pointer(event).await;
    }

    /// Processes a resolved pointer callback.
    pub async fn handle_pointer(&mut self, event: PointerEvent) {
        let metrics = Arc::clone(&self.viewer);
        let effects = match event.kind {
            PointerEventKind::Down => self.input.on_pointer_down(event.point, event.modifiers),
            PointerEventKind::Move => self.input.on_pointer_move(event.point, metrics.as_ref()),
            PointerEventKind::Up => self.input.on_pointer_up(event.point, metrics.as_ref()),
            PointerEventKind::Cancel => self.input.on_pointer_cancel(),
            PointerEventKind::DoubleClick => {
                let target = match event.point {
                    Some(point) if !event.modifiers.is_selection_click() => {
                        let unit = geometry::normalize_point(
                            Point::new(point.x, point.y),
                            metrics.scale_of(point.page),
                        );
                        self.gateway.text_box_at(point.page, unit).await
                    }
                    _ => None,
                };
                self.input
                    .on_double_click(event.point, event.modifiers, target.as_ref())
            }
        };
        self.apply(effects);
    }

    /// Feeds a probe outcome into the state machine.
    pub fn handle_probe_outcome(&mut self, outcome: ProbeOutcome) {
        self.outstanding_probes = self.outstanding_probes.saturating_sub(1);
        let effects = self.input.on_probe_settled(outcome.session, outcome.hit);
        self.apply(effects);
    }

    /// Waits for one probe outcome and processes it.
    ///
    /// Returns false when no probe is outstanding.
    pub async fn settle_next_probe(&mut self) -> bool {
        if self.outstanding_probes == 0 {
            return false;
        }
        match self.probe_rx.recv().await {
            Some(outcome) => {
                self.handle_probe_outcome(outcome);
                true
            }
            None => {
                self.outstanding_probes = 0;
                false
            }
        }
    }

    /// Waits for every outstanding probe and every spawned commit.
    ///
    /// Returns the reports of the commits that finished.
    pub async fn settle(&mut self) -> Vec<CommitReport> {
        while self.settle_next_probe().await {}

        let mut reports = Vec::new();
        while let Some(joined) = self.commits.join_next_with_id().await {
            match joined {
                Ok((id, report)) => {
                    self.commit_requests.remove(&id);
                    reports.push(report);
                }
                Err(err) => {
                    let Some(request) = self.commit_requests.remove(&err.id()) else {
                        log::error!("Commit task failed: {}", err);
                        continue;
                    };
                    log::error!("Commit task for page {} failed: {}", request.page, err);
                    reports.push(CommitReport {
                        request,
                        result: Err(CommitError::Cancelled(err.to_string())),
                    });
                }
            }
        }
        reports
    }

    /// Deletes an existing stroke through the gateway, confirming first.
    pub async fn delete_stroke(
        &self,
        page: u32,
        stroke: &StrokeId,
    ) -> Result<DeleteOutcome, CommitError> {
        self.gateway.delete_stroke(page, stroke).await
    }

    /// Runs until the pointer channel closes, then settles.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<RawPointerEvent>,
    ) -> Vec<CommitReport> {
        loop {
            tokio::select! {
                raw = events.recv() => match raw {
                    Some(raw) => self.handle_raw(raw).await,
                    None => break,
                },
                Some(outcome) = self.probe_rx.recv() => self.handle_probe_outcome(outcome),
            }
        }
        self.settle().await
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Forward(event) => self.viewer.dispatch(&event),
                Effect::StartProbe { session, sample } => {
                    let scale = self.viewer.scale_of(sample.page);
                    self.probes.start(session, sample, scale);
                    self.outstanding_probes += 1;
                }
                Effect::ShowPreview(preview) => {
                    if let Some(stale) = self.live_preview.take() {
                        self.surface.remove_preview(stale);
                    }
                    self.live_preview = Some(self.surface.show_preview(&preview));
                }
                Effect::UpdatePreview(preview) => {
                    if let Some(handle) = self.live_preview {
                        self.surface.update_preview(handle, &preview);
                    }
                }
                Effect::RemovePreview => {
                    if let Some(handle) = self.live_preview.take() {
                        self.surface.remove_preview(handle);
                    }
                }
                Effect::Commit(request) => self.spawn_commit(request),
            }
        }
    }

    fn spawn_commit(&mut self, request: CreateRequest) {
        let Some(preview) = self.live_preview.take() else {
            log::warn!(
                "Commit for page {} without a live preview; dropping",
                request.page
            );
            return;
        };

        let gateway = self.gateway.clone();
        let task_request = request.clone();
        let handle = self.commits.spawn_on(
            async move {
                let result = gateway.create(&task_request, preview).await;
                CommitReport {
                    request: task_request,
                    result,
                }
            },
            &self.runtime,
        );
        self.commit_requests.insert(handle.id(), request);
    }
}
