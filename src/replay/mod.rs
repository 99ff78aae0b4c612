//! Scripted replay of pointer sessions against in-memory collaborators.
//!
//! The replay harness builds a complete interaction core (viewer, drawing
//! surface, stroke index, store and confirmation prompt all kept in memory),
//! feeds it the steps of a [`Script`] and reports everything the collaborators
//! observed. The `pagemark` binary prints that report as JSON.

pub mod memory;
pub mod script;

pub use memory::{
    MemoryStore, PageLayout, RecordingSurface, RecordingViewer, ScriptedConfirm, SurfaceOp,
};
pub use script::{PointerStep, Script, ScriptError, Step};

use std::sync::Arc;

use serde::Serialize;
use tokio::time::Duration;

use crate::commit::{
    CommitDependencies, CommitError, CommitGateway, DeleteOutcome, UpdateOutcome,
};
use crate::config::Config;
use crate::controller::{CommitReport, InteractionController};
use crate::draw::{AnnotationId, AnnotationPatch, CommittedAnnotation, ShapeGeometry, ShapeKind, StrokeId};
use crate::geometry::Size;
use crate::input::{
    InputState, Modifiers, PointOnPage, PointerEvent, PointerEventKind, RawPointerEvent, Tool,
};
use crate::probe::PageStrokeIndex;
use crate::viewer::ViewerEvent;

/// Result of one create, as reported by the harness.
#[derive(Debug, Clone, Serialize)]
pub struct CommitSummary {
    pub page: u32,
    pub kind: ShapeKind,
    /// Unit-space geometry sent to the store
    pub geometry: ShapeGeometry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<AnnotationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<CommitReport> for CommitSummary {
    fn from(report: CommitReport) -> Self {
        let (id, error) = match report.result {
            Ok(annotation) => (Some(annotation.id), None),
            Err(err) => (None, Some(err.to_string())),
        };
        Self {
            page: report.request.page,
            kind: report.request.kind,
            geometry: report.request.geometry,
            id,
            error,
        }
    }
}

/// What an edit step produced.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MutationResult {
    Updated { outcome: UpdateOutcome },
    Deleted { outcomes: Vec<DeleteOutcome> },
    Refreshed { count: usize },
    Failed { error: String },
}

/// One edit step and its result.
#[derive(Debug, Clone, Serialize)]
pub struct MutationRecord {
    /// Zero-based index of the step in the script
    pub step: usize,
    pub action: &'static str,
    pub target: String,
    #[serde(flatten)]
    pub result: MutationResult,
}

/// Everything the collaborators observed during a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Events forwarded to the viewer, in order
    pub events: Vec<ViewerEvent>,
    /// Drawing surface operations, in order
    pub surface: Vec<SurfaceOp>,
    pub commits: Vec<CommitSummary>,
    pub mutations: Vec<MutationRecord>,
    /// Ids the inline text editor was opened for
    pub editors_opened: Vec<AnnotationId>,
    /// Titles of the confirmation prompts shown
    pub confirmations: Vec<String>,
    /// Previews still on the surface after the final settle
    pub live_previews: usize,
    /// Committed annotations as mirrored by the gateway
    pub annotations: Vec<CommittedAnnotation>,
}

/// Replays `script` with the given configuration.
///
/// # Behavior
/// Pointer steps are processed one at a time. Probe outcomes are only fed
/// back on `settle_probes` / `settle` steps, so a script controls exactly
/// which events arrive while a probe is outstanding. Every outstanding probe
/// and commit is settled after the last step.
///
/// # Errors
/// Returns an error if the script is invalid.
pub async fn run_script(script: &Script, config: &Config) -> Result<ReplayReport, ScriptError> {
    if script.pages.is_empty() {
        return Err(ScriptError::Invalid("at least one page is required".into()));
    }

    let layouts = script
        .pages
        .iter()
        .map(|page| PageLayout {
            scale: page.scale,
            size: Size::new(page.width, page.height),
        })
        .collect();
    let viewer = Arc::new(RecordingViewer::new(layouts));
    let surface = Arc::new(RecordingSurface::new());

    let mut index = PageStrokeIndex::new(config.probe.hit_tolerance);
    if script.probe.latency_ms > 0 {
        index = index.with_latency(Duration::from_millis(script.probe.latency_ms));
    }
    let index = Arc::new(index);

    let mut store = MemoryStore::new();
    if script.store.latency_ms > 0 {
        store = store.with_latency(Duration::from_millis(script.store.latency_ms));
    }
    store.fail_next_creates(script.store.fail_creates);
    store.empty_next_ids(script.store.empty_ids);
    store.fail_next_mutations(script.store.fail_mutations);

    for (page, spec) in script.pages.iter().enumerate() {
        let page = page as u32;
        for stroke in &spec.strokes {
            store.add_stroke(page, StrokeId(stroke.id.clone()));
        }
        index.set_page(page, spec.strokes.clone()).await;
        if spec.unavailable {
            index.mark_unavailable(page).await;
        }
    }
    let store = Arc::new(store);

    let confirm = Arc::new(ScriptedConfirm::new(
        script.confirm.answers.iter().copied(),
        script.confirm.default,
    ));

    let gateway = CommitGateway::new(
        CommitDependencies {
            store: store.clone(),
            confirm: confirm.clone(),
            surface: surface.clone(),
            viewer: viewer.clone(),
        },
        config.commit.clone(),
    );

    let mut controller = InteractionController::new(
        &tokio::runtime::Handle::current(),
        InputState::from_config(config),
        viewer.clone(),
        surface.clone(),
        index.clone(),
        gateway,
    );

    let mut commits = Vec::new();
    let mut mutations = Vec::new();

    for (step_index, step) in script.steps.iter().enumerate() {
        log::debug!("Step {}: {:?}", step_index, step);
        match step {
            Step::Arm { shape } => controller.set_tool(Tool::Create(*shape)),
            Step::Disarm => controller.set_tool(Tool::Select),
            Step::Color { color } => controller.set_color(*color),
            Step::StrokeEditing { enabled } => controller.set_stroke_editing(*enabled),
            Step::Down(at) => {
                controller
                    .handle_pointer(pointer_event(PointerEventKind::Down, at))
                    .await
            }
            Step::Move(at) => {
                controller
                    .handle_pointer(pointer_event(PointerEventKind::Move, at))
                    .await
            }
            Step::Up(at) => {
                controller
                    .handle_pointer(pointer_event(PointerEventKind::Up, at))
                    .await
            }
            Step::DoubleClick(at) => {
                controller
                    .handle_pointer(pointer_event(PointerEventKind::DoubleClick, at))
                    .await
            }
            Step::Cancel => {
                controller
                    .handle_pointer(PointerEvent::new(PointerEventKind::Cancel, None))
                    .await
            }
            Step::Raw {
                kind,
                client_x,
                client_y,
                ctrl,
            } => {
                controller
                    .handle_raw(RawPointerEvent {
                        kind: *kind,
                        client_x: *client_x,
                        client_y: *client_y,
                        modifiers: modifiers(*ctrl),
                    })
                    .await
            }
            Step::SettleProbes => {
                while controller.settle_next_probe().await {}
            }
            Step::Settle => {
                commits.extend(controller.settle().await.into_iter().map(CommitSummary::from))
            }
            Step::Recolor { id, color } => {
                let result = match CommitGateway::durable_id(id) {
                    Ok(id) => controller
                        .gateway()
                        .update(&id, &AnnotationPatch::recolor(*color))
                        .await
                        .map(|outcome| MutationResult::Updated { outcome }),
                    Err(err) => Err(err),
                };
                mutations.push(record(step_index, "recolor", id.clone(), result));
            }
            Step::Translate { id, dx, dy } => {
                let result = match CommitGateway::durable_id(id) {
                    Ok(id) => controller
                        .gateway()
                        .update(&id, &AnnotationPatch::moved_by(*dx, *dy))
                        .await
                        .map(|outcome| MutationResult::Updated { outcome }),
                    Err(err) => Err(err),
                };
                mutations.push(record(step_index, "translate", id.clone(), result));
            }
            Step::Delete { id, concurrent } => {
                let result = match CommitGateway::durable_id(id) {
                    Ok(id) => delete_annotation(controller.gateway(), &id, *concurrent).await,
                    Err(err) => Err(err),
                };
                mutations.push(record(step_index, "delete", id.clone(), result));
            }
            Step::DeleteStroke { page, stroke } => {
                let stroke_id = StrokeId(stroke.clone());
                let result = controller.delete_stroke(*page, &stroke_id).await;
                if matches!(result, Ok(DeleteOutcome::Removed)) {
                    index.remove_stroke(*page, &stroke_id).await;
                }
                let result = result.map(|outcome| MutationResult::Deleted {
                    outcomes: vec![outcome],
                });
                mutations.push(record(step_index, "delete_stroke", stroke.clone(), result));
            }
            Step::Refresh => {
                let result = controller
                    .gateway()
                    .refresh()
                    .await
                    .map(|count| MutationResult::Refreshed { count });
                mutations.push(record(step_index, "refresh", String::new(), result));
            }
        }
    }

    commits.extend(controller.settle().await.into_iter().map(CommitSummary::from));

    Ok(ReplayReport {
        events: viewer.events(),
        surface: surface.ops(),
        commits,
        mutations,
        editors_opened: viewer.opened_editors(),
        confirmations: confirm.asked(),
        live_previews: surface.live_preview_count(),
        annotations: controller.gateway().annotations().await,
    })
}

async fn delete_annotation(
    gateway: &CommitGateway,
    id: &AnnotationId,
    concurrent: bool,
) -> Result<MutationResult, CommitError> {
    let outcomes = if concurrent {
        let (first, second) = futures::join!(gateway.delete(id), gateway.delete(id));
        vec![first?, second?]
    } else {
        vec![gateway.delete(id).await?]
    };
    Ok(MutationResult::Deleted { outcomes })
}

fn record(
    step: usize,
    action: &'static str,
    target: String,
    result: Result<MutationResult, CommitError>,
) -> MutationRecord {
    let result = result.unwrap_or_else(|err| {
        log::warn!("Step {} ({}) failed: {}", step, action, err);
        MutationResult::Failed {
            error: err.to_string(),
        }
    });
    MutationRecord {
        step,
        action,
        target,
        result,
    }
}

fn modifiers(ctrl: bool) -> Modifiers {
    if ctrl { Modifiers::ctrl() } else { Modifiers::new() }
}

fn pointer_event(kind: PointerEventKind, at: &PointerStep) -> PointerEvent {
    let point = at.page.map(|page| PointOnPage::new(page, at.x, at.y));
    PointerEvent::new(kind, point).with_modifiers(modifiers(at.ctrl))
}
