//! In-memory collaborators used by the replay harness and by tests.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use tokio::time::{Duration, sleep};

use crate::commit::{AnnotationStore, ConfirmDialog, StoreError};
use crate::draw::{AnnotationId, CommittedAnnotation, NewAnnotation, StrokeId};
use crate::geometry::Size;
use crate::input::PointOnPage;
use crate::viewer::{
    DocumentViewer, DraftPreview, DrawingSurface, PageMetrics, PreviewHandle, ViewerEvent,
};

/// Vertical gap between stacked pages, in container pixels.
pub const PAGE_GAP: f64 = 10.0;

/// A page as laid out by [`RecordingViewer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub scale: f64,
    pub size: Size,
}

/// Document viewer that stacks pages vertically and records what it receives.
pub struct RecordingViewer {
    pages: Vec<PageLayout>,
    events: Mutex<Vec<ViewerEvent>>,
    editors: Mutex<Vec<AnnotationId>>,
}

impl RecordingViewer {
    pub fn new(pages: Vec<PageLayout>) -> Self {
        Self {
            pages,
            events: Mutex::new(Vec::new()),
            editors: Mutex::new(Vec::new()),
        }
    }

    /// Events dispatched so far, in order.
    pub fn events(&self) -> Vec<ViewerEvent> {
        lock(&self.events).clone()
    }

    /// Ids the inline text editor was opened for.
    pub fn opened_editors(&self) -> Vec<AnnotationId> {
        lock(&self.editors).clone()
    }
}

impl PageMetrics for RecordingViewer {
    fn scale_of(&self, page: u32) -> f64 {
        self.pages
            .get(page as usize)
            .map_or(1.0, |layout| layout.scale)
    }

    fn page_size(&self, page: u32) -> Size {
        self.pages
            .get(page as usize)
            .map_or_else(Size::default, |layout| layout.size)
    }
}

impl DocumentViewer for RecordingViewer {
    fn resolve(&self, client_x: f64, client_y: f64) -> Option<PointOnPage> {
        let mut top = 0.0;
        for (index, layout) in self.pages.iter().enumerate() {
            let bottom = top + layout.size.height;
            if client_y >= top && client_y <= bottom {
                if client_x < 0.0 || client_x > layout.size.width {
                    return None;
                }
                return Some(PointOnPage::new(index as u32, client_x, client_y - top));
            }
            top = bottom + PAGE_GAP;
        }
        None
    }

    fn dispatch(&self, event: &ViewerEvent) {
        lock(&self.events).push(event.clone());
    }

    fn open_text_editor(&self, id: &AnnotationId) {
        lock(&self.editors).push(id.clone());
    }
}

/// One operation performed on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SurfaceOp {
    ShowPreview {
        handle: PreviewHandle,
        preview: DraftPreview,
    },
    UpdatePreview {
        handle: PreviewHandle,
        preview: DraftPreview,
    },
    RemovePreview {
        handle: PreviewHandle,
    },
    PromotePreview {
        handle: PreviewHandle,
        id: AnnotationId,
    },
    RenderAnnotation {
        id: AnnotationId,
    },
    RemoveAnnotation {
        id: AnnotationId,
    },
    RemoveStroke {
        page: u32,
        stroke: StrokeId,
    },
}

/// Drawing surface that records every operation and tracks what is visible.
#[derive(Default)]
pub struct RecordingSurface {
    next_handle: AtomicU64,
    ops: Mutex<Vec<SurfaceOp>>,
    live_previews: Mutex<HashMap<PreviewHandle, DraftPreview>>,
    rendered: Mutex<HashSet<AnnotationId>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operations performed so far, in order.
    pub fn ops(&self) -> Vec<SurfaceOp> {
        lock(&self.ops).clone()
    }

    /// Number of previews currently on the surface.
    pub fn live_preview_count(&self) -> usize {
        lock(&self.live_previews).len()
    }

    /// Whether a committed annotation is currently rendered.
    pub fn is_rendered(&self, id: &AnnotationId) -> bool {
        lock(&self.rendered).contains(id)
    }

    fn record(&self, op: SurfaceOp) {
        lock(&self.ops).push(op);
    }
}

impl DrawingSurface for RecordingSurface {
    fn show_preview(&self, preview: &DraftPreview) -> PreviewHandle {
        let handle = PreviewHandle(self.next_handle.fetch_add(1, Ordering::SeqCst) + 1);
        lock(&self.live_previews).insert(handle, preview.clone());
        self.record(SurfaceOp::ShowPreview {
            handle,
            preview: preview.clone(),
        });
        handle
    }

    fn update_preview(&self, handle: PreviewHandle, preview: &DraftPreview) {
        if let Some(live) = lock(&self.live_previews).get_mut(&handle) {
            *live = preview.clone();
        }
        self.record(SurfaceOp::UpdatePreview {
            handle,
            preview: preview.clone(),
        });
    }

    fn remove_preview(&self, handle: PreviewHandle) {
        lock(&self.live_previews).remove(&handle);
        self.record(SurfaceOp::RemovePreview { handle });
    }

    fn promote_preview(&self, handle: PreviewHandle, annotation: &CommittedAnnotation) {
        {
            let mut previews = lock(&self.live_previews);
            let mut rendered = lock(&self.rendered);
            previews.remove(&handle);
            rendered.insert(annotation.id.clone());
        }
        self.record(SurfaceOp::PromotePreview {
            handle,
            id: annotation.id.clone(),
        });
    }

    fn render_annotation(&self, annotation: &CommittedAnnotation) {
        lock(&self.rendered).insert(annotation.id.clone());
        self.record(SurfaceOp::RenderAnnotation {
            id: annotation.id.clone(),
        });
    }

    fn remove_annotation(&self, id: &AnnotationId) {
        lock(&self.rendered).remove(id);
        self.record(SurfaceOp::RemoveAnnotation { id: id.clone() });
    }

    fn remove_stroke(&self, page: u32, stroke: &StrokeId) {
        self.record(SurfaceOp::RemoveStroke {
            page,
            stroke: stroke.clone(),
        });
    }
}

/// Annotation store kept in memory, with failure injection.
///
/// Ids are issued as `a1`, `a2`, ... in creation order.
#[derive(Default)]
pub struct MemoryStore {
    annotations: Mutex<BTreeMap<AnnotationId, CommittedAnnotation>>,
    strokes: Mutex<HashSet<(u32, StrokeId)>>,
    next_id: AtomicU64,
    fail_creates: AtomicUsize,
    empty_ids: AtomicUsize,
    fail_mutations: AtomicUsize,
    latency: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes the next `count` creates fail.
    pub fn fail_next_creates(&self, count: usize) {
        self.fail_creates.store(count, Ordering::SeqCst);
    }

    /// Makes the next `count` creates succeed without an id.
    pub fn empty_next_ids(&self, count: usize) {
        self.empty_ids.store(count, Ordering::SeqCst);
    }

    /// Makes the next `count` updates or deletes fail.
    pub fn fail_next_mutations(&self, count: usize) {
        self.fail_mutations.store(count, Ordering::SeqCst);
    }

    /// Registers an existing freehand stroke.
    pub fn add_stroke(&self, page: u32, stroke: StrokeId) {
        lock(&self.strokes).insert((page, stroke));
    }

    /// Snapshot of the stored annotations, in id order.
    pub fn annotations(&self) -> Vec<CommittedAnnotation> {
        lock(&self.annotations).values().cloned().collect()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            sleep(latency).await;
        }
    }
}

/// Decrements `counter` if it is positive; returns whether it was.
fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl AnnotationStore for MemoryStore {
    async fn create(&self, annotation: &NewAnnotation) -> Result<String, StoreError> {
        self.simulate_latency().await;
        if take_one(&self.fail_creates) {
            return Err(StoreError::Unavailable("injected create failure".into()));
        }
        if take_one(&self.empty_ids) {
            return Ok(String::new());
        }

        let raw = format!("a{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let id = AnnotationId::parse(raw.clone())
            .ok_or_else(|| StoreError::Rejected("generated an empty id".into()))?;
        lock(&self.annotations).insert(id.clone(), annotation.clone().into_committed(id));
        Ok(raw)
    }

    async fn update(&self, annotation: &CommittedAnnotation) -> Result<bool, StoreError> {
        self.simulate_latency().await;
        if take_one(&self.fail_mutations) {
            return Err(StoreError::Unavailable("injected update failure".into()));
        }
        let mut annotations = lock(&self.annotations);
        match annotations.get_mut(&annotation.id) {
            Some(stored) => {
                *stored = annotation.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &AnnotationId) -> Result<bool, StoreError> {
        self.simulate_latency().await;
        if take_one(&self.fail_mutations) {
            return Err(StoreError::Unavailable("injected delete failure".into()));
        }
        Ok(lock(&self.annotations).remove(id).is_some())
    }

    async fn delete_stroke(&self, page: u32, stroke: &StrokeId) -> Result<bool, StoreError> {
        self.simulate_latency().await;
        if take_one(&self.fail_mutations) {
            return Err(StoreError::Unavailable("injected delete failure".into()));
        }
        Ok(lock(&self.strokes).remove(&(page, stroke.clone())))
    }

    async fn load_annotation_map(&self) -> Result<Vec<CommittedAnnotation>, StoreError> {
        self.simulate_latency().await;
        Ok(self.annotations())
    }
}

/// Confirmation prompt answered from a script.
pub struct ScriptedConfirm {
    answers: Mutex<VecDeque<bool>>,
    default: bool,
    asked: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = bool>, default: bool) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            default,
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Titles of every prompt shown so far.
    pub fn asked(&self) -> Vec<String> {
        lock(&self.asked).clone()
    }
}

#[async_trait]
impl ConfirmDialog for ScriptedConfirm {
    async fn confirm(&self, title: &str) -> bool {
        lock(&self.asked).push(title.to_string());
        // Yield so concurrent callers interleave the way a real prompt would.
        tokio::task::yield_now().await;
        lock(&self.answers).pop_front().unwrap_or(self.default)
    }
}

/// Locks a mutex, recovering the data if a panicking holder poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
