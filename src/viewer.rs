//! Interfaces to the document viewer and its per-page drawing surface.
//!
//! The viewer owns page layout, scrolling and painting. The interaction core
//! only talks to it through the traits in this module: it asks for page
//! scales and sizes, forwards pointer events it decided not to consume, and
//! places live previews on the drawing surface.

use crate::draw::{AnnotationId, CommittedAnnotation, ShapeGeometry, ShapeKind, ShapeStyle, StrokeId};
use crate::geometry::Size;
use crate::input::{PointOnPage, PointerSample};
use serde::Serialize;

/// Per-page scale and canvas size lookup.
pub trait PageMetrics {
    /// Current render scale of `page` (pixel space / unit space).
    fn scale_of(&self, page: u32) -> f64;
    /// Current canvas size of `page` in pixel space.
    fn page_size(&self, page: u32) -> Size;
}

/// Pointer events handed back to the viewer.
///
/// These are the events the interaction core did not consume itself, in the
/// order the viewer must see them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ViewerEvent {
    /// Ordinary press (click or start of a plain selection drag)
    Press { sample: PointerSample, ctrl: bool },
    /// Ordinary move, pressed or hovering
    Move { sample: PointerSample },
    /// Ordinary release; `None` when released outside every page
    Release { sample: Option<PointerSample> },
    /// The pressed gesture was cancelled by the platform
    Cancel,
    /// A drag that started on an existing stroke; followed by moves and a release
    DragSelectStart {
        origin: PointerSample,
        stroke: StrokeId,
    },
    /// A click on an existing stroke: show its selection frame
    StrokeSelected { page: u32, stroke: StrokeId },
    /// Generic double-click
    DoubleClick {
        point: Option<PointOnPage>,
        ctrl: bool,
    },
}

/// Everything a renderer needs to paint the live preview of a draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftPreview {
    /// Zero-based page index
    pub page: u32,
    pub kind: ShapeKind,
    /// Pixel-space geometry
    pub geometry: ShapeGeometry,
    pub style: ShapeStyle,
}

/// Opaque handle to a live preview placed on a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PreviewHandle(pub u64);

/// The document viewer collaborator.
pub trait DocumentViewer: PageMetrics + Send + Sync {
    /// Resolves container coordinates onto a page, `None` outside every page.
    fn resolve(&self, client_x: f64, client_y: f64) -> Option<PointOnPage>;

    /// Delivers an event the interaction core did not consume.
    fn dispatch(&self, event: &ViewerEvent);

    /// Opens the inline editor for a freshly created text box.
    fn open_text_editor(&self, id: &AnnotationId);
}

/// Per-page drawing surface shared by live previews and committed annotations.
///
/// `promote_preview` must swap the preview for the committed rendering in one
/// step: the renderer never shows both for the same geometry.
pub trait DrawingSurface: Send + Sync {
    fn show_preview(&self, preview: &DraftPreview) -> PreviewHandle;
    fn update_preview(&self, handle: PreviewHandle, preview: &DraftPreview);
    fn remove_preview(&self, handle: PreviewHandle);
    fn promote_preview(&self, handle: PreviewHandle, annotation: &CommittedAnnotation);
    /// Re-renders a committed annotation after an update.
    fn render_annotation(&self, annotation: &CommittedAnnotation);
    fn remove_annotation(&self, id: &AnnotationId);
    fn remove_stroke(&self, page: u32, stroke: &StrokeId);
}
