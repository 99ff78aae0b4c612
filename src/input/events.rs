//! Pointer event types shared by the viewer and the interaction core.

use super::modifiers::Modifiers;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// A pointer position resolved onto a page by the document viewer.
///
/// Coordinates are page-local and in pixel space (already multiplied by the
/// page's render scale).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointOnPage {
    /// Zero-based page index
    pub page: u32,
    pub x: f64,
    pub y: f64,
}

impl PointOnPage {
    pub fn new(page: u32, x: f64, y: f64) -> Self {
        Self { page, x, y }
    }
}

/// A pointer position stamped with its arrival order.
///
/// The ordinal is assigned by the interaction core as events arrive and is
/// the only ordering key; wall-clock time plays no part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    /// Zero-based page index
    pub page: u32,
    pub x: f64,
    pub y: f64,
    /// Monotonic arrival order
    pub ordinal: u64,
}

impl PointerSample {
    /// Page-local position in pixel space.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Kind of pointer callback delivered by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
    DoubleClick,
}

/// A pointer callback after the viewer resolved it onto a page.
///
/// `point` is `None` when the event fell outside every page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub point: Option<PointOnPage>,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, point: Option<PointOnPage>) -> Self {
        Self {
            kind,
            point,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A raw pointer callback in container coordinates, before page resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointerEvent {
    pub kind: PointerEventKind,
    pub client_x: f64,
    pub client_y: f64,
    pub modifiers: Modifiers,
}
