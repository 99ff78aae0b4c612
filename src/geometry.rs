//! Geometry helpers for page-local coordinates.
//!
//! This module provides:
//! - Scale normalization between pixel space and unit space
//! - Drag bounds that do not care about drag direction
//! - Text-box minimum-size clamping that keeps the box inside its page
//! - Distance helpers used for click/drag disambiguation and stroke hit-testing
//!
//! Everything here is pure. Callers pass the page scale and container size they
//! sampled; nothing is looked up behind their back.

use crate::draw::ShapeKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Lines and arrows shorter than this (in pixel space) are treated as accidental clicks.
pub const MIN_LINE_LENGTH_PX: f64 = 10.0;

/// A page-local point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a page canvas in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned bound. Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bound {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bound {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Returns true when `point` lies inside the bound (edges included).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.left + self.width
            && point.y >= self.top
            && point.y <= self.top + self.height
    }

    /// Multiplies every component by `scale` (unit space back to pixel space).
    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            left: self.left * scale,
            top: self.top * scale,
            width: self.width * scale,
            height: self.height * scale,
        }
    }
}

/// Factors applied to the font size when enforcing a text box's minimum size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextBoxMinimum {
    /// Minimum height as a multiple of the scaled font size
    pub height_factor: f64,
    /// Minimum width as a multiple of the scaled font size
    pub width_factor: f64,
}

impl Default for TextBoxMinimum {
    fn default() -> Self {
        Self {
            height_factor: 2.0,
            width_factor: 6.0,
        }
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Converts a pixel-space bound into unit space by dividing every component by `scale`.
///
/// A non-positive or non-finite scale leaves the bound untouched; page scales
/// come from the viewer and a broken one should not poison stored geometry
/// with infinities.
pub fn normalize(bound: Bound, scale: f64) -> Bound {
    if !valid_scale(scale) {
        return bound;
    }
    Bound {
        left: bound.left / scale,
        top: bound.top / scale,
        width: bound.width / scale,
        height: bound.height / scale,
    }
}

/// Converts a single pixel-space point into unit space.
pub fn normalize_point(point: Point, scale: f64) -> Point {
    if !valid_scale(scale) {
        return point;
    }
    Point {
        x: point.x / scale,
        y: point.y / scale,
    }
}

fn valid_scale(scale: f64) -> bool {
    scale.is_finite() && scale > 0.0
}

// ============================================================================
// Bounds
// ============================================================================

/// Computes the axis-aligned bound spanned by a drag, whatever its direction.
///
/// # Arguments
/// * `anchor` - Where the pointer went down
/// * `current` - The latest pointer position
pub fn bound_from(anchor: Point, current: Point) -> Bound {
    Bound {
        left: anchor.x.min(current.x),
        top: anchor.y.min(current.y),
        width: (current.x - anchor.x).abs(),
        height: (current.y - anchor.y).abs(),
    }
}

/// Clamps a point into the `[0, width] x [0, height]` canvas of a page.
pub fn clamp_point(point: Point, container: Size) -> Point {
    Point {
        x: point.x.clamp(0.0, container.width.max(0.0)),
        y: point.y.clamp(0.0, container.height.max(0.0)),
    }
}

/// Enforces the minimum size of a text box using the default factors.
///
/// See [`clamp_minimum_with`].
pub fn clamp_minimum(
    kind: ShapeKind,
    bound: Bound,
    font_size: f64,
    scale: f64,
    container: Size,
) -> Bound {
    clamp_minimum_with(
        &TextBoxMinimum::default(),
        kind,
        bound,
        font_size,
        scale,
        container,
    )
}

/// Enforces the minimum size of a text box.
///
/// # Behavior
/// - Non text-box kinds are returned unchanged
/// - Height is raised to `height_factor * font_size * scale` when smaller
/// - Width is raised to `width_factor * font_size * scale` when smaller
/// - A grown axis that would overflow the container is shifted back so the
///   box ends at the container edge; it never starts before 0
pub fn clamp_minimum_with(
    minimum: &TextBoxMinimum,
    kind: ShapeKind,
    bound: Bound,
    font_size: f64,
    scale: f64,
    container: Size,
) -> Bound {
    if kind != ShapeKind::TextBox {
        return bound;
    }

    let scaled_font = font_size * scale;
    let mut result = bound;

    let min_height = scaled_font * minimum.height_factor;
    if result.height < min_height {
        result.height = min_height;
        if result.top + min_height > container.height {
            result.top = (container.height - min_height).max(0.0);
        }
    }

    let min_width = scaled_font * minimum.width_factor;
    if result.width < min_width {
        result.width = min_width;
        if result.left + min_width > container.width {
            result.left = (container.width - min_width).max(0.0);
        }
    }

    result
}

/// Calculates ellipse parameters from a drag bound.
///
/// # Returns
/// Tuple `(cx, cy, rx, ry)` where `cx`, `cy` is the center and `rx`, `ry`
/// are half the bound's width and height.
pub fn ellipse_from_bound(bound: Bound) -> (f64, f64, f64, f64) {
    let rx = bound.width / 2.0;
    let ry = bound.height / 2.0;
    (bound.left + rx, bound.top + ry, rx, ry)
}

// ============================================================================
// Distances
// ============================================================================

/// Squared euclidean distance between two points.
pub fn distance_squared(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx * dx + dy * dy
}

/// Squared distance from `point` to the segment `a`-`b`.
///
/// Degenerate segments (a == b) fall back to the point distance.
pub fn segment_distance_squared(point: Point, a: Point, b: Point) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq <= f64::EPSILON {
        return distance_squared(point, a);
    }

    let t = (((point.x - a.x) * abx + (point.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    let projected = Point {
        x: a.x + t * abx,
        y: a.y + t * aby,
    };
    distance_squared(point, projected)
}
