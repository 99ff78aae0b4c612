//! Shape kinds and geometry for page annotations.

use super::color::AnnotationColor;
use crate::geometry::{self, Bound, Point};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What a creation gesture produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Rectangle outline, corner to corner
    Rectangle,
    /// Ellipse inscribed in the drag bound
    Ellipse,
    /// Straight segment from anchor to release point
    Line,
    /// Segment with an arrowhead at the release point
    Arrow,
    /// Rectangular text box holding font records
    TextBox,
}

impl ShapeKind {
    /// Whether this kind is a two-point segment (line or arrow).
    pub fn is_segment(self) -> bool {
        matches!(self, ShapeKind::Line | ShapeKind::Arrow)
    }
}

/// Geometry of a shape in a single coordinate space.
///
/// The same type is used for pixel-space previews and unit-space storage;
/// which space a value is in is decided by whoever produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeGeometry {
    /// Rectangle or text box
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Ellipse given by center and radii
    Ellipse {
        cx: f64,
        cy: f64,
        radius_x: f64,
        radius_y: f64,
    },
    /// Line or arrow from (x1, y1) to (x2, y2)
    Segment { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl ShapeGeometry {
    /// Builds pixel-space geometry for a drag of `kind` from `anchor` to `current`.
    ///
    /// `bound` is the (possibly clamped) drag bound; segments ignore it and use
    /// the two points directly so the arrow keeps its direction.
    pub fn for_drag(kind: ShapeKind, anchor: Point, current: Point, bound: Bound) -> Self {
        match kind {
            ShapeKind::Rectangle | ShapeKind::TextBox => ShapeGeometry::Rect {
                x: bound.left,
                y: bound.top,
                width: bound.width,
                height: bound.height,
            },
            ShapeKind::Ellipse => {
                let (cx, cy, radius_x, radius_y) = geometry::ellipse_from_bound(bound);
                ShapeGeometry::Ellipse {
                    cx,
                    cy,
                    radius_x,
                    radius_y,
                }
            }
            ShapeKind::Line | ShapeKind::Arrow => ShapeGeometry::Segment {
                x1: anchor.x,
                y1: anchor.y,
                x2: current.x,
                y2: current.y,
            },
        }
    }

    /// Divides every coordinate by `scale` (pixel space to unit space).
    pub fn normalized(&self, scale: f64) -> Self {
        if !(scale.is_finite() && scale > 0.0) {
            return *self;
        }
        self.scaled(1.0 / scale)
    }

    /// Multiplies every coordinate by `scale`.
    pub fn scaled(&self, scale: f64) -> Self {
        match *self {
            ShapeGeometry::Rect {
                x,
                y,
                width,
                height,
            } => ShapeGeometry::Rect {
                x: x * scale,
                y: y * scale,
                width: width * scale,
                height: height * scale,
            },
            ShapeGeometry::Ellipse {
                cx,
                cy,
                radius_x,
                radius_y,
            } => ShapeGeometry::Ellipse {
                cx: cx * scale,
                cy: cy * scale,
                radius_x: radius_x * scale,
                radius_y: radius_y * scale,
            },
            ShapeGeometry::Segment { x1, y1, x2, y2 } => ShapeGeometry::Segment {
                x1: x1 * scale,
                y1: y1 * scale,
                x2: x2 * scale,
                y2: y2 * scale,
            },
        }
    }

    /// Shifts the geometry by (`dx`, `dy`).
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        match *self {
            ShapeGeometry::Rect {
                x,
                y,
                width,
                height,
            } => ShapeGeometry::Rect {
                x: x + dx,
                y: y + dy,
                width,
                height,
            },
            ShapeGeometry::Ellipse {
                cx,
                cy,
                radius_x,
                radius_y,
            } => ShapeGeometry::Ellipse {
                cx: cx + dx,
                cy: cy + dy,
                radius_x,
                radius_y,
            },
            ShapeGeometry::Segment { x1, y1, x2, y2 } => ShapeGeometry::Segment {
                x1: x1 + dx,
                y1: y1 + dy,
                x2: x2 + dx,
                y2: y2 + dy,
            },
        }
    }

    /// Returns the axis-aligned bounding box of the geometry.
    pub fn bounding_box(&self) -> Bound {
        match *self {
            ShapeGeometry::Rect {
                x,
                y,
                width,
                height,
            } => Bound::new(x, y, width, height),
            ShapeGeometry::Ellipse {
                cx,
                cy,
                radius_x,
                radius_y,
            } => Bound::new(cx - radius_x, cy - radius_y, radius_x * 2.0, radius_y * 2.0),
            ShapeGeometry::Segment { x1, y1, x2, y2 } => {
                geometry::bound_from(Point::new(x1, y1), Point::new(x2, y2))
            }
        }
    }
}

/// Styling applied to a new shape when it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke (and text) color
    pub color: AnnotationColor,
    /// Font size for text boxes, in points
    pub font_size: f64,
    /// Stroke width in unit space
    pub stroke_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: AnnotationColor::default(),
            font_size: 14.0,
            stroke_width: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_geometry_per_kind() {
        let anchor = Point::new(200.0, 200.0);
        let current = Point::new(400.0, 400.0);
        let bound = geometry::bound_from(anchor, current);

        assert_eq!(
            ShapeGeometry::for_drag(ShapeKind::Ellipse, anchor, current, bound),
            ShapeGeometry::Ellipse {
                cx: 300.0,
                cy: 300.0,
                radius_x: 100.0,
                radius_y: 100.0,
            }
        );
        assert_eq!(
            ShapeGeometry::for_drag(ShapeKind::Arrow, current, anchor, bound),
            ShapeGeometry::Segment {
                x1: 400.0,
                y1: 400.0,
                x2: 200.0,
                y2: 200.0,
            }
        );
    }

    #[test]
    fn ellipse_normalizes_to_unit_space() {
        let pixel = ShapeGeometry::Ellipse {
            cx: 300.0,
            cy: 300.0,
            radius_x: 100.0,
            radius_y: 100.0,
        };
        assert_eq!(
            pixel.normalized(2.0),
            ShapeGeometry::Ellipse {
                cx: 150.0,
                cy: 150.0,
                radius_x: 50.0,
                radius_y: 50.0,
            }
        );
    }

    #[test]
    fn bounding_box_of_ellipse_and_segment() {
        let ellipse = ShapeGeometry::Ellipse {
            cx: 10.0,
            cy: 10.0,
            radius_x: 5.0,
            radius_y: 2.0,
        };
        assert_eq!(ellipse.bounding_box(), Bound::new(5.0, 8.0, 10.0, 4.0));

        let segment = ShapeGeometry::Segment {
            x1: 10.0,
            y1: 0.0,
            x2: 0.0,
            y2: 5.0,
        };
        assert_eq!(segment.bounding_box(), Bound::new(0.0, 0.0, 10.0, 5.0));
    }

    #[test]
    fn translate_moves_every_point() {
        let segment = ShapeGeometry::Segment {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
        };
        assert_eq!(
            segment.translated(2.0, 3.0),
            ShapeGeometry::Segment {
                x1: 2.0,
                y1: 3.0,
                x2: 3.0,
                y2: 4.0,
            }
        );
    }
}
