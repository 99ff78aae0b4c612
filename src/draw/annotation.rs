//! Annotation records exchanged with the annotation store.
//!
//! All geometry here is in unit space: pixel geometry divided by the page
//! scale that was active when the shape was committed.

use super::color::AnnotationColor;
use super::font::FontRecord;
use super::shape::{ShapeGeometry, ShapeKind};
use crate::geometry::{Bound, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-issued annotation identifier. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(String);

impl AnnotationId {
    /// Wraps a store-issued id, rejecting empty or blank strings.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an existing freehand stroke.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeId(pub String);

impl fmt::Display for StrokeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A free shape (rectangle, ellipse, line, arrow).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeAnnotation {
    pub kind: ShapeKind,
    pub geometry: ShapeGeometry,
    pub stroke_color: AnnotationColor,
}

/// A rectangular text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBoxAnnotation {
    pub bound: Bound,
    pub fonts: Vec<FontRecord>,
}

/// Payload of an annotation, without identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum AnnotationBody {
    Shape(ShapeAnnotation),
    TextBox(TextBoxAnnotation),
}

impl AnnotationBody {
    /// Unit-space bounding box of the annotation.
    pub fn bounding_box(&self) -> Bound {
        match self {
            AnnotationBody::Shape(shape) => shape.geometry.bounding_box(),
            AnnotationBody::TextBox(text) => text.bound,
        }
    }

    /// Kind of shape this body renders as.
    pub fn kind(&self) -> ShapeKind {
        match self {
            AnnotationBody::Shape(shape) => shape.kind,
            AnnotationBody::TextBox(_) => ShapeKind::TextBox,
        }
    }

    /// Applies a patch in place.
    ///
    /// Color changes recolor a shape's stroke or every font run of a text box.
    /// A geometry patch on a text box is only honored when it is a `Rect`.
    pub fn apply(&mut self, patch: &AnnotationPatch) {
        match self {
            AnnotationBody::Shape(shape) => {
                if let Some(color) = patch.color {
                    shape.stroke_color = color;
                }
                if let Some(geometry) = patch.geometry {
                    shape.geometry = geometry;
                }
                if let Some(offset) = patch.offset {
                    shape.geometry = shape.geometry.translated(offset.x, offset.y);
                }
            }
            AnnotationBody::TextBox(text) => {
                if let Some(color) = patch.color {
                    for font in &mut text.fonts {
                        font.color = color;
                    }
                }
                if let Some(ShapeGeometry::Rect {
                    x,
                    y,
                    width,
                    height,
                }) = patch.geometry
                {
                    text.bound = Bound::new(x, y, width, height);
                }
                if let Some(offset) = patch.offset {
                    text.bound.left += offset.x;
                    text.bound.top += offset.y;
                }
            }
        }
    }
}

/// An annotation the store has acknowledged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommittedAnnotation {
    pub id: AnnotationId,
    /// Zero-based page index
    pub page: u32,
    pub body: AnnotationBody,
}

/// An annotation that has not been acknowledged yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAnnotation {
    /// Zero-based page index
    pub page: u32,
    pub body: AnnotationBody,
}

impl NewAnnotation {
    /// Binds the store-issued id, producing the durable record.
    pub fn into_committed(self, id: AnnotationId) -> CommittedAnnotation {
        CommittedAnnotation {
            id,
            page: self.page,
            body: self.body,
        }
    }
}

/// Partial change to a committed annotation (recolor, resize, reposition).
///
/// All values are in unit space. Fields left as `None` are untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationPatch {
    pub color: Option<AnnotationColor>,
    pub geometry: Option<ShapeGeometry>,
    pub offset: Option<Point>,
}

impl AnnotationPatch {
    pub fn recolor(color: AnnotationColor) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    pub fn reshape(geometry: ShapeGeometry) -> Self {
        Self {
            geometry: Some(geometry),
            ..Self::default()
        }
    }

    pub fn moved_by(dx: f64, dy: f64) -> Self {
        Self {
            offset: Some(Point::new(dx, dy)),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.geometry.is_none() && self.offset.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_body() -> AnnotationBody {
        AnnotationBody::TextBox(TextBoxAnnotation {
            bound: Bound::new(1.0, 2.0, 84.0, 28.0),
            fonts: vec![FontRecord::empty(14.0, AnnotationColor::Blue)],
        })
    }

    #[test]
    fn annotation_id_rejects_blank() {
        assert!(AnnotationId::parse("").is_none());
        assert!(AnnotationId::parse("   ").is_none());
        assert_eq!(AnnotationId::parse("a1").unwrap().as_str(), "a1");
    }

    #[test]
    fn recolor_text_box_updates_every_run() {
        let mut body = text_body();
        body.apply(&AnnotationPatch::recolor(AnnotationColor::Red));
        let AnnotationBody::TextBox(text) = body else {
            panic!("expected text box");
        };
        assert!(text.fonts.iter().all(|f| f.color == AnnotationColor::Red));
    }

    #[test]
    fn move_text_box_shifts_bound() {
        let mut body = text_body();
        body.apply(&AnnotationPatch::moved_by(10.0, -2.0));
        assert_eq!(body.bounding_box(), Bound::new(11.0, 0.0, 84.0, 28.0));
    }

    #[test]
    fn reshape_shape_replaces_geometry() {
        let mut body = AnnotationBody::Shape(ShapeAnnotation {
            kind: ShapeKind::Rectangle,
            geometry: ShapeGeometry::Rect {
                x: 0.0,
                y: 0.0,
                width: 1.0,
                height: 1.0,
            },
            stroke_color: AnnotationColor::Blue,
        });
        let geometry = ShapeGeometry::Rect {
            x: 5.0,
            y: 5.0,
            width: 10.0,
            height: 10.0,
        };
        body.apply(&AnnotationPatch::reshape(geometry));
        assert_eq!(body.bounding_box(), Bound::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(body.kind(), ShapeKind::Rectangle);
    }
}
