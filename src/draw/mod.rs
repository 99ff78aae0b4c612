//! Annotation model: colors, fonts, shapes and committed records.
//!
//! This module defines the data exchanged between the interaction core, the
//! drawing surface and the annotation store:
//! - [`AnnotationColor`]: palette entry persisted with every annotation
//! - [`ShapeKind`] / [`ShapeGeometry`]: what a creation gesture produces
//! - [`CommittedAnnotation`]: a record the store has acknowledged
//! - [`AnnotationMap`]: local mirror of the committed records

pub mod annotation;
pub mod annotation_map;
pub mod color;
pub mod font;
pub mod shape;

pub use annotation::{
    AnnotationBody, AnnotationId, AnnotationPatch, CommittedAnnotation, NewAnnotation,
    ShapeAnnotation, StrokeId, TextBoxAnnotation,
};
pub use annotation_map::AnnotationMap;
pub use color::{AnnotationColor, Color};
pub use font::FontRecord;
pub use shape::{ShapeGeometry, ShapeKind, ShapeStyle};
