//! Data types for committing annotations to the store.

use crate::draw::{
    AnnotationBody, FontRecord, NewAnnotation, ShapeAnnotation, ShapeGeometry, ShapeKind,
    ShapeStyle, TextBoxAnnotation,
};
use crate::geometry::Bound;
use serde::Serialize;
use thiserror::Error;

/// A finalized draft, ready to be created in the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRequest {
    /// Zero-based page index
    pub page: u32,
    pub kind: ShapeKind,
    /// Unit-space geometry (pixel geometry divided by `scale`)
    pub geometry: ShapeGeometry,
    pub style: ShapeStyle,
    /// Page scale the geometry was normalized with
    pub scale: f64,
}

impl CreateRequest {
    /// Builds the store payload.
    ///
    /// Text boxes carry one empty font record with the active font size and
    /// color; the inline editor fills it in after creation.
    pub fn to_new_annotation(&self) -> NewAnnotation {
        let body = match self.kind {
            ShapeKind::TextBox => {
                let bound: Bound = self.geometry.bounding_box();
                AnnotationBody::TextBox(TextBoxAnnotation {
                    bound,
                    fonts: vec![FontRecord::empty(self.style.font_size, self.style.color)],
                })
            }
            kind => AnnotationBody::Shape(ShapeAnnotation {
                kind,
                geometry: self.geometry,
                stroke_color: self.style.color,
            }),
        };
        NewAnnotation {
            page: self.page,
            body,
        }
    }
}

/// Outcome of an update that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    Applied,
    /// The store does not know the id; nothing changed
    Missing,
}

/// Outcome of a delete that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Removed,
    /// The user declined the confirmation
    Cancelled,
    /// Another delete of the same target is already in flight
    AlreadyPending,
    /// The store no longer knows the target
    Missing,
}

/// Errors reported by an annotation store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("annotation store unavailable: {0}")]
    Unavailable(String),

    #[error("annotation store rejected the request: {0}")]
    Rejected(String),
}

/// Errors surfaced by the commit gateway.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("store acknowledged the annotation without an id")]
    MissingId,

    #[error("annotation {0} is not durable; it has no store-issued id")]
    NotDurable(String),

    #[error("commit task was cancelled: {0}")]
    Cancelled(String),
}
