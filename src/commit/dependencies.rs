use std::sync::Arc;

use async_trait::async_trait;

use crate::commit::types::StoreError;
use crate::draw::{AnnotationId, CommittedAnnotation, NewAnnotation, StrokeId};
use crate::viewer::{DocumentViewer, DrawingSurface};

/// Abstraction over the annotation store (usually a remote service).
///
/// Update and delete report `Ok(false)` when the store does not know the target.
#[async_trait]
pub trait AnnotationStore: Send + Sync {
    /// Persists a new annotation and returns the id the store issued for it.
    async fn create(&self, annotation: &NewAnnotation) -> Result<String, StoreError>;
    async fn update(&self, annotation: &CommittedAnnotation) -> Result<bool, StoreError>;
    async fn delete(&self, id: &AnnotationId) -> Result<bool, StoreError>;
    async fn delete_stroke(&self, page: u32, stroke: &StrokeId) -> Result<bool, StoreError>;
    async fn load_annotation_map(&self) -> Result<Vec<CommittedAnnotation>, StoreError>;
}

/// Abstraction over the confirmation prompt shown before deleting.
#[async_trait]
pub trait ConfirmDialog: Send + Sync {
    async fn confirm(&self, title: &str) -> bool;
}

/// Bundle of collaborators used by the commit gateway. Each can be mocked in tests.
#[derive(Clone)]
pub struct CommitDependencies {
    pub store: Arc<dyn AnnotationStore>,
    pub confirm: Arc<dyn ConfirmDialog>,
    pub surface: Arc<dyn DrawingSurface>,
    pub viewer: Arc<dyn DocumentViewer>,
}
