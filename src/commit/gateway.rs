use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::commit::{
    dependencies::CommitDependencies,
    types::{CommitError, CreateRequest, DeleteOutcome, UpdateOutcome},
};
use crate::config::CommitConfig;
use crate::draw::{
    AnnotationId, AnnotationMap, AnnotationPatch, CommittedAnnotation, ShapeKind, StrokeId,
};
use crate::geometry::Point;
use crate::viewer::PreviewHandle;

/// Something a delete can target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DeleteTarget {
    Annotation(AnnotationId),
    Stroke(u32, StrokeId),
}

/// Commits drafts and edits to the annotation store.
///
/// The gateway keeps a local mirror of what the store has acknowledged. The
/// mirror and the drawing surface only change after the store answered, so a
/// failed call leaves both as they were (except for `create`, which removes
/// the preview it was given).
#[derive(Clone)]
pub struct CommitGateway {
    deps: CommitDependencies,
    options: Arc<CommitConfig>,
    annotations: Arc<Mutex<AnnotationMap>>,
    pending_deletes: Arc<Mutex<HashSet<DeleteTarget>>>,
}

impl CommitGateway {
    pub fn new(deps: CommitDependencies, options: CommitConfig) -> Self {
        Self {
            deps,
            options: Arc::new(options),
            annotations: Arc::new(Mutex::new(AnnotationMap::new())),
            pending_deletes: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Validates a raw id handed in from outside.
    ///
    /// Annotations without a store-issued id are not durable and cannot be
    /// updated or deleted.
    pub fn durable_id(raw: &str) -> Result<AnnotationId, CommitError> {
        AnnotationId::parse(raw).ok_or_else(|| CommitError::NotDurable(raw.to_string()))
    }

    /// Creates a finalized draft in the store.
    ///
    /// # Arguments
    /// * `request` - Unit-space shape from the interaction state machine
    /// * `preview` - Live preview currently showing the draft
    ///
    /// # Behavior
    /// - Success: the preview is promoted to the committed rendering in one
    ///   step; a text box also gets its inline editor opened
    /// - Failure (store error or an empty id): the preview is removed and
    ///   the error returned
    pub async fn create(
        &self,
        request: &CreateRequest,
        preview: PreviewHandle,
    ) -> Result<CommittedAnnotation, CommitError> {
        let annotation = request.to_new_annotation();

        let raw_id = match self.deps.store.create(&annotation).await {
            Ok(raw_id) => raw_id,
            Err(err) => {
                log::error!(
                    "Failed to create {:?} on page {}: {}",
                    request.kind,
                    request.page,
                    err
                );
                self.deps.surface.remove_preview(preview);
                return Err(err.into());
            }
        };

        let Some(id) = AnnotationId::parse(raw_id) else {
            log::warn!(
                "Store returned no id for new {:?}; rolling back preview",
                request.kind
            );
            self.deps.surface.remove_preview(preview);
            return Err(CommitError::MissingId);
        };

        let committed = annotation.into_committed(id);
        self.deps.surface.promote_preview(preview, &committed);
        self.annotations.lock().await.insert(committed.clone());
        log::info!(
            "Created {:?} {} on page {}",
            request.kind,
            committed.id,
            committed.page
        );

        if request.kind == ShapeKind::TextBox {
            self.deps.viewer.open_text_editor(&committed.id);
        }

        self.refresh_if_configured().await;
        Ok(committed)
    }

    /// Applies a recolor, resize or move to a committed annotation.
    ///
    /// The local mirror and the rendering change only after the store
    /// confirms. Unknown ids are a no-op.
    pub async fn update(
        &self,
        id: &AnnotationId,
        patch: &AnnotationPatch,
    ) -> Result<UpdateOutcome, CommitError> {
        if patch.is_empty() {
            return Ok(UpdateOutcome::Applied);
        }

        let Some(mut updated) = self.annotations.lock().await.get(id).cloned() else {
            log::debug!("Update for unknown annotation {}; ignoring", id);
            return Ok(UpdateOutcome::Missing);
        };
        updated.body.apply(patch);

        if !self.deps.store.update(&updated).await? {
            log::debug!("Store does not know annotation {}; update ignored", id);
            return Ok(UpdateOutcome::Missing);
        }

        let rendered = {
            let mut annotations = self.annotations.lock().await;
            annotations.apply_patch(id, patch).cloned()
        };
        if let Some(annotation) = rendered {
            self.deps.surface.render_annotation(&annotation);
        }
        log::info!("Updated annotation {}", id);

        self.refresh_if_configured().await;
        Ok(UpdateOutcome::Applied)
    }

    /// Deletes a committed annotation after the user confirmed.
    ///
    /// A delete of an id that is already being deleted returns
    /// [`DeleteOutcome::AlreadyPending`] without prompting.
    pub async fn delete(&self, id: &AnnotationId) -> Result<DeleteOutcome, CommitError> {
        let target = DeleteTarget::Annotation(id.clone());
        if !self.begin_delete(&target).await {
            log::debug!("Delete of annotation {} already in flight", id);
            return Ok(DeleteOutcome::AlreadyPending);
        }

        let result = self.delete_annotation(id).await;
        self.pending_deletes.lock().await.remove(&target);
        result
    }

    async fn delete_annotation(&self, id: &AnnotationId) -> Result<DeleteOutcome, CommitError> {
        if !self.deps.confirm.confirm(&self.options.delete_confirm_title).await {
            log::debug!("Delete of annotation {} cancelled", id);
            return Ok(DeleteOutcome::Cancelled);
        }

        if !self.deps.store.delete(id).await? {
            log::debug!("Store does not know annotation {}; nothing deleted", id);
            return Ok(DeleteOutcome::Missing);
        }

        self.annotations.lock().await.remove(id);
        self.deps.surface.remove_annotation(id);
        log::info!("Deleted annotation {}", id);

        self.refresh_if_configured().await;
        Ok(DeleteOutcome::Removed)
    }

    /// Deletes an existing freehand stroke after the user confirmed.
    ///
    /// Same contract as [`CommitGateway::delete`].
    pub async fn delete_stroke(
        &self,
        page: u32,
        stroke: &StrokeId,
    ) -> Result<DeleteOutcome, CommitError> {
        let target = DeleteTarget::Stroke(page, stroke.clone());
        if !self.begin_delete(&target).await {
            log::debug!("Delete of stroke {} already in flight", stroke);
            return Ok(DeleteOutcome::AlreadyPending);
        }

        let result = self.delete_stroke_confirmed(page, stroke).await;
        self.pending_deletes.lock().await.remove(&target);
        result
    }

    async fn delete_stroke_confirmed(
        &self,
        page: u32,
        stroke: &StrokeId,
    ) -> Result<DeleteOutcome, CommitError> {
        if !self.deps.confirm.confirm(&self.options.delete_confirm_title).await {
            log::debug!("Delete of stroke {} cancelled", stroke);
            return Ok(DeleteOutcome::Cancelled);
        }

        if !self.deps.store.delete_stroke(page, stroke).await? {
            log::debug!("Store does not know stroke {}; nothing deleted", stroke);
            return Ok(DeleteOutcome::Missing);
        }

        self.deps.surface.remove_stroke(page, stroke);
        log::info!("Deleted stroke {} on page {}", stroke, page);
        Ok(DeleteOutcome::Removed)
    }

    /// Reloads the local mirror from the store.
    ///
    /// Returns the number of annotations loaded.
    pub async fn refresh(&self) -> Result<usize, CommitError> {
        let loaded = self.deps.store.load_annotation_map().await?;
        let count = loaded.len();
        self.annotations.lock().await.load(loaded);
        log::debug!("Loaded {} annotations from store", count);
        Ok(count)
    }

    /// Snapshot of the committed annotations, in id order.
    pub async fn annotations(&self) -> Vec<CommittedAnnotation> {
        self.annotations.lock().await.iter().cloned().collect()
    }

    /// Finds the text box on `page` under a unit-space point.
    pub async fn text_box_at(&self, page: u32, point: Point) -> Option<AnnotationId> {
        self.annotations
            .lock()
            .await
            .text_box_at(page, point)
            .map(|annotation| annotation.id.clone())
    }

    async fn begin_delete(&self, target: &DeleteTarget) -> bool {
        self.pending_deletes.lock().await.insert(target.clone())
    }

    async fn refresh_if_configured(&self) {
        if !self.options.refresh_after_mutation {
            return;
        }
        if let Err(err) = self.refresh().await {
            log::warn!("Refresh after mutation failed: {}", err);
        }
    }
}
