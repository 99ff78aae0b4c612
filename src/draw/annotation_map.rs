//! Local mirror of the committed annotations of a document.

use super::annotation::{AnnotationId, AnnotationPatch, CommittedAnnotation};
use super::shape::ShapeKind;
use crate::geometry::Point;
use std::collections::BTreeMap;

/// Committed annotations keyed by id.
///
/// This is what the store last acknowledged, never a draft. Ordering by id
/// keeps iteration deterministic for the renderer and for tests.
#[derive(Debug, Clone, Default)]
pub struct AnnotationMap {
    entries: BTreeMap<AnnotationId, CommittedAnnotation>,
}

impl AnnotationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole map, e.g. after a store refresh.
    pub fn load(&mut self, annotations: Vec<CommittedAnnotation>) {
        self.entries = annotations
            .into_iter()
            .map(|annotation| (annotation.id.clone(), annotation))
            .collect();
    }

    /// Inserts or replaces an annotation.
    pub fn insert(&mut self, annotation: CommittedAnnotation) {
        self.entries.insert(annotation.id.clone(), annotation);
    }

    pub fn get(&self, id: &AnnotationId) -> Option<&CommittedAnnotation> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &AnnotationId) -> bool {
        self.entries.contains_key(id)
    }

    /// Removes an annotation, returning it if it was present.
    pub fn remove(&mut self, id: &AnnotationId) -> Option<CommittedAnnotation> {
        self.entries.remove(id)
    }

    /// Applies a patch and returns the updated record.
    pub fn apply_patch(
        &mut self,
        id: &AnnotationId,
        patch: &AnnotationPatch,
    ) -> Option<&CommittedAnnotation> {
        let entry = self.entries.get_mut(id)?;
        entry.body.apply(patch);
        Some(entry)
    }

    /// Finds the topmost text box on `page` containing the unit-space `point`.
    pub fn text_box_at(&self, page: u32, point: Point) -> Option<&CommittedAnnotation> {
        self.entries
            .values()
            .rev()
            .filter(|a| a.page == page && a.body.kind() == ShapeKind::TextBox)
            .find(|a| a.body.bounding_box().contains(point))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates annotations in id order.
    pub fn iter(&self) -> impl Iterator<Item = &CommittedAnnotation> {
        self.entries.values()
    }
}
