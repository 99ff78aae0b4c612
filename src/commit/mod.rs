//! Committing drafts and edits to the annotation store.
//!
//! This module provides:
//! - Creation of finalized drafts, with preview promotion or rollback
//! - Recolor, resize and move of committed annotations
//! - Confirmed, double-invocation-safe deletion of annotations and strokes
//! - Refreshing the local mirror from the store

pub mod types;

mod dependencies;
mod gateway;

pub use dependencies::{AnnotationStore, CommitDependencies, ConfirmDialog};
pub use gateway::CommitGateway;
pub use types::{CommitError, CreateRequest, DeleteOutcome, StoreError, UpdateOutcome};
