//! Pointer interaction core for annotating paginated documents.
//!
//! Turns raw pointer events over a multi-page viewer into shape drafts,
//! stroke selection gestures and committed annotations:
//! - [`input`]: the interaction state machine and event buffering
//! - [`probe`]: asynchronous hit-testing against existing freehand strokes
//! - [`commit`]: create, update and delete against the annotation store
//! - [`controller`]: async driver wiring the three to the viewer
//! - [`replay`]: scripted sessions against in-memory collaborators

pub mod commit;
pub mod config;
pub mod controller;
pub mod draw;
pub mod geometry;
pub mod input;
pub mod probe;
pub mod replay;
pub mod viewer;

pub use config::Config;
