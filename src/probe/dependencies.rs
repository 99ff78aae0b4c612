use async_trait::async_trait;

use crate::geometry::Point;
use crate::probe::types::{ProbeError, StrokeHit};

/// Abstraction over the index of existing freehand strokes.
///
/// `point` is in unit space (pixel position divided by the page scale), the
/// space strokes are stored in.
#[async_trait]
pub trait StrokeIndex: Send + Sync {
    async fn hit_test(&self, page: u32, point: Point) -> Result<Option<StrokeHit>, ProbeError>;
}
