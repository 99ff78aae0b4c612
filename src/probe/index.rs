//! In-process stroke index with lazy per-page decoding.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::{Duration, sleep};

use crate::draw::StrokeId;
use crate::geometry::{self, Bound, Point};
use crate::probe::{
    dependencies::StrokeIndex,
    types::{ProbeError, StrokeHit},
};

fn default_stroke_width() -> f64 {
    2.0
}

/// A freehand stroke as delivered by the store, in unit space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeRecord {
    pub id: String,
    /// Polyline vertices as `[x, y]` pairs
    pub points: Vec<[f64; 2]>,
    #[serde(default = "default_stroke_width")]
    pub width: f64,
}

/// Stroke geometry prepared for hit-testing.
#[derive(Debug)]
struct DecodedStroke {
    id: StrokeId,
    bound: Bound,
    points: Vec<Point>,
    half_width: f64,
}

impl DecodedStroke {
    fn decode(page: u32, record: &StrokeRecord) -> Result<Self, ProbeError> {
        if record.points.is_empty() {
            return Err(ProbeError::Decode {
                page,
                reason: format!("stroke {} has no points", record.id),
            });
        }

        let mut points = Vec::with_capacity(record.points.len());
        for [x, y] in &record.points {
            if !x.is_finite() || !y.is_finite() {
                return Err(ProbeError::Decode {
                    page,
                    reason: format!("stroke {} has a non-finite point", record.id),
                });
            }
            points.push(Point::new(*x, *y));
        }

        let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            id: StrokeId(record.id.clone()),
            bound: Bound::new(min_x, min_y, max_x - min_x, max_y - min_y),
            points,
            half_width: record.width.max(0.0) / 2.0,
        })
    }

    fn is_hit(&self, point: Point, tolerance: f64) -> bool {
        let reach = tolerance + self.half_width;
        let inflated = Bound::new(
            self.bound.left - reach,
            self.bound.top - reach,
            self.bound.width + reach * 2.0,
            self.bound.height + reach * 2.0,
        );
        if !inflated.contains(point) {
            return false;
        }

        let reach_sq = reach * reach;
        if self.points.len() == 1 {
            return geometry::distance_squared(point, self.points[0]) <= reach_sq;
        }
        self.points
            .windows(2)
            .any(|pair| geometry::segment_distance_squared(point, pair[0], pair[1]) <= reach_sq)
    }
}

#[derive(Default)]
struct IndexState {
    raw: HashMap<u32, Vec<StrokeRecord>>,
    decoded: HashMap<u32, Arc<Vec<DecodedStroke>>>,
    unavailable: HashSet<u32>,
}

/// Stroke index over per-page stroke records.
///
/// Pages are decoded on first probe and cached until their strokes change.
/// An optional artificial latency makes probe resolution observably
/// asynchronous, which the replay harness uses to exercise buffering.
pub struct PageStrokeIndex {
    state: Mutex<IndexState>,
    /// Hit distance in unit space, added to half the stroke width.
    tolerance: f64,
    latency: Option<Duration>,
}

impl PageStrokeIndex {
    pub fn new(tolerance: f64) -> Self {
        Self {
            state: Mutex::new(IndexState::default()),
            tolerance,
            latency: None,
        }
    }

    /// Delay every probe by `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Replaces the strokes of `page`.
    pub async fn set_page(&self, page: u32, strokes: Vec<StrokeRecord>) {
        let mut state = self.state.lock().await;
        state.decoded.remove(&page);
        state.raw.insert(page, strokes);
    }

    /// Makes every probe on `page` fail until strokes are set again.
    pub async fn mark_unavailable(&self, page: u32) {
        self.state.lock().await.unavailable.insert(page);
    }

    /// Forgets a stroke after it was deleted.
    pub async fn remove_stroke(&self, page: u32, stroke: &StrokeId) -> bool {
        let mut state = self.state.lock().await;
        let Some(records) = state.raw.get_mut(&page) else {
            return false;
        };
        let before = records.len();
        records.retain(|record| record.id != stroke.0);
        let removed = records.len() != before;
        if removed {
            state.decoded.remove(&page);
        }
        removed
    }

    async fn decoded_page(&self, page: u32) -> Result<Arc<Vec<DecodedStroke>>, ProbeError> {
        let mut state = self.state.lock().await;
        if state.unavailable.contains(&page) {
            return Err(ProbeError::PageUnavailable(page));
        }
        if let Some(decoded) = state.decoded.get(&page) {
            return Ok(Arc::clone(decoded));
        }

        let decoded = match state.raw.get(&page) {
            Some(records) => records
                .iter()
                .map(|record| DecodedStroke::decode(page, record))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        log::debug!("Decoded {} strokes for page {}", decoded.len(), page);

        let decoded = Arc::new(decoded);
        state.decoded.insert(page, Arc::clone(&decoded));
        Ok(decoded)
    }
}

#[async_trait]
impl StrokeIndex for PageStrokeIndex {
    async fn hit_test(&self, page: u32, point: Point) -> Result<Option<StrokeHit>, ProbeError> {
        if let Some(latency) = self.latency {
            sleep(latency).await;
        }

        let strokes = self.decoded_page(page).await?;
        // Last drawn is on top.
        Ok(strokes
            .iter()
            .rev()
            .find(|stroke| stroke.is_hit(point, self.tolerance))
            .map(|stroke| StrokeHit {
                page,
                stroke: stroke.id.clone(),
            }))
    }
}
