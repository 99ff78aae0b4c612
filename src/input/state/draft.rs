//! In-progress shapes and their finalization.

use super::core::InteractionLimits;
use crate::commit::CreateRequest;
use crate::draw::{ShapeGeometry, ShapeKind, ShapeStyle};
use crate::geometry::{self, Bound, Point, Size};
use crate::input::events::PointerSample;
use crate::viewer::DraftPreview;

/// A shape being drawn. Everything here is in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDraft {
    pub kind: ShapeKind,
    /// Where the pointer went down; fixes the page of the draft
    pub anchor: PointerSample,
    /// Latest pointer position on the anchor page
    pub current: Point,
    /// Bound spanned by `anchor` and `current`
    pub current_bound: Bound,
    pub style: ShapeStyle,
}

/// What a pointer-up turns a draft into.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftOutcome {
    /// Final pixel preview plus the unit-space request for the store
    Commit {
        preview: DraftPreview,
        request: CreateRequest,
    },
    /// Too small to mean anything; dropped without a commit
    Degenerate,
}

impl ShapeDraft {
    pub fn new(kind: ShapeKind, anchor: PointerSample, style: ShapeStyle) -> Self {
        let origin = anchor.position();
        Self {
            kind,
            anchor,
            current: origin,
            current_bound: geometry::bound_from(origin, origin),
            style,
        }
    }

    /// Moves the free corner to `point`.
    ///
    /// With a `container` the point is first clamped into the page canvas.
    pub fn update(&mut self, point: Point, container: Option<Size>) {
        self.current = match container {
            Some(size) => geometry::clamp_point(point, size),
            None => point,
        };
        self.current_bound = geometry::bound_from(self.anchor.position(), self.current);
    }

    /// Pixel-space preview of the current draft.
    pub fn preview(&self) -> DraftPreview {
        self.preview_for(self.current, self.current_bound)
    }

    fn preview_for(&self, current: Point, bound: Bound) -> DraftPreview {
        DraftPreview {
            page: self.anchor.page,
            kind: self.kind,
            geometry: ShapeGeometry::for_drag(self.kind, self.anchor.position(), current, bound),
            style: self.style,
        }
    }

    /// Turns the draft into a create request at pointer-up.
    ///
    /// # Arguments
    /// * `end` - Release position on the anchor page
    /// * `scale` - Current scale of the anchor page
    /// * `container` - Canvas size of the anchor page, sampled now
    /// * `limits` - Gesture thresholds
    ///
    /// # Behavior
    /// - Lines and arrows shorter than the minimum length are degenerate
    /// - Text boxes are grown to their minimum size inside `container`
    /// - Geometry is normalized by `scale` for storage
    pub fn finalize(
        &mut self,
        end: Point,
        scale: f64,
        container: Size,
        limits: &InteractionLimits,
    ) -> DraftOutcome {
        let clamp = limits.clamp_preview_to_page.then_some(container);
        self.update(end, clamp);

        let anchor = self.anchor.position();
        if self.kind.is_segment() {
            let min = limits.line_min_length_px;
            if geometry::distance_squared(anchor, self.current) < min * min {
                log::debug!(
                    "Discarding {:?} shorter than {}px on page {}",
                    self.kind,
                    min,
                    self.anchor.page
                );
                return DraftOutcome::Degenerate;
            }
        }

        let bound = geometry::clamp_minimum_with(
            &limits.text_minimum,
            self.kind,
            self.current_bound,
            self.style.font_size,
            scale,
            container,
        );
        self.current_bound = bound;

        let preview = self.preview_for(self.current, bound);
        let request = CreateRequest {
            page: self.anchor.page,
            kind: self.kind,
            geometry: preview.geometry.normalized(scale),
            style: self.style,
            scale,
        };
        DraftOutcome::Commit { preview, request }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(x: f64, y: f64) -> PointerSample {
        PointerSample {
            page: 0,
            x,
            y,
            ordinal: 1,
        }
    }

    fn page() -> Size {
        Size::new(1000.0, 1000.0)
    }

    #[test]
    fn rectangle_commits_unit_geometry() {
        let mut draft = ShapeDraft::new(ShapeKind::Rectangle, anchor(100.0, 100.0), ShapeStyle::default());
        let outcome = draft.finalize(
            Point::new(300.0, 250.0),
            1.0,
            page(),
            &InteractionLimits::default(),
        );
        match outcome {
            DraftOutcome::Commit { request, .. } => assert_eq!(
                request.geometry,
                ShapeGeometry::Rect {
                    x: 100.0,
                    y: 100.0,
                    width: 200.0,
                    height: 150.0
                }
            ),
            other => panic!("expected commit, got {other:?}"),
        }
    }

    #[test]
    fn ellipse_radii_are_divided_by_scale() {
        let mut draft = ShapeDraft::new(ShapeKind::Ellipse, anchor(200.0, 200.0), ShapeStyle::default());
        let outcome = draft.finalize(
            Point::new(400.0, 400.0),
            2.0,
            page(),
            &InteractionLimits::default(),
        );
        let DraftOutcome::Commit { preview, request } = outcome else {
            panic!("expected commit");
        };
        assert_eq!(
            request.geometry,
            ShapeGeometry::Ellipse {
                cx: 150.0,
                cy: 150.0,
                radius_x: 50.0,
                radius_y: 50.0
            }
        );
        assert_eq!(preview.geometry, request.geometry.scaled(2.0));
    }

    #[test]
    fn short_line_is_degenerate() {
        let mut draft = ShapeDraft::new(ShapeKind::Line, anchor(50.0, 50.0), ShapeStyle::default());
        let outcome = draft.finalize(
            Point::new(52.0, 52.0),
            1.0,
            page(),
            &InteractionLimits::default(),
        );
        assert_eq!(outcome, DraftOutcome::Degenerate);
    }

    #[test]
    fn arrow_keeps_its_direction() {
        let mut draft = ShapeDraft::new(ShapeKind::Arrow, anchor(300.0, 300.0), ShapeStyle::default());
        let outcome = draft.finalize(
            Point::new(100.0, 200.0),
            2.0,
            page(),
            &InteractionLimits::default(),
        );
        let DraftOutcome::Commit { request, .. } = outcome else {
            panic!("expected commit");
        };
        assert_eq!(
            request.geometry,
            ShapeGeometry::Segment {
                x1: 150.0,
                y1: 150.0,
                x2: 50.0,
                y2: 100.0
            }
        );
    }

    #[test]
    fn text_box_grows_to_minimum_size() {
        let mut draft = ShapeDraft::new(ShapeKind::TextBox, anchor(990.0, 995.0), ShapeStyle::default());
        let outcome = draft.finalize(
            Point::new(1000.0, 1000.0),
            1.0,
            page(),
            &InteractionLimits::default(),
        );
        let DraftOutcome::Commit { request, .. } = outcome else {
            panic!("expected commit");
        };
        let bound = request.geometry.bounding_box();
        assert_eq!(bound.height, 28.0);
        assert_eq!(bound.width, 84.0);
        assert!(bound.left >= 0.0 && bound.left + bound.width <= 1000.0);
        assert!(bound.top >= 0.0 && bound.top + bound.height <= 1000.0);
    }

    #[test]
    fn update_clamps_into_page() {
        let mut draft = ShapeDraft::new(ShapeKind::Rectangle, anchor(10.0, 10.0), ShapeStyle::default());
        draft.update(Point::new(-40.0, 2000.0), Some(page()));
        assert_eq!(draft.current, Point::new(0.0, 1000.0));
        assert_eq!(draft.current_bound, Bound::new(0.0, 10.0, 10.0, 990.0));

        draft.update(Point::new(-40.0, 2000.0), None);
        assert_eq!(draft.current, Point::new(-40.0, 2000.0));
    }
}
