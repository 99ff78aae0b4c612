use super::*;
use crate::draw::{AnnotationId, ShapeGeometry, ShapeKind, ShapeStyle, StrokeId};
use crate::geometry::Size;
use crate::input::{Modifiers, PointOnPage, PointerSample, Tool};
use crate::probe::StrokeHit;
use crate::viewer::{PageMetrics, ViewerEvent};

struct FixedPages {
    scale: f64,
    size: Size,
}

impl PageMetrics for FixedPages {
    fn scale_of(&self, _page: u32) -> f64 {
        self.scale
    }

    fn page_size(&self, _page: u32) -> Size {
        self.size
    }
}

fn pages() -> FixedPages {
    FixedPages {
        scale: 1.0,
        size: Size::new(1000.0, 1000.0),
    }
}

fn create_test_input_state() -> InputState {
    InputState::with_defaults(ShapeStyle::default(), InteractionLimits::default())
}

fn at(page: u32, x: f64, y: f64) -> Option<PointOnPage> {
    Some(PointOnPage::new(page, x, y))
}

fn forwarded(effects: &[Effect]) -> Vec<ViewerEvent> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Forward(event) => Some(event.clone()),
            _ => None,
        })
        .collect()
}

fn started_session(effects: &[Effect]) -> (SessionId, PointerSample) {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::StartProbe { session, sample } => Some((*session, *sample)),
            _ => None,
        })
        .expect("pointer down should start a probe")
}

fn move_positions(events: &[ViewerEvent]) -> Vec<(f64, f64)> {
    events
        .iter()
        .filter_map(|event| match event {
            ViewerEvent::Move { sample } => Some((sample.x, sample.y)),
            _ => None,
        })
        .collect()
}

fn stroke_hit(id: &str) -> StrokeHit {
    StrokeHit {
        page: 0,
        stroke: StrokeId(id.to_string()),
    }
}

// ============================================================================
// Drafting
// ============================================================================

#[test]
fn armed_pointer_down_starts_draft_with_preview() {
    let mut state = create_test_input_state();
    state.arm(ShapeKind::Rectangle);

    let effects = state.on_pointer_down(at(0, 100.0, 100.0), Modifiers::new());

    assert!(matches!(effects.as_slice(), [Effect::ShowPreview(_)]));
    assert!(state.draft().is_some());
    assert!(state.probing_session().is_none());
}

#[test]
fn rectangle_drag_commits_normalized_geometry() {
    let mut state = create_test_input_state();
    let metrics = FixedPages {
        scale: 2.0,
        size: Size::new(2000.0, 2000.0),
    };
    state.arm(ShapeKind::Rectangle);
    state.on_pointer_down(at(0, 100.0, 100.0), Modifiers::new());

    let moved = state.on_pointer_move(at(0, 200.0, 150.0), &metrics);
    assert!(matches!(moved.as_slice(), [Effect::UpdatePreview(_)]));

    let effects = state.on_pointer_up(at(0, 300.0, 250.0), &metrics);
    let request = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Commit(request) => Some(request.clone()),
            _ => None,
        })
        .expect("drag should commit");
    assert_eq!(
        request.geometry,
        ShapeGeometry::Rect {
            x: 50.0,
            y: 50.0,
            width: 100.0,
            height: 75.0
        }
    );
    assert_eq!(request.scale, 2.0);
    assert!(!effects.contains(&Effect::RemovePreview));
    assert!(state.is_idle());
    assert_eq!(state.tool, Tool::Select);
}

#[test]
fn short_line_commits_nothing() {
    let mut state = create_test_input_state();
    state.arm(ShapeKind::Line);
    state.on_pointer_down(at(0, 50.0, 50.0), Modifiers::new());

    let effects = state.on_pointer_up(at(0, 52.0, 52.0), &pages());

    assert_eq!(effects, vec![Effect::RemovePreview]);
    assert_eq!(state.tool, Tool::Select);
}

#[test]
fn move_onto_other_page_cancels_draft() {
    let mut state = create_test_input_state();
    state.arm(ShapeKind::Ellipse);
    state.on_pointer_down(at(0, 50.0, 50.0), Modifiers::new());

    let effects = state.on_pointer_move(at(1, 60.0, 60.0), &pages());

    assert_eq!(effects, vec![Effect::RemovePreview]);
    assert!(state.draft().is_none());
    assert!(!state.tool.is_armed());
}

#[test]
fn release_after_cross_page_cancel_is_swallowed() {
    let mut state = create_test_input_state();
    state.arm(ShapeKind::Rectangle);
    state.on_pointer_down(at(0, 50.0, 50.0), Modifiers::new());
    state.on_pointer_move(at(1, 60.0, 60.0), &pages());

    assert!(state.on_pointer_move(at(1, 70.0, 70.0), &pages()).is_empty());
    let effects = state.on_pointer_up(at(1, 80.0, 80.0), &pages());

    assert!(effects.is_empty(), "got {effects:?}");
    assert!(state.is_idle());

    let hover = state.on_pointer_move(at(1, 90.0, 90.0), &pages());
    assert_eq!(move_positions(&forwarded(&hover)), vec![(90.0, 90.0)]);
}

#[test]
fn release_off_page_discards_draft() {
    let mut state = create_test_input_state();
    state.arm(ShapeKind::Rectangle);
    state.on_pointer_down(at(0, 50.0, 50.0), Modifiers::new());
    state.on_pointer_move(at(0, 150.0, 150.0), &pages());

    let effects = state.on_pointer_up(None, &pages());

    assert_eq!(effects, vec![Effect::RemovePreview]);
}

#[test]
fn drafting_preview_is_clamped_to_page() {
    let mut state = create_test_input_state();
    state.arm(ShapeKind::Rectangle);
    state.on_pointer_down(at(0, 900.0, 900.0), Modifiers::new());

    let effects = state.on_pointer_move(at(0, 1200.0, 1100.0), &pages());

    let Effect::UpdatePreview(preview) = &effects[0] else {
        panic!("expected preview update");
    };
    assert_eq!(
        preview.geometry,
        ShapeGeometry::Rect {
            x: 900.0,
            y: 900.0,
            width: 100.0,
            height: 100.0
        }
    );
}

#[test]
fn text_box_commit_grows_to_minimum() {
    let mut state = create_test_input_state();
    state.arm(ShapeKind::TextBox);
    state.on_pointer_down(at(0, 100.0, 100.0), Modifiers::new());

    let effects = state.on_pointer_up(at(0, 110.0, 110.0), &pages());

    let request = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Commit(request) => Some(request.clone()),
            _ => None,
        })
        .expect("text box should commit");
    let bound = request.geometry.bounding_box();
    assert!(bound.height >= 28.0);
    assert!(bound.width >= 84.0);
}

#[test]
fn disarm_mid_draft_removes_preview() {
    let mut state = create_test_input_state();
    state.arm(ShapeKind::Arrow);
    state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new());

    let effects = state.set_tool(Tool::Select);

    assert_eq!(effects, vec![Effect::RemovePreview]);
    assert!(state.draft().is_none());
    assert!(!state.tool.is_armed());

    assert!(state.on_pointer_up(at(0, 40.0, 40.0), &pages()).is_empty());
    assert!(state.is_idle());
}

#[test]
fn cancel_discards_draft() {
    let mut state = create_test_input_state();
    state.arm(ShapeKind::Rectangle);
    state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new());

    assert_eq!(state.on_pointer_cancel(), vec![Effect::RemovePreview]);
    assert!(state.is_idle());
    assert!(!state.tool.is_armed());
}

// ============================================================================
// Forwarding
// ============================================================================

#[test]
fn ctrl_click_is_forwarded_without_probe() {
    let mut state = create_test_input_state();

    let effects = state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::ctrl());

    let events = forwarded(&effects);
    assert!(matches!(
        events.as_slice(),
        [ViewerEvent::Press { ctrl: true, .. }]
    ));
    assert!(state.probing_session().is_none());

    let moves = state.on_pointer_move(at(0, 20.0, 20.0), &pages());
    assert_eq!(move_positions(&forwarded(&moves)), vec![(20.0, 20.0)]);

    let up = state.on_pointer_up(at(0, 30.0, 30.0), &pages());
    assert!(matches!(
        forwarded(&up).as_slice(),
        [ViewerEvent::Release { sample: Some(_) }]
    ));
    assert!(state.is_idle());
}

#[test]
fn read_only_viewer_never_probes() {
    let mut state = create_test_input_state();
    state.set_stroke_editing(false);

    let effects = state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new());

    assert!(matches!(
        forwarded(&effects).as_slice(),
        [ViewerEvent::Press { ctrl: false, .. }]
    ));
    assert!(
        !effects
            .iter()
            .any(|effect| matches!(effect, Effect::StartProbe { .. }))
    );
}

#[test]
fn hover_moves_are_forwarded_when_idle() {
    let mut state = create_test_input_state();
    let effects = state.on_pointer_move(at(2, 5.0, 6.0), &pages());
    assert_eq!(move_positions(&forwarded(&effects)), vec![(5.0, 6.0)]);

    assert!(state.on_pointer_move(None, &pages()).is_empty());
}

#[test]
fn forwarded_release_off_page_has_no_sample() {
    let mut state = create_test_input_state();
    state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::ctrl());

    let up = state.on_pointer_up(None, &pages());

    assert_eq!(up, vec![Effect::Forward(ViewerEvent::Release { sample: None })]);
    assert!(state.is_idle());
}

#[test]
fn release_after_settled_miss_is_forwarded_live() {
    let mut state = create_test_input_state();
    let (session, _) = started_session(&state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new()));
    state.on_probe_settled(session, None);
    state.on_pointer_move(at(0, 20.0, 20.0), &pages());

    let up = state.on_pointer_up(at(0, 25.0, 20.0), &pages());
    assert!(matches!(
        forwarded(&up).as_slice(),
        [ViewerEvent::Release { sample: Some(sample) }] if sample.x == 25.0
    ));
    assert!(state.is_idle());

    let (session, _) = started_session(&state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new()));
    state.on_probe_settled(session, None);
    assert_eq!(
        state.on_pointer_up(None, &pages()),
        vec![Effect::Forward(ViewerEvent::Release { sample: None })]
    );
    assert!(state.is_idle());
}

#[test]
fn settled_hit_then_release_in_place_selects_stroke() {
    let mut state = create_test_input_state();
    let (session, _) = started_session(&state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new()));
    assert!(state.on_probe_settled(session, Some(stroke_hit("s2"))).is_empty());
    assert!(state.on_pointer_move(at(0, 11.0, 10.0), &pages()).is_empty());

    let up = state.on_pointer_up(at(0, 11.0, 10.0), &pages());

    assert_eq!(
        forwarded(&up),
        vec![ViewerEvent::StrokeSelected {
            page: 0,
            stroke: StrokeId("s2".to_string())
        }]
    );
    assert!(state.is_idle());
}

#[test]
fn release_while_pending_is_held_until_settle() {
    let mut state = create_test_input_state();
    let (session, _) = started_session(&state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new()));

    assert!(state.on_pointer_up(at(0, 10.0, 10.0), &pages()).is_empty());
    assert_eq!(state.probing_session(), Some(session));

    let events = forwarded(&state.on_probe_settled(session, None));
    assert!(matches!(
        events.as_slice(),
        [ViewerEvent::Press { .. }, ViewerEvent::Release { sample: Some(_) }]
    ));
}

// ============================================================================
// Probing
// ============================================================================

#[test]
fn moves_are_buffered_while_probe_is_pending() {
    let mut state = create_test_input_state();
    let effects = state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new());
    started_session(&effects);

    for step in 1..=3 {
        let effects = state.on_pointer_move(at(0, 10.0 + step as f64, 10.0), &pages());
        assert!(effects.is_empty(), "moves must wait for the probe");
    }

    let InteractionState::Probing(probe) = &state.state else {
        panic!("expected probing state");
    };
    assert_eq!(probe.buffer.len(), 3);
}

#[test]
fn probe_miss_replays_press_then_moves_in_order() {
    let mut state = create_test_input_state();
    let (session, origin) = started_session(&state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new()));
    for x in [20.0, 30.0, 40.0] {
        state.on_pointer_move(at(0, x, 10.0), &pages());
    }

    let events = forwarded(&state.on_probe_settled(session, None));

    assert_eq!(
        events[0],
        ViewerEvent::Press {
            sample: origin,
            ctrl: false
        }
    );
    assert_eq!(
        move_positions(&events[1..]),
        vec![(20.0, 10.0), (30.0, 10.0), (40.0, 10.0)]
    );

    let live = state.on_pointer_move(at(0, 50.0, 10.0), &pages());
    assert_eq!(move_positions(&forwarded(&live)), vec![(50.0, 10.0)]);
}

#[test]
fn replay_matches_instant_probe() {
    let moves = [(12.0, 10.0), (30.0, 15.0), (60.0, 40.0), (61.0, 41.0)];

    // Probe settles before any move.
    let mut instant = create_test_input_state();
    let (session, _) = started_session(&instant.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new()));
    let mut expected = instant.on_probe_settled(session, Some(stroke_hit("s1")));
    for (x, y) in moves {
        expected.extend(instant.on_pointer_move(at(0, x, y), &pages()));
    }
    expected.extend(instant.on_pointer_up(at(0, 62.0, 42.0), &pages()));

    // Probe settles after the pointer is already released.
    let mut delayed = create_test_input_state();
    let (session, _) = started_session(&delayed.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new()));
    for (x, y) in moves {
        assert!(delayed.on_pointer_move(at(0, x, y), &pages()).is_empty());
    }
    assert!(delayed.on_pointer_up(at(0, 62.0, 42.0), &pages()).is_empty());
    let actual = delayed.on_probe_settled(session, Some(stroke_hit("s1")));

    assert_eq!(forwarded(&actual), forwarded(&expected));
    assert!(delayed.is_idle());
}

#[test]
fn probe_hit_with_travel_starts_drag_select_at_origin() {
    let mut state = create_test_input_state();
    let (session, origin) = started_session(&state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new()));
    state.on_pointer_move(at(0, 12.0, 12.0), &pages());
    state.on_pointer_move(at(0, 40.0, 10.0), &pages());

    let events = forwarded(&state.on_probe_settled(session, Some(stroke_hit("s1"))));

    assert_eq!(
        events[0],
        ViewerEvent::DragSelectStart {
            origin,
            stroke: StrokeId("s1".to_string())
        }
    );
    assert_eq!(move_positions(&events[1..]), vec![(12.0, 12.0), (40.0, 10.0)]);
}

#[test]
fn probe_hit_without_travel_selects_stroke() {
    let mut state = create_test_input_state();
    let (session, _) = started_session(&state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new()));
    state.on_pointer_move(at(0, 13.0, 14.0), &pages());
    state.on_pointer_up(at(0, 13.0, 14.0), &pages());

    let events = forwarded(&state.on_probe_settled(session, Some(stroke_hit("s7"))));

    assert_eq!(
        events,
        vec![ViewerEvent::StrokeSelected {
            page: 0,
            stroke: StrokeId("s7".to_string())
        }]
    );
    assert!(state.is_idle());
}

#[test]
fn release_before_miss_replays_full_click() {
    let mut state = create_test_input_state();
    let (session, _) = started_session(&state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new()));
    state.on_pointer_move(at(0, 11.0, 10.0), &pages());
    state.on_pointer_up(at(0, 11.0, 10.0), &pages());
    state.on_pointer_move(at(0, 200.0, 200.0), &pages());

    let events = forwarded(&state.on_probe_settled(session, None));

    assert!(matches!(events[0], ViewerEvent::Press { .. }));
    assert!(matches!(events[1], ViewerEvent::Move { .. }));
    assert!(matches!(events[2], ViewerEvent::Release { sample: Some(_) }));
    assert_eq!(move_positions(&events[3..]), vec![(200.0, 200.0)]);
    assert_eq!(events.len(), 4);
    assert!(state.is_idle());
}

#[test]
fn cancel_before_probe_settles_replays_cancel() {
    let mut state = create_test_input_state();
    let (session, _) = started_session(&state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new()));
    assert!(state.on_pointer_cancel().is_empty());

    let events = forwarded(&state.on_probe_settled(session, None));

    assert!(matches!(
        events.as_slice(),
        [ViewerEvent::Press { .. }, ViewerEvent::Cancel]
    ));
}

#[test]
fn new_session_discards_previous_buffer() {
    let mut state = create_test_input_state();
    let (first, _) = started_session(&state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new()));
    state.on_pointer_move(at(0, 20.0, 20.0), &pages());
    state.on_pointer_move(at(0, 30.0, 30.0), &pages());

    let (second, _) = started_session(&state.on_pointer_down(at(0, 500.0, 500.0), Modifiers::new()));
    assert_ne!(first, second);

    // The first probe resolves late; nothing happens.
    assert!(state.on_probe_settled(first, Some(stroke_hit("s1"))).is_empty());
    assert_eq!(state.probing_session(), Some(second));

    let events = forwarded(&state.on_probe_settled(second, None));
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        ViewerEvent::Press { sample, .. } if sample.x == 500.0
    ));
}

#[test]
fn stale_outcome_after_session_end_is_ignored() {
    let mut state = create_test_input_state();
    let (first, _) = started_session(&state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new()));
    state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::ctrl());

    assert!(state.on_probe_settled(first, None).is_empty());
    assert!(matches!(state.state, InteractionState::Forwarding));
}

#[test]
fn drag_select_cancel_forwards_cancel() {
    let mut state = create_test_input_state();
    let (session, _) = started_session(&state.on_pointer_down(at(0, 10.0, 10.0), Modifiers::new()));
    state.on_probe_settled(session, Some(stroke_hit("s1")));
    state.on_pointer_move(at(0, 80.0, 80.0), &pages());

    assert_eq!(
        forwarded(&state.on_pointer_cancel()),
        vec![ViewerEvent::Cancel]
    );
    assert!(state.is_idle());
}

#[test]
fn sample_ordinals_increase_across_sessions() {
    let mut state = create_test_input_state();
    let (_, first) = started_session(&state.on_pointer_down(at(0, 1.0, 1.0), Modifiers::new()));
    state.on_pointer_up(at(0, 1.0, 1.0), &pages());
    let (_, second) = started_session(&state.on_pointer_down(at(0, 1.0, 1.0), Modifiers::new()));
    assert!(second.ordinal > first.ordinal);
}

// ============================================================================
// Double-click
// ============================================================================

#[test]
fn double_click_without_target_is_forwarded() {
    let mut state = create_test_input_state();
    let effects = state.on_double_click(at(0, 5.0, 5.0), Modifiers::new(), None);
    assert_eq!(
        forwarded(&effects),
        vec![ViewerEvent::DoubleClick {
            point: at(0, 5.0, 5.0),
            ctrl: false
        }]
    );
}

#[test]
fn double_click_on_text_box_is_reserved() {
    let mut state = create_test_input_state();
    let id = AnnotationId::parse("t1").unwrap();
    assert!(
        state
            .on_double_click(at(0, 5.0, 5.0), Modifiers::new(), Some(&id))
            .is_empty()
    );

    let with_ctrl = state.on_double_click(at(0, 5.0, 5.0), Modifiers::ctrl(), Some(&id));
    assert!(matches!(
        forwarded(&with_ctrl).as_slice(),
        [ViewerEvent::DoubleClick { ctrl: true, .. }]
    ));
}
