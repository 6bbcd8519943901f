#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::MIN_THETA;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn core_with(page_count: usize, pinned: Option<usize>, config: CurlConfig) -> EngineCore {
    let book = BookState::new(page_count, pinned).unwrap();
    let mut core = EngineCore::new(config, Viewport::new(400.0, 800.0), book).unwrap();
    let actions = core.start();
    acknowledge(&mut core, &actions);
    core
}

/// 400 × 800 page, all slots rendered.
fn core(page_count: usize, pinned: Option<usize>) -> EngineCore {
    core_with(page_count, pinned, CurlConfig::default())
}

fn acknowledge(core: &mut EngineCore, actions: &[Action]) {
    for action in actions {
        if let Action::RenderPage(req) = action {
            core.page_rendered(req.page, req.slot);
        }
    }
}

fn turns(actions: &[Action]) -> Vec<TurnRequest> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::TurnPage(t) => Some(*t),
            _ => None,
        })
        .collect()
}

fn page_requests(actions: &[Action]) -> Vec<PageRequest> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::RenderPage(r) => Some(*r),
            _ => None,
        })
        .collect()
}

/// Press at (300, 600), drag left until the entry animation has finished.
/// Returns every action emitted along the way.
fn drag_into_draggable(core: &mut EngineCore) -> Vec<Action> {
    let mut actions = core.on_drag_start(pt(300.0, 600.0), 0.0);
    actions.extend(core.on_drag(pt(290.0, 598.0), 10.0));
    actions.extend(core.on_drag(pt(250.0, 590.0), 100.0));
    for now in [150.0, 200.0] {
        actions.extend(core.on_frame(now).actions);
    }
    actions
}

// =============================================================
// Page window
// =============================================================

#[test]
fn start_requests_surrounding_pages() {
    let book = BookState::new(5, Some(2)).unwrap();
    let mut core = EngineCore::new(CurlConfig::default(), Viewport::new(400.0, 800.0), book).unwrap();
    let actions = core.start();
    assert_eq!(
        page_requests(&actions),
        vec![
            PageRequest { page: 1, slot: Slot::Previous },
            PageRequest { page: 2, slot: Slot::Current },
            PageRequest { page: 3, slot: Slot::Next },
        ]
    );
    assert!(actions.contains(&Action::RenderNeeded));
}

#[test]
fn first_page_has_no_previous_slot() {
    let book = BookState::new(3, None).unwrap();
    let mut core = EngineCore::new(CurlConfig::default(), Viewport::new(400.0, 800.0), book).unwrap();
    let slots: Vec<_> = page_requests(&core.start()).into_iter().map(|r| r.slot).collect();
    assert_eq!(slots, vec![Slot::Current, Slot::Next]);
}

#[test]
fn input_waits_for_rendered_pages() {
    let book = BookState::new(5, None).unwrap();
    let mut core = EngineCore::new(CurlConfig::default(), Viewport::new(400.0, 800.0), book).unwrap();
    core.start();

    assert!(core.on_tap(pt(300.0, 400.0), 0.0).is_empty());
    assert_eq!(core.flow(), FlowState::Idle);
}

#[test]
fn stale_page_render_is_ignored() {
    let mut core = core(5, Some(2));
    assert!(core.page_rendered(4, Slot::Next).is_empty());
    assert!(core.pages.is_ready());
}

#[test]
fn invalid_config_rejected() {
    let book = BookState::new(5, None).unwrap();
    let config = CurlConfig { mesh_interval: 0, ..CurlConfig::default() };
    let result = EngineCore::new(config, Viewport::new(400.0, 800.0), book);
    assert!(matches!(result, Err(ConfigError::ZeroMeshInterval)));
}

#[test]
fn set_current_page_pins_and_replans() {
    let mut core = core(5, None);
    let actions = core.set_current_page(4).unwrap();
    assert!(core.book.is_pinned());
    assert_eq!(core.current_page(), 4);
    assert_eq!(page_requests(&actions).len(), 2);
    assert!(!core.pages.is_ready());
}

#[test]
fn set_current_page_out_of_range() {
    let mut core = core(5, None);
    assert!(core.set_current_page(5).is_err());
    assert_eq!(core.current_page(), 0);
}

// =============================================================
// Taps
// =============================================================

#[test]
fn tap_backward_on_first_page_reports_failure() {
    let mut core = core(5, None);
    let actions = core.on_tap(pt(100.0, 400.0), 0.0);

    assert_eq!(actions, vec![Action::TurnPage(TurnRequest { page: 0, forward: false, success: false })]);
    assert_eq!(core.flow(), FlowState::Idle);
    assert_eq!(core.current_page(), 0);
}

#[test]
fn tap_in_top_strip_is_ignored() {
    let mut core = core(5, None);
    assert!(core.on_tap(pt(300.0, 2.0), 0.0).is_empty());
    assert_eq!(core.flow(), FlowState::Idle);
}

#[test]
fn tap_outside_band_is_ignored() {
    let mut core = core(5, None);
    assert!(core.on_tap(pt(395.0, 400.0), 0.0).is_empty());
}

#[test]
fn tap_ignored_by_behavior() {
    let mut core = core(5, None);
    core.behaviors.tap = Some(Box::new(|_: &Bounds, _: Point| TapResponse::Ignore));
    assert!(core.on_tap(pt(300.0, 400.0), 0.0).is_empty());
    assert_eq!(core.flow(), FlowState::Idle);
}

#[test]
fn tap_forward_animates_then_turns() {
    let mut core = core(5, None);
    assert_eq!(core.on_tap(pt(300.0, 400.0), 0.0), vec![Action::RenderNeeded]);
    assert_eq!(core.flow(), FlowState::ExitingAnimation);

    let mut actions = Vec::new();
    for now in [50.0, 100.0, 150.0] {
        actions.extend(core.on_frame(now).actions);
    }
    assert!(turns(&actions).is_empty());

    actions.extend(core.on_frame(200.0).actions);
    assert_eq!(turns(&actions), vec![TurnRequest { page: 1, forward: true, success: true }]);
    assert_eq!(core.current_page(), 1);
    assert_eq!(core.flow(), FlowState::Idle);
    assert_eq!(page_requests(&actions).len(), 3);
}

#[test]
fn disabled_engine_ignores_input() {
    let config = CurlConfig { disabled: true, ..CurlConfig::default() };
    let mut core = core_with(5, None, config);
    assert!(core.on_tap(pt(300.0, 400.0), 0.0).is_empty());
    assert!(core.on_drag_start(pt(300.0, 600.0), 0.0).is_empty());
    assert!(core.on_drag(pt(250.0, 590.0), 100.0).is_empty());
    assert_eq!(core.flow(), FlowState::Idle);
}

// =============================================================
// Drags
// =============================================================

#[test]
fn pinned_forward_drag_reports_one_turn() {
    let mut core = core(5, Some(2));
    let mut actions = drag_into_draggable(&mut core);
    assert_eq!(core.flow(), FlowState::Draggable);

    actions.extend(core.on_drag(pt(100.0, 580.0), 210.0));
    actions.extend(core.on_frame(220.0).actions);
    actions.extend(core.on_drag_end(230.0));
    assert_eq!(core.flow(), FlowState::ExitingAnimation);

    for now in [280.0, 330.0, 400.0] {
        actions.extend(core.on_frame(now).actions);
    }

    assert_eq!(turns(&actions), vec![TurnRequest { page: 3, forward: true, success: true }]);
    // Pinned: the host moves the book.
    assert_eq!(core.current_page(), 2);
    assert!(page_requests(&actions).is_empty());
}

/// Press at (360, 400), engage at (356, 399), then step by `(dx, dy)` with
/// two frames per move until the curl goes tight or `steps` run out.
/// Returns the distinct regimes seen, in order.
fn drag_path(core: &mut EngineCore, dx: f64, dy: f64, steps: u32) -> Vec<Regime> {
    core.on_drag_start(pt(360.0, 400.0), 0.0);
    core.on_drag(pt(356.0, 399.0), 100.0);
    core.on_frame(150.0);
    core.on_frame(200.0);
    assert_eq!(core.flow(), FlowState::Draggable);

    let mut regimes = vec![core.regime()];
    for i in 1..=steps {
        let step = f64::from(i);
        let now = 200.0 + 10.0 * step;
        core.on_drag(pt(356.0 + dx * step, 399.0 + dy * step), now);
        for tick in [1.0, 2.0] {
            core.on_frame(now + tick);
            if regimes.last() != Some(&core.regime()) {
                regimes.push(core.regime());
            }
        }
        if core.regime() == Regime::Tight {
            break;
        }
    }
    regimes
}

#[test]
fn shallow_drag_clamps_width_then_turns() {
    let mut core = core(5, Some(2));
    let regimes = drag_path(&mut core, -4.0, -1.0, 70);
    assert_eq!(regimes, vec![Regime::Loose, Regime::WidthMin]);
    assert!(!core.is_upside_down());

    let mut actions = core.on_drag_end(1000.0);
    for now in [1050.0, 1100.0, 1200.0] {
        actions.extend(core.on_frame(now).actions);
    }
    assert_eq!(turns(&actions), vec![TurnRequest { page: 3, forward: true, success: true }]);
    assert_eq!(core.flow(), FlowState::Idle);
}

#[test]
fn steep_drag_goes_tight() {
    let mut core = core(5, Some(2));
    let regimes = drag_path(&mut core, -4.0, -4.0, 40);
    assert_eq!(regimes, vec![Regime::Loose, Regime::WidthMin, Regime::Tight]);
    assert!(core.sim.theta >= MIN_THETA);

    // Moving up while tight steers θ without leaving the regime.
    let actions = core.on_drag(pt(276.0, 300.0), 700.0);
    assert_eq!(actions, vec![Action::RenderNeeded]);
    core.on_frame(701.0);
    assert_eq!(core.regime(), Regime::Tight);
    assert!(core.sim.theta >= MIN_THETA);
}

#[test]
fn exit_resets_to_idle() {
    let mut core = core(5, Some(2));
    drag_into_draggable(&mut core);
    core.on_drag(pt(100.0, 580.0), 210.0);
    core.on_frame(220.0);
    core.on_drag_end(230.0);
    core.on_frame(400.0);

    assert_eq!(core.flow(), FlowState::Idle);
    assert_eq!(core.regime(), Regime::Loose);
    assert_eq!(core.sim, Simulation::default());
    assert_eq!(core.points, AllPoints::default());
    assert!(!core.is_upside_down());
}

#[test]
fn draggable_frames_carry_a_scene() {
    let mut core = core(5, Some(2));
    core.on_drag_start(pt(300.0, 600.0), 0.0);
    core.on_drag(pt(250.0, 590.0), 100.0);
    assert_eq!(core.flow(), FlowState::EnteringAnimation);

    let frame = core.on_frame(200.0);
    assert!(frame.scene.is_some());
    assert!(!frame.mesh.is_degenerate());
    assert_eq!((frame.curl_slot, frame.under_slot), (Slot::Current, Slot::Next));
    assert_eq!(core.flow(), FlowState::Draggable);
}

#[test]
fn idle_frame_draws_nothing_new() {
    let mut core = core(5, None);
    let frame = core.on_frame(0.0);
    assert!(frame.scene.is_none());
    assert!(!frame.redraw);
    assert!(frame.actions.is_empty());
}

#[test]
fn drag_waits_for_start_timeout() {
    let mut core = core(5, Some(2));
    core.on_drag_start(pt(300.0, 600.0), 0.0);
    assert!(core.on_drag(pt(250.0, 590.0), 50.0).is_empty());
    assert_eq!(core.flow(), FlowState::Idle);
}

#[test]
fn vertical_drag_does_not_engage() {
    let mut core = core(5, Some(2));
    core.on_drag_start(pt(300.0, 600.0), 0.0);
    core.on_drag(pt(300.0, 500.0), 100.0);
    assert_eq!(core.flow(), FlowState::Idle);
}

#[test]
fn downward_drag_curls_upside_down() {
    let mut core = core(5, Some(2));
    core.on_drag_start(pt(300.0, 200.0), 0.0);
    core.on_drag(pt(250.0, 210.0), 100.0);
    assert_eq!(core.flow(), FlowState::EnteringAnimation);
    assert!(core.is_upside_down());
    assert_eq!(core.sim.f, 200.0);
}

#[test]
fn frames_carry_the_upside_down_flag() {
    let mut core = core(5, Some(2));
    assert!(!core.on_frame(0.0).upside_down);
    core.on_drag_start(pt(300.0, 200.0), 0.0);
    core.on_drag(pt(250.0, 210.0), 100.0);
    assert!(core.on_frame(150.0).upside_down);
}

#[test]
fn release_during_entry_exits_after_entry() {
    let mut core = core(5, Some(2));
    core.on_drag_start(pt(300.0, 600.0), 0.0);
    core.on_drag(pt(250.0, 590.0), 100.0);
    assert!(core.on_drag_end(120.0).is_empty());
    assert_eq!(core.flow(), FlowState::EnteringAnimation);

    core.on_frame(150.0);
    core.on_frame(200.0);
    assert_eq!(core.flow(), FlowState::ExitPending);

    core.on_frame(210.0);
    assert_eq!(core.flow(), FlowState::ExitingAnimation);

    // Released on the right half: the page falls back, nothing to report.
    let actions = core.on_frame(320.0).actions;
    assert!(turns(&actions).is_empty());
    assert_eq!(core.flow(), FlowState::Idle);
}

#[test]
fn leaving_the_band_ends_the_gesture() {
    let mut core = core(5, Some(2));
    drag_into_draggable(&mut core);

    assert_eq!(core.on_drag(pt(395.0, 585.0), 210.0), vec![Action::RenderNeeded]);
    assert_eq!(core.flow(), FlowState::ExitingAnimation);

    // Later moves and the real lift belong to the ended gesture.
    assert!(core.on_drag(pt(300.0, 585.0), 220.0).is_empty());
    assert!(core.on_drag_end(230.0).is_empty());

    let actions = core.on_frame(400.0).actions;
    assert!(turns(&actions).is_empty());
    assert_eq!(core.flow(), FlowState::Idle);
}

#[test]
fn backward_drag_on_first_page_reports_failure_on_release() {
    let mut core = core(5, None);
    core.on_drag_start(pt(100.0, 600.0), 0.0);
    assert!(core.on_drag(pt(250.0, 590.0), 100.0).is_empty());
    assert_eq!(core.flow(), FlowState::Idle);

    let actions = core.on_drag_end(150.0);
    assert_eq!(turns(&actions), vec![TurnRequest { page: 0, forward: false, success: false }]);
}

#[test]
fn unclassified_release_reports_nothing() {
    let mut core = core(5, None);
    core.on_drag_start(pt(100.0, 600.0), 0.0);
    core.on_drag(pt(250.0, 590.0), 20.0);
    assert!(core.on_drag_end(30.0).is_empty());
}

#[test]
fn interrupted_gesture_ignores_release() {
    let mut core = core(5, Some(2));
    core.behaviors.drag = Some(Box::new(|_: &Bounds, _: Point, _: Point| None));

    core.on_drag_start(pt(300.0, 600.0), 0.0);
    core.on_drag(pt(250.0, 590.0), 100.0);
    assert_eq!(core.flow(), FlowState::Idle);
    assert!(core.on_drag(pt(200.0, 590.0), 110.0).is_empty());
    assert!(core.on_drag_end(120.0).is_empty());
}
