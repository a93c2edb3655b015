#![allow(clippy::float_cmp)]

use super::*;
use crate::fixtures::{bare_scene, loaded_engine, scene_with_geometry, server_error};

fn light_engine() -> EngineCore {
    loaded_engine(bare_scene(42.0, Point::new(100.0, 50.0)))
}

/// Press inside the light icon and return the started session.
fn grab(engine: &mut EngineCore) -> SessionId {
    let actions = engine.on_pointer_down(Point::new(120.0, 560.0), Button::Primary);
    match actions.as_slice() {
        [Action::StartSync { session, .. }] => *session,
        other => panic!("expected StartSync, got {other:?}"),
    }
}

// =============================================================
// Load
// =============================================================

#[test]
fn first_load_requests_canvas() {
    let mut engine = EngineCore::default();
    let actions = engine.load(Ok(bare_scene(42.0, Point::new(1.0, 1.0))));
    assert_eq!(actions, vec![Action::CreateCanvas { width: 800.0, height: 600.0 }]);
    assert_eq!(engine.viewport(), Some(Viewport::new(800.0, 600.0)));
    assert!(engine.scene().is_some());
}

#[test]
fn second_load_keeps_canvas() {
    let mut engine = light_engine();
    let actions = engine.load(Ok(bare_scene(50.0, Point::new(1.0, 1.0))));
    assert!(actions.is_empty());
    assert_eq!(engine.scene().map(|s| s.lit_area), Some(50.0));
}

#[test]
fn viewport_is_fixed_by_first_load() {
    let mut engine = light_engine();
    let mut bigger = bare_scene(42.0, Point::new(1.0, 1.0));
    bigger.width = 1024.0;
    bigger.height = 768.0;
    engine.load(Ok(bigger));
    assert_eq!(engine.viewport(), Some(Viewport::new(800.0, 600.0)));
}

#[test]
fn load_failure_leaves_engine_unloaded() {
    let mut engine = EngineCore::default();
    let actions = engine.load(Err(server_error(500)));
    assert!(actions.is_empty());
    assert!(engine.scene().is_none());
    assert!(engine.viewport().is_none());
    assert!(engine.overlay_error().is_some_and(|m| m.contains("500")));
}

#[test]
fn load_success_clears_load_error() {
    let mut engine = EngineCore::default();
    engine.load(Err(server_error(500)));
    engine.load(Ok(bare_scene(1.0, Point::new(1.0, 1.0))));
    assert_eq!(engine.overlay_error(), None);
}

// =============================================================
// Pointer down
// =============================================================

#[test]
fn press_on_light_starts_drag() {
    let mut engine = light_engine();
    let actions = engine.on_pointer_down(Point::new(120.0, 560.0), Button::Primary);
    assert_eq!(actions.len(), 1);
    let Action::StartSync { session, interval_ms } = actions[0] else {
        panic!("expected StartSync");
    };
    assert_eq!(interval_ms, 100);
    assert!(engine.is_dragging());
    assert!(engine.sync.is_live(session));
}

#[test]
fn press_outside_light_is_ignored() {
    let mut engine = light_engine();
    assert!(engine.on_pointer_down(Point::new(90.0, 560.0), Button::Primary).is_empty());
    assert!(!engine.is_dragging());
    assert_eq!(engine.sync.active(), None);
}

#[test]
fn press_before_load_is_ignored() {
    let mut engine = EngineCore::default();
    assert!(engine.on_pointer_down(Point::new(120.0, 560.0), Button::Primary).is_empty());
    assert!(!engine.is_dragging());
}

#[test]
fn secondary_button_does_not_grab() {
    let mut engine = light_engine();
    assert!(engine.on_pointer_down(Point::new(120.0, 560.0), Button::Secondary).is_empty());
    assert!(!engine.is_dragging());
}

#[test]
fn second_press_while_dragging_is_ignored() {
    let mut engine = light_engine();
    let session = grab(&mut engine);
    assert!(engine.on_pointer_down(Point::new(120.0, 560.0), Button::Primary).is_empty());
    assert_eq!(engine.input.session(), Some(session));
}

#[test]
fn configured_interval_is_used() {
    let config = ViewerConfig { sync_interval_ms: 250, ..ViewerConfig::default() };
    let mut engine = EngineCore::new(&config);
    engine.load(Ok(bare_scene(42.0, Point::new(100.0, 50.0))));
    let actions = engine.on_pointer_down(Point::new(120.0, 560.0), Button::Primary);
    assert!(matches!(actions[..], [Action::StartSync { interval_ms: 250, .. }]));
}

#[test]
fn icon_size_update_moves_hit_box() {
    let mut engine = light_engine();
    engine.set_icon_size(IconSize::new(100.0, 30.0));
    // X=180 is beyond a 40px icon but inside a 100px one.
    assert!(!engine.on_pointer_down(Point::new(180.0, 560.0), Button::Primary).is_empty());
}

#[test]
fn invalid_icon_size_is_ignored() {
    let mut engine = light_engine();
    engine.set_icon_size(IconSize::new(0.0, 0.0));
    assert_eq!(engine.icon_size(), IconSize::new(40.0, 40.0));
}

// =============================================================
// Pointer move
// =============================================================

#[test]
fn move_while_dragging_sets_light_in_sim_space() {
    let mut engine = light_engine();
    grab(&mut engine);
    engine.on_pointer_move(Point::new(300.0, 200.0));
    assert_eq!(engine.scene().map(|s| s.light), Some(Point::new(300.0, 400.0)));
}

#[test]
fn move_while_idle_does_nothing() {
    let mut engine = light_engine();
    let before = engine.scene().cloned();
    engine.on_pointer_move(Point::new(300.0, 200.0));
    assert_eq!(engine.scene().map(|s| s.light), Some(Point::new(100.0, 50.0)));
    assert_eq!(engine.scene().cloned(), before);
}

#[test]
fn drag_moves_touch_only_the_light() {
    let mut engine = loaded_engine(scene_with_geometry());
    grab(&mut engine);
    for step in 0..10 {
        engine.on_pointer_move(Point::new(120.0 + f64::from(step) * 5.0, 560.0 - f64::from(step) * 7.0));
    }
    let original = scene_with_geometry();
    let scene = engine.scene().unwrap();
    assert_eq!(scene.light, Point::new(165.0, 600.0 - 497.0));
    assert_eq!(scene.polygons, original.polygons);
    assert_eq!(scene.triangles, original.triangles);
    assert_eq!(scene.lit_area, original.lit_area);
    assert_eq!((scene.width, scene.height), (original.width, original.height));
}

// =============================================================
// Pointer up
// =============================================================

#[test]
fn release_stops_session() {
    let mut engine = light_engine();
    let session = grab(&mut engine);
    let actions = engine.on_pointer_up();
    assert_eq!(actions, vec![Action::StopSync { session }]);
    assert!(!engine.is_dragging());
    assert!(!engine.sync.is_live(session));
}

#[test]
fn release_while_idle_is_noop() {
    let mut engine = light_engine();
    assert!(engine.on_pointer_up().is_empty());
}

#[test]
fn move_after_release_does_not_drag() {
    let mut engine = light_engine();
    grab(&mut engine);
    engine.on_pointer_move(Point::new(300.0, 200.0));
    engine.on_pointer_up();
    engine.on_pointer_move(Point::new(10.0, 10.0));
    assert_eq!(engine.scene().map(|s| s.light), Some(Point::new(300.0, 400.0)));
}

#[test]
fn each_drag_gets_a_new_session() {
    let mut engine = light_engine();
    let first = grab(&mut engine);
    engine.on_pointer_up();
    let second = grab(&mut engine);
    assert_ne!(first, second);
    assert!(!engine.sync.is_live(first));
    assert!(engine.sync.is_live(second));
}

#[test]
fn end_drag_behaves_like_release() {
    let mut engine = light_engine();
    let session = grab(&mut engine);
    assert_eq!(engine.end_drag(), vec![Action::StopSync { session }]);
    assert!(engine.end_drag().is_empty());
}

// =============================================================
// Shutdown
// =============================================================

#[test]
fn shut_down_ends_active_drag() {
    let mut engine = light_engine();
    let session = grab(&mut engine);
    assert_eq!(engine.shut_down(), vec![Action::StopSync { session }]);
    assert!(engine.is_shut_down());
    assert!(!engine.sync.is_live(session));
}

#[test]
fn load_after_shut_down_creates_no_canvas() {
    let mut engine = EngineCore::default();
    assert!(engine.shut_down().is_empty());
    let actions = engine.load(Ok(bare_scene(42.0, Point::new(100.0, 50.0))));
    assert!(actions.is_empty());
    assert!(engine.scene().is_none());
    assert!(engine.viewport().is_none());
}

#[test]
fn press_after_shut_down_does_not_grab() {
    let mut engine = light_engine();
    engine.shut_down();
    assert!(engine.on_pointer_down(Point::new(120.0, 560.0), Button::Primary).is_empty());
    assert!(!engine.is_dragging());
}

// =============================================================
// Cycle steps
// =============================================================

#[test]
fn begin_cycle_snapshots_current_light() {
    let mut engine = light_engine();
    let session = grab(&mut engine);
    engine.on_pointer_move(Point::new(300.0, 200.0));
    let CycleStep::Push(payload) = engine.begin_cycle(session) else {
        panic!("expected push");
    };
    assert_eq!(payload.light, Point::new(300.0, 400.0));
    assert_eq!((payload.scene.x, payload.scene.y), (800.0, 600.0));
}

#[test]
fn begin_cycle_skips_while_in_flight() {
    let mut engine = light_engine();
    let session = grab(&mut engine);
    assert!(matches!(engine.begin_cycle(session), CycleStep::Push(_)));
    assert_eq!(engine.begin_cycle(session), CycleStep::Done(CycleOutcome::Skipped));
}

#[test]
fn begin_cycle_for_ended_session_is_stale() {
    let mut engine = light_engine();
    let session = grab(&mut engine);
    engine.on_pointer_up();
    assert_eq!(engine.begin_cycle(session), CycleStep::Done(CycleOutcome::Stale));
}

#[test]
fn push_failure_sets_overlay_and_keeps_light() {
    let mut engine = light_engine();
    let session = grab(&mut engine);
    engine.on_pointer_move(Point::new(300.0, 200.0));
    engine.begin_cycle(session);
    let outcome = engine.after_push(session, Err(server_error(503)));
    assert_eq!(outcome, Some(CycleOutcome::Failed(server_error(503))));
    assert!(engine.overlay_error().is_some_and(|m| m.contains("503")));
    assert_eq!(engine.scene().map(|s| s.light), Some(Point::new(300.0, 400.0)));
    assert_eq!(engine.sync.in_flight(), None);
}

#[test]
fn push_success_continues_to_pull() {
    let mut engine = light_engine();
    let session = grab(&mut engine);
    engine.begin_cycle(session);
    assert_eq!(engine.after_push(session, Ok(())), None);
    assert_eq!(engine.sync.in_flight(), Some(session));
}

#[test]
fn pull_applies_scene_and_clears_overlay() {
    let mut engine = light_engine();
    let session = grab(&mut engine);
    engine.begin_cycle(session);
    engine.after_push(session, Err(server_error(500)));

    engine.begin_cycle(session);
    engine.after_push(session, Ok(()));
    let outcome = engine.after_pull(session, Ok(bare_scene(67.0, Point::new(100.0, 50.0))));
    assert_eq!(outcome, CycleOutcome::Applied);
    assert_eq!(engine.overlay_error(), None);
    assert_eq!(engine.scene().map(|s| s.lit_area), Some(67.0));
}

#[test]
fn pulled_scene_keeps_light_under_pointer_while_dragging() {
    let mut engine = light_engine();
    let session = grab(&mut engine);
    engine.on_pointer_move(Point::new(300.0, 200.0));
    engine.begin_cycle(session);
    engine.after_push(session, Ok(()));
    // Backend still reports the older light position.
    engine.after_pull(session, Ok(bare_scene(55.0, Point::new(250.0, 380.0))));
    let scene = engine.scene().unwrap();
    assert_eq!(scene.lit_area, 55.0);
    assert_eq!(scene.light, Point::new(300.0, 400.0));
}

#[test]
fn pull_after_release_is_discarded() {
    let mut engine = light_engine();
    let session = grab(&mut engine);
    engine.begin_cycle(session);
    engine.after_push(session, Ok(()));
    engine.on_pointer_up();
    let before = engine.scene().cloned();
    let outcome = engine.after_pull(session, Ok(bare_scene(99.0, Point::new(0.0, 0.0))));
    assert_eq!(outcome, CycleOutcome::Stale);
    assert_eq!(engine.scene().cloned(), before);
    assert_eq!(engine.scene().map(|s| s.lit_area), Some(42.0));
}

#[test]
fn pull_failure_sets_overlay() {
    let mut engine = light_engine();
    let session = grab(&mut engine);
    engine.begin_cycle(session);
    engine.after_push(session, Ok(()));
    let outcome = engine.after_pull(session, Err(server_error(404)));
    assert!(matches!(outcome, CycleOutcome::Failed(_)));
    assert!(engine.overlay_error().is_some_and(|m| m.contains("404")));
    assert_eq!(engine.scene().map(|s| s.lit_area), Some(42.0));
}

#[test]
fn push_completing_after_release_is_stale() {
    let mut engine = light_engine();
    let session = grab(&mut engine);
    engine.begin_cycle(session);
    engine.on_pointer_up();
    assert_eq!(engine.after_push(session, Ok(())), Some(CycleOutcome::Stale));
    assert_eq!(engine.sync.in_flight(), None);
}
