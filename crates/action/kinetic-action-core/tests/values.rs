use std::rc::Rc;

use kinetic_action_core::{
    Action, Config, Definition, FrameScheduler, InputTracker, Mode, Point, PresetLibrary,
    SharedAction, TrackConfig,
};
use serde_json::json;

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn setup() -> (FrameScheduler, SharedAction) {
    let json = kinetic_test_fixtures::presets::json("ui").expect("load ui presets");
    let library = PresetLibrary::from_json(&json).expect("parse ui presets");
    let scheduler = FrameScheduler::manual(Config::default());
    let action = Action::new(&scheduler, Rc::new(library));
    (scheduler, action)
}

fn defs(value: serde_json::Value) -> Option<Definition> {
    match value {
        serde_json::Value::Object(map) => Some(Definition::Props(map)),
        _ => panic!("expected object"),
    }
}

/// it should reuse the same value object across sets touching the same key
#[test]
fn set_reuses_existing_value() {
    let (_scheduler, action) = setup();
    let mut a = action.borrow_mut();
    a.set(defs(json!({ "values": { "x": { "to": 5, "sentinel": "kept" } } })), None, None)
        .expect("first set");
    a.set(defs(json!({ "values": { "x": 5 } })), None, None)
        .expect("second set");
    a.set(defs(json!({ "values": { "x": 5 } })), None, None)
        .expect("third set");

    let x = a.get_value("x").expect("x exists");
    assert_eq!(x.get("sentinel"), Some(json!("kept")));
    assert_eq!(x.to, 5.0);
    assert_eq!(a.values().len(), 1);
}

/// it should keep a reused value's own timing and input settings on later sets
#[test]
fn reused_value_keeps_its_own_settings() {
    let (_scheduler, action) = setup();
    let mut a = action.borrow_mut();
    a.set(
        defs(json!({ "values": { "x": { "to": 5, "duration": 50, "amp": 0.5, "friction": 0.3 } } })),
        None,
        None,
    )
    .expect("first set");
    a.set(defs(json!({ "values": { "x": 10 } })), None, None)
        .expect("second set");

    let x = a.get_value("x").expect("x exists");
    assert_eq!(x.duration, Some(50.0));
    assert_eq!(x.amp, 0.5);
    assert_eq!(x.friction, 0.3);
    assert_eq!(x.to, 10.0);
    drop(a);

    // the drag preset's halved y axis survives a follow-up set
    let mut a = action.borrow_mut();
    a.set(Some("drag".into()), None, None).expect("set drag");
    a.set(defs(json!({ "values": { "y": { "to": 3 } } })), None, None)
        .expect("set y");
    assert_eq!(a.get_value("y").unwrap().amp, 0.5);
}

/// it should create x and y when angle and distance are both present
#[test]
fn angle_and_distance_derive_x_and_y() {
    let (_scheduler, action) = setup();
    let mut a = action.borrow_mut();
    a.set(defs(json!({ "values": { "angle": 0, "distance": 10 } })), None, None)
        .expect("set pair");
    assert!(a.get_value("x").is_some());
    assert!(a.get_value("y").is_some());
    assert_eq!(a.origin().len(), 4);
}

/// it should never create x or y from angle alone
#[test]
fn angle_alone_does_not_derive() {
    let (_scheduler, action) = setup();
    let mut a = action.borrow_mut();
    a.set(defs(json!({ "values": { "angle": 45 } })), None, None)
        .expect("set angle");
    assert!(a.get_value("x").is_none());
    assert!(a.get_value("y").is_none());

    // presence across calls is enough
    a.set(defs(json!({ "values": { "distance": 3 } })), None, None)
        .expect("set distance");
    assert!(a.get_value("x").is_some());
    assert!(a.get_value("y").is_some());
}

/// it should move x and y with angle and distance while playing
#[test]
fn derived_pair_follows_angle_each_frame() {
    let (scheduler, action) = setup();
    action.borrow_mut().play("orbit", None).expect("play orbit");
    scheduler.tick(50.0);

    let a = action.borrow();
    approx(a.get_value("angle").unwrap().current, 45.0, 1e-9);
    let expected = 10.0 * 45f64.to_radians().cos();
    approx(a.get_value("x").unwrap().current, expected, 1e-9);
    approx(a.get_value("y").unwrap().current, expected, 1e-9);
}

/// it should snapshot origin at set time rather than follow live readings
#[test]
fn origin_is_a_snapshot() {
    let (scheduler, action) = setup();
    action.borrow_mut().play("slide", None).expect("play slide");
    scheduler.tick(50.0);
    scheduler.tick(50.0);

    let a = action.borrow();
    assert_eq!(a.origin().get("x"), Some(&-40.0));
    assert!(a.get_value("x").unwrap().current > -40.0);
}

/// it should let explicit override fields beat preset fields, merging values per key
#[test]
fn override_wins_over_preset() {
    let (_scheduler, action) = setup();
    let mut a = action.borrow_mut();
    let Some(Definition::Props(over)) =
        defs(json!({ "duration": 50, "values": { "opacity": { "to": 0.5 } } }))
    else {
        unreachable!()
    };
    a.set(Some("slide".into()), Some(over), None)
        .expect("set with override");

    assert_eq!(a.get_prop("duration"), Some(&json!(50)));
    let x = a.get_value("x").unwrap();
    assert_eq!((x.current, x.to), (-40.0, 0.0));
    assert_eq!(x.duration, Some(50.0));
    assert_eq!(x.get("unit"), Some(json!("px")));
    assert_eq!(a.get_value("opacity").unwrap().to, 0.5);
}

/// it should pass unknown keys straight through props and values
#[test]
fn accessors_are_permissive() {
    let (_scheduler, action) = setup();
    let mut a = action.borrow_mut();
    assert_eq!(a.get_prop("whatever"), None);
    assert!(a.get_value("nothing").is_none());

    a.set_prop("whatever", json!({ "nested": true }));
    assert_eq!(a.get_prop("whatever"), Some(&json!({ "nested": true })));

    a.set_value("z", Some(&json!({ "from": 2, "to": 4 })), None);
    a.set_value("z", Some(&json!(6)), None);
    let z = a.get_value("z").unwrap();
    assert_eq!((z.current, z.to), (2.0, 6.0));
}

/// it should follow input deltas from the tracked origin in INPUT mode
#[test]
fn track_follows_input_from_origin() {
    let (scheduler, action) = setup();
    let host = InputTracker::from((100.0, 50.0));
    action
        .borrow_mut()
        .track(TrackConfig::new(host.clone()).definition("drag"))
        .expect("track drag");
    {
        let a = action.borrow();
        assert_eq!(a.mode().mode, Mode::Input);
        assert_eq!(a.get_prop("inputOrigin"), Some(&json!({ "x": 100.0, "y": 50.0 })));
    }

    host.update(Point::new(130.0, 40.0));
    scheduler.tick(16.0);
    host.update(Point::new(160.0, 40.0));
    scheduler.tick(16.0);

    let a = action.borrow();
    approx(a.get_value("x").unwrap().current, 60.0, 1e-12);
    approx(a.get_value("y").unwrap().current, -5.0, 1e-12);
    // drag values have no from -> to range to measure progress along
    assert_eq!(a.progress, 0.0);
    assert!(a.is_active());
}

/// it should drive progress from input displacement along the tracked range
#[test]
fn track_progress_follows_input_delta() {
    let (scheduler, action) = setup();
    let host = InputTracker::from((0.0, 0.0));
    action
        .borrow_mut()
        .track(TrackConfig::new(host.clone()).definition("slide"))
        .expect("track slide");

    // slide: x from -40 to 0
    host.update(Point::new(20.0, 0.0));
    scheduler.tick(16.0);
    {
        let a = action.borrow();
        approx(a.get_value("x").unwrap().current, -20.0, 1e-12);
        approx(a.progress, 0.5, 1e-12);
    }

    host.update(Point::new(10.0, 0.0));
    scheduler.tick(16.0);
    let a = action.borrow();
    approx(a.progress, 0.25, 1e-12);
    assert!(a.is_active());
}

/// it should attach input to the current definition when tracking without one
#[test]
fn track_without_definition_keeps_props() {
    let (scheduler, action) = setup();
    action.borrow_mut().play("slide", None).expect("play slide");
    let host = InputTracker::from(Point::new(0.0, 0.0));
    action
        .borrow_mut()
        .track(TrackConfig::new(host.clone()))
        .expect("track");

    host.update(Point::new(12.0, 0.0));
    scheduler.tick(16.0);
    let a = action.borrow();
    assert_eq!(a.get_prop("duration"), Some(&json!(200)));
    approx(a.get_value("x").unwrap().current, -28.0, 1e-12);
}

/// it should merge an override over the current properties when tracking without a definition
#[test]
fn track_without_definition_merges_override() {
    let (scheduler, action) = setup();
    action.borrow_mut().play("slide", None).expect("play slide");
    let Some(Definition::Props(over)) =
        defs(json!({ "duration": 50, "values": { "x": { "amp": 2 } } }))
    else {
        unreachable!()
    };
    let host = InputTracker::from(Point::new(0.0, 0.0));
    action
        .borrow_mut()
        .track(TrackConfig::new(host.clone()).override_props(over))
        .expect("track with override");

    host.update(Point::new(10.0, 0.0));
    scheduler.tick(16.0);
    let a = action.borrow();
    assert_eq!(a.get_prop("duration"), Some(&json!(50)));
    assert_eq!(a.get_prop("inputOrigin"), Some(&json!({ "x": 0.0, "y": 0.0 })));
    approx(a.get_value("x").unwrap().current, -20.0, 1e-12);
    assert_eq!(a.mode().mode, Mode::Input);
}

/// it should run velocity values until they rest, then stop
#[test]
fn run_mode_settles_and_stops() {
    let (scheduler, action) = setup();
    action.borrow_mut().run("fling", None).expect("run fling");
    assert_eq!(action.borrow().mode().mode, Mode::Run);

    let mut frames = 0;
    while action.borrow().is_active() && frames < 1000 {
        scheduler.tick(16.0);
        frames += 1;
    }
    let a = action.borrow();
    assert!(!a.is_active(), "fling should come to rest");
    // 2000 * 0.016 * sum(0.9^n) = 288
    approx(a.get_value("x").unwrap().current, 288.0, 0.01);
}

/// it should clamp velocity values at their bounds
#[test]
fn run_mode_clamps_to_bounds() {
    let (scheduler, action) = setup();
    let Some(Definition::Props(over)) =
        defs(json!({ "values": { "x": { "velocity": 90000, "min": -500, "max": 500 } } }))
    else {
        unreachable!()
    };
    action
        .borrow_mut()
        .run("fling", Some(over))
        .expect("run fling");
    for _ in 0..20 {
        scheduler.tick(16.0);
    }
    let a = action.borrow();
    assert_eq!(a.get_value("x").unwrap().current, 500.0);
    assert!(!a.is_active());
}

/// it should keep the default template untouched across actions
#[test]
fn props_are_seeded_with_defaults() {
    let (_scheduler, action) = setup();
    let a = action.borrow();
    for (key, value) in kinetic_action_core::DEFAULT_PROPS.iter() {
        assert_eq!(a.get_prop(key), Some(value), "default {key}");
    }
}
