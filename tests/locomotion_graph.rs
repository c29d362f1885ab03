use std::sync::Arc;

use clip_ik::clip::{
    Clip, ClipController, ClipPool, Keyframe, KeyframePool, ParameterValue, Predicate,
    Transition, TransitionKind,
};

fn keys(duration: f64, values: [f64; 2]) -> Arc<KeyframePool> {
    Arc::new(KeyframePool::new(vec![
        Keyframe::new(0.0, duration, values[0]).unwrap(),
        Keyframe::new(duration, duration, values[1]).unwrap(),
    ]))
}

fn walk_clip(name: &str, next: &str, values: [f64; 2]) -> Clip {
    Clip::new(
        name,
        keys(0.5, values),
        0,
        1,
        Transition::to(TransitionKind::Forward, next),
        Transition::new(TransitionKind::Pause),
    )
    .unwrap()
}

fn locomotion() -> ClipController {
    let idle = Clip::new(
        "idle",
        keys(0.1, [0.0, 1.0]),
        0,
        1,
        Transition::new(TransitionKind::Forward),
        Transition::new(TransitionKind::Backward),
    )
    .unwrap();

    let mut pool = ClipPool::new(vec![
        idle,
        walk_clip("rightStart", "leftStop", [0.0, 1.0]),
        walk_clip("rightStep", "leftStop", [-1.0, 1.0]),
        walk_clip("rightStop", "idle", [-1.0, 0.0]),
        walk_clip("leftStart", "rightStop", [0.0, 1.0]),
        walk_clip("leftStep", "rightStop", [-1.0, 1.0]),
        walk_clip("leftStop", "idle", [-1.0, 0.0]),
        walk_clip("jump", "falling", [0.0, 1.0]),
        walk_clip("falling", "idle", [1.0, 0.0]),
    ]);

    for clip in pool.iter_mut().take(7) {
        clip.forward_mut().add_condition("jumpKey", "jump", Predicate::Triggered);
    }
    for (from, to) in [
        ("idle", "rightStart"),
        ("rightStart", "leftStep"),
        ("rightStep", "leftStep"),
        ("rightStop", "rightStart"),
        ("leftStart", "rightStep"),
        ("leftStep", "rightStep"),
        ("leftStop", "leftStart"),
    ] {
        pool.by_name_mut(from)
            .unwrap()
            .forward_mut()
            .add_condition("speed", to, Predicate::GreaterThan(0.1));
    }

    let mut controller = ClipController::new("character", Arc::new(pool), "idle").unwrap();
    controller.set_parameter("speed", 0.0);
    controller
}

/// Plays the current two-keyframe clip from its start through its forward
/// transition.
fn play_through(controller: &mut ClipController) {
    let duration = controller.current_keyframe().duration();
    controller.update(duration).unwrap();
    controller.update(duration).unwrap();
}

fn clip_name(controller: &ClipController) -> &str {
    controller.current_clip().name()
}

#[test]
fn idle_loops_without_input() {
    let mut controller = locomotion();
    for _ in 0..3 {
        play_through(&mut controller);
        assert_eq!(clip_name(&controller), "idle");
        assert_eq!(controller.keyframe_index(), 0);
    }
}

#[test]
fn walking_alternates_feet_and_stops() {
    let mut controller = locomotion();
    controller.set_parameter("speed", 1.0);

    let mut visited = Vec::new();
    for _ in 0..4 {
        play_through(&mut controller);
        visited.push(clip_name(&controller).to_string());
    }
    assert_eq!(visited, ["rightStart", "leftStep", "rightStep", "leftStep"]);

    controller.set_parameter("speed", 0.0);
    play_through(&mut controller);
    assert_eq!(clip_name(&controller), "rightStop");
    play_through(&mut controller);
    assert_eq!(clip_name(&controller), "idle");
}

#[test]
fn jump_trigger_fires_once() {
    let mut controller = locomotion();
    controller.set_parameter("speed", 1.0);
    play_through(&mut controller);
    assert_eq!(clip_name(&controller), "rightStart");

    controller.fire_trigger("jumpKey");
    play_through(&mut controller);
    assert_eq!(clip_name(&controller), "jump");
    assert_eq!(controller.parameter("jumpKey"), Some(&ParameterValue::Trigger(false)));

    play_through(&mut controller);
    assert_eq!(clip_name(&controller), "falling");

    // falling always lands in idle, then speed takes over again
    play_through(&mut controller);
    assert_eq!(clip_name(&controller), "idle");
    play_through(&mut controller);
    assert_eq!(clip_name(&controller), "rightStart");
}

#[test]
fn jump_ignores_a_trigger_fired_mid_air() {
    let mut controller = locomotion();
    controller.fire_trigger("jumpKey");
    play_through(&mut controller);
    assert_eq!(clip_name(&controller), "jump");

    controller.fire_trigger("jumpKey");
    play_through(&mut controller);
    assert_eq!(clip_name(&controller), "falling");
    assert_eq!(controller.parameter("jumpKey"), Some(&ParameterValue::Trigger(true)));
}
