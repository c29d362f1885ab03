use std::sync::Arc;

use clip_ik::clip::{
    Clip, ClipController, ClipPool, EvaluationMode, Keyframe, KeyframePool, Predicate,
    Transition, TransitionKind,
};
use clip_ik::ground::{GroundHit, GroundQuery, Ray};
use clip_ik::ik::{
    LegStepper, ProceduralGrab, ProceduralLook, Skeleton, StepConfig, TailConfig, TailFollower,
};
use clip_ik::math::Transform;
use clip_ik::Result;
use glam::Vec3;

const FRAME: f64 = 1.0 / 60.0;
const SPEED_THRESHOLD: f64 = 0.1;

/// Horizontal ground at a fixed height.
struct FlatGround {
    height: f32,
}

impl GroundQuery for FlatGround {
    fn cast(&self, ray: &Ray) -> Option<GroundHit> {
        if ray.direction.y.abs() < 1e-6 {
            return None;
        }
        let distance = (self.height - ray.origin.y) / ray.direction.y;
        ray.contains(distance).then(|| GroundHit {
            point: ray.at(distance),
            normal: Vec3::Y,
            distance,
        })
    }
}

fn two_keys(first: (f64, f64, f64), second: (f64, f64, f64)) -> Result<Arc<KeyframePool>> {
    Ok(Arc::new(KeyframePool::new(vec![
        Keyframe::spanning(first.0, first.1, first.2)?,
        Keyframe::spanning(second.0, second.1, second.2)?,
    ])))
}

/// Idle, a two-footed walk cycle and a jump, switched by a `speed` float and
/// a `jumpKey` trigger.
fn locomotion_pool() -> Result<ClipPool> {
    let step = |stop_value: f64| two_keys((0.0, 0.5, -1.0), (0.5, 1.0, stop_value));
    let start = || two_keys((0.0, 0.5, 0.0), (0.5, 1.0, 1.0));

    let clip = |name: &str, keys: Arc<KeyframePool>, next: &str| {
        Clip::new(
            name,
            keys,
            0,
            1,
            Transition::to(TransitionKind::Forward, next),
            Transition::new(TransitionKind::Pause),
        )
    };

    let idle = Clip::new(
        "idle",
        two_keys((0.0, 0.1, 0.0), (0.1, 0.2, 1.0))?,
        0,
        1,
        Transition::new(TransitionKind::Forward),
        Transition::new(TransitionKind::Backward),
    )?;

    let mut pool = ClipPool::new(vec![
        idle,
        clip("rightStart", start()?, "leftStop")?,
        clip("rightStep", step(1.0)?, "leftStop")?,
        clip("rightStop", step(0.0)?, "idle")?,
        clip("leftStart", start()?, "rightStop")?,
        clip("leftStep", step(1.0)?, "rightStop")?,
        clip("leftStop", step(0.0)?, "idle")?,
        clip("jump", two_keys((0.0, 1.0, 0.0), (1.0, 2.0, 1.0))?, "falling")?,
        clip("falling", two_keys((0.0, 1.0, 1.0), (1.0, 2.0, 0.0))?, "idle")?,
    ]);

    // jump and falling cannot chain into another jump
    for clip in pool.iter_mut().filter(|c| c.name() != "jump" && c.name() != "falling") {
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
        if let Some(clip) = pool.by_name_mut(from) {
            clip.forward_mut()
                .add_condition("speed", to, Predicate::GreaterThan(SPEED_THRESHOLD));
        }
    }

    Ok(pool)
}

fn run_locomotion() -> Result<()> {
    let mut controller = ClipController::new("character", Arc::new(locomotion_pool()?), "idle")?;
    controller.set_parameter("speed", 0.0);

    let mut last_clip = controller.clip_index();
    for frame in 0..600 {
        match frame {
            60 => controller.set_parameter("speed", 1.0),
            240 => controller.fire_trigger("jumpKey"),
            420 => controller.set_parameter("speed", 0.0),
            _ => {}
        }

        controller.update(FRAME)?;

        if controller.clip_index() != last_clip {
            last_clip = controller.clip_index();
            log::info!(
                "frame {frame}: {} -> '{}' (value {:.2})",
                controller.name(),
                controller.current_clip().name(),
                controller.evaluate(EvaluationMode::Lerp)
            );
        }
    }
    Ok(())
}

/// Body bob driven by two idle clips on one pool, cross-faded by a height
/// factor.
fn run_body_bob() -> Result<()> {
    let bob = 1.0;
    let keys = Arc::new(KeyframePool::new(vec![
        Keyframe::spanning(0.0, bob / 2.0, 0.2)?,
        Keyframe::spanning(bob / 2.0, bob, 0.4)?,
        Keyframe::spanning(0.0, bob / 2.0, 0.6)?,
        Keyframe::spanning(bob / 2.0, bob, 0.8)?,
    ]));
    let looping = |name: &str, first, last| {
        Clip::new(
            name,
            Arc::clone(&keys),
            first,
            last,
            Transition::new(TransitionKind::Forward),
            Transition::new(TransitionKind::Backward),
        )
    };
    let pool = Arc::new(ClipPool::new(vec![
        looping("idle-high", 2, 3)?,
        looping("idle-low", 0, 1)?,
    ]));

    let mut high = ClipController::new("spider high", Arc::clone(&pool), "idle-high")?;
    let mut low = ClipController::new("spider low", pool, "idle-low")?;

    for frame in 0..120 {
        high.update(FRAME)?;
        low.update(FRAME)?;

        let height_factor = frame as f64 / 119.0;
        if frame % 20 == 0 {
            let height = ClipController::blend_evaluations(
                &low,
                &high,
                EvaluationMode::CatmullRom,
                height_factor,
            );
            log::info!("frame {frame}: body height {height:.3}");
        }
    }
    Ok(())
}

/// One spider leg walking forward over flat ground while the head tracks a
/// point ahead of the body.
fn run_leg() -> Result<()> {
    let ground = FlatGround { height: 0.0 };
    let body_start = Vec3::new(0.0, 0.6, 0.0);
    let foot_offset = Vec3::new(1.0, -0.6, 0.0);

    let (mut skeleton, ids) = Skeleton::chain(
        Transform::from_position(body_start),
        &[
            Vec3::new(0.2, 0.6, 0.0),
            Vec3::new(0.6, 0.9, 0.0),
            body_start + foot_offset,
        ],
    );
    let body = ids[0];
    let foot = ids[3];
    let head = skeleton.add_child_at(body, "head", body_start + Vec3::new(0.0, 0.1, -0.3))?;

    let locator = Transform::from_position(skeleton.world_position(foot));
    let mut grab = ProceduralGrab::new(&skeleton, foot, locator, 2)?;
    let look = ProceduralLook::new(&skeleton, head)?;
    let mut leg = LegStepper::new(
        StepConfig::default()
            .with_foot_max_distance(0.3)
            .with_overshoot_distance(0.15)
            .with_step_height(0.15),
        locator,
    );

    let mut steps = 0;
    for frame in 0..240 {
        let dt = FRAME as f32;
        let body_position = body_start + Vec3::NEG_Z * 0.5 * dt * frame as f32;
        skeleton.set_world_position(body, body_position);

        let rest = Transform::from_position(body_position + foot_offset);
        let jitter = ((frame * 37) % 100) as f32 / 100.0;
        if leg.try_move(&rest, skeleton.world_position(foot), 1.0, 0.0, jitter, &ground) {
            steps += 1;
        }
        leg.advance(dt);

        let target = leg.locator();
        let pole = target.position + Vec3::Y;
        let result = grab.resolve_ik(&mut skeleton, target.position, target.rotation, pole)?;
        let reached = skeleton.world_position(foot);
        if result.over_extended && leg.notify_over_extended(&rest, reached, jitter, &ground) {
            steps += 1;
        }

        look.look_at(&mut skeleton, body_position + Vec3::new(0.0, 0.0, -2.0), Vec3::Y);

        if frame % 40 == 0 {
            log::info!(
                "frame {frame}: foot at {:.2?}, {} iterations, {:.4} from target",
                skeleton.world_position(foot),
                result.iterations,
                result.final_distance
            );
        }
    }
    log::info!("leg took {steps} steps");
    Ok(())
}

/// A three-bone tail dragged behind a body that walks forward, following the
/// ground below its rest point.
fn run_tail() -> Result<()> {
    let ground = FlatGround { height: 0.0 };
    let body_start = Vec3::new(0.0, 0.6, 0.0);
    let tip_offset = Vec3::new(0.0, -0.3, 0.8);

    let (mut skeleton, ids) = Skeleton::chain(
        Transform::from_position(body_start),
        &[
            body_start + Vec3::new(0.0, 0.0, 0.3),
            body_start + Vec3::new(0.0, -0.1, 0.6),
            body_start + tip_offset,
        ],
    );
    let body = ids[0];
    let tip = ids[3];

    let locator = Transform::from_position(skeleton.world_position(tip));
    let mut grab = ProceduralGrab::new(&skeleton, tip, locator, 2)?;
    let mut tail = TailFollower::new(TailConfig::default().with_rest_height(0.3), locator);

    for frame in 0..180 {
        let dt = FRAME as f32;
        let body_position = body_start + Vec3::NEG_Z * 0.5 * dt * frame as f32;
        skeleton.set_world_position(body, body_position);

        let rest = Transform::from_position(body_position + tip_offset);
        let target = tail.update(&rest, dt, &ground);
        let pole = target.position + Vec3::Y;
        let result = grab.resolve_ik(&mut skeleton, target.position, target.rotation, pole)?;

        if frame % 60 == 0 {
            log::info!(
                "frame {frame}: tail tip at {:.2?}, {:.4} from target",
                skeleton.world_position(tip),
                result.final_distance
            );
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let demos: [(&str, fn() -> Result<()>); 4] = [
        ("locomotion", run_locomotion),
        ("body bob", run_body_bob),
        ("leg", run_leg),
        ("tail", run_tail),
    ];

    for (name, demo) in demos {
        log::info!("running {name} demo");
        if let Err(err) = demo() {
            log::error!("{name} demo failed: {err}");
            std::process::exit(1);
        }
    }
}
