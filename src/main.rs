use glam::{Mat3, Mat4, Vec3};
use puppet_motion::collision::{CollisionEvent, CollisionInfo, CollisionPair, CollisionTracker};
use puppet_motion::constraint::{translate_constrained, BoundaryConstraint, DEFAULT_MOVE_ITERATIONS};
use puppet_motion::kinematics::{Humanoid, Side};
use puppet_motion::math::{translation, RigidTransform};
use puppet_motion::surface::{Aabb, Ellipsoid, HalfSpace, MeshSurface, TriangleMesh};
use puppet_motion::time::FrameClock;
use puppet_motion::zmap::{
    encode_samples, HeightSample, NavigationConfig, Zmap, DEFAULT_PADDING, NO_ROOM,
};
use std::error::Error;
use std::thread;
use std::time::Duration;

const GRID: usize = 32;
const FRAMES: u32 = 600;
const FRAME_TIME: f32 = 1.0 / 60.0;
const WALK_SPEED: f32 = 1.5;
const TURN_RATE: f32 = 0.4;
/// Ankle-to-rig-origin height of the humanoid at rest.
const LEG_LENGTH: f32 = 0.9047;

/// Floor height of the demo level at a world point, `None` for walls.
fn level_height(p: Vec3) -> Option<f32> {
    let border = p.x.abs() > 7.0 || p.z.abs() > 7.0;
    let pillar = (2.0..3.0).contains(&p.x) && (-1.0..1.0).contains(&p.z);
    if border || pillar {
        None
    } else if p.x < -3.0 && p.z > 2.0 {
        Some(0.5)
    } else {
        Some(0.0)
    }
}

fn build_level() -> Result<Zmap, Box<dyn Error>> {
    let bounds = Aabb::new(Vec3::new(-8.0, -1.0, -8.0), Vec3::new(8.0, 3.0, 8.0));
    let mut map = Zmap::from_bounds(GRID, GRID, &bounds, DEFAULT_PADDING)?;
    let heights: Vec<Option<f32>> = (0..GRID * GRID)
        .map(|i| level_height(map.cell_center(i % GRID, i / GRID, 0.0)))
        .collect();

    // stands in for the rasterized height pass
    let mut producer = |frame_z: f32, z_step: f32| {
        let samples: Vec<HeightSample> = heights
            .iter()
            .map(|h| match *h {
                Some(h) if h > frame_z - z_step && h <= frame_z => {
                    let level = ((h - frame_z + z_step) / z_step * 255.0).round();
                    HeightSample::new(level as u8, 1)
                }
                _ => HeightSample::new(0, NO_ROOM),
            })
            .collect();
        encode_samples(&samples)
    };
    let layers = map.populate(&mut producer, bounds.min.y, bounds.max.y, 4)?;
    log::info!("level height field ready: {layers} layers");
    Ok(map)
}

fn yaw(angle: f32) -> Mat3 {
    Mat3::from_rotation_y(angle)
}

/// Hip swing and knee bend for one leg at gait phase `phase`.
fn leg_pose(phase: f32) -> [f32; 7] {
    let swing = 0.4 * phase.sin();
    let knee = 0.6 * phase.cos().max(0.0);
    [0.0, swing, 0.0, knee, 0.0, 0.0, 0.0]
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let map = build_level()?;
    let nav = NavigationConfig::default();

    let mut feet = Vec3::ZERO;
    let mut heading = 0.0_f32;
    let mut rig = Humanoid::new(translation(feet + Vec3::Y * LEG_LENGTH))?;

    let fence = HalfSpace::new(Vec3::Z, 5.0);
    let fence_constraint = BoundaryConstraint::new(&fence);

    let trigger = Ellipsoid::sphere(1.0)?;
    let trigger_at = translation(Vec3::new(-2.0, 1.0, -2.0));
    let hitbox = MeshSurface::from_model(&TriangleMesh::cuboid(Vec3::new(0.25, 0.9, 0.25)))?;
    let trigger_pair = CollisionPair::new(&trigger, &hitbox);
    let mut tracker = CollisionTracker::new();
    let mut info = CollisionInfo::new();

    let mut clock = FrameClock::new();
    let mut time = 0.0;
    let mut falls = 0;
    let mut deflections = 0;

    for frame in 0..FRAMES {
        thread::sleep(Duration::from_secs_f32(FRAME_TIME));
        let dt = clock.tick();
        time += dt;
        heading += TURN_RATE * dt;

        let position = rig.position()?;
        let direction = yaw(heading) * Vec3::Z;
        let step = map.new_position(feet, direction * WALK_SPEED * dt, &nav);
        if step.freefall {
            falls += 1;
        }
        if step.deflected {
            deflections += 1;
        }

        let delta = translate_constrained(&position, step.position - feet, &[&fence_constraint]);
        feet += delta;
        let placement =
            Mat4::from_rotation_translation_block(yaw(heading), feet + Vec3::Y * LEG_LENGTH);
        rig.set_position(placement)?;
        rig.refresh();

        let ground = HalfSpace::below(0.0);
        let ground_at = translation(Vec3::new(0.0, feet.y - 0.05, 0.0));
        let ground_constraint = BoundaryConstraint::placed(&ground, &ground_at);
        for (side, offset) in [(Side::Left, 0.0), (Side::Right, std::f32::consts::PI)] {
            let node = rig.leg_node(side);
            let target = leg_pose(time * 6.0 + offset);
            let moved = rig.skeleton_mut().bounded_move(
                node,
                &target,
                &[&ground_constraint],
                DEFAULT_MOVE_ITERATIONS,
            )?;
            if moved.blocked {
                log::debug!("frame {frame}: {side:?} leg held at {:.2}", moved.fraction);
            }
        }

        let event = tracker.observe("trigger", &trigger_pair, &trigger_at, &placement, &mut info)?;
        match event {
            Some(CollisionEvent::Entered) => log::info!("frame {frame}: entered trigger zone"),
            Some(CollisionEvent::Exited) => log::info!("frame {frame}: left trigger zone"),
            _ => {}
        }

        if frame % 100 == 0 {
            let wrist = rig.wrist(Side::Right)?.translation_block();
            log::info!(
                "frame {frame}: feet {feet:.2}, room {}, right wrist {wrist:.2}",
                map.room(feet)
            );
        }
    }

    log::info!(
        "walked {FRAMES} frames: {deflections} deflected steps, {falls} freefall steps, last frame {:?}",
        clock.elapsed()
    );
    Ok(())
}
