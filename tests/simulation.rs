use approx::assert_relative_eq;

use rusted_physics::engine::physics::{presets, BodyBuilder, CollisionShape, ContactKind};
use rusted_physics::{PhysicsConfig, PhysicsWorld, RigidBody, Vec3};

const DT: f32 = 1.0 / 60.0;

fn run(world: &mut PhysicsWorld, frames: usize) {
    for _ in 0..frames {
        world.update(DT);
    }
}

#[test]
fn free_fall_matches_discrete_recurrence() {
    let mut world = PhysicsWorld::new();
    let ball = world.add_body(presets::ball(Vec3::new(0.0, 10.0, 0.0), 0.5));

    run(&mut world, 60);

    // Semi-implicit Euler: velocity first, then position with the new velocity
    let gravity = -9.81_f32;
    let (mut velocity, mut position) = (0.0_f32, 10.0_f32);
    for _ in 0..60 {
        velocity += gravity * DT;
        position += velocity * DT;
    }

    let body = world.body(ball).unwrap();
    assert_relative_eq!(body.velocity().y, velocity, max_relative = 1e-6);
    assert_relative_eq!(body.position().y, position, max_relative = 1e-6);
    assert_relative_eq!(body.velocity().y, -9.81, epsilon = 1e-3);

    // The continuous-time answer differs noticeably after one second
    let continuous = 10.0 - 0.5 * 9.81;
    assert!((body.position().y - continuous).abs() > 0.05);
    assert_eq!(body.position().x, 0.0);
    assert_eq!(body.position().z, 0.0);
}

#[test]
fn static_bodies_never_move() {
    let mut world = PhysicsWorld::new();
    let floor = world.add_body(presets::ground(0.0, 5.0, 5.0));
    let pillar = world.add_body(
        BodyBuilder::new_static()
            .position(2.0, 1.0, 0.0)
            .shape(CollisionShape::cuboid(Vec3::new(0.5, 1.0, 0.5)))
            .build(),
    );
    world.add_body(presets::ball(Vec3::new(2.0, 4.0, 0.0), 0.5));
    world.add_body(presets::crate_box(Vec3::new(0.0, 3.0, 0.0), Vec3::splat(0.5), 5.0));

    let floor_start = world.body(floor).unwrap().position();
    let pillar_start = world.body(pillar).unwrap().position();

    for _ in 0..240 {
        world.apply_force_to_all(Vec3::new(30.0, 0.0, 0.0));
        world.update(DT);
    }

    assert_eq!(world.body(floor).unwrap().position(), floor_start);
    assert_eq!(world.body(pillar).unwrap().position(), pillar_start);
}

#[test]
fn drag_never_increases_speed() {
    let mut world = PhysicsWorld::new();
    let body = world.add_body(
        BodyBuilder::new_dynamic()
            .velocity(3.0, 1.0, -2.0)
            .use_gravity(false)
            .drag(0.05)
            .build(),
    );

    let mut last_speed = world.body(body).unwrap().velocity().length();
    for _ in 0..300 {
        world.update(DT);
        let speed = world.body(body).unwrap().velocity().length();
        assert!(speed <= last_speed, "speed rose from {} to {}", last_speed, speed);
        last_speed = speed;
    }
    assert!(last_speed < 0.01);
}

#[test]
fn slow_body_falls_asleep_with_exact_zero_velocity() {
    let mut world = PhysicsWorld::new();
    let body = world.add_body(
        BodyBuilder::new_dynamic()
            .velocity(0.0, 0.004, 0.0)
            .use_gravity(false)
            .build(),
    );

    // Half a second at 60 Hz: awake after 29 steps, asleep after the 30th
    run(&mut world, 29);
    assert!(!world.body(body).unwrap().is_sleeping());

    run(&mut world, 1);
    let body = world.body(body).unwrap();
    assert!(body.is_sleeping());
    assert_eq!(body.velocity(), Vec3::ZERO);
    assert_eq!(world.stats().sleeping_bodies, 1);
}

#[test]
fn ball_comes_to_rest_on_ground() {
    let mut world = PhysicsWorld::new();
    world.add_body(presets::ground(0.0, 10.0, 10.0));
    let ball = world.add_body(presets::ball(Vec3::new(0.0, 4.0, 0.0), 0.5));

    run(&mut world, 300);

    let body = world.body(ball).unwrap();
    let y = body.position().y;
    assert!(y > 0.45 && y < 0.55, "ball should rest on the ground, y = {}", y);
    assert!(body.velocity().length() < 0.5);
    assert!(world
        .contacts()
        .iter()
        .any(|c| c.body_b == ball && c.kind == ContactKind::Resting));
}

#[test]
fn sphere_registered_before_box_still_lands_on_top() {
    let mut world = PhysicsWorld::new();
    let ball = world.add_body(presets::ball(Vec3::new(0.0, 2.0, 0.0), 0.5));
    world.add_body(presets::ground(0.0, 10.0, 10.0));

    run(&mut world, 300);

    let y = world.body(ball).unwrap().position().y;
    assert!(y > 0.45 && y < 0.55, "ball fell through or floated: y = {}", y);
}

#[test]
fn crate_settles_on_ground_along_min_axis() {
    let mut world = PhysicsWorld::new();
    world.add_body(presets::ground(0.0, 10.0, 10.0));
    let crate_box = world.add_body(presets::crate_box(
        Vec3::new(0.3, 3.0, -0.2),
        Vec3::splat(0.5),
        2.0,
    ));

    run(&mut world, 300);

    let body = world.body(crate_box).unwrap();
    assert!(body.position().y > 0.45 && body.position().y < 0.55);
    // Contact normal is vertical so nothing pushes it sideways
    assert_relative_eq!(body.position().x, 0.3, epsilon = 1e-4);
    assert_relative_eq!(body.position().z, -0.2, epsilon = 1e-4);
}

#[test]
fn heavy_body_barely_moves_when_hit() {
    let config = PhysicsConfig::with_gravity(Vec3::ZERO);
    let mut world = PhysicsWorld::with_config(config).unwrap();
    let light = world.add_body(
        BodyBuilder::new_dynamic()
            .position(-3.0, 0.0, 0.0)
            .velocity(6.0, 0.0, 0.0)
            .shape(CollisionShape::sphere(0.5))
            .build(),
    );
    let heavy = world.add_body(
        BodyBuilder::new_dynamic()
            .mass(100.0)
            .shape(CollisionShape::sphere(0.5))
            .build(),
    );

    let momentum_before =
        world.body(light).unwrap().momentum() + world.body(heavy).unwrap().momentum();

    run(&mut world, 60);

    let light_body = world.body(light).unwrap();
    let heavy_body = world.body(heavy).unwrap();
    assert!(light_body.velocity().x < 0.0, "light body should bounce back");
    assert!(heavy_body.velocity().x > 0.0);
    assert!(heavy_body.velocity().x < 0.2);

    let momentum_after = light_body.momentum() + heavy_body.momentum();
    assert_relative_eq!(momentum_after.x, momentum_before.x, epsilon = 1e-3);
}

fn build_scene() -> PhysicsWorld {
    let mut world = PhysicsWorld::new();
    world.add_body(presets::ground(0.0, 10.0, 10.0));
    for i in 0..4 {
        let x = i as f32 * 0.7 - 1.0;
        world.add_body(presets::ball(Vec3::new(x, 2.0 + i as f32, 0.1 * i as f32), 0.4));
        world.add_body(presets::crate_box(
            Vec3::new(x + 0.2, 5.0 + i as f32, 0.0),
            Vec3::new(0.3, 0.3, 0.3),
            1.0 + i as f32,
        ));
    }
    world
}

#[test]
fn identical_runs_are_bit_identical() {
    let mut first = build_scene();
    let mut second = build_scene();

    // Uneven frame times exercise the accumulator as well
    let frames = [DT, DT * 0.5, DT * 2.3, DT, DT * 0.9];
    for i in 0..400 {
        let dt = frames[i % frames.len()];
        first.update(dt);
        second.update(dt);
    }

    let a: Vec<RigidBody> = first.bodies().map(|(_, b)| b.clone()).collect();
    let b: Vec<RigidBody> = second.bodies().map(|(_, b)| b.clone()).collect();
    assert_eq!(a.len(), 9);
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.position(), y.position());
        assert_eq!(x.velocity(), y.velocity());
    }
}

#[test]
fn huge_frame_is_capped() {
    let mut world = PhysicsWorld::new();
    world.add_body(presets::ball(Vec3::new(0.0, 100.0, 0.0), 0.5));

    // A debugger pause worth of time runs at most max_substeps steps
    let steps = world.update(30.0);
    assert_eq!(steps, world.config().max_substeps);
    assert_eq!(world.update(0.0), 0);
}

#[test]
fn removed_body_no_longer_collides() {
    let mut world = PhysicsWorld::new();
    let floor = world.add_body(presets::ground(0.0, 10.0, 10.0));
    let ball = world.add_body(presets::ball(Vec3::new(0.0, 0.45, 0.0), 0.5));
    world.update(DT);
    assert!(world.is_touching(floor, ball));

    let taken = world.remove_body(ball);
    assert!(taken.is_some());
    assert_eq!(world.body_count(), 1);
    assert!(!world.check_collision(0, 1));
    world.update(DT);
    assert!(world.contacts().is_empty());
}
