use anyhow::{Context, Result};
use log::info;

use rusted_physics::engine::physics::{presets, BodyBuilder, CollisionEvent, CollisionShape};
use rusted_physics::{PhysicsConfig, PhysicsWorld, Vec3};

/// Simulated frame rate of the demo
const FRAME_TIME: f32 = 1.0 / 60.0;

/// Seconds of simulation the demo runs for
const DEMO_SECONDS: f32 = 4.0;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Rusted Physics demo...");

    // Optional config file as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read physics config {}", path))?;
            PhysicsConfig::from_json_str(&text)
                .with_context(|| format!("Invalid physics config {}", path))?
        }
        None => PhysicsConfig::default(),
    };
    info!(
        "Gravity {:?}, fixed timestep {:.4}s",
        config.gravity, config.fixed_timestep
    );

    let mut world = PhysicsWorld::with_config(config)?;

    let ground = world.add_body(presets::ground(0.0, 10.0, 10.0));
    let ball = world.add_body(presets::ball(Vec3::new(0.0, 4.0, 0.0), 0.5));
    let crate_box = world.add_body(presets::crate_box(
        Vec3::new(0.3, 6.0, 0.0),
        Vec3::splat(0.5),
        2.0,
    ));
    let drifter = world.add_body(
        BodyBuilder::new_dynamic()
            .position(-3.0, 0.5, 0.0)
            .velocity(1.5, 0.0, 0.0)
            .use_gravity(false)
            .drag(0.02)
            .shape(CollisionShape::sphere(0.5))
            .build(),
    );

    let frames = (DEMO_SECONDS / FRAME_TIME).round() as u32;
    for frame in 0..frames {
        world.update(FRAME_TIME);

        for event in world.collision_events() {
            match event {
                CollisionEvent::Started { body_a, body_b } => {
                    info!("frame {}: {:?} touched {:?}", frame, body_a, body_b)
                }
                CollisionEvent::Stopped { body_a, body_b } => {
                    info!("frame {}: {:?} separated from {:?}", frame, body_a, body_b)
                }
            }
        }

        if frame % 30 == 0 {
            for (name, handle) in [("ball", ball), ("crate", crate_box), ("drifter", drifter)] {
                if let Some(body) = world.body(handle) {
                    info!(
                        "t={:.2}s {:<8} pos=({:.3}, {:.3}, {:.3}) speed={:.3} sleeping={}",
                        frame as f32 * FRAME_TIME,
                        name,
                        body.position().x,
                        body.position().y,
                        body.position().z,
                        body.velocity().length(),
                        body.is_sleeping()
                    );
                }
            }
        }
    }

    let stats = world.stats();
    info!(
        "Done: {} steps ({:.3}s dropped), {} contacts in last step, {} sleeping, ground still at {:?}",
        stats.total_steps,
        stats.dropped_time,
        stats.contacts,
        stats.sleeping_bodies,
        world.body(ground).map(|b| b.position())
    );

    Ok(())
}
