//! Headless симуляция Riftguard
//!
//! Маленькая арена без рендера: игрок, две spawn points, пул patrol точек.
//! Первый аргумент (опционально) — путь к TOML конфигу.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use riftguard_simulation::bridge::PlayerInput;
use riftguard_simulation::player::player_bundle;
use riftguard_simulation::session::{GameSession, KillTally};
use riftguard_simulation::spawn::{spawn_point_bundle, PatrolPool};
use riftguard_simulation::waves::WaveOrchestrator;
use riftguard_simulation::{
    create_headless_app, log_error, log_info, GameConfig, SessionCommand, SimulationPlugin,
};

const FRAME_RATE: u32 = 60;
const MAX_FRAMES: u32 = FRAME_RATE * 180;

fn main() {
    let seed = 42;

    let mut app = create_headless_app(seed);

    let config = match std::env::args().nth(1) {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(error) => {
                log_error(&format!("Config {}: {}", path, error));
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };

    log_info(&format!("Starting Riftguard headless simulation (seed: {})", seed));

    app.insert_resource(config.clone())
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / FRAME_RATE as f64,
        )))
        .insert_resource(arena_patrol_pool())
        .add_plugins(SimulationPlugin);

    let world = app.world_mut();
    world.spawn(player_bundle(&config, Transform::default()));
    world.spawn(spawn_point_bundle(&config, Transform::from_xyz(-8.0, 0.0, -8.0)));
    world.spawn(spawn_point_bundle(&config, Transform::from_xyz(8.0, 0.0, -8.0)));
    world.send_event(SessionCommand::Start);

    for frame in 0..MAX_FRAMES {
        // Игрок стоит на месте и машет оружием раз в полторы секунды
        app.world_mut().resource_mut::<PlayerInput>().attack_pressed = frame % 90 == 0;

        app.update();

        if frame % FRAME_RATE == 0 {
            let world = app.world();
            let orchestrator = world.resource::<WaveOrchestrator>();
            let tally = world.resource::<KillTally>();
            log_info(&format!(
                "t={:>3}s wave {} {:?} (left {}), kills {}/{}",
                frame / FRAME_RATE,
                orchestrator.waves_completed() + 1,
                orchestrator.phase(),
                orchestrator.current_wave_size(),
                tally.kills,
                tally.enemies
            ));
        }

        if !app.world().resource::<GameSession>().is_active() {
            break;
        }
    }

    match app.world().resource::<GameSession>().outcome() {
        Some(true) => log_info("Simulation complete: player won"),
        Some(false) => log_info("Simulation complete: player lost"),
        None => log_info("Simulation complete: time limit reached"),
    }
}

/// Пул patrol точек арены (три зоны по три точки)
fn arena_patrol_pool() -> PatrolPool {
    PatrolPool::new(vec![
        Vec3::new(-6.0, 0.0, -4.0),
        Vec3::new(-4.0, 0.0, 2.0),
        Vec3::new(-7.0, 0.0, 6.0),
        Vec3::new(0.0, 0.0, -6.0),
        Vec3::new(1.0, 0.0, 4.0),
        Vec3::new(-1.0, 0.0, 8.0),
        Vec3::new(6.0, 0.0, -4.0),
        Vec3::new(4.0, 0.0, 2.0),
        Vec3::new(7.0, 0.0, 6.0),
    ])
}
