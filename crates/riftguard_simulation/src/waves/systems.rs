//! Wave ECS systems.

use bevy::prelude::*;

use super::orchestrator::{WaveOrchestrator, WaveStep};
use crate::agent::PatrolRoute;
use crate::config::GameConfig;
use crate::session::{EnemyCountChanged, GameSession, KillCountChanged, KillTally};
use crate::spawn::{spawn_agent, PatrolPool, Roster, SpawnPoint};
use crate::DeterministicRng;

/// Система: секундный тик волн
///
/// Часы идут только пока игра активна и есть живые spawn points.
pub fn run_wave_clock(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    session: Res<GameSession>,
    pool: Res<PatrolPool>,
    mut orchestrator: ResMut<WaveOrchestrator>,
    mut roster: ResMut<Roster>,
    mut rng: ResMut<DeterministicRng>,
    mut tally: ResMut<KillTally>,
    spawn_points: Query<(&SpawnPoint, &Transform)>,
    mut enemy_events: EventWriter<EnemyCountChanged>,
    mut kill_events: EventWriter<KillCountChanged>,
) {
    if !session.is_active() || !orchestrator.is_running() || !roster.has_living_spawners() {
        return;
    }

    // Ролл видит только spawn points, которые реально можно вызвать:
    // иначе progress и размер волны списываются за несостоявшийся spawn
    let spawners: Vec<Entity> = roster
        .living_spawners
        .iter()
        .copied()
        .filter(|entity| spawn_points.contains(*entity))
        .collect();
    if spawners.len() != roster.living_spawners.len() {
        crate::log_warning(&format!(
            "Wave clock: {} of {} roster spawners have no SpawnPoint",
            roster.living_spawners.len() - spawners.len(),
            roster.living_spawners.len()
        ));
    }

    let ticks = orchestrator.accumulate(time.delta_secs());
    for _ in 0..ticks {
        let step = orchestrator.tick_second(&config.waves, &mut rng.rng, spawners.len());

        match step {
            WaveStep::Quiet | WaveStep::Cooldown { .. } => {}

            WaveStep::Spawn {
                spawner_index,
                wave_cleared,
            } => {
                let Some((spawn_point, transform)) = spawners
                    .get(spawner_index)
                    .and_then(|entity| spawn_points.get(*entity).ok())
                else {
                    crate::log_warning(&format!(
                        "Wave spawn: spawner index {} out of {}",
                        spawner_index,
                        spawners.len()
                    ));
                    continue;
                };

                let route = PatrolRoute::new(pool.assemble_route(&mut rng.rng));
                let agent = spawn_agent(&mut commands, spawn_point, transform, route);
                roster.push_agent(agent);

                if wave_cleared {
                    crate::log_info(&format!(
                        "🌊 Wave {} fully spawned, cooldown {}s",
                        orchestrator.waves_completed() + 1,
                        orchestrator.cooldown_remaining()
                    ));
                }
            }

            WaveStep::WaveCleared => {
                crate::log_info(&format!(
                    "🌊 Wave {} is empty, cooldown {}s",
                    orchestrator.waves_completed() + 1,
                    orchestrator.cooldown_remaining()
                ));
            }

            WaveStep::WaveStarted { size } => {
                tally.enemies += size.max(0) as u32;
                crate::log_info(&format!(
                    "🌊 Wave {} started: {} enemies",
                    orchestrator.waves_completed() + 1,
                    size
                ));
                enemy_events.write(EnemyCountChanged { count: size });
                kill_events.write(tally.changed());
            }

            WaveStep::AllWavesComplete => {
                crate::log_info("🌊 All waves complete");
            }
        }
    }
}
