//! Session systems: start / end, kill tally, win / loss.

use bevy::prelude::*;

use super::events::{EnemyCountChanged, GameEnded, KillCountChanged, SessionCommand, VictoryReached};
use super::state::{GameSession, KillTally};
use crate::agent::{Agent, AgentDestroyed};
use crate::config::GameConfig;
use crate::player::Player;
use crate::spawn::{rebuild_roster, Roster, SpawnPoint};
use crate::vitals::VitalStats;
use crate::waves::WaveOrchestrator;

/// Конец игры под lock'ом. None если игра уже не шла.
fn finish_session(
    session: &mut GameSession,
    roster: &mut Roster,
    orchestrator: &mut WaveOrchestrator,
    won: bool,
) -> Option<GameEnded> {
    if !session.finish(won) {
        return None;
    }

    roster.clear();
    orchestrator.halt();

    if won {
        crate::log_info("🏆 Game won");
    } else {
        crate::log_info("☠️ Game lost");
    }
    Some(GameEnded { won })
}

/// Система: SessionCommand → старт / конец игры
pub fn handle_session_commands(
    mut session_commands: EventReader<SessionCommand>,
    config: Res<GameConfig>,
    mut session: ResMut<GameSession>,
    mut roster: ResMut<Roster>,
    mut orchestrator: ResMut<WaveOrchestrator>,
    mut tally: ResMut<KillTally>,
    agents: Query<(Entity, &VitalStats), (With<Agent>, Without<SpawnPoint>)>,
    spawners: Query<(Entity, &VitalStats), (With<SpawnPoint>, Without<Agent>)>,
    mut ended_events: EventWriter<GameEnded>,
    mut enemy_events: EventWriter<EnemyCountChanged>,
    mut kill_events: EventWriter<KillCountChanged>,
) {
    for command in session_commands.read() {
        match *command {
            SessionCommand::Start => {
                if !session.start() {
                    continue;
                }

                rebuild_roster(&mut roster, &agents, &spawners);
                orchestrator.begin(&config.waves);
                tally.reset();

                let wave_size = if orchestrator.is_running() {
                    orchestrator.current_wave_size().max(0)
                } else {
                    0
                };
                tally.enemies = roster.living_agents.len() as u32 + wave_size as u32;

                crate::log_info(&format!(
                    "▶️ Game started: {} agents, {} spawn points, first wave {}",
                    roster.living_agents.len(),
                    roster.living_spawners.len(),
                    wave_size
                ));
                enemy_events.write(EnemyCountChanged { count: wave_size });
                kill_events.write(tally.changed());
            }

            SessionCommand::End { won } => {
                if let Some(ended) = finish_session(&mut session, &mut roster, &mut orchestrator, won) {
                    ended_events.write(ended);
                }
            }
        }
    }
}

/// Система: AgentDestroyed → kill tally (+ победа по порогу)
///
/// После конца игры добитые агенты уже не считаются.
pub fn record_kills(
    mut destroyed_events: EventReader<AgentDestroyed>,
    config: Res<GameConfig>,
    session: Res<GameSession>,
    mut tally: ResMut<KillTally>,
    mut kill_events: EventWriter<KillCountChanged>,
    mut victory_events: EventWriter<VictoryReached>,
) {
    if !session.is_active() {
        destroyed_events.clear();
        return;
    }

    for _ in destroyed_events.read() {
        let reached = tally.record_kill(config.session.victory_kill_threshold);
        kill_events.write(tally.changed());

        if reached {
            crate::log_info(&format!("🏆 Kill threshold reached ({} kills)", tally.kills));
            victory_events.write(VictoryReached);
        }
    }
}

/// Система: проверка победы / поражения каждый кадр
///
/// Победа: нет живых spawn points и живых агентов. Поражение: игрок мёртв.
pub fn check_game_outcome(
    mut session: ResMut<GameSession>,
    mut roster: ResMut<Roster>,
    mut orchestrator: ResMut<WaveOrchestrator>,
    players: Query<&VitalStats, With<Player>>,
    mut ended_events: EventWriter<GameEnded>,
) {
    if !session.is_active() {
        return;
    }

    let won = if !roster.has_living_spawners() && !roster.has_living_agents() {
        true
    } else if players.iter().any(VitalStats::is_dead) {
        false
    } else {
        return;
    };

    if let Some(ended) = finish_session(&mut session, &mut roster, &mut orchestrator, won) {
        ended_events.write(ended);
    }
}
