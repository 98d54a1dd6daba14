//! Tests for session systems (start / end lock, kill tally, outcome).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::events::{
        EnemyCountChanged, GameEnded, KillCountChanged, SessionCommand, VictoryReached,
    };
    use super::super::state::{GameSession, KillTally};
    use super::super::systems::{check_game_outcome, handle_session_commands, record_kills};
    use crate::agent::{AgentDestroyed, PatrolRoute};
    use crate::config::GameConfig;
    use crate::player::Player;
    use crate::spawn::{agent_bundle, spawn_point_bundle, AgentBlueprint, Roster};
    use crate::vitals::VitalStats;
    use crate::waves::{WaveOrchestrator, WavePhase};

    fn session_app(config: GameConfig) -> App {
        let mut app = App::new();
        app.insert_resource(config)
            .init_resource::<GameSession>()
            .init_resource::<KillTally>()
            .init_resource::<Roster>()
            .init_resource::<WaveOrchestrator>()
            .add_event::<SessionCommand>()
            .add_event::<GameEnded>()
            .add_event::<KillCountChanged>()
            .add_event::<EnemyCountChanged>()
            .add_event::<VictoryReached>()
            .add_event::<AgentDestroyed>()
            .add_systems(
                Update,
                (handle_session_commands, record_kills, check_game_outcome).chain(),
            );
        app
    }

    fn drain<E: Event>(app: &mut App) -> Vec<E> {
        app.world_mut().resource_mut::<Events<E>>().drain().collect()
    }

    fn spawn_portal(app: &mut App) -> Entity {
        app.world_mut()
            .spawn(spawn_point_bundle(&GameConfig::default(), Transform::default()))
            .id()
    }

    fn spawn_player(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((Player::default(), VitalStats::new(100.0)))
            .id()
    }

    fn send(app: &mut App, command: SessionCommand) {
        app.world_mut().send_event(command);
    }

    #[test]
    fn test_start_rebuilds_state() {
        let mut app = session_app(GameConfig::default());
        let portal = spawn_portal(&mut app);
        let agent = app
            .world_mut()
            .spawn(agent_bundle(
                &AgentBlueprint::default(),
                Transform::default(),
                PatrolRoute::default(),
            ))
            .id();
        spawn_player(&mut app);

        send(&mut app, SessionCommand::Start);
        app.update();

        assert!(app.world().resource::<GameSession>().is_active());
        let roster = app.world().resource::<Roster>();
        assert_eq!(roster.living_spawners, vec![portal]);
        assert_eq!(roster.living_agents, vec![agent]);

        let orchestrator = app.world().resource::<WaveOrchestrator>();
        assert_eq!(orchestrator.phase(), WavePhase::WaveActive);
        assert_eq!(orchestrator.current_wave_size(), 8);

        assert_eq!(drain::<EnemyCountChanged>(&mut app), vec![EnemyCountChanged { count: 8 }]);
        assert_eq!(
            drain::<KillCountChanged>(&mut app),
            vec![KillCountChanged { kills: 0, enemies: 9 }]
        );
        assert!(drain::<GameEnded>(&mut app).is_empty());
    }

    #[test]
    fn test_double_start_is_noop() {
        let mut app = session_app(GameConfig::default());
        spawn_portal(&mut app);
        spawn_player(&mut app);

        send(&mut app, SessionCommand::Start);
        app.update();
        drain::<EnemyCountChanged>(&mut app);

        app.world_mut().resource_mut::<KillTally>().kills = 3;
        send(&mut app, SessionCommand::Start);
        app.update();

        // Tally не сброшен, событий старта нет
        assert_eq!(app.world().resource::<KillTally>().kills, 3);
        assert!(drain::<EnemyCountChanged>(&mut app).is_empty());
    }

    #[test]
    fn test_end_fires_once() {
        let mut app = session_app(GameConfig::default());
        spawn_portal(&mut app);
        spawn_player(&mut app);

        // End до старта: no-op
        send(&mut app, SessionCommand::End { won: true });
        app.update();
        assert!(drain::<GameEnded>(&mut app).is_empty());

        send(&mut app, SessionCommand::Start);
        app.update();
        send(&mut app, SessionCommand::End { won: false });
        send(&mut app, SessionCommand::End { won: true });
        app.update();

        assert_eq!(drain::<GameEnded>(&mut app), vec![GameEnded { won: false }]);
        assert_eq!(app.world().resource::<GameSession>().outcome(), Some(false));
        assert!(app.world().resource::<Roster>().living_spawners.is_empty());
        assert_eq!(
            app.world().resource::<WaveOrchestrator>().phase(),
            WavePhase::NoWave
        );
    }

    #[test]
    fn test_win_when_nothing_left() {
        let mut app = session_app(GameConfig::default());
        let portal = spawn_portal(&mut app);
        spawn_player(&mut app);

        send(&mut app, SessionCommand::Start);
        app.update();
        assert!(drain::<GameEnded>(&mut app).is_empty());

        // Spawn point уничтожен, агентов нет
        app.world_mut()
            .resource_mut::<Roster>()
            .living_spawners
            .retain(|entity| *entity != portal);
        app.world_mut().despawn(portal);
        app.update();
        app.update();

        assert_eq!(drain::<GameEnded>(&mut app), vec![GameEnded { won: true }]);
        assert_eq!(app.world().resource::<GameSession>().outcome(), Some(true));
    }

    #[test]
    fn test_loss_when_player_dies() {
        let mut app = session_app(GameConfig::default());
        spawn_portal(&mut app);
        let player = spawn_player(&mut app);

        send(&mut app, SessionCommand::Start);
        app.update();

        app.world_mut().get_mut::<VitalStats>(player).unwrap().die();
        app.update();
        app.update();

        assert_eq!(drain::<GameEnded>(&mut app), vec![GameEnded { won: false }]);
    }

    #[test]
    fn test_kill_threshold_announces_victory_once() {
        let mut config = GameConfig::default();
        config.session.victory_kill_threshold = Some(2);
        let mut app = session_app(config);
        spawn_portal(&mut app);
        spawn_player(&mut app);
        send(&mut app, SessionCommand::Start);

        for index in 0..3 {
            app.world_mut().send_event(AgentDestroyed {
                entity: Entity::from_raw(100 + index),
            });
        }
        app.update();

        assert_eq!(app.world().resource::<KillTally>().kills, 3);
        assert_eq!(drain::<VictoryReached>(&mut app).len(), 1);
        let kills: Vec<u32> = drain::<KillCountChanged>(&mut app)
            .into_iter()
            .map(|event| event.kills)
            .collect();
        // Первое событие от старта (kills = 0)
        assert_eq!(kills, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_kills_ignored_after_game_end() {
        let mut app = session_app(GameConfig::default());
        spawn_portal(&mut app);
        spawn_player(&mut app);

        send(&mut app, SessionCommand::Start);
        app.update();
        app.world_mut().send_event(AgentDestroyed {
            entity: Entity::from_raw(100),
        });
        app.update();
        assert_eq!(app.world().resource::<KillTally>().kills, 1);

        send(&mut app, SessionCommand::End { won: true });
        app.update();
        drain::<KillCountChanged>(&mut app);

        app.world_mut().send_event(AgentDestroyed {
            entity: Entity::from_raw(101),
        });
        app.update();

        assert_eq!(app.world().resource::<KillTally>().kills, 1);
        assert!(drain::<KillCountChanged>(&mut app).is_empty());
        assert!(drain::<VictoryReached>(&mut app).is_empty());
    }
}
