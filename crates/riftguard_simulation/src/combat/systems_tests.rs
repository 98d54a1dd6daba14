//! Tests for weapon windows and hit resolution.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::components::Weapon;
    use super::super::events::{DamageDealt, WeaponOverlap, WeaponWindow};
    use super::super::systems::{apply_weapon_windows, resolve_weapon_hits};
    use crate::agent::{AgentState, AgentStateMachine, PatrolRoute};
    use crate::bridge::{AnimTrigger, AnimationSignals, NavAgent};
    use crate::config::GameConfig;
    use crate::player::{player_bundle, PlayerState, PlayerStateMachine};
    use crate::spawn::{agent_bundle, spawn_point_bundle, AgentBlueprint};
    use crate::vitals::{HealthChanged, VitalStats};

    struct Arena {
        app: App,
        player: Entity,
        agent: Entity,
        portal: Entity,
    }

    fn arena() -> Arena {
        let mut app = App::new();
        app.add_event::<WeaponWindow>()
            .add_event::<WeaponOverlap>()
            .add_event::<DamageDealt>()
            .add_event::<HealthChanged>()
            .add_systems(Update, (apply_weapon_windows, resolve_weapon_hits).chain());

        let config = GameConfig::default();
        let player = app
            .world_mut()
            .spawn(player_bundle(&config, Transform::default()))
            .id();
        let agent = app
            .world_mut()
            .spawn(agent_bundle(
                &AgentBlueprint::default(),
                Transform::from_xyz(0.0, 0.0, -1.0),
                PatrolRoute::new(vec![Vec3::new(5.0, 0.0, 0.0)]),
            ))
            .id();
        let portal = app
            .world_mut()
            .spawn(spawn_point_bundle(&config, Transform::from_xyz(3.0, 0.0, 0.0)))
            .id();

        Arena {
            app,
            player,
            agent,
            portal,
        }
    }

    impl Arena {
        fn swing(&mut self, owner: Entity, target: Entity) {
            let world = self.app.world_mut();
            world.send_event(WeaponWindow::Open(owner));
            world.send_event(WeaponOverlap {
                weapon_owner: owner,
                target,
            });
            self.app.update();
        }

        fn close(&mut self, owner: Entity) {
            self.app.world_mut().send_event(WeaponWindow::Close(owner));
            self.app.update();
        }

        fn health(&self, entity: Entity) -> f32 {
            self.app.world().get::<VitalStats>(entity).unwrap().current()
        }

        fn health_events(&mut self) -> Vec<HealthChanged> {
            self.app
                .world_mut()
                .resource_mut::<Events<HealthChanged>>()
                .drain()
                .collect()
        }

        fn damage_events(&mut self) -> Vec<DamageDealt> {
            self.app
                .world_mut()
                .resource_mut::<Events<DamageDealt>>()
                .drain()
                .collect()
        }
    }

    #[test]
    fn test_player_hit_puts_agent_in_damage() {
        let mut arena = arena();
        let (player, agent) = (arena.player, arena.agent);

        arena.swing(player, agent);

        assert_eq!(arena.health(agent), 90.0);
        let machine = arena.app.world().get::<AgentStateMachine>(agent).unwrap();
        assert_eq!(machine.state(), AgentState::Damage);
        assert!(arena
            .app
            .world()
            .get::<AnimationSignals>(agent)
            .unwrap()
            .is_triggered(AnimTrigger::Damage));
        assert!(arena.app.world().get::<NavAgent>(agent).unwrap().is_stopped());

        assert_eq!(
            arena.damage_events(),
            vec![DamageDealt {
                attacker: player,
                target: agent,
                damage: 10.0,
                target_died: false,
            }]
        );
    }

    #[test]
    fn test_one_hit_per_window() {
        let mut arena = arena();
        let (player, agent) = (arena.player, arena.agent);

        arena.swing(player, agent);
        arena
            .app
            .world_mut()
            .send_event(WeaponOverlap {
                weapon_owner: player,
                target: agent,
            });
        arena.app.update();
        assert_eq!(arena.health(agent), 90.0);

        // Закрытое окно не бьёт
        arena.close(player);
        arena.app.world_mut().send_event(WeaponOverlap {
            weapon_owner: player,
            target: agent,
        });
        arena.app.update();
        assert_eq!(arena.health(agent), 90.0);

        // Новый swing
        arena.swing(player, agent);
        assert_eq!(arena.health(agent), 80.0);
    }

    #[test]
    fn test_lethal_hit_forces_agent_death() {
        let mut arena = arena();
        let (player, agent) = (arena.player, arena.agent);
        arena.app.world_mut().get_mut::<Weapon>(player).unwrap().damage = 150.0;

        arena.swing(player, agent);

        assert_eq!(arena.health(agent), 0.0);
        let machine = arena.app.world().get::<AgentStateMachine>(agent).unwrap();
        assert_eq!(machine.state(), AgentState::Death);
        assert!(arena.damage_events()[0].target_died);

        assert_eq!(arena.health_events().len(), 1);

        // Мёртвого больше не бьём, и health события нет
        arena.close(player);
        arena.swing(player, agent);
        assert!(arena.damage_events().is_empty());
        assert!(arena.health_events().is_empty());
    }

    #[test]
    fn test_agents_do_not_hit_agents() {
        let mut arena = arena();
        let agent = arena.agent;
        let other = arena
            .app
            .world_mut()
            .spawn(agent_bundle(
                &AgentBlueprint::default(),
                Transform::default(),
                PatrolRoute::default(),
            ))
            .id();

        arena.swing(agent, other);
        arena.swing(agent, agent);

        assert_eq!(arena.health(other), 100.0);
        assert_eq!(arena.health(agent), 100.0);
        assert!(arena.damage_events().is_empty());
    }

    #[test]
    fn test_agent_kills_player() {
        let mut arena = arena();
        let (player, agent) = (arena.player, arena.agent);

        for _ in 0..4 {
            arena.swing(agent, player);
            arena.close(agent);
        }

        assert_eq!(arena.health(player), 0.0);
        let machine = arena.app.world().get::<PlayerStateMachine>(player).unwrap();
        assert_eq!(machine.state(), PlayerState::Death);
    }

    #[test]
    fn test_spawn_point_destroyed() {
        let mut arena = arena();
        let (player, portal) = (arena.player, arena.portal);

        for _ in 0..9 {
            arena.swing(player, portal);
            arena.close(player);
        }
        assert_eq!(arena.health(portal), 10.0);

        arena.swing(player, portal);
        assert!(arena.app.world().get_entity(portal).is_err());
    }
}
