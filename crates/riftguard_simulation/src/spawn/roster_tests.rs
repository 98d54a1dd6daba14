//! Tests for roster sweep / rebuild and the agent factory.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::components::PatrolPool;
    use super::super::factory::{agent_bundle, spawn_point_bundle};
    use super::super::roster::{rebuild_roster, sweep_rosters, Roster};
    use super::super::AgentBlueprint;
    use crate::agent::{Agent, AgentState, AgentStateMachine, PatrolRoute};
    use crate::bridge::NavAgent;
    use crate::config::GameConfig;
    use crate::spawn::SpawnPoint;
    use crate::vitals::VitalStats;

    fn route() -> PatrolRoute {
        PatrolRoute::new(vec![Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 5.0)])
    }

    fn spawn_agent(world: &mut World) -> Entity {
        world
            .spawn(agent_bundle(&AgentBlueprint::default(), Transform::default(), route()))
            .id()
    }

    #[test]
    fn test_agent_bundle_starts_patrolling() {
        let mut world = World::new();
        let agent = spawn_agent(&mut world);

        let machine = world.get::<AgentStateMachine>(agent).unwrap();
        assert_eq!(machine.state(), AgentState::Patrol);
        assert_eq!(machine.next_waypoint(), 1);

        let nav = world.get::<NavAgent>(agent).unwrap();
        assert_eq!(nav.destination(), Some(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(nav.stopping_distance, 1.5);
        assert_eq!(world.get::<VitalStats>(agent).unwrap().max(), 100.0);
    }

    #[test]
    fn test_sweep_keeps_dying_agent_until_despawn() {
        let mut app = App::new();
        app.init_resource::<Roster>()
            .add_systems(Update, sweep_rosters);

        let first = spawn_agent(app.world_mut());
        let second = spawn_agent(app.world_mut());
        let third = spawn_agent(app.world_mut());
        let portal = app
            .world_mut()
            .spawn(spawn_point_bundle(&GameConfig::default(), Transform::default()))
            .id();

        {
            let mut roster = app.world_mut().resource_mut::<Roster>();
            roster.living_agents = vec![first, second, third];
            roster.living_spawners = vec![portal];
        }

        app.world_mut().get_mut::<VitalStats>(first).unwrap().die();
        app.world_mut().despawn(second);
        app.update();

        // Мёртвый агент ещё в Death клипе: считается до despawn
        let roster = app.world().resource::<Roster>();
        assert_eq!(roster.living_agents, vec![first, third]);
        assert_eq!(roster.living_spawners, vec![portal]);

        app.world_mut().despawn(first);
        app.update();
        assert_eq!(app.world().resource::<Roster>().living_agents, vec![third]);
    }

    #[test]
    fn test_sweep_drops_dead_spawner_immediately() {
        let mut app = App::new();
        app.init_resource::<Roster>()
            .add_systems(Update, sweep_rosters);

        let portal = app
            .world_mut()
            .spawn(spawn_point_bundle(&GameConfig::default(), Transform::default()))
            .id();
        let other = app
            .world_mut()
            .spawn(spawn_point_bundle(&GameConfig::default(), Transform::default()))
            .id();
        app.world_mut().resource_mut::<Roster>().living_spawners = vec![portal, other];

        app.world_mut().get_mut::<VitalStats>(portal).unwrap().die();
        app.update();
        assert_eq!(app.world().resource::<Roster>().living_spawners, vec![other]);

        app.world_mut().despawn(other);
        app.update();
        assert!(!app.world().resource::<Roster>().has_living_spawners());
    }

    #[test]
    fn test_rebuild_collects_living_entities() {
        let mut app = App::new();
        app.init_resource::<Roster>().add_systems(
            Update,
            |mut roster: ResMut<Roster>,
             agents: Query<(Entity, &VitalStats), (With<Agent>, Without<SpawnPoint>)>,
             spawners: Query<(Entity, &VitalStats), (With<SpawnPoint>, Without<Agent>)>| {
                rebuild_roster(&mut roster, &agents, &spawners);
            },
        );

        let living = spawn_agent(app.world_mut());
        let dead = spawn_agent(app.world_mut());
        app.world_mut().get_mut::<VitalStats>(dead).unwrap().die();
        let portal = app
            .world_mut()
            .spawn(spawn_point_bundle(&GameConfig::default(), Transform::default()))
            .id();

        app.update();

        let roster = app.world().resource::<Roster>();
        assert_eq!(roster.living_agents, vec![living]);
        assert_eq!(roster.living_spawners, vec![portal]);
    }

    #[test]
    fn test_push_agent_is_unique() {
        let mut roster = Roster::default();
        let entity = Entity::from_raw(9);
        roster.push_agent(entity);
        roster.push_agent(entity);
        assert_eq!(roster.living_agents.len(), 1);
        assert!(PatrolPool::default().waypoints().is_empty());
    }
}
