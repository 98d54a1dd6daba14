//! Сборка entity агентов и spawn points.

use bevy::prelude::*;

use super::components::{AgentBlueprint, SpawnPoint};
use crate::agent::{Agent, AgentContext, AgentStateMachine, PatrolRoute};
use crate::bridge::{AnimationSignals, LookPoint, NavAgent, LAYER_AGENT, LAYER_PLAYER, LAYER_SPAWN_POINT};
use crate::combat::{HitVolume, Weapon};
use crate::config::GameConfig;
use crate::vitals::VitalStats;

/// Компоненты нового агента. FSM уже в Patrol (первая точка маршрута выдана).
pub fn agent_bundle(blueprint: &AgentBlueprint, transform: Transform, route: PatrolRoute) -> impl Bundle {
    let config = blueprint.config.clone();
    // stopping distance = attack distance: агент останавливается на дистанции удара
    let mut nav = NavAgent::new(config.walk_speed, config.attack_distance);
    let mut anim = AnimationSignals::default();
    let machine = AgentStateMachine::start(&mut AgentContext {
        nav: &mut nav,
        anim: &mut anim,
        route: &route,
        config: &config,
    });

    (
        Agent,
        transform,
        machine,
        nav,
        anim,
        LookPoint::at_height(config.eye_height),
        VitalStats::new(blueprint.max_health),
        HitVolume::new(LAYER_AGENT, blueprint.hit_radius),
        Weapon::new(blueprint.weapon_damage, LAYER_PLAYER)
            .with_reach(blueprint.weapon_reach, blueprint.weapon_radius),
        route,
        config,
    )
}

/// Spawn point создаёт одного агента со своей позиции + offset
pub fn spawn_agent(
    commands: &mut Commands,
    spawn_point: &SpawnPoint,
    spawn_point_transform: &Transform,
    route: PatrolRoute,
) -> Entity {
    let transform = spawn_point.spawn_transform(spawn_point_transform);
    let waypoints = route.len();
    let entity = commands
        .spawn(agent_bundle(&spawn_point.blueprint, transform, route))
        .id();

    crate::log(&format!(
        "👾 Spawned agent {:?} at {:?} ({} waypoints)",
        entity, transform.translation, waypoints
    ));
    entity
}

/// Разрушаемый spawn point с blueprint из общего tuning
pub fn spawn_point_bundle(config: &GameConfig, transform: Transform) -> impl Bundle {
    (
        SpawnPoint::new(config.spawn.offset(), AgentBlueprint::from_config(config)),
        transform,
        VitalStats::new(config.spawn.spawn_point_max_health),
        HitVolume::new(LAYER_SPAWN_POINT, config.spawn.spawn_point_hit_radius),
    )
}
