//! Agent ECS systems: perception + FSM tick (Update), движение (FixedUpdate).

use bevy::prelude::*;

use super::components::{Agent, AgentConfig, PatrolRoute};
use super::perception::{detects_player, PlayerSighting};
use super::state_machine::{AgentContext, AgentSenses, AgentStateMachine, AgentTick};
use crate::bridge::{AnimationSignals, Geometry, LookPoint, NavAgent};
use crate::player::Player;
use crate::vitals::VitalStats;

/// Событие: агент доиграл Death и удалён из мира
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentDestroyed {
    pub entity: Entity,
}

/// Система: perception + logic tick всех агентов
///
/// Death → Destroy: despawn + AgentDestroyed (kill tally считает session).
pub fn agent_logic_tick(
    mut commands: Commands,
    mut agents: Query<
        (
            Entity,
            &Transform,
            &LookPoint,
            &mut AgentStateMachine,
            &mut NavAgent,
            &mut AnimationSignals,
            &PatrolRoute,
            &AgentConfig,
        ),
        With<Agent>,
    >,
    players: Query<(Entity, &Transform, &LookPoint, &VitalStats), (With<Player>, Without<Agent>)>,
    geometry: Res<Geometry>,
    time: Res<Time>,
    mut destroyed_events: EventWriter<AgentDestroyed>,
) {
    let delta = time.delta_secs();

    let player = players
        .iter()
        .next()
        .map(|(entity, transform, look, vitals)| {
            let sighting = PlayerSighting {
                entity,
                look_point: look.world(transform),
                alive: vitals.is_alive(),
            };
            (sighting, transform.translation)
        });

    for (entity, transform, look, mut machine, mut nav, mut anim, route, config) in agents.iter_mut() {
        let player_detected = player.is_some_and(|(sighting, _)| {
            detects_player(
                look.world(transform),
                transform.forward().as_vec3(),
                &sighting,
                config.fov_half_angle_deg,
                config.detection_distance,
                geometry.provider(),
            )
        });

        let senses = AgentSenses {
            position: transform.translation,
            player_detected,
            player_position: player
                .filter(|(sighting, _)| sighting.alive)
                .map(|(_, position)| position),
        };

        let mut ctx = AgentContext {
            nav: &mut nav,
            anim: &mut anim,
            route,
            config,
        };

        if machine.tick(&senses, delta, &mut ctx) == AgentTick::Destroy {
            crate::log_info(&format!("💀 Agent {:?} destroyed (death animation finished)", entity));
            commands.entity(entity).despawn();
            destroyed_events.write(AgentDestroyed { entity });
        }
    }
}

/// Система: fixed tick агентов (скорость навигации, поворот)
pub fn agent_fixed_tick(
    mut agents: Query<
        (
            &mut Transform,
            &mut AgentStateMachine,
            &mut NavAgent,
            &mut AnimationSignals,
            &PatrolRoute,
            &AgentConfig,
        ),
        With<Agent>,
    >,
    players: Query<(&Transform, &VitalStats), (With<Player>, Without<Agent>)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    let player_position = players
        .iter()
        .next()
        .filter(|(_, vitals)| vitals.is_alive())
        .map(|(transform, _)| transform.translation);

    for (mut transform, mut machine, mut nav, mut anim, route, config) in agents.iter_mut() {
        let senses = AgentSenses {
            position: transform.translation,
            player_detected: false,
            player_position,
        };

        let mut ctx = AgentContext {
            nav: &mut nav,
            anim: &mut anim,
            route,
            config,
        };

        machine.fixed_tick(&mut transform, &senses, delta, &mut ctx);
    }
}
