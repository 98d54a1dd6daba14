//! Combat resolution: окна оружия → overlap → урон → принудительный переход FSM.
//!
//! Работает в Update до FSM тиков, поэтому убитый агент уже в Death к моменту
//! проверки auto-destroy в том же кадре.

use bevy::prelude::*;

use super::components::{HitVolume, Weapon};
use super::events::{DamageDealt, WeaponOverlap, WeaponWindow};
use crate::agent::{Agent, AgentConfig, AgentContext, AgentState, AgentStateMachine, PatrolRoute};
use crate::bridge::{AnimationSignals, NavAgent};
use crate::player::{Player, PlayerMotion, PlayerRig, PlayerState, PlayerStateMachine, PlayerTimers};
use crate::spawn::SpawnPoint;
use crate::vitals::{HealthChanged, VitalChange, VitalStats};

/// Система: WeaponWindow события → Weapon.enabled
pub fn apply_weapon_windows(
    mut window_events: EventReader<WeaponWindow>,
    mut weapons: Query<&mut Weapon>,
) {
    for event in window_events.read() {
        match *event {
            WeaponWindow::Open(owner) => {
                if let Ok(mut weapon) = weapons.get_mut(owner) {
                    weapon.open_window();
                }
            }
            WeaponWindow::Close(owner) => {
                if let Ok(mut weapon) = weapons.get_mut(owner) {
                    weapon.close_window();
                }
            }
        }
    }
}

type AgentTargets<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut VitalStats,
        &'static mut AgentStateMachine,
        &'static mut NavAgent,
        &'static mut AnimationSignals,
        &'static PatrolRoute,
        &'static AgentConfig,
    ),
    With<Agent>,
>;

type PlayerTargets<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut VitalStats,
        &'static mut PlayerStateMachine,
        &'static mut PlayerMotion,
        &'static mut AnimationSignals,
        &'static mut PlayerTimers,
    ),
    (With<Player>, Without<Agent>),
>;

type SpawnPointTargets<'w, 's> =
    Query<'w, 's, &'static mut VitalStats, (With<SpawnPoint>, Without<Agent>, Without<Player>)>;

/// Система: WeaponOverlap → урон
///
/// 1. Фильтр: окно открыто, не сам себя, слой цели в targets, цель ещё не бита в этом окне
/// 2. Урон в VitalStats + HealthChanged (только если health реально поменялся)
/// 3. Агент: Death если убит, иначе Damage (если уже не там)
/// 4. Игрок: Death если убит
/// 5. Spawn point: despawn при нуле
pub fn resolve_weapon_hits(
    mut commands: Commands,
    mut overlap_events: EventReader<WeaponOverlap>,
    mut weapons: Query<&mut Weapon>,
    volumes: Query<&HitVolume>,
    mut agents: AgentTargets,
    mut players: PlayerTargets,
    mut spawn_points: SpawnPointTargets,
    mut health_events: EventWriter<HealthChanged>,
    mut damage_events: EventWriter<DamageDealt>,
) {
    for overlap in overlap_events.read() {
        let Ok(volume) = volumes.get(overlap.target) else {
            continue;
        };
        let Ok(mut weapon) = weapons.get_mut(overlap.weapon_owner) else {
            crate::log_warning(&format!(
                "WeaponOverlap: owner {:?} has no Weapon",
                overlap.weapon_owner
            ));
            continue;
        };

        if !weapon.register_hit(overlap.weapon_owner, overlap.target, volume.layer) {
            continue;
        }
        let damage = weapon.damage;

        let change = if let Ok((mut vitals, mut machine, mut nav, mut anim, route, config)) =
            agents.get_mut(overlap.target)
        {
            let change = vitals.deplete_health(damage);
            if change != VitalChange::Unchanged {
                health_events.write(HealthChanged::of(overlap.target, &vitals));
            }

            let mut ctx = AgentContext {
                nav: &mut nav,
                anim: &mut anim,
                route,
                config,
            };
            if vitals.is_dead() {
                if machine.state() != AgentState::Death {
                    machine.force(AgentState::Death, &mut ctx);
                }
            } else if machine.state() != AgentState::Damage {
                machine.force(AgentState::Damage, &mut ctx);
            }
            change
        } else if let Ok((mut vitals, mut machine, mut motion, mut anim, mut timers)) =
            players.get_mut(overlap.target)
        {
            let change = vitals.deplete_health(damage);
            if change != VitalChange::Unchanged {
                health_events.write(HealthChanged::of(overlap.target, &vitals));
            }

            if vitals.is_dead() && machine.state() != PlayerState::Death {
                machine.force(
                    PlayerState::Death,
                    &mut PlayerRig {
                        motion: &mut motion,
                        anim: &mut anim,
                        timers: &mut timers,
                    },
                );
            }
            change
        } else if let Ok(mut vitals) = spawn_points.get_mut(overlap.target) {
            let change = vitals.deplete_health(damage);
            if change != VitalChange::Unchanged {
                health_events.write(HealthChanged::of(overlap.target, &vitals));
            }

            if change == VitalChange::Killed {
                crate::log_info(&format!("🔥 Spawn point {:?} destroyed", overlap.target));
                commands.entity(overlap.target).despawn();
            }
            change
        } else {
            continue;
        };

        if change == VitalChange::Unchanged {
            continue;
        }

        crate::log(&format!(
            "⚔️ Hit: {:?} → {:?} ({:.0} damage, killed = {})",
            overlap.weapon_owner,
            overlap.target,
            damage,
            change == VitalChange::Killed
        ));
        damage_events.write(DamageDealt {
            attacker: overlap.weapon_owner,
            target: overlap.target,
            damage,
            target_died: change == VitalChange::Killed,
        });
    }
}
