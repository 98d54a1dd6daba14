//! Player ECS systems: input gating, logic tick, physics step.

use bevy::prelude::*;

use super::components::{Player, PlayerIntent, PlayerMotion};
use super::state_machine::{
    physics_step, PlayerFrame, PlayerRig, PlayerState, PlayerStateMachine, PlayerTick,
};
use super::timers::PlayerTimers;
use crate::bridge::{AnimationSignals, CameraBasis, Geometry, PlayerInput};
use crate::config::GameConfig;
use crate::session::VictoryReached;
use crate::vitals::{Stamina, StaminaChanged, VitalStats};

/// UI: показать экран конца забега (death или victory анимация доиграна)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowEndOfRunUi {
    pub player: Entity,
    pub victorious: bool,
}

/// Система: снимок ввода → PlayerIntent
///
/// Мёртвый или победивший игрок не двигается и не атакует,
/// sprint требует stamina > 0. Нажатие атаки держится `attack_input_window_secs`.
pub fn latch_player_input(
    input: Res<PlayerInput>,
    config: Res<GameConfig>,
    mut players: Query<(&Player, &VitalStats, &Stamina, &mut PlayerIntent, &mut PlayerTimers)>,
) {
    for (player, vitals, stamina, mut intent, mut timers) in players.iter_mut() {
        let can_act = vitals.is_alive() && !player.is_victorious;

        if !can_act {
            intent.movement = Vec2::ZERO;
            intent.sprinting = false;
            intent.attack_input = false;
            timers.cancel_attack_latch();
            continue;
        }

        intent.movement = input.move_vector;
        intent.sprinting = input.sprint_held && stamina.has_stamina();

        if input.attack_pressed {
            intent.attack_input = true;
            timers.latch_attack(config.player.attack_input_window_secs);
        }
    }
}

/// Система: logic tick FSM игрока (+ victory от kill tally)
pub fn player_logic_tick(
    mut players: Query<(
        Entity,
        &mut Player,
        &mut PlayerStateMachine,
        &PlayerIntent,
        &mut PlayerMotion,
        &mut AnimationSignals,
        &mut PlayerTimers,
    )>,
    mut victory_events: EventReader<VictoryReached>,
    config: Res<GameConfig>,
    mut end_ui_events: EventWriter<ShowEndOfRunUi>,
) {
    let victory = victory_events.read().count() > 0;

    for (entity, mut player, mut machine, intent, mut motion, mut anim, mut timers) in players.iter_mut() {
        let mut rig = PlayerRig {
            motion: &mut motion,
            anim: &mut anim,
            timers: &mut timers,
        };

        if victory && !player.is_victorious {
            player.is_victorious = true;
            if machine.force(PlayerState::Victory, &mut rig) {
                crate::log_info(&format!("🏆 Player {:?} is victorious", entity));
            }
        }

        if machine.tick(intent, &config.player, &mut rig) == PlayerTick::ShowEndOfRunUi {
            let victorious = machine.state() == PlayerState::Victory;
            crate::log_info(&format!(
                "Player {:?}: end of run (victorious = {})",
                entity, victorious
            ));
            end_ui_events.write(ShowEndOfRunUi {
                player: entity,
                victorious,
            });
        }
    }
}

/// Система: physics шаг игрока (таймеры, ground probe, скорость)
pub fn player_fixed_tick(
    mut players: Query<
        (
            Entity,
            &mut Transform,
            &mut PlayerStateMachine,
            &mut PlayerIntent,
            &mut Stamina,
            &mut PlayerMotion,
            &mut AnimationSignals,
            &mut PlayerTimers,
        ),
        With<Player>,
    >,
    camera: Res<CameraBasis>,
    geometry: Res<Geometry>,
    config: Res<GameConfig>,
    time: Res<Time<Fixed>>,
    mut stamina_events: EventWriter<StaminaChanged>,
) {
    let delta = time.delta_secs();

    for (entity, mut transform, mut machine, mut intent, mut stamina, mut motion, mut anim, mut timers) in
        players.iter_mut()
    {
        let mut rig = PlayerRig {
            motion: &mut motion,
            anim: &mut anim,
            timers: &mut timers,
        };
        let mut frame = PlayerFrame {
            transform: &mut transform,
            camera: &camera,
            config: &config.player,
            stamina: &config.stamina,
            geometry: geometry.provider(),
            delta,
        };

        if physics_step(&mut machine, &mut intent, &mut stamina, &mut rig, &mut frame) {
            stamina_events.write(StaminaChanged::of(entity, &stamina));
        }
    }
}
