//! Player FSM: Move / Fall / Land / Attack + терминальные Death и Victory.
//!
//! Logic tick (Update) смотрит на прогресс анимаций и ввод атаки,
//! fixed tick (FixedUpdate) делает ground probe, поворот и скорость.

use bevy::prelude::*;

use super::components::{PlayerConfig, PlayerIntent, PlayerMotion, StaminaConfig};
use super::timers::{PlayerTimerAction, PlayerTimers};
use crate::agent::yaw_toward;
use crate::bridge::{
    AnimTrigger, AnimationSignals, CameraBasis, LineOfSight, RayQuery, MASK_GROUND,
};
use crate::vitals::Stamina;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum PlayerState {
    Move,
    Fall,
    Land,
    Attack,
    Death,
    Victory,
}

impl PlayerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PlayerState::Death | PlayerState::Victory)
    }
}

/// Мост хоста, нужный enter/exit
pub struct PlayerRig<'a> {
    pub motion: &'a mut PlayerMotion,
    pub anim: &'a mut AnimationSignals,
    pub timers: &'a mut PlayerTimers,
}

/// Всё остальное для physics шага
pub struct PlayerFrame<'a> {
    pub transform: &'a mut Transform,
    pub camera: &'a CameraBasis,
    pub config: &'a PlayerConfig,
    pub stamina: &'a StaminaConfig,
    pub geometry: &'a dyn LineOfSight,
    pub delta: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerTick {
    Continue,
    /// Death / Victory анимация доиграна (ровно один раз)
    ShowEndOfRunUi,
}

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerStateMachine {
    state: PlayerState,
    combo_armed: bool,
    end_ui_shown: bool,
}

impl PlayerStateMachine {
    /// FSM в Move, enter уже выполнен
    pub fn start(rig: &mut PlayerRig) -> Self {
        let mut machine = Self {
            state: PlayerState::Move,
            combo_armed: false,
            end_ui_shown: false,
        };
        machine.enter(rig);
        machine
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_combo_armed(&self) -> bool {
        self.combo_armed
    }

    /// `None` или выход из терминального состояния = нет перехода
    pub fn transition(&mut self, next: Option<PlayerState>, rig: &mut PlayerRig) -> bool {
        let Some(next) = next else {
            return false;
        };
        if self.state.is_terminal() {
            return false;
        }

        let previous = self.state;
        self.exit(rig);
        self.state = next;
        self.enter(rig);

        crate::log(&format!("PlayerFsm: {:?} → {:?}", previous, next));
        true
    }

    pub fn force(&mut self, next: PlayerState, rig: &mut PlayerRig) -> bool {
        self.transition(Some(next), rig)
    }

    fn enter(&mut self, rig: &mut PlayerRig) {
        match self.state {
            PlayerState::Move => rig.anim.set_trigger(AnimTrigger::Move),
            PlayerState::Fall => rig.anim.set_trigger(AnimTrigger::Fall),
            PlayerState::Land => rig.anim.set_trigger(AnimTrigger::Land),
            PlayerState::Attack => {
                self.combo_armed = false;
                rig.anim.root_motion = true;
                rig.motion.velocity = Vec3::ZERO;
                rig.anim.set_trigger(AnimTrigger::Attack);
            }
            PlayerState::Death | PlayerState::Victory => {
                rig.motion.velocity = Vec3::ZERO;
                rig.motion.force = Vec3::ZERO;
                rig.timers.cancel_drain();
                rig.timers.cancel_attack_latch();
                let trigger = if self.state == PlayerState::Death {
                    AnimTrigger::Death
                } else {
                    AnimTrigger::Victory
                };
                rig.anim.set_trigger(trigger);
            }
        }
    }

    fn exit(&mut self, rig: &mut PlayerRig) {
        match self.state {
            PlayerState::Move => {
                rig.timers.cancel_drain();
                rig.anim.reset_trigger(AnimTrigger::Move);
            }
            PlayerState::Fall => rig.anim.reset_trigger(AnimTrigger::Fall),
            PlayerState::Land => rig.anim.reset_trigger(AnimTrigger::Land),
            PlayerState::Attack => {
                rig.anim.root_motion = false;
                rig.anim.reset_trigger(AnimTrigger::Attack);
            }
            PlayerState::Death | PlayerState::Victory => {}
        }
        rig.anim.rewind();
    }

    /// Logic tick (каждый кадр)
    pub fn tick(&mut self, intent: &PlayerIntent, config: &PlayerConfig, rig: &mut PlayerRig) -> PlayerTick {
        match self.state {
            PlayerState::Move => {
                if intent.attack_input {
                    self.transition(Some(PlayerState::Attack), rig);
                }
            }

            PlayerState::Fall => {}

            PlayerState::Land => {
                let progress = rig.anim.normalized_time();
                if !rig.anim.is_transitioning && progress > config.land_exit_time {
                    self.transition(Some(PlayerState::Move), rig);
                }
            }

            PlayerState::Attack => {
                if rig.anim.is_transitioning {
                    return PlayerTick::Continue;
                }

                let progress = rig.anim.normalized_time();
                if progress > config.combo_arm_time && intent.attack_input {
                    self.combo_armed = true;
                }

                if progress >= config.combo_chain_time && self.combo_armed {
                    // Chain: полный exit → enter той же атаки
                    self.transition(Some(PlayerState::Attack), rig);
                } else if progress >= 1.0 && !self.combo_armed {
                    self.transition(Some(PlayerState::Move), rig);
                }
            }

            PlayerState::Death | PlayerState::Victory => {
                if !self.end_ui_shown && rig.anim.is_settled_at(1.0) {
                    self.end_ui_shown = true;
                    return PlayerTick::ShowEndOfRunUi;
                }
            }
        }

        PlayerTick::Continue
    }

    /// Physics tick
    pub fn fixed_tick(&mut self, intent: &PlayerIntent, rig: &mut PlayerRig, frame: &mut PlayerFrame) {
        match self.state {
            PlayerState::Move => {
                let grounded = probe_ground(frame, rig.motion);
                steer(intent, rig.motion, frame);
                rig.timers
                    .update_sprint_drain(intent.sprinting, frame.stamina.sprint_drain_interval_secs);

                if !grounded {
                    self.transition(Some(PlayerState::Fall), rig);
                }
            }

            PlayerState::Fall => {
                let grounded = probe_ground(frame, rig.motion);
                steer(intent, rig.motion, frame);

                if grounded {
                    self.transition(Some(PlayerState::Land), rig);
                } else {
                    rig.motion.force = Vec3::NEG_Y * frame.config.fall_speed * rig.motion.air_time;
                    rig.motion.air_time += frame.delta * 2.0;
                }
            }

            PlayerState::Land | PlayerState::Attack | PlayerState::Death | PlayerState::Victory => {
                probe_ground(frame, rig.motion);
            }
        }
    }
}

/// Ground probe: луч вниз от (позиция − offset), при попадании snap на землю.
pub fn probe_ground(frame: &mut PlayerFrame, motion: &mut PlayerMotion) -> bool {
    let origin = frame.transform.translation - Vec3::Y * frame.config.grounded_offset;

    let hit = RayQuery::new(origin, Vec3::NEG_Y, frame.config.ground_probe_length, MASK_GROUND)
        .and_then(|query| frame.geometry.cast_ray(&query));

    match hit {
        Some(hit) => {
            frame.transform.translation.y = hit.point.y + frame.config.ground_snap_height;
            motion.air_time = 0.0;
            motion.grounded = true;
            true
        }
        None => {
            motion.grounded = false;
            false
        }
    }
}

/// Camera-relative горизонтальная скорость + поворот по направлению ввода
fn steer(intent: &PlayerIntent, motion: &mut PlayerMotion, frame: &mut PlayerFrame) {
    let direction = frame.camera.planar_direction(intent.movement);
    let speed = if intent.sprinting {
        frame.config.sprint_speed
    } else {
        frame.config.walk_speed
    };

    motion.velocity.x = direction.x * speed;
    motion.velocity.z = direction.z * speed;

    if direction != Vec3::ZERO {
        let factor = (frame.config.turn_rate * frame.delta).clamp(0.0, 1.0);
        frame.transform.rotation = frame.transform.rotation.slerp(yaw_toward(direction), factor);
    }
}

/// Один physics шаг игрока: таймеры → FSM fixed tick → replenish.
///
/// Возвращает `true` если stamina изменилась (для UI события).
pub fn physics_step(
    machine: &mut PlayerStateMachine,
    intent: &mut PlayerIntent,
    stamina: &mut Stamina,
    rig: &mut PlayerRig,
    frame: &mut PlayerFrame,
) -> bool {
    let mut stamina_changed = false;

    for action in rig.timers.advance(frame.delta) {
        match action {
            PlayerTimerAction::SprintDrain => {
                if intent.sprinting && machine.state() == PlayerState::Move {
                    stamina_changed |= stamina.deplete(frame.stamina.sprint_drain_amount);
                }
            }
            PlayerTimerAction::Replenish => {
                stamina_changed |= stamina.increase(frame.stamina.regen_amount);
                crate::log(&format!(
                    "Stamina replenished → {:.0}/{:.0}",
                    stamina.current(),
                    stamina.max()
                ));
            }
            PlayerTimerAction::ReleaseAttackInput => intent.attack_input = false,
        }
    }

    if !stamina.has_stamina() {
        intent.sprinting = false;
    }

    machine.fixed_tick(intent, rig, frame);

    // Replenish только вне sprint drain
    rig.timers.update_replenish(
        !stamina.is_full() && !rig.timers.is_draining(),
        frame.stamina.regen_delay_secs,
    );

    stamina_changed
}
