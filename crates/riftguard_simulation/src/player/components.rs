//! Player components: marker, tuning, motion state, gated input.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::timers::PlayerTimers;
use crate::config::{ensure_non_negative, ensure_positive, ConfigError};

/// Marker component для player-controlled entity
///
/// AI и wave системы используют `Without<Player>` / `With<Player>` фильтры.
/// В сессии ровно один такой entity, создаётся хостом один раз.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
#[require(PlayerIntent, PlayerMotion, PlayerTimers)]
pub struct Player {
    /// Выставляется при достижении kill threshold, блокирует ввод
    pub is_victorious: bool,
}

/// Движение игрока (rigidbody хоста)
///
/// Core пишет горизонтальную velocity и force; хост (или
/// `headless::integrate_player_motion`) интегрирует и сбрасывает force.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerMotion {
    pub velocity: Vec3,
    /// Сила на текущий physics шаг (масса = 1)
    pub force: Vec3,
    /// Время в воздухе, растёт ×2 к реальному
    pub air_time: f32,
    pub grounded: bool,
}

/// Ввод после gating'а (мёртв / победил / нет stamina)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerIntent {
    pub movement: Vec2,
    /// Latch: true на короткое окно после нажатия атаки
    pub attack_input: bool,
    /// Sprint зажат и stamina > 0
    pub sprinting: bool,
}

/// Тюнинг игрока
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    /// Множитель нарастающей силы падения
    pub fall_speed: f32,
    pub turn_rate: f32,
    /// Смещение начала ground probe (отрицательное = выше ступней)
    pub grounded_offset: f32,
    pub ground_probe_length: f32,
    /// Высота над точкой попадания при snap'е на землю
    pub ground_snap_height: f32,
    /// Land → Move после этого прогресса анимации
    pub land_exit_time: f32,
    /// Attack: после этого прогресса повторное нажатие взводит combo
    pub combo_arm_time: f32,
    /// Attack: с этого прогресса взведённое combo перезапускает атаку
    pub combo_chain_time: f32,
    pub attack_input_window_secs: f32,
    pub eye_height: f32,
    pub max_health: f32,
    pub weapon_damage: f32,
    pub weapon_reach: f32,
    pub weapon_radius: f32,
    pub hit_radius: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 2.5,
            sprint_speed: 6.5,
            fall_speed: 30.0,
            turn_rate: 15.0,
            grounded_offset: -0.3,
            ground_probe_length: 1.0,
            ground_snap_height: 0.035,
            land_exit_time: 0.5,
            combo_arm_time: 0.15,
            combo_chain_time: 0.8,
            attack_input_window_secs: 0.03,
            eye_height: 1.5,
            max_health: 100.0,
            weapon_damage: 10.0,
            weapon_reach: 1.0,
            weapon_radius: 0.6,
            hit_radius: 0.7,
        }
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("player.walk_speed", self.walk_speed)?;
        ensure_non_negative("player.sprint_speed", self.sprint_speed)?;
        ensure_non_negative("player.fall_speed", self.fall_speed)?;
        ensure_non_negative("player.turn_rate", self.turn_rate)?;
        ensure_positive("player.ground_probe_length", self.ground_probe_length)?;
        ensure_non_negative("player.attack_input_window_secs", self.attack_input_window_secs)?;
        ensure_positive("player.max_health", self.max_health)?;
        ensure_non_negative("player.weapon_damage", self.weapon_damage)?;

        for (field, value) in [
            ("player.land_exit_time", self.land_exit_time),
            ("player.combo_arm_time", self.combo_arm_time),
            ("player.combo_chain_time", self.combo_chain_time),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(
                    field,
                    format!("expected normalized time in [0, 1], got {value}"),
                ));
            }
        }
        Ok(())
    }
}

/// Тюнинг stamina (sprint drain + отложенный replenish)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaminaConfig {
    pub max_stamina: f32,
    /// Сколько снимает один drain тик
    pub sprint_drain_amount: f32,
    pub sprint_drain_interval_secs: f32,
    pub regen_amount: f32,
    pub regen_delay_secs: f32,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            max_stamina: 100.0,
            sprint_drain_amount: 1.0,
            sprint_drain_interval_secs: 0.1,
            regen_amount: 25.0,
            regen_delay_secs: 10.0,
        }
    }
}

impl StaminaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("stamina.max_stamina", self.max_stamina)?;
        ensure_non_negative("stamina.sprint_drain_amount", self.sprint_drain_amount)?;
        ensure_positive("stamina.sprint_drain_interval_secs", self.sprint_drain_interval_secs)?;
        ensure_non_negative("stamina.regen_amount", self.regen_amount)?;
        ensure_non_negative("stamina.regen_delay_secs", self.regen_delay_secs)?;
        Ok(())
    }
}
