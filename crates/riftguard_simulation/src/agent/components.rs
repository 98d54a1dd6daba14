//! Agent components (marker, tuning, patrol route).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{ensure_non_negative, ensure_positive, ConfigError};

/// Маркер: враг под управлением `AgentStateMachine`
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Agent;

/// Параметры AI агента
///
/// Глобальный шаблон лежит в `GameConfig.agent`, у каждого агента своя копия
/// (spawn point может переопределить через `AgentBlueprint`).
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AgentConfig {
    /// Половина угла обзора (градусы)
    pub fov_half_angle_deg: f32,
    /// Дальность луча обнаружения (метры)
    pub detection_distance: f32,
    /// Дистанция атаки, она же stopping distance навигации
    pub attack_distance: f32,
    /// Сколько стоим в Idle перед следующей patrol точкой
    pub idle_dwell_secs: f32,
    /// Как часто Chase переотправляет destination к игроку
    pub destination_repoll_secs: f32,
    pub attack_cooldown_secs: f32,
    pub walk_speed: f32,
    /// Скорость в Chase
    pub sprint_speed: f32,
    /// Множитель slerp поворота (× dt)
    pub turn_rate: f32,
    pub eye_height: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            fov_half_angle_deg: 55.0,
            detection_distance: 7.5,
            attack_distance: 1.5,
            idle_dwell_secs: 5.0,
            destination_repoll_secs: 0.1,
            attack_cooldown_secs: 3.0,
            walk_speed: 2.5,
            sprint_speed: 6.5,
            turn_rate: 10.0,
            eye_height: 1.5,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_half_angle_deg > 0.0 && self.fov_half_angle_deg <= 180.0) {
            return Err(ConfigError::invalid(
                "agent.fov_half_angle_deg",
                format!("expected (0, 180], got {}", self.fov_half_angle_deg),
            ));
        }
        ensure_positive("agent.detection_distance", self.detection_distance)?;
        ensure_non_negative("agent.attack_distance", self.attack_distance)?;
        ensure_non_negative("agent.idle_dwell_secs", self.idle_dwell_secs)?;
        ensure_non_negative("agent.destination_repoll_secs", self.destination_repoll_secs)?;
        ensure_non_negative("agent.attack_cooldown_secs", self.attack_cooldown_secs)?;
        ensure_non_negative("agent.walk_speed", self.walk_speed)?;
        ensure_non_negative("agent.sprint_speed", self.sprint_speed)?;
        ensure_non_negative("agent.turn_rate", self.turn_rate)?;
        Ok(())
    }
}

/// Маршрут патруля (фиксируется при спавне, не меняется)
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PatrolRoute {
    waypoints: Vec<Vec3>,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self { waypoints }
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.waypoints.get(index).copied()
    }
}
