//! Spawn point, agent blueprint, общий пул patrol точек.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::agent::AgentConfig;
use crate::config::{ensure_non_negative, ensure_positive, ConfigError, GameConfig};

/// Tuning spawn points и агентов, которых они создают
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Смещение точки появления агента от spawn point
    pub offset: [f32; 3],
    pub spawn_point_max_health: f32,
    pub spawn_point_hit_radius: f32,
    pub agent_max_health: f32,
    pub agent_weapon_damage: f32,
    pub agent_weapon_reach: f32,
    pub agent_weapon_radius: f32,
    pub agent_hit_radius: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            offset: [0.0, 0.0, -1.5],
            spawn_point_max_health: 100.0,
            spawn_point_hit_radius: 1.0,
            agent_max_health: 100.0,
            agent_weapon_damage: 25.0,
            agent_weapon_reach: 1.0,
            agent_weapon_radius: 0.6,
            agent_hit_radius: 0.7,
        }
    }
}

impl SpawnConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("spawn.spawn_point_max_health", self.spawn_point_max_health)?;
        ensure_positive("spawn.spawn_point_hit_radius", self.spawn_point_hit_radius)?;
        ensure_positive("spawn.agent_max_health", self.agent_max_health)?;
        ensure_non_negative("spawn.agent_weapon_damage", self.agent_weapon_damage)?;
        ensure_non_negative("spawn.agent_weapon_reach", self.agent_weapon_reach)?;
        ensure_positive("spawn.agent_weapon_radius", self.agent_weapon_radius)?;
        ensure_positive("spawn.agent_hit_radius", self.agent_hit_radius)?;
        Ok(())
    }

    pub fn offset(&self) -> Vec3 {
        Vec3::from_array(self.offset)
    }
}

/// Параметры фабрики агентов (что именно spawn point создаёт)
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct AgentBlueprint {
    pub config: AgentConfig,
    pub max_health: f32,
    pub weapon_damage: f32,
    pub weapon_reach: f32,
    pub weapon_radius: f32,
    pub hit_radius: f32,
}

impl Default for AgentBlueprint {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl AgentBlueprint {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            config: config.agent.clone(),
            max_health: config.spawn.agent_max_health,
            weapon_damage: config.spawn.agent_weapon_damage,
            weapon_reach: config.spawn.agent_weapon_reach,
            weapon_radius: config.spawn.agent_weapon_radius,
            hit_radius: config.spawn.agent_hit_radius,
        }
    }
}

/// Разрушаемый объект, создающий агентов
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SpawnPoint {
    pub offset: Vec3,
    pub blueprint: AgentBlueprint,
}

impl SpawnPoint {
    pub fn new(offset: Vec3, blueprint: AgentBlueprint) -> Self {
        Self { offset, blueprint }
    }

    /// Позиция + offset, ориентация spawn point
    pub fn spawn_transform(&self, transform: &Transform) -> Transform {
        Transform {
            translation: transform.translation + self.offset,
            rotation: transform.rotation,
            scale: Vec3::ONE,
        }
    }
}

/// Resource: общий пул patrol точек уровня
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PatrolPool {
    waypoints: Vec<Vec3>,
}

impl PatrolPool {
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self { waypoints }
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    /// Маршрут из трёх точек: пул режется на три непрерывных непересекающихся
    /// диапазона индексов, из каждого берётся одна случайная точка.
    ///
    /// Пул меньше трёх точек возвращается как есть.
    pub fn assemble_route<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Vec3> {
        let len = self.waypoints.len();
        if len < 3 {
            return self.waypoints.clone();
        }

        let third = len / 3;
        let ranges = [(0, third), (third, 2 * third), (2 * third, len)];

        ranges
            .iter()
            .map(|&(start, end)| self.waypoints[rng.gen_range(start..end)])
            .collect()
    }
}
