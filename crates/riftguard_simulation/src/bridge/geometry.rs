//! Запросы геометрии: raycast для perception и ground probe.
//!
//! ## Collision layers (битовые маски)
//! - Layer 1 (0b1): Player
//! - Layer 2 (0b10): Agents
//! - Layer 3 (0b100): Environment (стены, пол)
//! - Layer 4 (0b1000): Spawn points
//!
//! Core интерпретирует только слой первого попадания. Кто считает пересечения
//! (физика хоста или `headless::SphereWorld`) решает `LineOfSight` реализация.

use bevy::prelude::*;

use crate::headless::SphereWorld;

/// Layer 1: игрок
pub const LAYER_PLAYER: u32 = 0b1;

/// Layer 2: агенты
pub const LAYER_AGENT: u32 = 0b10;

/// Layer 3: статическое окружение
pub const LAYER_ENVIRONMENT: u32 = 0b100;

/// Layer 4: spawn points (разрушаемые)
pub const LAYER_SPAWN_POINT: u32 = 0b1000;

pub const MASK_ALL: u32 = u32::MAX;

/// Mask: взгляд агента (всё кроме других агентов)
pub const MASK_AGENT_SIGHT: u32 = MASK_ALL & !LAYER_AGENT;

/// Mask: ground probe игрока
pub const MASK_GROUND: u32 = LAYER_ENVIRONMENT;

/// Название слоя для debug логов
pub fn layer_name(layer_bits: u32) -> &'static str {
    match layer_bits {
        LAYER_PLAYER => "Player",
        LAYER_AGENT => "Agent",
        LAYER_ENVIRONMENT => "Environment",
        LAYER_SPAWN_POINT => "SpawnPoint",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayQuery {
    pub origin: Vec3,
    /// Нормализованное направление
    pub direction: Vec3,
    pub max_distance: f32,
    /// Какие слои луч видит
    pub mask: u32,
}

impl RayQuery {
    /// `None` если направление вырожденное
    pub fn new(origin: Vec3, direction: Vec3, max_distance: f32, mask: u32) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self {
            origin,
            direction,
            max_distance,
            mask,
        })
    }

    /// Луч из `from` в сторону `to`
    pub fn toward(from: Vec3, to: Vec3, max_distance: f32, mask: u32) -> Option<Self> {
        Self::new(from, to - from, max_distance, mask)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// ECS entity коллайдера (статика может быть без entity)
    pub entity: Option<Entity>,
    /// Ровно один `LAYER_*` бит
    pub layer: u32,
    pub point: Vec3,
    pub distance: f32,
}

/// Сферический proxy тела для headless геометрии
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProxySphere {
    pub entity: Option<Entity>,
    pub center: Vec3,
    pub radius: f32,
    pub layer: u32,
}

pub trait LineOfSight: Send + Sync {
    /// Первое попадание вдоль луча в пределах `max_distance`
    fn cast_ray(&self, query: &RayQuery) -> Option<RayHit>;

    /// Обновление динамических тел. Физика хоста знает их сама и игнорирует вызов.
    fn sync_bodies(&mut self, _bodies: &[ProxySphere]) {}
}

/// Resource: активный провайдер геометрии
#[derive(Resource)]
pub struct Geometry {
    provider: Box<dyn LineOfSight>,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(SphereWorld::with_ground(0.0))
    }
}

impl Geometry {
    pub fn new(provider: impl LineOfSight + 'static) -> Self {
        Self {
            provider: Box::new(provider),
        }
    }

    pub fn cast_ray(&self, query: &RayQuery) -> Option<RayHit> {
        self.provider.cast_ray(query)
    }

    pub fn provider(&self) -> &dyn LineOfSight {
        self.provider.as_ref()
    }

    pub fn sync_bodies(&mut self, bodies: &[ProxySphere]) {
        self.provider.sync_bodies(bodies);
    }
}
