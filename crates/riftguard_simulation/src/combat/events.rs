//! Combat events (от аниматора / физики хоста и обратно в UI).

use bevy::prelude::*;

/// Окно урона оружия, шлёт аниматор (EnableDamage / DisableDamage)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponWindow {
    Open(Entity),
    Close(Entity),
}

/// Overlap weapon volume с hurtbox'ом (trigger enter физики хоста)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponOverlap {
    pub weapon_owner: Entity,
    pub target: Entity,
}

/// Событие: урон нанесен
///
/// Генерируется после применения урона к VitalStats.
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
    pub target_died: bool,
}
