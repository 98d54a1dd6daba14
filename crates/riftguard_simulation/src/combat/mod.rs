//! Combat resolution module
//!
//! ECS ответственность:
//! - Правила: кто кого может ударить, урон, смерть
//! - Принудительные переходы FSM (Damage / Death)
//!
//! Хост ответственность:
//! - Аниматор: окна урона оружия (`WeaponWindow`)
//! - Физика: overlap weapon volume с hurtbox (`WeaponOverlap`)

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod systems_tests;

pub use components::{HitVolume, Weapon};
pub use events::{DamageDealt, WeaponOverlap, WeaponWindow};
pub use systems::{apply_weapon_windows, resolve_weapon_hits};

use crate::SimulationSet;

/// Combat Plugin
///
/// Порядок выполнения (Update, SimulationSet::Combat):
/// 1. apply_weapon_windows — открыть / закрыть окна урона
/// 2. resolve_weapon_hits — overlap → урон → Damage / Death
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<WeaponWindow>()
            .add_event::<WeaponOverlap>()
            .add_event::<DamageDealt>();

        app.add_systems(
            Update,
            (apply_weapon_windows, resolve_weapon_hits)
                .chain()
                .in_set(SimulationSet::Combat),
        );
    }
}
