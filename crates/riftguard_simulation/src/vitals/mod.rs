//! Vital stats: здоровье (игрок, агенты, spawn points) и stamina игрока.
//!
//! Поля закрыты: мутация только через `deplete_health` / `die` / `revive`,
//! чтобы инвариант 0 ≤ current ≤ max и "смерть один раз" держался всегда.

use bevy::prelude::*;

/// Результат `deplete_health`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VitalChange {
    /// Уже мёртв (или amount = 0), ничего не поменялось
    Unchanged,
    Damaged,
    /// Этот вызов перевёл в dead
    Killed,
}

/// Здоровье комбатанта
///
/// Инвариант: 0 ≤ current ≤ max, alive ⇔ current > 0.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct VitalStats {
    current: f32,
    max: f32,
    alive: bool,
}

impl Default for VitalStats {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl VitalStats {
    pub fn new(max: f32) -> Self {
        let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
        Self {
            current: max,
            max,
            alive: max > 0.0,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_dead(&self) -> bool {
        !self.alive
    }

    pub fn deplete_health(&mut self, amount: f32) -> VitalChange {
        if !self.alive || !(amount > 0.0) {
            return VitalChange::Unchanged;
        }

        self.current = (self.current - amount).clamp(0.0, self.max);

        if self.current <= 0.0 {
            self.die();
            VitalChange::Killed
        } else {
            VitalChange::Damaged
        }
    }

    /// Одноразовый переход в dead. `false` если уже мёртв.
    pub fn die(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.current = 0.0;
        self.alive = false;
        true
    }

    /// Полное восстановление. `false` если уже жив.
    pub fn revive(&mut self) -> bool {
        if self.alive || self.max <= 0.0 {
            return false;
        }
        self.current = self.max;
        self.alive = true;
        true
    }
}

/// Stamina игрока (sprint drain / delayed replenish)
///
/// Инвариант: 0.0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Stamina {
    current: f32,
    max: f32,
}

impl Default for Stamina {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Stamina {
    pub fn new(max: f32) -> Self {
        let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn has_stamina(&self) -> bool {
        self.current > 0.0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// `true` если значение изменилось
    pub fn deplete(&mut self, amount: f32) -> bool {
        let before = self.current;
        self.current = (self.current - amount.max(0.0)).clamp(0.0, self.max);
        self.current != before
    }

    pub fn increase(&mut self, amount: f32) -> bool {
        let before = self.current;
        self.current = (self.current + amount.max(0.0)).clamp(0.0, self.max);
        self.current != before
    }
}

/// UI: health bar (смузинг на стороне хоста)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub current: f32,
    pub max: f32,
}

impl HealthChanged {
    pub fn of(entity: Entity, vitals: &VitalStats) -> Self {
        Self {
            entity,
            current: vitals.current(),
            max: vitals.max(),
        }
    }
}

/// UI: stamina bar
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct StaminaChanged {
    pub entity: Entity,
    pub current: f32,
    pub max: f32,
}

impl StaminaChanged {
    pub fn of(entity: Entity, stamina: &Stamina) -> Self {
        Self {
            entity,
            current: stamina.current(),
            max: stamina.max(),
        }
    }
}

pub struct VitalsPlugin;

impl Plugin for VitalsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HealthChanged>()
            .add_event::<StaminaChanged>();
    }
}
