//! Combat components: weapon damage volume и hurtbox.

use bevy::prelude::*;

/// Оружие (damage volume перед владельцем)
///
/// Включается окном анимации (`WeaponWindow`), за одно окно бьёт каждую
/// цель не больше одного раза (`hit_entities`).
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Weapon {
    pub damage: f32,
    /// Смещение центра volume вперёд от владельца (метры)
    pub reach: f32,
    /// Радиус сферы volume
    pub radius: f32,
    /// Высота центра volume над Transform
    pub height: f32,
    /// По каким collision layers оружие наносит урон
    pub targets: u32,
    pub enabled: bool,
    /// Кого уже ударили в текущем окне
    pub hit_entities: Vec<Entity>,
}

impl Weapon {
    pub fn new(damage: f32, targets: u32) -> Self {
        Self {
            damage,
            reach: 1.0,
            radius: 0.6,
            height: 1.0,
            targets,
            enabled: false,
            hit_entities: Vec::new(),
        }
    }

    pub fn with_reach(mut self, reach: f32, radius: f32) -> Self {
        self.reach = reach;
        self.radius = radius;
        self
    }

    pub fn volume_center(&self, transform: &Transform) -> Vec3 {
        transform.translation + transform.rotation * Vec3::new(0.0, self.height, -self.reach)
    }

    /// Открыть окно урона (новый swing)
    pub fn open_window(&mut self) {
        self.enabled = true;
        self.hit_entities.clear();
    }

    pub fn close_window(&mut self) {
        self.enabled = false;
    }

    /// Пропускает ли оружие удар по цели на этом слое.
    /// Отмечает цель как ударенную в текущем окне.
    pub fn register_hit(&mut self, owner: Entity, target: Entity, target_layer: u32) -> bool {
        if !self.enabled || owner == target || self.targets & target_layer == 0 {
            return false;
        }
        if self.hit_entities.contains(&target) {
            return false;
        }
        self.hit_entities.push(target);
        true
    }
}

/// Hurtbox: сфера на collision layer владельца
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HitVolume {
    /// Ровно один `LAYER_*` бит
    pub layer: u32,
    pub radius: f32,
    pub center_offset: Vec3,
}

impl HitVolume {
    pub fn new(layer: u32, radius: f32) -> Self {
        Self {
            layer,
            radius,
            center_offset: Vec3::Y * 1.0,
        }
    }

    pub fn center(&self, transform: &Transform) -> Vec3 {
        transform.translation + self.center_offset
    }
}
