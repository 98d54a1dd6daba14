//! Снимки ввода и базис камеры (пишет хост каждый кадр).

use bevy::prelude::*;

/// Ввод игрока за текущий кадр
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// x = strafe (вправо +), y = вперёд (+)
    pub move_vector: Vec2,
    /// Нажатие атаки в этом кадре (edge, не hold)
    pub attack_pressed: bool,
    pub sprint_held: bool,
}

/// Базис камеры для camera-relative движения
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self {
            forward: Vec3::NEG_Z,
            right: Vec3::X,
        }
    }
}

impl CameraBasis {
    /// Горизонтальное направление для вектора ввода (нормализованное или ноль)
    pub fn planar_direction(&self, move_vector: Vec2) -> Vec3 {
        let forward = Vec3::new(self.forward.x, 0.0, self.forward.z).normalize_or_zero();
        let right = Vec3::new(self.right.x, 0.0, self.right.z).normalize_or_zero();

        (forward * move_vector.y + right * move_vector.x).normalize_or_zero()
    }
}
