//! Perception: FOV угол + line-of-sight raycast до глаз игрока.
//!
//! Чистые функции, без ECS: система собирает позиции и геометрию, здесь
//! только решение "вижу / не вижу".

use bevy::prelude::*;

use crate::bridge::{LineOfSight, RayQuery, LAYER_PLAYER, MASK_AGENT_SIGHT};

/// Что агент знает о глазах игрока в этот тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSighting {
    pub entity: Entity,
    pub look_point: Vec3,
    pub alive: bool,
}

/// Игрок внутри конуса обзора (угол между forward и вектором на цель)
pub fn within_field_of_view(eye: Vec3, forward: Vec3, target: Vec3, half_angle_deg: f32) -> bool {
    let to_target = target - eye;
    if to_target.length_squared() <= f32::EPSILON || forward.length_squared() <= f32::EPSILON {
        return false;
    }

    forward.angle_between(to_target).to_degrees() <= half_angle_deg
}

/// Полная проверка обнаружения.
///
/// 1. FOV угол
/// 2. Луч от глаз агента к глазам игрока (агентский слой исключён)
/// 3. Первое попадание должно быть игроком
///
/// Мёртвый игрок не обнаруживается никогда.
pub fn detects_player(
    eye: Vec3,
    forward: Vec3,
    player: &PlayerSighting,
    half_angle_deg: f32,
    detection_distance: f32,
    geometry: &dyn LineOfSight,
) -> bool {
    if !player.alive {
        return false;
    }

    if !within_field_of_view(eye, forward, player.look_point, half_angle_deg) {
        return false;
    }

    let Some(query) = RayQuery::toward(eye, player.look_point, detection_distance, MASK_AGENT_SIGHT)
    else {
        return false;
    };

    match geometry.cast_ray(&query) {
        Some(hit) => hit.layer == LAYER_PLAYER && hit.entity.map_or(true, |e| e == player.entity),
        None => false,
    }
}
