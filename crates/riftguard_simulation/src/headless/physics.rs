//! Headless заглушки физики и навигации хоста (FixedUpdate).

use bevy::prelude::*;

use crate::bridge::{AnimationSignals, NavAgent};
use crate::combat::{HitVolume, Weapon, WeaponOverlap};
use crate::player::{Player, PlayerMotion};

/// Прямолинейная "навигация": в плоскости xz к destination
pub fn step_navigation(transform: &mut Transform, nav: &mut NavAgent, delta: f32) {
    nav.path_pending = false;

    let Some(destination) = nav.destination() else {
        nav.velocity = Vec3::ZERO;
        nav.remaining_distance = 0.0;
        return;
    };

    let offset = Vec3::new(
        destination.x - transform.translation.x,
        0.0,
        destination.z - transform.translation.z,
    );
    let remaining = offset.length();

    if nav.is_stopped() || remaining < nav.stopping_distance || remaining <= f32::EPSILON {
        nav.velocity = Vec3::ZERO;
        nav.remaining_distance = remaining;
        return;
    }

    let direction = offset / remaining;
    let step = (nav.speed * delta).min(remaining);
    transform.translation += direction * step;

    nav.velocity = direction * nav.speed;
    nav.remaining_distance = remaining - step;
}

/// Интеграция скорости игрока (rigidbody хоста)
pub fn integrate_motion(transform: &mut Transform, motion: &mut PlayerMotion, root_motion: bool, delta: f32) {
    motion.velocity += motion.force * delta;
    motion.force = Vec3::ZERO;

    if root_motion {
        motion.velocity.x = 0.0;
        motion.velocity.z = 0.0;
    }
    if motion.grounded && motion.velocity.y < 0.0 {
        motion.velocity.y = 0.0;
    }

    transform.translation += motion.velocity * delta;
}

/// Система: навигация всех NavAgent
pub fn drive_navigation(mut agents: Query<(&mut Transform, &mut NavAgent)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();
    for (mut transform, mut nav) in agents.iter_mut() {
        step_navigation(&mut transform, &mut nav, delta);
    }
}

/// Система: интеграция движения игрока
pub fn integrate_player_motion(
    mut players: Query<(&mut Transform, &mut PlayerMotion, &AnimationSignals), With<Player>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    for (mut transform, mut motion, anim) in players.iter_mut() {
        integrate_motion(&mut transform, &mut motion, anim.root_motion, delta);
    }
}

/// Система: overlap сфер оружия с hurtbox'ами
///
/// Фильтр по слоям и "один удар за окно" делает combat.
pub fn detect_weapon_overlaps(
    weapons: Query<(Entity, &Transform, &Weapon)>,
    volumes: Query<(Entity, &Transform, &HitVolume)>,
    mut overlap_events: EventWriter<WeaponOverlap>,
) {
    for (owner, owner_transform, weapon) in weapons.iter() {
        if !weapon.enabled {
            continue;
        }
        let center = weapon.volume_center(owner_transform);

        let mut touching: Vec<Entity> = volumes
            .iter()
            .filter(|(target, transform, volume)| {
                *target != owner
                    && center.distance(volume.center(transform)) < weapon.radius + volume.radius
            })
            .map(|(target, _, _)| target)
            .collect();
        touching.sort();

        for target in touching {
            overlap_events.write(WeaponOverlap {
                weapon_owner: owner,
                target,
            });
        }
    }
}
