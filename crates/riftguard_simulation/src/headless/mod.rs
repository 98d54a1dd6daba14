//! Headless хост: всё, что в игре делает движок (navmesh, аниматор,
//! физика, raycast), в простейшем виде. Нужен бинарнику и тестам.

use bevy::prelude::*;

pub mod animator;
pub mod physics;
pub mod sphere_world;

pub use animator::{advance_animations, HeadlessAnimator, WindowEdge};
pub use physics::{
    detect_weapon_overlaps, drive_navigation, integrate_motion, integrate_player_motion,
    step_navigation,
};
pub use sphere_world::SphereWorld;

use crate::bridge::{Geometry, ProxySphere};
use crate::combat::HitVolume;
use crate::{PhysicsSet, SimulationSet};

/// Система: hurtbox'ы → тела геометрии для raycast
pub fn sync_geometry_bodies(
    volumes: Query<(Entity, &Transform, &HitVolume)>,
    mut geometry: ResMut<Geometry>,
) {
    let mut bodies: Vec<ProxySphere> = volumes
        .iter()
        .map(|(entity, transform, volume)| ProxySphere {
            entity: Some(entity),
            center: volume.center(transform),
            radius: volume.radius,
            layer: volume.layer,
        })
        .collect();
    bodies.sort_by_key(|body| body.entity);

    geometry.sync_bodies(&bodies);
}

/// Headless Plugin (добавлять вместо движка хоста)
///
/// - Update / HostSync: sync тел геометрии, аниматор
/// - FixedUpdate / Host: навигация, интеграция игрока, overlap оружия
pub struct HeadlessPlugin;

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HeadlessAnimator>();

        if !app.world().contains_resource::<Geometry>() {
            app.insert_resource(Geometry::new(SphereWorld::with_ground(0.0)));
        }

        app.add_systems(
            Update,
            (sync_geometry_bodies, advance_animations)
                .chain()
                .in_set(SimulationSet::HostSync),
        )
        .add_systems(
            FixedUpdate,
            (drive_navigation, integrate_player_motion, detect_weapon_overlaps)
                .chain()
                .in_set(PhysicsSet::Host),
        );
    }
}
