//! Headless `LineOfSight`: сферы + горизонтальная плоскость пола.

use bevy::prelude::*;

use crate::bridge::{LineOfSight, ProxySphere, RayHit, RayQuery, LAYER_ENVIRONMENT};

#[derive(Debug, Clone, Default)]
pub struct SphereWorld {
    /// Статика (стены, колонны), не трогается sync'ом
    obstacles: Vec<ProxySphere>,
    /// Динамические тела, перезаписываются каждый кадр
    bodies: Vec<ProxySphere>,
    ground_height: Option<f32>,
}

impl SphereWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ground(height: f32) -> Self {
        Self {
            ground_height: Some(height),
            ..Self::default()
        }
    }

    pub fn with_obstacle(mut self, center: Vec3, radius: f32) -> Self {
        self.obstacles.push(ProxySphere {
            entity: None,
            center,
            radius,
            layer: LAYER_ENVIRONMENT,
        });
        self
    }

    pub fn bodies(&self) -> &[ProxySphere] {
        &self.bodies
    }
}

/// Расстояние вдоль луча до сферы; origin внутри сферы = попадание на 0
fn ray_sphere_distance(origin: Vec3, direction: Vec3, sphere: &ProxySphere) -> Option<f32> {
    let offset = origin - sphere.center;
    let c = offset.length_squared() - sphere.radius * sphere.radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    let b = offset.dot(direction);
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let t = -b - discriminant.sqrt();
    (t >= 0.0).then_some(t)
}

impl LineOfSight for SphereWorld {
    fn cast_ray(&self, query: &RayQuery) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;

        let mut consider = |distance: f32, entity: Option<Entity>, layer: u32| {
            if distance > query.max_distance {
                return;
            }
            if best.map_or(true, |hit| distance < hit.distance) {
                best = Some(RayHit {
                    entity,
                    layer,
                    point: query.origin + query.direction * distance,
                    distance,
                });
            }
        };

        for sphere in self.obstacles.iter().chain(self.bodies.iter()) {
            if sphere.layer & query.mask == 0 {
                continue;
            }
            if let Some(distance) = ray_sphere_distance(query.origin, query.direction, sphere) {
                consider(distance, sphere.entity, sphere.layer);
            }
        }

        if let Some(ground) = self.ground_height {
            if LAYER_ENVIRONMENT & query.mask != 0 && query.direction.y < -f32::EPSILON {
                let distance = (ground - query.origin.y) / query.direction.y;
                if distance >= 0.0 {
                    consider(distance, None, LAYER_ENVIRONMENT);
                }
            }
        }

        best
    }

    fn sync_bodies(&mut self, bodies: &[ProxySphere]) {
        self.bodies.clear();
        self.bodies.extend_from_slice(bodies);
    }
}
