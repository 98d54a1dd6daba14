//! Граница с хост-движком (navmesh, аниматор, физика, ввод).
//!
//! ECS = правила игры, хост = исполнение. Всё общение идёт через компоненты,
//! ресурсы и события из этого модуля.

use bevy::prelude::*;

pub mod animation;
pub mod geometry;
pub mod input;
pub mod navigation;

pub use animation::{AnimTrigger, AnimationSignals};
pub use geometry::{
    layer_name, Geometry, LineOfSight, ProxySphere, RayHit, RayQuery, LAYER_AGENT,
    LAYER_ENVIRONMENT, LAYER_PLAYER, LAYER_SPAWN_POINT, MASK_AGENT_SIGHT, MASK_ALL, MASK_GROUND,
};
pub use input::{CameraBasis, PlayerInput};
pub use navigation::NavAgent;

/// Точка взгляда (глаза) относительно Transform
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct LookPoint {
    pub offset: Vec3,
}

impl Default for LookPoint {
    fn default() -> Self {
        Self {
            offset: Vec3::Y * 1.5,
        }
    }
}

impl LookPoint {
    pub fn at_height(height: f32) -> Self {
        Self {
            offset: Vec3::Y * height,
        }
    }

    pub fn world(&self, transform: &Transform) -> Vec3 {
        transform.translation + transform.rotation * self.offset
    }
}

pub struct BridgePlugin;

impl Plugin for BridgePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>()
            .init_resource::<CameraBasis>();

        // Хост может поставить свою геометрию до плагина
        if !app.world().contains_resource::<Geometry>() {
            app.insert_resource(Geometry::default());
        }
    }
}
