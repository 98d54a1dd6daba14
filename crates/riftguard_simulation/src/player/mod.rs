//! Player: FSM, stamina таймеры, input gating.

use bevy::prelude::*;

pub mod components;
pub mod state_machine;
pub mod systems;
pub mod timers;


pub use components::{Player, PlayerConfig, PlayerIntent, PlayerMotion, StaminaConfig};
pub use state_machine::{
    physics_step, probe_ground, PlayerFrame, PlayerRig, PlayerState, PlayerStateMachine,
    PlayerTick,
};
pub use systems::{latch_player_input, player_fixed_tick, player_logic_tick, ShowEndOfRunUi};
pub use timers::{PlayerTimerAction, PlayerTimers};

use crate::bridge::{AnimationSignals, LookPoint, LAYER_AGENT, LAYER_PLAYER, LAYER_SPAWN_POINT};
use crate::combat::{HitVolume, Weapon};
use crate::config::GameConfig;
use crate::vitals::{Stamina, VitalStats};
use crate::{PhysicsSet, SimulationSet};

/// Компоненты игрока (хост добавляет свои visual/physics поверх)
pub fn player_bundle(config: &GameConfig, transform: Transform) -> impl Bundle {
    let mut motion = PlayerMotion::default();
    let mut anim = AnimationSignals::default();
    let mut timers = PlayerTimers::default();
    let machine = PlayerStateMachine::start(&mut PlayerRig {
        motion: &mut motion,
        anim: &mut anim,
        timers: &mut timers,
    });

    let player = &config.player;
    (
        Player::default(),
        transform,
        machine,
        motion,
        anim,
        timers,
        PlayerIntent::default(),
        VitalStats::new(player.max_health),
        Stamina::new(config.stamina.max_stamina),
        LookPoint::at_height(player.eye_height),
        HitVolume::new(LAYER_PLAYER, player.hit_radius),
        Weapon::new(player.weapon_damage, LAYER_AGENT | LAYER_SPAWN_POINT)
            .with_reach(player.weapon_reach, player.weapon_radius),
    )
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ShowEndOfRunUi>();

        app.add_systems(Update, latch_player_input.in_set(SimulationSet::Input))
            .add_systems(Update, player_logic_tick.in_set(SimulationSet::Player))
            .add_systems(FixedUpdate, player_fixed_tick.in_set(PhysicsSet::Logic));
    }
}
