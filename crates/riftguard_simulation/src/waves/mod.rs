//! Wave orchestrator: волны врагов и их спавн.

use bevy::prelude::*;

pub mod orchestrator;
pub mod systems;


pub use orchestrator::{WaveConfig, WaveOrchestrator, WavePhase, WaveStep, SPAWN_ROLL_MAX};
pub use systems::run_wave_clock;

use crate::SimulationSet;

pub struct WavesPlugin;

impl Plugin for WavesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaveOrchestrator>();

        app.add_systems(Update, run_wave_clock.in_set(SimulationSet::Waves));
    }
}
