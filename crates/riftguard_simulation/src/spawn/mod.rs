//! Spawn points: разрушаемые объекты, создающие агентов.

use bevy::prelude::*;

pub mod components;
pub mod factory;
pub mod roster;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod roster_tests;

pub use components::{AgentBlueprint, PatrolPool, SpawnConfig, SpawnPoint};
pub use factory::{agent_bundle, spawn_agent, spawn_point_bundle};
pub use roster::{rebuild_roster, sweep_rosters, Roster};

use crate::SimulationSet;

pub struct SpawnPlugin;

impl Plugin for SpawnPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Roster>().init_resource::<PatrolPool>();

        app.add_systems(Update, sweep_rosters.in_set(SimulationSet::Roster));
    }
}
