//! Agent AI: perception, FSM, ECS systems.
//!
//! ECS ответственность: решения (куда идти, когда атаковать, когда умереть).
//! Хост: путь по navmesh, анимации, физика.

use bevy::prelude::*;

pub mod components;
pub mod perception;
pub mod state_machine;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod state_machine_tests;

pub use components::{Agent, AgentConfig, PatrolRoute};
pub use perception::{detects_player, within_field_of_view, PlayerSighting};
pub use state_machine::{
    yaw_toward, AgentContext, AgentSenses, AgentState, AgentStateMachine, AgentTick,
};
pub use systems::{agent_fixed_tick, agent_logic_tick, AgentDestroyed};

use crate::player::player_fixed_tick;
use crate::{PhysicsSet, SimulationSet};

pub struct AgentPlugin;

impl Plugin for AgentPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AgentDestroyed>();

        app.add_systems(Update, agent_logic_tick.in_set(SimulationSet::Agents));
        // Агенты поворачиваются к позиции игрока после его physics шага
        app.add_systems(
            FixedUpdate,
            agent_fixed_tick
                .after(player_fixed_tick)
                .in_set(PhysicsSet::Logic),
        );
    }
}
