//! Игровая сессия: старт / конец, kill tally, победа и поражение.
//!
//! "Ровно один менеджер" = Resource, вставленный `SimulationPlugin`.

use bevy::prelude::*;

pub mod events;
pub mod state;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod systems_tests;

pub use events::{EnemyCountChanged, GameEnded, KillCountChanged, SessionCommand, VictoryReached};
pub use state::{GameSession, KillTally, SessionConfig};
pub use systems::{check_game_outcome, handle_session_commands, record_kills};

use crate::agent::agent_logic_tick;
use crate::SimulationSet;

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameSession>()
            .init_resource::<KillTally>()
            .add_event::<SessionCommand>()
            .add_event::<GameEnded>()
            .add_event::<KillCountChanged>()
            .add_event::<EnemyCountChanged>()
            .add_event::<VictoryReached>();

        app.add_systems(Update, handle_session_commands.in_set(SimulationSet::Session))
            .add_systems(
                Update,
                record_kills
                    .after(agent_logic_tick)
                    .in_set(SimulationSet::Agents),
            )
            .add_systems(Update, check_game_outcome.in_set(SimulationSet::Outcome));
    }
}
