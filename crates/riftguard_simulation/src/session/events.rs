//! Session events (команды хоста и UI sinks).

use bevy::prelude::*;

/// Команды хоста (меню / сцена)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    End { won: bool },
}

/// Игра закончилась (хост выбирает звук победы / поражения)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameEnded {
    pub won: bool,
}

/// UI: "x kills / enemies"
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillCountChanged {
    pub kills: u32,
    pub enemies: u32,
}

/// UI: размер новой волны
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyCountChanged {
    pub count: i32,
}

/// Достигнут порог убийств: игрок победил
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VictoryReached;
