//! Состояние сессии: lock активной игры, kill tally.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::events::KillCountChanged;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Kills для досрочной победы игрока (`None` = только через волны)
    pub victory_kill_threshold: Option<u32>,
}

/// Resource: `game_active` lock
///
/// Start при активной игре и End при неактивной — тихие no-op.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct GameSession {
    game_active: bool,
    /// Some(won) после конца игры
    outcome: Option<bool>,
}

impl GameSession {
    pub fn is_active(&self) -> bool {
        self.game_active
    }

    pub fn outcome(&self) -> Option<bool> {
        self.outcome
    }

    /// false если игра уже идёт
    pub fn start(&mut self) -> bool {
        if self.game_active {
            return false;
        }
        self.game_active = true;
        self.outcome = None;
        true
    }

    /// false если игра не идёт (повторный конец)
    pub fn finish(&mut self, won: bool) -> bool {
        if !self.game_active {
            return false;
        }
        self.game_active = false;
        self.outcome = Some(won);
        true
    }
}

/// Resource: счётчик убийств для UI и победы по порогу
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct KillTally {
    pub kills: u32,
    pub enemies: u32,
    pub victory_announced: bool,
}

impl KillTally {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn changed(&self) -> KillCountChanged {
        KillCountChanged {
            kills: self.kills,
            enemies: self.enemies,
        }
    }

    /// +1 kill. true если только что достигнут порог победы (один раз)
    pub fn record_kill(&mut self, threshold: Option<u32>) -> bool {
        self.kills += 1;

        match threshold {
            Some(threshold) if !self.victory_announced && self.kills >= threshold => {
                self.victory_announced = true;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lock() {
        let mut session = GameSession::default();
        assert!(!session.finish(true));
        assert_eq!(session.outcome(), None);

        assert!(session.start());
        assert!(!session.start());
        assert!(session.is_active());

        assert!(session.finish(false));
        assert!(!session.finish(true));
        assert_eq!(session.outcome(), Some(false));

        // Новая игра сбрасывает исход
        assert!(session.start());
        assert_eq!(session.outcome(), None);
    }

    #[test]
    fn test_victory_threshold_fires_once() {
        let mut tally = KillTally::default();
        assert!(!tally.record_kill(Some(3)));
        assert!(!tally.record_kill(Some(3)));
        assert!(tally.record_kill(Some(3)));
        assert!(!tally.record_kill(Some(3)));
        assert_eq!(tally.kills, 4);
    }

    #[test]
    fn test_no_threshold_never_wins() {
        let mut tally = KillTally::default();
        for _ in 0..100 {
            assert!(!tally.record_kill(None));
        }
    }
}
