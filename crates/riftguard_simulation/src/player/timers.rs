//! Отложенные действия игрока: sprint drain, stamina replenish, attack latch.
//!
//! Все три построены на `Scheduler` и держат свой pending токен, поэтому
//! повторное взведение никогда не плодит дубликаты.

use bevy::prelude::*;

use crate::schedule::{CancelToken, Scheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerTimerAction {
    SprintDrain,
    Replenish,
    ReleaseAttackInput,
}

#[derive(Component, Debug, Clone, Default)]
pub struct PlayerTimers {
    scheduler: Scheduler<PlayerTimerAction>,
    drain: Option<CancelToken>,
    replenish: Option<CancelToken>,
    attack_release: Option<CancelToken>,
}

impl PlayerTimers {
    /// Продвигает игровое время, снимает pending токены сработавших действий
    pub fn advance(&mut self, delta: f32) -> Vec<PlayerTimerAction> {
        let fired = self.scheduler.advance(delta);

        for action in &fired {
            match action {
                PlayerTimerAction::SprintDrain => self.drain = None,
                PlayerTimerAction::Replenish => self.replenish = None,
                PlayerTimerAction::ReleaseAttackInput => self.attack_release = None,
            }
        }

        fired
    }

    /// Sprint drain: взводим полный интервал при первом тике sprint'а,
    /// отменяем сразу как только sprint прекратился (без переноса остатка).
    pub fn update_sprint_drain(&mut self, sprinting: bool, interval: f32) {
        if !sprinting {
            self.cancel_drain();
            return;
        }

        if self.drain.is_none() {
            self.drain = Some(self.scheduler.schedule(interval, PlayerTimerAction::SprintDrain));
        }
    }

    pub fn cancel_drain(&mut self) {
        if let Some(token) = self.drain.take() {
            self.scheduler.cancel(token);
        }
    }

    pub fn is_draining(&self) -> bool {
        self.drain.is_some()
    }

    /// Replenish: один pending цикл пока stamina ниже max и нет drain.
    /// Иначе висящий цикл отменяется.
    pub fn update_replenish(&mut self, below_max: bool, delay: f32) {
        if below_max {
            if self.replenish.is_none() {
                self.replenish = Some(self.scheduler.schedule(delay, PlayerTimerAction::Replenish));
            }
        } else if let Some(token) = self.replenish.take() {
            self.scheduler.cancel(token);
        }
    }

    pub fn is_replenish_pending(&self) -> bool {
        self.replenish.is_some()
    }

    /// Новое нажатие перезапускает окно атаки
    pub fn latch_attack(&mut self, window: f32) {
        self.cancel_attack_latch();
        self.attack_release = Some(
            self.scheduler
                .schedule(window, PlayerTimerAction::ReleaseAttackInput),
        );
    }

    pub fn cancel_attack_latch(&mut self) {
        if let Some(token) = self.attack_release.take() {
            self.scheduler.cancel(token);
        }
    }

    pub fn pending_count(&self) -> usize {
        self.scheduler.pending_count()
    }
}
