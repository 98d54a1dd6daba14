//! Wave orchestrator: давление спавна, размер волн, cooldown.
//!
//! Тикает раз в целую секунду игрового времени, дробный остаток
//! переносится на следующий кадр.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Верхняя граница броска спавна (бросок в `[0, SPAWN_ROLL_MAX)`)
pub const SPAWN_ROLL_MAX: i32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub initial_wave_size: i32,
    pub growth_per_wave: i32,
    /// Всего волн за игру (0 = сразу AllWavesComplete)
    pub number_of_waves: u32,
    /// Прирост spawn progress за секунду активной волны
    pub spawn_progress_growth: i32,
    /// Пауза между волнами (целые секунды)
    pub wave_cooldown_secs: i32,
    pub initial_spawn_progress: i32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            initial_wave_size: 8,
            growth_per_wave: 2,
            number_of_waves: 4,
            spawn_progress_growth: 15,
            wave_cooldown_secs: 8,
            initial_spawn_progress: 0,
        }
    }
}

impl WaveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_wave_size < 0 {
            return Err(ConfigError::invalid(
                "waves.initial_wave_size",
                format!("expected >= 0, got {}", self.initial_wave_size),
            ));
        }
        if self.growth_per_wave < 0 {
            return Err(ConfigError::invalid(
                "waves.growth_per_wave",
                format!("expected >= 0, got {}", self.growth_per_wave),
            ));
        }
        if self.wave_cooldown_secs < 0 {
            return Err(ConfigError::invalid(
                "waves.wave_cooldown_secs",
                format!("expected >= 0, got {}", self.wave_cooldown_secs),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum WavePhase {
    #[default]
    NoWave,
    WaveActive,
    Cooldown,
    AllWavesComplete,
}

/// Что произошло за один секундный тик
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveStep {
    /// Волна идёт, бросок не прошёл
    Quiet,
    /// Спавн у `roster.living_spawners[spawner_index]`
    Spawn { spawner_index: usize, wave_cleared: bool },
    /// Размер волны уже 0 на входе: сразу в cooldown
    WaveCleared,
    Cooldown { remaining: i32 },
    WaveStarted { size: i32 },
    AllWavesComplete,
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct WaveOrchestrator {
    phase: WavePhase,
    spawn_progress: i32,
    current_wave_size: i32,
    waves_completed: u32,
    cooldown_remaining: i32,
    since_last_tick: f32,
}

impl WaveOrchestrator {
    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn spawn_progress(&self) -> i32 {
        self.spawn_progress
    }

    pub fn current_wave_size(&self) -> i32 {
        self.current_wave_size
    }

    pub fn waves_completed(&self) -> u32 {
        self.waves_completed
    }

    pub fn cooldown_remaining(&self) -> i32 {
        self.cooldown_remaining
    }

    /// WaveActive или Cooldown
    pub fn is_running(&self) -> bool {
        matches!(self.phase, WavePhase::WaveActive | WavePhase::Cooldown)
    }

    pub fn max_wave_size(&self, config: &WaveConfig) -> i32 {
        config.initial_wave_size + config.growth_per_wave * self.waves_completed as i32
    }

    /// Старт игры: первая волна
    pub fn begin(&mut self, config: &WaveConfig) {
        *self = Self {
            spawn_progress: config.initial_spawn_progress,
            ..Self::default()
        };

        if config.number_of_waves == 0 {
            self.phase = WavePhase::AllWavesComplete;
            return;
        }

        self.current_wave_size = self.max_wave_size(config);
        self.phase = WavePhase::WaveActive;
    }

    /// Конец игры
    pub fn halt(&mut self) {
        self.phase = WavePhase::NoWave;
        self.since_last_tick = 0.0;
    }

    /// Копит время кадра, возвращает сколько целых секундных тиков набралось
    pub fn accumulate(&mut self, delta: f32) -> u32 {
        self.since_last_tick += delta;

        let mut ticks = 0;
        while self.since_last_tick >= 1.0 {
            self.since_last_tick -= 1.0;
            ticks += 1;
        }
        ticks
    }

    /// Один секундный тик.
    ///
    /// Бросок спавна и выбор spawner'а — независимые draws из `rng`.
    /// Без живых spawner'ов попытка спавна пропускается.
    pub fn tick_second<R: Rng + ?Sized>(
        &mut self,
        config: &WaveConfig,
        rng: &mut R,
        living_spawners: usize,
    ) -> WaveStep {
        match self.phase {
            WavePhase::WaveActive => {
                if self.current_wave_size <= 0 {
                    self.enter_cooldown(config);
                    return WaveStep::WaveCleared;
                }

                self.spawn_progress += config.spawn_progress_growth;
                let roll = rng.gen_range(0..SPAWN_ROLL_MAX);

                if roll < self.spawn_progress || living_spawners == 0 {
                    return WaveStep::Quiet;
                }

                let spawner_index = rng.gen_range(0..living_spawners);
                self.spawn_progress -= SPAWN_ROLL_MAX;
                self.current_wave_size -= 1;

                let wave_cleared = self.current_wave_size <= 0;
                if wave_cleared {
                    self.enter_cooldown(config);
                }

                WaveStep::Spawn {
                    spawner_index,
                    wave_cleared,
                }
            }

            WavePhase::Cooldown => {
                self.cooldown_remaining -= 1;
                if self.cooldown_remaining > 0 {
                    return WaveStep::Cooldown {
                        remaining: self.cooldown_remaining,
                    };
                }

                self.waves_completed += 1;
                if self.waves_completed < config.number_of_waves {
                    self.current_wave_size = self.max_wave_size(config);
                    self.phase = WavePhase::WaveActive;
                    WaveStep::WaveStarted {
                        size: self.current_wave_size,
                    }
                } else {
                    self.phase = WavePhase::AllWavesComplete;
                    WaveStep::AllWavesComplete
                }
            }

            WavePhase::NoWave | WavePhase::AllWavesComplete => WaveStep::Quiet,
        }
    }

    fn enter_cooldown(&mut self, config: &WaveConfig) {
        self.phase = WavePhase::Cooldown;
        self.cooldown_remaining = config.wave_cooldown_secs;
    }
}
