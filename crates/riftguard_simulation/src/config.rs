//! Глобальный tuning симуляции (TOML).
//!
//! Каждая подсистема держит свою секцию; `GameConfig` их только собирает.
//! Отсутствующие поля берутся из `Default` (значения из оригинального тюнинга).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::agent::AgentConfig;
use crate::player::{PlayerConfig, StaminaConfig};
use crate::session::SessionConfig;
use crate::spawn::SpawnConfig;
use crate::waves::WaveConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Resource: весь tuning одной сессии
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub agent: AgentConfig,
    pub player: PlayerConfig,
    pub stamina: StaminaConfig,
    pub waves: WaveConfig,
    pub spawn: SpawnConfig,
    pub session: SessionConfig,
}

impl GameConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.agent.validate()?;
        self.player.validate()?;
        self.stamina.validate()?;
        self.waves.validate()?;
        self.spawn.validate()?;
        Ok(())
    }
}

/// Общая проверка для длительностей / скоростей
pub(crate) fn ensure_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("expected a finite non-negative number, got {value}"),
        ))
    }
}

pub(crate) fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("expected a finite positive number, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = GameConfig::from_toml_str("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.agent.fov_half_angle_deg, 55.0);
        assert_eq!(config.waves.initial_wave_size, 8);
        assert_eq!(config.stamina.regen_delay_secs, 10.0);
    }

    #[test]
    fn test_partial_override() {
        let config = GameConfig::from_toml_str(
            r#"
            [waves]
            initial_wave_size = 3
            number_of_waves = 2

            [session]
            victory_kill_threshold = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.waves.initial_wave_size, 3);
        assert_eq!(config.waves.number_of_waves, 2);
        // Не указанное поле секции остаётся дефолтным
        assert_eq!(config.waves.growth_per_wave, 2);
        assert_eq!(config.session.victory_kill_threshold, Some(5));
    }

    #[test]
    fn test_parse_error() {
        let result = GameConfig::from_toml_str("[waves\ninitial_wave_size = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_fov_rejected() {
        let result = GameConfig::from_toml_str(
            r#"
            [agent]
            fov_half_angle_deg = 270.0
            "#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "agent.fov_half_angle_deg",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_duration_rejected() {
        let result = GameConfig::from_toml_str(
            r#"
            [stamina]
            regen_delay_secs = -1.0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_zero_waves_allowed() {
        let config = GameConfig::from_toml_str(
            r#"
            [waves]
            number_of_waves = 0
            initial_wave_size = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.waves.number_of_waves, 0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = GameConfig::load("/definitely/not/here/riftguard.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
