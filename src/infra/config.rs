//! Конфигурация движка: тик, задержки, таймауты, турнирные часы, каталог логов.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{TableTiming, TournamentRules};
use crate::time_ctrl::TimeRules;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Переменная {name}: не удалось разобрать {value:?}")]
    Parse { name: &'static str, value: String },

    #[error("Некорректная конфигурация: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Период тика стола.
    pub tick_ms: u64,
    pub runout_delay_ticks: u32,
    pub next_hand_delay_ticks: u32,
    pub disconnect_timeout_ticks: u32,
    pub call_clock_ticks: u32,
    pub level_duration_ticks: u32,
    pub break_duration_ticks: u32,
    /// Перерыв после каждого N-го уровня (0 – без перерывов).
    pub break_every_levels: u32,
    /// Каталог логов истории раздач.
    pub hand_log_dir: PathBuf,
}

impl EngineConfig {
    /// Боевой профиль: тик 1 секунда.
    pub fn standard() -> Self {
        Self {
            tick_ms: 1_000,
            runout_delay_ticks: 2,
            next_hand_delay_ticks: 5,
            disconnect_timeout_ticks: 10,
            call_clock_ticks: 30,
            level_duration_ticks: 600,
            break_duration_ticks: 300,
            break_every_levels: 6,
            hand_log_dir: PathBuf::from("hand_logs"),
        }
    }

    /// Быстрый профиль для тестов и симуляций.
    pub fn testing() -> Self {
        Self {
            tick_ms: 10,
            runout_delay_ticks: 1,
            next_hand_delay_ticks: 1,
            disconnect_timeout_ticks: 3,
            call_clock_ticks: 5,
            level_duration_ticks: 50,
            break_duration_ticks: 10,
            break_every_levels: 4,
            hand_log_dir: env::temp_dir().join("holdem_table_logs"),
        }
    }

    /// Стандартный профиль, переопределённый переменными `HOLDEM_*`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = Self::standard();
        let config = Self {
            tick_ms: env_or("HOLDEM_TICK_MS", base.tick_ms)?,
            runout_delay_ticks: env_or("HOLDEM_RUNOUT_DELAY_TICKS", base.runout_delay_ticks)?,
            next_hand_delay_ticks: env_or("HOLDEM_NEXT_HAND_DELAY_TICKS", base.next_hand_delay_ticks)?,
            disconnect_timeout_ticks: env_or(
                "HOLDEM_DISCONNECT_TIMEOUT_TICKS",
                base.disconnect_timeout_ticks,
            )?,
            call_clock_ticks: env_or("HOLDEM_CALL_CLOCK_TICKS", base.call_clock_ticks)?,
            level_duration_ticks: env_or("HOLDEM_LEVEL_DURATION_TICKS", base.level_duration_ticks)?,
            break_duration_ticks: env_or("HOLDEM_BREAK_DURATION_TICKS", base.break_duration_ticks)?,
            break_every_levels: env_or("HOLDEM_BREAK_EVERY_LEVELS", base.break_every_levels)?,
            hand_log_dir: env::var("HOLDEM_HAND_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(base.hand_log_dir),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms = 0".into()));
        }
        if self.disconnect_timeout_ticks == 0 || self.call_clock_ticks == 0 {
            return Err(ConfigError::Invalid("таймауты хода должны быть > 0".into()));
        }
        self.tournament_rules().validate().map_err(ConfigError::Invalid)
    }

    pub fn time_rules(&self) -> TimeRules {
        TimeRules::new(self.disconnect_timeout_ticks, self.call_clock_ticks)
    }

    pub fn table_timing(&self) -> TableTiming {
        TableTiming {
            runout_delay_ticks: self.runout_delay_ticks,
            next_hand_delay_ticks: self.next_hand_delay_ticks,
            time_rules: self.time_rules(),
        }
    }

    pub fn tournament_rules(&self) -> TournamentRules {
        TournamentRules {
            level_duration_ticks: self.level_duration_ticks,
            break_duration_ticks: self.break_duration_ticks,
            break_every_levels: self.break_every_levels,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

fn env_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Parse { name, value }),
        Err(_) => Ok(default),
    }
}
