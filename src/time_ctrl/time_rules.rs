// src/time_ctrl/time_rules.rs
//! Пороги тиковых таймаутов для одного стола.
//!
//! Здесь описываем только "правила", без состояния и без привязки к конкретному месту.

use serde::{Deserialize, Serialize};

/// Правила таймаутов (всё в тиках планировщика).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeRules {
    /// Сколько тиков игрок может "думать" в дисконнекте, прежде чем за него сходит стол.
    pub disconnect_timeout_ticks: u32,
    /// Сколько тиков даётся после объявления call clock.
    pub call_clock_ticks: u32,
}

impl TimeRules {
    pub const fn new(disconnect_timeout_ticks: u32, call_clock_ticks: u32) -> Self {
        Self {
            disconnect_timeout_ticks,
            call_clock_ticks,
        }
    }

    /// Стандартный профиль при тике в 1 секунду: 10 сек дисконнекта, 30 сек clock.
    pub const fn standard() -> Self {
        Self::new(10, 30)
    }
}

impl Default for TimeRules {
    fn default() -> Self {
        Self::standard()
    }
}
