// src/time_ctrl/mod.rs
//! Контроль времени хода на тиках: дисконнект и call clock.
//!
//! - правила (`TimeRules`);
//! - счётчики текущего хода (`TurnTimers`), живут прямо в месте игрока.

pub mod clock;
pub mod time_rules;

pub use clock::TurnTimers;
pub use time_rules::TimeRules;

/// Какое авто-действие нужно сделать при истечении порога.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoActionDecision {
    /// Время не вышло – действий со стороны движка не требуется.
    None,
    /// Порог пройден – AUTO CHECK / AUTO FOLD
    /// в зависимости от ставки места (это решает покерный движок).
    TimeoutCheckOrFold,
}
