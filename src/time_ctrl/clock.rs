// src/time_ctrl/clock.rs
//! Тиковые счётчики текущего хода. Отдельного таймера на место нет:
//! счётчики растут на тиках стола и сравниваются с порогом.

use serde::{Deserialize, Serialize};

use super::{AutoActionDecision, TimeRules};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnTimers {
    /// Сколько тиков место "ходит" в дисконнекте.
    pub disconnected_ticks: u32,
    /// Сколько тиков прошло с объявления call clock (None – clock не объявлен).
    pub clock_ticks: Option<u32>,
}

impl TurnTimers {
    pub fn clear(&mut self) {
        self.disconnected_ticks = 0;
        self.clock_ticks = None;
    }

    pub fn call_clock(&mut self) {
        if self.clock_ticks.is_none() {
            self.clock_ticks = Some(0);
        }
    }

    /// Есть ли что считать на тиках.
    pub fn is_running(&self, disconnected: bool) -> bool {
        disconnected || self.clock_ticks.is_some()
    }

    /// Один тик для места, которое сейчас должно ходить.
    pub fn on_tick(&mut self, disconnected: bool, rules: &TimeRules) -> AutoActionDecision {
        let mut decision = AutoActionDecision::None;

        if disconnected {
            self.disconnected_ticks += 1;
            if self.disconnected_ticks >= rules.disconnect_timeout_ticks {
                decision = AutoActionDecision::TimeoutCheckOrFold;
            }
        }

        if let Some(ticks) = self.clock_ticks.as_mut() {
            *ticks += 1;
            if *ticks >= rules.call_clock_ticks {
                decision = AutoActionDecision::TimeoutCheckOrFold;
            }
        }

        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnect_threshold_triggers_auto_action() {
        let rules = TimeRules::new(3, 100);
        let mut t = TurnTimers::default();
        assert_eq!(t.on_tick(true, &rules), AutoActionDecision::None);
        assert_eq!(t.on_tick(true, &rules), AutoActionDecision::None);
        assert_eq!(t.on_tick(true, &rules), AutoActionDecision::TimeoutCheckOrFold);
    }

    #[test]
    fn clock_only_counts_after_being_called() {
        let rules = TimeRules::new(100, 2);
        let mut t = TurnTimers::default();
        assert_eq!(t.on_tick(false, &rules), AutoActionDecision::None);
        assert!(!t.is_running(false));
        t.call_clock();
        assert_eq!(t.on_tick(false, &rules), AutoActionDecision::None);
        assert_eq!(t.on_tick(false, &rules), AutoActionDecision::TimeoutCheckOrFold);
    }
}
