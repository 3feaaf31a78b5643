// src/domain/tournament.rs

use serde::{Deserialize, Serialize};

use crate::domain::blinds::{BlindLevel, BlindStructure};
use crate::domain::chips::Chips;
use crate::domain::SeatIndex;

/// Правила турнирных часов (в тиках планировщика).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TournamentRules {
    /// Длительность одного уровня блайндов.
    pub level_duration_ticks: u32,
    /// Длительность перерыва.
    pub break_duration_ticks: u32,
    /// Перерыв после каждого N-го уровня (0 – без перерывов).
    pub break_every_levels: u32,
}

impl TournamentRules {
    pub fn validate(&self) -> Result<(), String> {
        if self.level_duration_ticks == 0 {
            return Err("TournamentRules: level_duration_ticks = 0".into());
        }
        if self.break_every_levels > 0 && self.break_duration_ticks == 0 {
            return Err("TournamentRules: break_duration_ticks = 0".into());
        }
        Ok(())
    }

    /// Уровень, после которого положен перерыв.
    pub fn is_break_level(&self, level: u32) -> bool {
        self.break_every_levels > 0 && level > 0 && level % self.break_every_levels == 0
    }
}

/// Что произошло за один тик турнирных часов.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TournamentTimeEvent {
    None,
    /// Победитель уже известен – часы стоят.
    Ended,
    LevelAdvanced { from: u32, to: u32, new_blinds: BlindLevel },
    BreakStarted { level: u32 },
    /// Перерыв закончился; если есть следующий уровень – он уже включён.
    BreakEnded { new_blinds: Option<BlindLevel> },
}

/// Турнирное состояние стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TournamentState {
    pub level: u32,
    pub level_ticks: u32,
    pub on_break: bool,
    pub break_ticks: u32,
    /// Unix timestamp (секунды) старта турнира.
    pub started_at_ts: u64,
    pub initial_stack: Chips,
    pub buy_in: Chips,
    /// Победитель (место за столом). None – турнир идёт.
    pub winner: Option<SeatIndex>,

    pub blinds: BlindStructure,
    pub rules: TournamentRules,
}

impl TournamentState {
    pub fn new(
        blinds: BlindStructure,
        rules: TournamentRules,
        initial_stack: Chips,
        buy_in: Chips,
        started_at_ts: u64,
    ) -> Self {
        let level = blinds.first_level().map(|l| l.level).unwrap_or(1);
        Self {
            level,
            level_ticks: 0,
            on_break: false,
            break_ticks: 0,
            started_at_ts,
            initial_stack,
            buy_in,
            winner: None,
            blinds,
            rules,
        }
    }

    pub fn current_blind_level(&self) -> Option<&BlindLevel> {
        self.blinds.level_by_number(self.level)
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// Зафиксировать победителя. Повторный вызов ничего не меняет.
    /// Возвращает true, если победитель записан именно сейчас.
    pub fn record_winner(&mut self, seat: SeatIndex) -> bool {
        if self.winner.is_some() {
            return false;
        }
        self.winner = Some(seat);
        true
    }

    /// Тик турнирных часов.
    ///
    /// Часы не зависят от исхода раздач: уровень растёт по времени,
    /// перерыв начинается на уровне-перерыве, после перерыва – следующий уровень.
    /// Уровень никогда не уменьшается.
    pub fn tick(&mut self) -> TournamentTimeEvent {
        if self.winner.is_some() {
            return TournamentTimeEvent::Ended;
        }

        if self.on_break {
            self.break_ticks += 1;
            if self.break_ticks < self.rules.break_duration_ticks {
                return TournamentTimeEvent::None;
            }
            self.on_break = false;
            self.break_ticks = 0;
            let new_blinds = self.advance_level().copied();
            return TournamentTimeEvent::BreakEnded { new_blinds };
        }

        self.level_ticks += 1;
        if self.level_ticks < self.rules.level_duration_ticks {
            return TournamentTimeEvent::None;
        }
        self.level_ticks = 0;

        if self.rules.is_break_level(self.level) {
            self.on_break = true;
            self.break_ticks = 0;
            return TournamentTimeEvent::BreakStarted { level: self.level };
        }

        let from = self.level;
        match self.advance_level().copied() {
            Some(new_blinds) => TournamentTimeEvent::LevelAdvanced {
                from,
                to: new_blinds.level,
                new_blinds,
            },
            None => TournamentTimeEvent::None,
        }
    }

    /// Перейти на следующий уровень, если он есть.
    fn advance_level(&mut self) -> Option<&BlindLevel> {
        let next = self.blinds.next_level(self.level)?;
        self.level = next.level;
        Some(next)
    }
}
