use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::SeatIndex;

/// Фаза раздачи. Waiting – между раздачами.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    #[default]
    Waiting,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Phase {
    /// Идёт ли сейчас раунд ставок.
    pub fn is_betting(self) -> bool {
        matches!(self, Phase::Preflop | Phase::Flop | Phase::Turn | Phase::River)
    }

    /// Следующая улица. Для River – Showdown.
    pub fn next_street(self) -> Option<Phase> {
        match self {
            Phase::Preflop => Some(Phase::Flop),
            Phase::Flop => Some(Phase::Turn),
            Phase::Turn => Some(Phase::River),
            Phase::River => Some(Phase::Showdown),
            Phase::Waiting | Phase::Showdown => None,
        }
    }

    /// Сколько карт борда открывается при переходе на эту улицу.
    pub fn board_cards_dealt(self) -> usize {
        match self {
            Phase::Flop => 3,
            Phase::Turn | Phase::River => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Waiting => "Waiting",
            Phase::Preflop => "Preflop",
            Phase::Flop => "Flop",
            Phase::Turn => "Turn",
            Phase::River => "River",
            Phase::Showdown => "Showdown",
        };
        f.write_str(s)
    }
}

/// Состояние текущей раздачи. Создаётся на старте раздачи и
/// сбрасывается в `Hand::default()` по её окончании.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hand {
    pub phase: Phase,
    /// Собранный банк (ставки прошлых раундов + анте).
    pub pot: Chips,
    /// Ставка, которую нужно уравнять в текущем раунде.
    pub current_bet: Chips,
    /// Место последнего полноценного bet/raise.
    pub last_raiser: Option<SeatIndex>,
    /// Чей ход. None – раунд закрыт, действовать никому не нужно.
    pub acting_seat: Option<SeatIndex>,
    /// Размер последнего повышения (минимальный шаг рейза).
    pub last_raise_size: Chips,
}
