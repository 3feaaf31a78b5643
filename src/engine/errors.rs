use crate::domain::{Chips, PlayerId, SeatIndex};

use thiserror::Error;

/// Ошибки движка покера.
///
/// Любая ошибка означает, что состояние стола не изменилось.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Место {0} не существует за столом")]
    InvalidSeat(SeatIndex),

    #[error("Место {0} пустое")]
    EmptySeat(SeatIndex),

    #[error("Место {0} уже занято")]
    SeatOccupied(SeatIndex),

    #[error("Игрок {0} уже сидит за столом")]
    PlayerAlreadySeated(PlayerId),

    #[error("Игрок {0} не найден за столом")]
    PlayerNotAtTable(PlayerId),

    #[error("Недостаточно игроков для раздачи: готовы {eligible}, нужно минимум 2")]
    InsufficientPlayers { eligible: usize },

    #[error("Раздача уже идёт")]
    HandAlreadyInProgress,

    #[error("Раздача не активна")]
    NoActiveHand,

    #[error("Турнир уже завершён")]
    TournamentFinished,

    #[error("Место {seat} участвует в текущей раздаче")]
    PlayerInHand { seat: SeatIndex },

    #[error("Сейчас не ход места {seat} (ходит {acting:?})")]
    NotYourTurn {
        seat: SeatIndex,
        acting: Option<SeatIndex>,
    },

    #[error("Место {0} уже сфолдило")]
    SeatFolded(SeatIndex),

    #[error("Место {0} не участвует в раздаче")]
    NotInHand(SeatIndex),

    #[error("Место {0} уже в all-in")]
    AlreadyAllIn(SeatIndex),

    #[error("Check невозможен: нужно доставить {to_call}")]
    CannotCheck { to_call: Chips },

    #[error("Call невозможен: ставки для уравнивания нет")]
    CannotCall,

    #[error("Bet невозможен: ставка {current_bet} уже сделана, нужен raise")]
    CannotBet { current_bet: Chips },

    #[error("Raise невозможен: ставки ещё нет, нужен bet")]
    CannotRaise,

    #[error("Ставка {attempted} меньше минимальной {min}")]
    BetTooSmall { attempted: Chips, min: Chips },

    #[error("Рейз до {attempted} меньше минимального {min}")]
    RaiseTooSmall { attempted: Chips, min: Chips },

    #[error("Недостаточно фишек: нужно {needed}, в стеке {stack}")]
    NotEnoughChips { needed: Chips, stack: Chips },

    #[error("Торговля не переоткрыта: место {0} может только call или fold")]
    RaiseNotReopened(SeatIndex),

    #[error("Сумма должна быть больше нуля")]
    ZeroAmount,

    #[error("Докупка фишек запрещена на турнирном столе")]
    RebuyNotAllowed,

    #[error("Место {0} с фишками не может покинуть идущий турнир")]
    TournamentSeatLocked(SeatIndex),

    #[error("У места {0} нет фишек")]
    NoChips(SeatIndex),
}
