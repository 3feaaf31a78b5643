use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{LastAction, Phase, PlayerId, SeatIndex, TableId, TableType};

/// Одно место в снапшоте. Пустое место – `player: None`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatView {
    pub seat: SeatIndex,
    pub player: Option<PlayerView>,
}

/// Игрок за столом глазами конкретного зрителя.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerView {
    pub player_id: PlayerId,
    pub name: String,
    pub stack: Chips,
    pub bet: Chips,
    pub total_buy_in: Chips,
    pub hands_played: u32,
    /// Карманные карты: свои, либо открытые на шоудауне. Иначе None.
    pub hole_cards: Option<Vec<Card>>,
    /// Сколько закрытых карт у игрока (рубашки для остальных).
    pub card_count: u8,
    pub in_hand: bool,
    pub folded: bool,
    pub all_in: bool,
    pub sitting_out: bool,
    pub disconnected: bool,
    pub missed_big_blind: bool,
    pub is_acting: bool,
    /// Сколько тиков осталось по call clock (если объявлен).
    pub clock_ticks_left: Option<u32>,
    pub last_action: Option<LastAction>,
    pub hand_result: Option<i64>,
    pub winning_cards: Vec<Card>,
}

/// Турнирная часть снапшота.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TournamentView {
    pub level: u32,
    pub level_ticks: u32,
    pub level_duration_ticks: u32,
    pub on_break: bool,
    pub break_ticks: u32,
    pub next_small_blind: Option<Chips>,
    pub next_big_blind: Option<Chips>,
    pub winner: Option<SeatIndex>,
    pub finished: bool,
}

/// Снапшот стола для рассылки клиентам.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSnapshot {
    pub table_id: TableId,
    pub name: String,
    pub table_type: TableType,
    pub max_seats: u8,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,

    pub hand_number: u64,
    pub phase: Phase,
    pub button: Option<SeatIndex>,
    pub acting_seat: Option<SeatIndex>,
    pub board: Vec<Card>,
    /// Собранный банк без ставок текущего раунда.
    pub pot: Chips,
    /// Банк плюс ставки на столе.
    pub total_pot: Chips,
    pub current_bet: Chips,
    /// Минимальный рейз "до" для текущего раунда.
    pub min_raise_to: Chips,
    pub runout_in_progress: bool,
    /// Тиков до старта следующей раздачи.
    pub countdown: Option<u32>,

    pub seats: Vec<SeatView>,
    pub tournament: Option<TournamentView>,
}
