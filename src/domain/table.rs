use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::blinds::BlindLevel;
use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::{Hand, Phase};
use crate::domain::player::{Seat, SeatedPlayer};
use crate::domain::tournament::TournamentState;
use crate::domain::{PlayerId, TableId};
use crate::engine::hand_history::HandRecorder;
use crate::time_ctrl::TimeRules;
use crate::tournament::SummaryRecorder;

/// Индекс места за столом (0..seat_count-1).
pub type SeatIndex = u8;

/// Тип стола.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TableType {
    Cash,
    Tournament,
}

/// Размер стола. Других вариантов нет: 2, 6 или 9 мест.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TableSize {
    HeadsUp,
    SixMax,
    NineMax,
}

impl TableSize {
    pub const fn seats(self) -> u8 {
        match self {
            TableSize::HeadsUp => 2,
            TableSize::SixMax => 6,
            TableSize::NineMax => 9,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Недопустимый размер стола: {0} (допустимо 2, 6 или 9)")]
pub struct TableSizeError(pub u8);

impl TryFrom<u8> for TableSize {
    type Error = TableSizeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(TableSize::HeadsUp),
            6 => Ok(TableSize::SixMax),
            9 => Ok(TableSize::NineMax),
            other => Err(TableSizeError(other)),
        }
    }
}

/// Стейки стола (SB/BB/ante). В турнире меняются по уровням.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableStakes {
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
}

impl TableStakes {
    pub fn new(sb: Chips, bb: Chips, ante: Chips) -> Self {
        Self {
            small_blind: sb,
            big_blind: bb,
            ante,
        }
    }
}

impl From<&BlindLevel> for TableStakes {
    fn from(level: &BlindLevel) -> Self {
        Self::new(level.small_blind, level.big_blind, level.ante)
    }
}

/// Тиковые задержки стола.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableTiming {
    /// Пауза между улицами при автоматическом доигрывании.
    pub runout_delay_ticks: u32,
    /// Обратный отсчёт до следующей раздачи.
    pub next_hand_delay_ticks: u32,
    pub time_rules: TimeRules,
}

impl TableTiming {
    pub const fn standard() -> Self {
        Self {
            runout_delay_ticks: 2,
            next_hand_delay_ticks: 5,
            time_rules: TimeRules::standard(),
        }
    }
}

impl Default for TableTiming {
    fn default() -> Self {
        Self::standard()
    }
}

/// Конфиг стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    pub size: TableSize,
    pub table_type: TableType,
    pub stakes: TableStakes,
    pub timing: TableTiming,
}

impl TableConfig {
    pub fn new(size: TableSize, table_type: TableType, stakes: TableStakes) -> Self {
        Self {
            size,
            table_type,
            stakes,
            timing: TableTiming::standard(),
        }
    }

    pub fn cash(size: TableSize, stakes: TableStakes) -> Self {
        Self::new(size, TableType::Cash, stakes)
    }
}

/// Шаг автоматического доигрывания (runout), когда решений больше нет.
///
/// Каждый шаг – отдельное состояние; хост может рассылать снапшот после каждого.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunoutStep {
    Flop,
    Turn,
    River,
    Showdown,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunoutState {
    pub next_step: RunoutStep,
    /// Сколько тиков осталось до следующего шага.
    pub ticks_left: u32,
}

/// Основное состояние стола.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub config: TableConfig,

    /// Места за столом: индекс вектора = SeatIndex. Длина не меняется.
    pub seats: Vec<Seat>,

    /// Дилерская кнопка. None – стол ещё не стартовал.
    pub button: Option<SeatIndex>,

    pub deck: Deck,
    /// Общие карты борда (0–5 карт).
    pub board: Vec<Card>,

    pub hand: Hand,
    /// Сколько раздач сыграно за столом (номер последней раздачи).
    pub hand_counter: u64,

    pub tournament: Option<TournamentState>,
    pub runout: Option<RunoutState>,

    /// Обратный отсчёт (в тиках) до старта следующей раздачи.
    pub countdown: Option<u32>,

    /// Запись истории раздач (OHH) – принадлежит столу.
    pub recorder: HandRecorder,
    /// Турнирная сводка – только для турнирных столов.
    pub summary: Option<SummaryRecorder>,
}

impl Table {
    /// Создать пустой стол с заданной конфигурацией.
    pub fn new(id: TableId, name: impl Into<String>, config: TableConfig) -> Self {
        let seats = vec![Seat::Empty; config.size.seats() as usize];
        Self {
            id,
            name: name.into(),
            config,
            seats,
            button: None,
            deck: Deck::default(),
            board: Vec::new(),
            hand: Hand::default(),
            hand_counter: 0,
            tournament: None,
            runout: None,
            countdown: None,
            recorder: HandRecorder::new(),
            summary: None,
        }
    }

    /// Турнирный стол: блайнды берутся из первого уровня состояния турнира.
    pub fn new_tournament(
        id: TableId,
        name: impl Into<String>,
        size: TableSize,
        tournament: TournamentState,
        stakes: TableStakes,
    ) -> Self {
        let config = TableConfig::new(size, TableType::Tournament, stakes);
        let mut table = Self::new(id, name, config);
        table.summary = Some(SummaryRecorder::new(&tournament));
        table.tournament = Some(tournament);
        table
    }

    pub fn seat_count(&self) -> u8 {
        self.config.size.seats()
    }

    pub fn is_tournament(&self) -> bool {
        self.tournament.is_some()
    }

    pub fn player(&self, seat: SeatIndex) -> Option<&SeatedPlayer> {
        self.seats.get(seat as usize).and_then(Seat::player)
    }

    pub fn player_mut(&mut self, seat: SeatIndex) -> Option<&mut SeatedPlayer> {
        self.seats.get_mut(seat as usize).and_then(Seat::player_mut)
    }

    /// Итератор по занятым местам: (seat, player).
    pub fn players(&self) -> impl Iterator<Item = (SeatIndex, &SeatedPlayer)> {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.player().map(|p| (i as SeatIndex, p)))
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = (SeatIndex, &mut SeatedPlayer)> {
        self.seats
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.player_mut().map(|p| (i as SeatIndex, p)))
    }

    pub fn seated_count(&self) -> usize {
        self.players().count()
    }

    /// Места, которые могут получить карты (фишки есть, не sit out).
    pub fn eligible_count(&self) -> usize {
        self.players().filter(|(_, p)| p.is_eligible_for_hand()).count()
    }

    /// Места с положительным стеком (для определения победителя турнира).
    pub fn funded_seats(&self) -> Vec<SeatIndex> {
        self.players()
            .filter(|(_, p)| !p.stack.is_zero())
            .map(|(s, _)| s)
            .collect()
    }

    pub fn find_player(&self, player_id: PlayerId) -> Option<SeatIndex> {
        self.players()
            .find(|(_, p)| p.player_id == player_id)
            .map(|(s, _)| s)
    }

    pub fn hand_in_progress(&self) -> bool {
        self.hand.phase != Phase::Waiting
    }

    /// Сумма всех фишек на столе: стеки + ставки раунда + банк.
    pub fn total_chips(&self) -> Chips {
        let seats: Chips = self.players().map(|(_, p)| p.stack + p.bet).sum();
        seats + self.hand.pot
    }
}
