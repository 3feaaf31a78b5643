//! История раздач в формате, близком к Open Hand History (OHH).
//!
//! Одна запись `HandRecord` на раздачу. В файле каждая запись – строка
//! `{"ohh": {...}}`, записи разделены пустой строкой. Места в записи
//! нумеруются с 1. Суммы bet/raise/call – "до" (итог ставки на улице),
//! посты блайндов и анте – фактически внесённые фишки.

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::{Phase, PlayerId, SeatIndex, Table};

pub const OHH_SPEC_VERSION: &str = "1.4.7";
pub const SITE_NAME: &str = "holdem-table";

/// Тип действия в записи раздачи.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionKind {
    #[serde(rename = "Dealt Cards")]
    DealtCards,
    #[serde(rename = "Post SB")]
    PostSmallBlind,
    #[serde(rename = "Post BB")]
    PostBigBlind,
    #[serde(rename = "Post Ante")]
    PostAnte,
    /// Живой BB после пропуска большого блайнда.
    #[serde(rename = "Post Extra Blind")]
    PostExtraBlind,
    Fold,
    Check,
    Bet,
    Raise,
    Call,
    #[serde(rename = "Shows Cards")]
    ShowsCards,
    #[serde(rename = "Mucks Cards")]
    MucksCards,
    /// Всё, что мы не понимаем, при чтении не ломает запись.
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionRecord {
    pub action_number: u32,
    pub player_id: PlayerId,
    pub action: ActionKind,
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub is_allin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<Card>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundRecord {
    pub id: u32,
    /// "Preflop", "Flop", "Turn", "River", "Showdown".
    pub street: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<Card>>,
    #[serde(default)]
    pub actions: Vec<ActionRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: PlayerId,
    /// Место с 1.
    pub seat: u8,
    pub name: String,
    pub starting_stack: u64,
    #[serde(default)]
    pub is_sitting_out: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerWinsRecord {
    pub player_id: PlayerId,
    pub win_amount: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotRecord {
    pub number: u32,
    pub amount: u64,
    /// Места победителей (с 1).
    #[serde(default)]
    pub winner_seats: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winning_hand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winning_cards: Option<Vec<Card>>,
    #[serde(default)]
    pub player_wins: Vec<PlayerWinsRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TournamentInfoRecord {
    pub buyin_amount: u64,
    pub initial_stack: u64,
    pub start_date_utc: u64,
    pub level: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandRecord {
    pub spec_version: String,
    pub site_name: String,
    /// "<table_id>-<номер раздачи>".
    pub game_number: String,
    /// Unix timestamp (секунды).
    pub start_date_utc: u64,
    pub table_name: String,
    pub table_size: u8,
    #[serde(default)]
    pub tournament: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament_info: Option<TournamentInfoRecord>,
    /// Кнопка (с 1).
    pub dealer_seat: u8,
    pub small_blind_amount: u64,
    pub big_blind_amount: u64,
    #[serde(default)]
    pub ante_amount: u64,
    pub players: Vec<PlayerRecord>,
    #[serde(default)]
    pub rounds: Vec<RoundRecord>,
    #[serde(default)]
    pub pots: Vec<PotRecord>,
}

impl HandRecord {
    /// Номер раздачи из `game_number`.
    pub fn hand_number(&self) -> Option<u64> {
        self.game_number.rsplit('-').next()?.parse().ok()
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.id == player_id)
    }
}

/// Обёртка строки лога: `{"ohh": {...}}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OhhLine {
    pub ohh: HandRecord,
}

pub fn street_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Waiting | Phase::Preflop => "Preflop",
        Phase::Flop => "Flop",
        Phase::Turn => "Turn",
        Phase::River => "River",
        Phase::Showdown => "Showdown",
    }
}

/// Шапка записи и стартовые стеки мест, получивших карты.
///
/// Вызывается до постинга блайндов и анте.
pub fn new_record(table: &Table, start_ts: u64) -> HandRecord {
    let stakes = table.config.stakes;
    let players = table
        .players()
        .filter(|(_, p)| p.in_hand)
        .map(|(seat, p)| PlayerRecord {
            id: p.player_id,
            seat: seat + 1,
            name: p.name.clone(),
            starting_stack: p.stack.0,
            is_sitting_out: false,
        })
        .collect();

    let tournament_info = table.tournament.as_ref().map(|t| TournamentInfoRecord {
        buyin_amount: t.buy_in.0,
        initial_stack: t.initial_stack.0,
        start_date_utc: t.started_at_ts,
        level: t.level,
    });

    HandRecord {
        spec_version: OHH_SPEC_VERSION.to_string(),
        site_name: SITE_NAME.to_string(),
        game_number: format!("{}-{}", table.id, table.hand_counter),
        start_date_utc: start_ts,
        table_name: table.name.clone(),
        table_size: table.seat_count(),
        tournament: table.is_tournament(),
        tournament_info,
        dealer_seat: table.button.map_or(0, |b| b + 1),
        small_blind_amount: stakes.small_blind.0,
        big_blind_amount: stakes.big_blind.0,
        ante_amount: stakes.ante.0,
        players,
        rounds: vec![RoundRecord {
            id: 0,
            street: street_name(Phase::Preflop).to_string(),
            cards: None,
            actions: Vec::new(),
        }],
        pots: Vec::new(),
    }
}

/// Построитель записей раздач. Принадлежит столу.
///
/// Готовые записи копятся в `completed`, пока рантайм их не заберёт.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandRecorder {
    current: Option<HandRecord>,
    completed: Vec<HandRecord>,
}

impl HandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&HandRecord> {
        self.current.as_ref()
    }

    /// Начать запись новой раздачи.
    pub fn begin_hand(&mut self, record: HandRecord) {
        self.current = Some(record);
    }

    /// Открыть новый раунд (улицу) с картами борда этой улицы.
    pub fn start_round(&mut self, phase: Phase, cards: Vec<Card>) {
        if let Some(record) = self.current.as_mut() {
            let id = record.rounds.len() as u32;
            record.rounds.push(RoundRecord {
                id,
                street: street_name(phase).to_string(),
                cards: if cards.is_empty() { None } else { Some(cards) },
                actions: Vec::new(),
            });
        }
    }

    /// Добавить действие в текущий раунд.
    pub fn record_action(
        &mut self,
        player_id: PlayerId,
        action: ActionKind,
        amount: u64,
        is_allin: bool,
        cards: Option<Vec<Card>>,
    ) {
        let Some(round) = self.current.as_mut().and_then(|r| r.rounds.last_mut()) else {
            return;
        };
        let action_number = round.actions.len() as u32 + 1;
        round.actions.push(ActionRecord {
            action_number,
            player_id,
            action,
            amount,
            is_allin,
            cards,
        });
    }

    pub fn record_pot(
        &mut self,
        amount: u64,
        winners: &[(SeatIndex, PlayerId, u64)],
        winning_hand: Option<String>,
        winning_cards: Option<Vec<Card>>,
    ) {
        if let Some(record) = self.current.as_mut() {
            let number = record.pots.len() as u32;
            record.pots.push(PotRecord {
                number,
                amount,
                winner_seats: winners.iter().map(|(seat, _, _)| seat + 1).collect(),
                winning_hand,
                winning_cards,
                player_wins: winners
                    .iter()
                    .map(|&(_, player_id, win_amount)| PlayerWinsRecord {
                        player_id,
                        win_amount,
                    })
                    .collect(),
            });
        }
    }

    /// Закрыть текущую запись и положить её в очередь готовых.
    pub fn finish_hand(&mut self) -> Option<&HandRecord> {
        let record = self.current.take()?;
        self.completed.push(record);
        self.completed.last()
    }

    /// Забрать все готовые записи (для записи на диск).
    pub fn drain_completed(&mut self) -> Vec<HandRecord> {
        std::mem::take(&mut self.completed)
    }
}
