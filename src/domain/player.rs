use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::PlayerId;
use crate::time_ctrl::TurnTimers;

/// Последнее действие игрока – только для отображения после раздачи/хода.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LastAction {
    PostSmallBlind(Chips),
    PostBigBlind(Chips),
    PostAnte(Chips),
    Fold,
    Check,
    Call(Chips),
    Bet(Chips),
    Raise(Chips),
    AllIn(Chips),
}

/// Место за столом: либо пустое, либо занятое игроком.
///
/// Каждый доступ к игроку идёт через `match`/`player()`, никаких
/// "полупустых" мест с null-полями.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Seat {
    #[default]
    Empty,
    Occupied(SeatedPlayer),
}

impl Seat {
    pub fn is_empty(&self) -> bool {
        matches!(self, Seat::Empty)
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Seat::Occupied(_))
    }

    pub fn player(&self) -> Option<&SeatedPlayer> {
        match self {
            Seat::Occupied(p) => Some(p),
            Seat::Empty => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut SeatedPlayer> {
        match self {
            Seat::Occupied(p) => Some(p),
            Seat::Empty => None,
        }
    }
}

/// Игрок, сидящий за столом.
///
/// `stack` – фишки, не поставленные в текущем раунде;
/// `bet` – ставка текущего раунда;
/// `total_invested` – всё, что игрок внёс в этой раздаче (для сайд-потов).
/// `total_buy_in` и `hands_played` живут всю сессию и не сбрасываются между раздачами.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatedPlayer {
    pub player_id: PlayerId,
    pub name: String,

    pub stack: Chips,
    pub bet: Chips,
    pub total_invested: Chips,

    pub total_buy_in: Chips,
    pub hands_played: u32,

    pub hole_cards: Vec<Card>,

    /// Игрок получил карты в текущей раздаче.
    pub in_hand: bool,
    pub folded: bool,
    pub all_in: bool,
    pub sitting_out: bool,
    pub missed_big_blind: bool,
    pub disconnected: bool,
    /// Игрок уже действовал в текущем раунде ставок (блайнды не считаются).
    pub acted: bool,

    /// Тиковые счётчики: дисконнект и "call clock".
    pub timers: TurnTimers,

    pub last_action: Option<LastAction>,
    /// Итог раздачи: выигрыш минус вложенное (со знаком).
    pub hand_result: Option<i64>,
    pub winning_cards: Vec<Card>,
    pub shown_cards: bool,
}

impl SeatedPlayer {
    pub fn new(player_id: PlayerId, name: impl Into<String>, buy_in: Chips) -> Self {
        Self {
            player_id,
            name: name.into(),
            stack: buy_in,
            bet: Chips::ZERO,
            total_invested: Chips::ZERO,
            total_buy_in: buy_in,
            hands_played: 0,
            hole_cards: Vec::new(),
            in_hand: false,
            folded: false,
            all_in: false,
            sitting_out: false,
            missed_big_blind: false,
            disconnected: false,
            acted: false,
            timers: TurnTimers::default(),
            last_action: None,
            hand_result: None,
            winning_cards: Vec::new(),
            shown_cards: false,
        }
    }

    /// Сброс всех полей "на раздачу". Стек, бай-ины и счётчик раздач не трогаем.
    pub fn reset_for_hand(&mut self) {
        self.bet = Chips::ZERO;
        self.total_invested = Chips::ZERO;
        self.hole_cards.clear();
        self.in_hand = false;
        self.folded = false;
        self.all_in = false;
        self.acted = false;
        self.timers.clear();
        self.last_action = None;
        self.hand_result = None;
        self.winning_cards.clear();
        self.shown_cards = false;
    }

    /// Может ли игрок получить карты в следующей раздаче.
    pub fn is_eligible_for_hand(&self) -> bool {
        !self.sitting_out && !self.stack.is_zero()
    }

    /// Ещё претендует на банк (получил карты и не сфолдил).
    pub fn is_contesting(&self) -> bool {
        self.in_hand && !self.folded
    }

    /// Может добровольно действовать (в раздаче, не сфолдил, не в all-in).
    pub fn can_act(&self) -> bool {
        self.in_hand && !self.folded && !self.all_in
    }

    /// Перенести до `amount` фишек из стека в ставку раунда.
    /// Если стека не хватает – ставится всё (all-in). Возвращает реально поставленное.
    pub fn commit(&mut self, amount: Chips) -> Chips {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.bet += paid;
        self.total_invested += paid;
        if self.stack.is_zero() && self.in_hand {
            self.all_in = true;
        }
        paid
    }

    /// "Мёртвые" фишки (анте): идут сразу в банк, мимо ставки раунда.
    pub fn commit_dead(&mut self, amount: Chips) -> Chips {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.total_invested += paid;
        if self.stack.is_zero() && self.in_hand {
            self.all_in = true;
        }
        paid
    }
}
