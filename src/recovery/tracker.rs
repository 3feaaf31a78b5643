//! Свёртка лога раздач в итоговые стеки, бай-ины и число раздач.

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::domain::{Chips, PlayerId, SeatIndex};
use crate::engine::hand_history::{ActionKind, HandRecord};

/// Накопленное по одному игроку.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerTotals {
    pub name: String,
    /// Последнее место игрока (с 0).
    pub seat: SeatIndex,
    pub ending_stack: Chips,
    pub total_buy_in: Chips,
    pub hands_played: u32,
}

/// Сколько каждый игрок внёс в раздачу.
///
/// Блайнды и анте – фактические суммы. Bet/raise/call записаны "до",
/// поэтому учитывается только прирост над уже поставленным на этой улице.
/// Живые блайнды входят в ставку улицы, анте – нет.
pub fn hand_contributions(record: &HandRecord) -> HashMap<PlayerId, Chips> {
    let mut total: HashMap<PlayerId, Chips> = HashMap::new();

    for round in &record.rounds {
        let mut street: HashMap<PlayerId, Chips> = HashMap::new();

        for action in &round.actions {
            let amount = Chips(action.amount);
            match action.action {
                ActionKind::PostSmallBlind | ActionKind::PostBigBlind | ActionKind::PostExtraBlind => {
                    *total.entry(action.player_id).or_default() += amount;
                    *street.entry(action.player_id).or_default() += amount;
                }
                ActionKind::PostAnte => {
                    *total.entry(action.player_id).or_default() += amount;
                }
                ActionKind::Bet | ActionKind::Raise | ActionKind::Call => {
                    let committed = street.entry(action.player_id).or_default();
                    if amount > *committed {
                        *total.entry(action.player_id).or_default() += amount - *committed;
                        *committed = amount;
                    }
                }
                _ => {}
            }
        }
    }

    total
}

/// Выигрыши игроков по всем банкам раздачи.
pub fn hand_winnings(record: &HandRecord) -> HashMap<PlayerId, Chips> {
    let mut won: HashMap<PlayerId, Chips> = HashMap::new();
    for pot in &record.pots {
        for win in &pot.player_wins {
            *won.entry(win.player_id).or_default() += Chips(win.win_amount);
        }
    }
    won
}

/// Состояние, собранное проходом по всему логу стола.
#[derive(Clone, Debug, Default)]
pub struct RecoveryTracker {
    players: BTreeMap<PlayerId, PlayerTotals>,
    seats: BTreeMap<SeatIndex, PlayerId>,
    /// Порядок вылета (стек дошёл до нуля), первый – худшее место.
    busted: Vec<(PlayerId, String)>,
    hands: usize,
}

impl RecoveryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hands_applied(&self) -> usize {
        self.hands
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&PlayerTotals> {
        self.players.get(&player_id)
    }

    /// Игроки без фишек в порядке вылета.
    pub fn busted(&self) -> &[(PlayerId, String)] {
        &self.busted
    }

    /// Текущие занятые места: (место, игрок).
    pub fn seats(&self) -> impl Iterator<Item = (SeatIndex, &PlayerTotals, PlayerId)> + '_ {
        self.seats
            .iter()
            .filter_map(|(seat, id)| self.players.get(id).map(|t| (*seat, t, *id)))
    }

    /// Учесть одну раздачу.
    pub fn apply_hand(&mut self, record: &HandRecord) {
        let contributions = hand_contributions(record);
        let winnings = hand_winnings(record);
        // (стартовый стек, место, игрок, имя) вылетевших в этой раздаче.
        let mut busted_now: Vec<(Chips, SeatIndex, PlayerId, String)> = Vec::new();

        for player in &record.players {
            let seat = match player.seat.checked_sub(1) {
                Some(seat) if player.seat <= record.table_size => seat,
                _ => {
                    warn!(
                        game = %record.game_number,
                        player_id = player.id,
                        seat = player.seat,
                        "место вне стола, игрок пропущен"
                    );
                    continue;
                }
            };

            let starting = Chips(player.starting_stack);
            let paid = contributions.get(&player.id).copied().unwrap_or_default();
            let won = winnings.get(&player.id).copied().unwrap_or_default();
            let ending = starting.saturating_sub(paid) + won;

            if ending.is_zero() {
                if !starting.is_zero() {
                    busted_now.push((starting, seat, player.id, player.name.clone()));
                }
            } else {
                self.busted.retain(|(id, _)| *id != player.id);
            }

            let previous_seat = match self.players.get_mut(&player.id) {
                Some(totals) => {
                    // Докупка между раздачами: стек вырос без выигрыша.
                    if starting > totals.ending_stack {
                        totals.total_buy_in += starting - totals.ending_stack;
                    }
                    let previous = totals.seat;
                    totals.name = player.name.clone();
                    totals.seat = seat;
                    totals.ending_stack = ending;
                    totals.hands_played += 1;
                    Some(previous)
                }
                None => {
                    self.players.insert(
                        player.id,
                        PlayerTotals {
                            name: player.name.clone(),
                            seat,
                            ending_stack: ending,
                            total_buy_in: starting,
                            hands_played: 1,
                        },
                    );
                    None
                }
            };

            // Игрок пересел – освобождаем старое место, если оно всё ещё за ним.
            if let Some(previous) = previous_seat.filter(|&s| s != seat) {
                if self.seats.get(&previous) == Some(&player.id) {
                    self.seats.remove(&previous);
                }
            }
            self.seats.insert(seat, player.id);
        }

        // Вылетевшие в одной раздаче: меньший стартовый стек – место ниже.
        busted_now.sort_by_key(|(starting, seat, _, _)| (*starting, *seat));
        for (_, _, player_id, name) in busted_now {
            if !self.busted.iter().any(|(id, _)| *id == player_id) {
                self.busted.push((player_id, name));
            }
        }

        self.hands += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::hand_history::{ActionRecord, PlayerRecord, PlayerWinsRecord, PotRecord, RoundRecord};

    fn act(n: u32, player_id: PlayerId, action: ActionKind, amount: u64) -> ActionRecord {
        ActionRecord {
            action_number: n,
            player_id,
            action,
            amount,
            is_allin: false,
            cards: None,
        }
    }

    fn record(rounds: Vec<RoundRecord>) -> HandRecord {
        HandRecord {
            spec_version: "1.4.7".into(),
            site_name: "test".into(),
            game_number: "1-1".into(),
            start_date_utc: 0,
            table_name: "t".into(),
            table_size: 2,
            tournament: false,
            tournament_info: None,
            dealer_seat: 1,
            small_blind_amount: 5,
            big_blind_amount: 10,
            ante_amount: 1,
            players: vec![
                PlayerRecord { id: 1, seat: 1, name: "a".into(), starting_stack: 100, is_sitting_out: false },
                PlayerRecord { id: 2, seat: 2, name: "b".into(), starting_stack: 100, is_sitting_out: false },
            ],
            rounds,
            pots: Vec::new(),
        }
    }

    #[test]
    fn raise_amounts_count_only_increase_over_street_commitment() {
        let rec = record(vec![
            RoundRecord {
                id: 0,
                street: "Preflop".into(),
                cards: None,
                actions: vec![
                    act(1, 1, ActionKind::PostAnte, 1),
                    act(2, 2, ActionKind::PostAnte, 1),
                    act(3, 1, ActionKind::PostSmallBlind, 5),
                    act(4, 2, ActionKind::PostBigBlind, 10),
                    act(5, 1, ActionKind::Raise, 30),
                    act(6, 2, ActionKind::Call, 30),
                ],
            },
            RoundRecord {
                id: 1,
                street: "Flop".into(),
                cards: None,
                actions: vec![act(7, 2, ActionKind::Bet, 20), act(8, 1, ActionKind::Call, 20)],
            },
        ]);

        let paid = hand_contributions(&rec);
        // анте 1 + 30 на префлопе + 20 на флопе
        assert_eq!(paid.get(&1), Some(&Chips(51)));
        assert_eq!(paid.get(&2), Some(&Chips(51)));
    }

    #[test]
    fn busts_in_one_hand_are_ordered_by_starting_stack() {
        let mut rec = record(vec![RoundRecord {
            id: 0,
            street: "Preflop".into(),
            cards: None,
            actions: vec![
                act(1, 1, ActionKind::PostSmallBlind, 5),
                act(2, 2, ActionKind::PostBigBlind, 10),
                act(3, 3, ActionKind::Raise, 200),
                act(4, 1, ActionKind::Call, 80),
                act(5, 2, ActionKind::Call, 60),
            ],
        }]);
        rec.table_size = 6;
        rec.players = vec![
            PlayerRecord { id: 1, seat: 1, name: "a".into(), starting_stack: 80, is_sitting_out: false },
            PlayerRecord { id: 2, seat: 2, name: "b".into(), starting_stack: 60, is_sitting_out: false },
            PlayerRecord { id: 3, seat: 3, name: "c".into(), starting_stack: 500, is_sitting_out: false },
        ];
        rec.pots = vec![PotRecord {
            number: 0,
            amount: 340,
            winner_seats: vec![3],
            winning_hand: None,
            winning_cards: None,
            player_wins: vec![PlayerWinsRecord { player_id: 3, win_amount: 340 }],
        }];

        let mut tracker = RecoveryTracker::new();
        tracker.apply_hand(&rec);

        let order: Vec<PlayerId> = tracker.busted().iter().map(|(id, _)| *id).collect();
        // у b стек меньше – он вылетает первым (место ниже)
        assert_eq!(order, vec![2, 1]);
        assert_eq!(tracker.player(3).map(|t| t.ending_stack), Some(Chips(640)));
    }
}
