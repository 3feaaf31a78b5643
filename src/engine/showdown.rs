//! Распределение банков: шоудаун и победа без вскрытия.

use std::collections::BTreeMap;

use tracing::info;

use crate::domain::{Card, Chips, Phase, SeatIndex, Table};
use crate::engine::hand_history::ActionKind;
use crate::engine::side_pots::{calculate_pots, Pot};
use crate::eval::{best_of_seven, EvaluatedHand};

/// Рука места на шоудауне.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShowdownHand {
    pub seat: SeatIndex,
    pub hand: EvaluatedHand,
    pub cards: [Card; 5],
}

/// Победители одного банка: среди претендентов банка – все,
/// чья рука равна лучшей (полное равенство, а не только категория).
/// Результат отсортирован по номеру места.
pub fn determine_winners_for_pot(pot: &Pot, hands: &[ShowdownHand]) -> Vec<SeatIndex> {
    let candidates: Vec<&ShowdownHand> = hands
        .iter()
        .filter(|h| pot.eligible_seats.contains(&h.seat))
        .collect();

    if let [only] = candidates.as_slice() {
        return vec![only.seat];
    }

    let Some(best) = candidates.iter().map(|h| h.hand).max() else {
        return Vec::new();
    };

    let mut winners: Vec<SeatIndex> = candidates
        .iter()
        .filter(|h| h.hand == best)
        .map(|h| h.seat)
        .collect();
    winners.sort_unstable();
    winners
}

/// Поделить банк поровну. Остаток от деления целиком получает
/// первый победитель по порядку мест.
pub fn award_pot(amount: Chips, winners: &[SeatIndex]) -> Vec<(SeatIndex, Chips)> {
    if winners.is_empty() {
        return Vec::new();
    }

    let mut ordered = winners.to_vec();
    ordered.sort_unstable();

    let count = ordered.len() as u64;
    let share = amount.0 / count;
    let remainder = amount.0 % count;

    ordered
        .iter()
        .enumerate()
        .map(|(i, &seat)| {
            let extra = if i == 0 { remainder } else { 0 };
            (seat, Chips(share + extra))
        })
        .collect()
}

/// Собрать ставки раунда в банк.
pub fn collect_bets(table: &mut Table) {
    let mut collected = Chips::ZERO;
    for (_, p) in table.players_mut() {
        collected += p.bet;
        p.bet = Chips::ZERO;
    }
    table.hand.pot += collected;
}

/// Итог раздачи каждого места: выигрыш минус вложенное.
fn set_hand_results(table: &mut Table, winnings: &BTreeMap<SeatIndex, Chips>) {
    for (seat, p) in table.players_mut() {
        if !p.in_hand {
            continue;
        }
        let won = winnings.get(&seat).copied().unwrap_or(Chips::ZERO);
        p.hand_result = Some(won.signed_diff(p.total_invested));
    }
}

/// Победа без вскрытия: все остальные сфолдили.
/// Оценщик не вызывается; банк плюс несобранные ставки уходят единственному месту.
pub fn award_fold_win(table: &mut Table, winner: SeatIndex) {
    collect_bets(table);
    let amount = table.hand.pot;
    table.hand.pot = Chips::ZERO;

    let Some(player) = table.player_mut(winner) else {
        return;
    };
    player.stack += amount;
    let player_id = player.player_id;

    info!(table_id = table.id, hand = table.hand_counter, seat = winner, %amount, "банк без вскрытия");

    table
        .recorder
        .record_pot(amount.0, &[(winner, player_id, amount.0)], None, None);

    let winnings = BTreeMap::from([(winner, amount)]);
    set_hand_results(table, &winnings);
}

/// Шоудаун: оценить руки претендентов, разложить банки, выплатить.
pub fn run_showdown(table: &mut Table) {
    collect_bets(table);
    table.hand.phase = Phase::Showdown;
    table.hand.acting_seat = None;

    let board = table.board.clone();
    let hands: Vec<ShowdownHand> = table
        .players()
        .filter(|(_, p)| p.is_contesting())
        .filter_map(|(seat, p)| {
            best_of_seven(&p.hole_cards, &board).map(|(hand, cards)| ShowdownHand { seat, hand, cards })
        })
        .collect();

    table.recorder.start_round(Phase::Showdown, Vec::new());
    for h in &hands {
        if let Some(p) = table.player_mut(h.seat) {
            p.shown_cards = true;
            let (player_id, hole) = (p.player_id, p.hole_cards.clone());
            table
                .recorder
                .record_action(player_id, ActionKind::ShowsCards, 0, false, Some(hole));
        }
    }

    let pots = calculate_pots(&table.seats);
    let mut winnings: BTreeMap<SeatIndex, Chips> = BTreeMap::new();

    for pot in &pots {
        let winners = determine_winners_for_pot(pot, &hands);
        let shares = award_pot(pot.amount, &winners);

        let best = winners
            .first()
            .and_then(|w| hands.iter().find(|h| h.seat == *w))
            .copied();

        // Банк с одним претендентом (невостребованные фишки) описываем без руки.
        let contested = pot.eligible_seats.len() > 1;

        let mut pot_winners = Vec::with_capacity(shares.len());
        for &(seat, amount) in &shares {
            let Some(p) = table.player_mut(seat) else {
                continue;
            };
            p.stack += amount;
            if let Some(h) = hands.iter().find(|h| h.seat == seat).filter(|_| contested) {
                p.winning_cards = h.cards.to_vec();
            }
            pot_winners.push((seat, p.player_id, amount.0));
            *winnings.entry(seat).or_insert(Chips::ZERO) += amount;
        }

        info!(
            table_id = table.id,
            hand = table.hand_counter,
            pot = %pot.amount,
            winners = ?winners,
            "банк разыгран"
        );

        table.recorder.record_pot(
            pot.amount.0,
            &pot_winners,
            best.filter(|_| contested).map(|h| h.hand.describe()),
            best.filter(|_| contested).map(|h| h.cards.to_vec()),
        );
    }

    table.hand.pot = Chips::ZERO;
    set_hand_results(table, &winnings);
}
