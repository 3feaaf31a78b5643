use crate::api::dto::{PlayerView, SeatView, TableSnapshot, TournamentView};
use crate::domain::{Chips, PlayerId, SeatIndex, SeatedPlayer, Table, TournamentState};
use crate::engine::betting::min_raise;

/// Снапшот стола для зрителя `viewer`.
///
/// Чужие карманные карты скрыты, пока игрок их не открыл на шоудауне.
/// `viewer = None` – наблюдатель, видит только открытые карты.
pub fn build_snapshot(table: &Table, viewer: Option<PlayerId>) -> TableSnapshot {
    let seats = table
        .seats
        .iter()
        .enumerate()
        .map(|(idx, seat)| {
            let seat_index = idx as SeatIndex;
            SeatView {
                seat: seat_index,
                player: seat
                    .player()
                    .map(|p| player_view(table, seat_index, p, viewer)),
            }
        })
        .collect();

    let stakes = table.config.stakes;
    let bets: Chips = table.players().map(|(_, p)| p.bet).sum();

    TableSnapshot {
        table_id: table.id,
        name: table.name.clone(),
        table_type: table.config.table_type,
        max_seats: table.seat_count(),
        small_blind: stakes.small_blind,
        big_blind: stakes.big_blind,
        ante: stakes.ante,
        hand_number: table.hand_counter,
        phase: table.hand.phase,
        button: table.button,
        acting_seat: table.hand.acting_seat,
        board: table.board.clone(),
        pot: table.hand.pot,
        total_pot: table.hand.pot + bets,
        current_bet: table.hand.current_bet,
        min_raise_to: min_raise(table),
        runout_in_progress: table.runout.is_some(),
        countdown: table.countdown,
        seats,
        tournament: table.tournament.as_ref().map(tournament_view),
    }
}

fn player_view(table: &Table, seat: SeatIndex, p: &SeatedPlayer, viewer: Option<PlayerId>) -> PlayerView {
    let visible = viewer == Some(p.player_id) || p.shown_cards;
    let hole_cards = (visible && !p.hole_cards.is_empty()).then(|| p.hole_cards.clone());

    PlayerView {
        player_id: p.player_id,
        name: p.name.clone(),
        stack: p.stack,
        bet: p.bet,
        total_buy_in: p.total_buy_in,
        hands_played: p.hands_played,
        hole_cards,
        card_count: p.hole_cards.len() as u8,
        in_hand: p.in_hand,
        folded: p.folded,
        all_in: p.all_in,
        sitting_out: p.sitting_out,
        disconnected: p.disconnected,
        missed_big_blind: p.missed_big_blind,
        is_acting: table.hand.acting_seat == Some(seat),
        clock_ticks_left: p
            .timers
            .clock_ticks
            .map(|elapsed| table.config.timing.time_rules.call_clock_ticks.saturating_sub(elapsed)),
        last_action: p.last_action,
        hand_result: p.hand_result,
        winning_cards: p.winning_cards.clone(),
    }
}

fn tournament_view(t: &TournamentState) -> TournamentView {
    let next = t.blinds.next_level(t.level);
    TournamentView {
        level: t.level,
        level_ticks: t.level_ticks,
        level_duration_ticks: t.rules.level_duration_ticks,
        on_break: t.on_break,
        break_ticks: t.break_ticks,
        next_small_blind: next.map(|l| l.small_blind),
        next_big_blind: next.map(|l| l.big_blind),
        winner: t.winner,
        finished: t.is_finished(),
    }
}
