//! Сборка живого стола из свёртки лога.

use tracing::{info, warn};

use crate::domain::{
    BlindStructure, Chips, Seat, SeatedPlayer, Table, TableConfig, TableId, TableSize,
    TableStakes, TournamentRules, TournamentState,
};
use crate::engine::hand_history::HandRecord;
use crate::engine::positions::{next_occupied_seat, next_seat_where};
use crate::recovery::tracker::RecoveryTracker;
use crate::tournament::TournamentSummary;

/// Построить стол по записям раздач (в порядке лога) и необязательной сводке.
///
/// Ставки не переигрываются: берутся итоговые стеки из трекера, а размер
/// стола, блайнды и кнопка – из последней записи. Все места помечаются
/// отключёнными; место в sit out, если фишек нет или игрок пропустил
/// последнюю раздачу.
pub fn rebuild_table(
    table_id: TableId,
    records: &[HandRecord],
    summary: Option<&TournamentSummary>,
    blinds: &BlindStructure,
    rules: TournamentRules,
) -> Option<Table> {
    let last = records.last()?;

    let size = match TableSize::try_from(last.table_size) {
        Ok(size) => size,
        Err(err) => {
            warn!(table_id, error = %err, "последняя запись лога с неверным размером стола");
            return None;
        }
    };

    let mut tracker = RecoveryTracker::new();
    for record in records {
        tracker.apply_hand(record);
    }

    let stakes = TableStakes::new(
        Chips(last.small_blind_amount),
        Chips(last.big_blind_amount),
        Chips(last.ante_amount),
    );

    let mut table = if last.tournament {
        let tournament = rebuild_tournament(records, last, summary, blinds, rules);
        Table::new_tournament(table_id, last.table_name.clone(), size, tournament, stakes)
    } else {
        Table::new(table_id, last.table_name.clone(), TableConfig::cash(size, stakes))
    };

    for (seat, totals, player_id) in tracker.seats() {
        let Some(slot) = table.seats.get_mut(seat as usize) else {
            continue;
        };
        let mut player = SeatedPlayer::new(player_id, totals.name.clone(), totals.ending_stack);
        player.total_buy_in = totals.total_buy_in;
        player.hands_played = totals.hands_played;
        player.disconnected = true;
        player.sitting_out = totals.ending_stack.is_zero() || last.player(player_id).is_none();
        *slot = Seat::Occupied(player);
    }

    // Вылетевшие до рестарта снова попадут в итоговые места.
    if let Some(recorder) = table.summary.as_mut() {
        for (player_id, name) in tracker.busted() {
            recorder.record_elimination(*player_id, name.clone());
        }
    }

    if let Some(dealer) = last.dealer_seat.checked_sub(1) {
        table.button = next_seat_where(&table, dealer, false, |p| !p.sitting_out)
            .or_else(|| next_occupied_seat(&table, dealer, false));
    }

    table.hand_counter = last
        .hand_number()
        .unwrap_or(tracker.hands_applied() as u64);

    let winner = summary
        .and_then(TournamentSummary::winner)
        .and_then(|id| table.find_player(id));
    if let (Some(seat), Some(tournament)) = (winner, table.tournament.as_mut()) {
        tournament.record_winner(seat);
    }

    info!(
        table_id,
        hands = tracker.hands_applied(),
        seated = table.seated_count(),
        button = ?table.button,
        "стол восстановлен из лога"
    );

    Some(table)
}

/// Турнирные метаданные: сводка, затем tournament_info записи, затем уровень
/// по блайндам, затем уровень 1.
fn rebuild_tournament(
    records: &[HandRecord],
    last: &HandRecord,
    summary: Option<&TournamentSummary>,
    blinds: &BlindStructure,
    rules: TournamentRules,
) -> TournamentState {
    let info = last
        .tournament_info
        .as_ref()
        .or_else(|| records.iter().find_map(|r| r.tournament_info.as_ref()));

    let buy_in = summary
        .map(|s| s.buy_in)
        .or_else(|| info.map(|i| i.buyin_amount))
        .unwrap_or(0);
    let initial_stack = summary
        .map(|s| s.initial_stack)
        .or_else(|| info.map(|i| i.initial_stack))
        .unwrap_or(0);
    let started_at = summary
        .map(|s| s.start_date_utc)
        .or_else(|| info.map(|i| i.start_date_utc))
        .or_else(|| records.first().map(|r| r.start_date_utc))
        .unwrap_or(0);

    let level = summary
        .map(|s| s.level)
        .or_else(|| info.map(|i| i.level))
        .or_else(|| {
            blinds.level_for_blinds(
                Chips(last.small_blind_amount),
                Chips(last.big_blind_amount),
                Chips(last.ante_amount),
            )
        })
        .unwrap_or(1);

    let mut state = TournamentState::new(
        blinds.clone(),
        rules,
        Chips(initial_stack),
        Chips(buy_in),
        started_at,
    );
    state.level = level;
    state
}
