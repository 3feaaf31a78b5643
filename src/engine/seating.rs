//! Посадка, уход, докупка, sit out / sit in, дисконнект.

use tracing::info;

use crate::domain::{Chips, PlayerId, Seat, SeatIndex, SeatedPlayer, Table};
use crate::engine::actions::TableAction;
use crate::engine::errors::EngineError;
use crate::engine::game_loop::{apply_action, schedule_next_hand, HandStatus};
use crate::engine::positions::prev_occupied_seat;
use crate::engine::scheduler::call_clock;

fn seat_ref(table: &Table, seat: SeatIndex) -> Result<&Seat, EngineError> {
    table.seats.get(seat as usize).ok_or(EngineError::InvalidSeat(seat))
}

fn occupied_mut(table: &mut Table, seat: SeatIndex) -> Result<&mut SeatedPlayer, EngineError> {
    table
        .seats
        .get_mut(seat as usize)
        .ok_or(EngineError::InvalidSeat(seat))?
        .player_mut()
        .ok_or(EngineError::EmptySeat(seat))
}

/// Место в живой раздаче (получило карты и раздача идёт).
fn is_in_live_hand(table: &Table, seat: SeatIndex) -> bool {
    table.hand_in_progress() && table.player(seat).map_or(false, |p| p.in_hand)
}

/// Посадить игрока. Бай-ин сразу учитывается в `total_buy_in`.
pub fn sit_down(
    table: &mut Table,
    seat: SeatIndex,
    player_id: PlayerId,
    name: impl Into<String>,
    buy_in: Chips,
) -> Result<(), EngineError> {
    if seat_ref(table, seat)?.is_occupied() {
        return Err(EngineError::SeatOccupied(seat));
    }
    if table.find_player(player_id).is_some() {
        return Err(EngineError::PlayerAlreadySeated(player_id));
    }
    if buy_in.is_zero() {
        return Err(EngineError::ZeroAmount);
    }

    table.seats[seat as usize] = Seat::Occupied(SeatedPlayer::new(player_id, name, buy_in));
    info!(table_id = table.id, seat, player_id, %buy_in, "игрок сел за стол");

    schedule_next_hand(table);
    Ok(())
}

/// Встать из-за стола. Нельзя, пока место играет в текущей раздаче.
///
/// В идущем турнире уходят только вылетевшие: фишки не покидают турнир
/// мимо итоговых мест.
pub fn stand_up(table: &mut Table, seat: SeatIndex) -> Result<SeatedPlayer, EngineError> {
    if seat_ref(table, seat)?.is_empty() {
        return Err(EngineError::EmptySeat(seat));
    }
    if is_in_live_hand(table, seat) {
        return Err(EngineError::PlayerInHand { seat });
    }
    let running = table.tournament.as_ref().map_or(false, |t| !t.is_finished());
    if running && table.player(seat).map_or(false, |p| !p.stack.is_zero()) {
        return Err(EngineError::TournamentSeatLocked(seat));
    }

    let removed = std::mem::take(&mut table.seats[seat as usize]);

    // Кнопка всегда на занятом месте: сдвигаем назад, чтобы
    // следующая раздача передала её дальше по кругу как обычно.
    if table.button == Some(seat) {
        table.button = prev_occupied_seat(table, seat);
    }

    match removed {
        Seat::Occupied(player) => {
            info!(table_id = table.id, seat, player_id = player.player_id, "игрок встал из-за стола");
            Ok(player)
        }
        Seat::Empty => Err(EngineError::EmptySeat(seat)),
    }
}

/// Докупка между раздачами (только кэш).
pub fn add_chips(table: &mut Table, seat: SeatIndex, amount: Chips) -> Result<(), EngineError> {
    if table.is_tournament() {
        return Err(EngineError::RebuyNotAllowed);
    }
    if amount.is_zero() {
        return Err(EngineError::ZeroAmount);
    }
    if is_in_live_hand(table, seat) {
        return Err(EngineError::PlayerInHand { seat });
    }

    let p = occupied_mut(table, seat)?;
    p.stack += amount;
    p.total_buy_in += amount;

    schedule_next_hand(table);
    Ok(())
}

/// Уйти в sit out. В текущей раздаче место доигрывает как обычно.
/// На кэш-столе место помечается пропустившим большой блайнд.
pub fn sit_out(table: &mut Table, seat: SeatIndex) -> Result<(), EngineError> {
    let is_cash = !table.is_tournament();
    let p = occupied_mut(table, seat)?;
    p.sitting_out = true;
    if is_cash {
        p.missed_big_blind = true;
    }
    Ok(())
}

pub fn sit_in(table: &mut Table, seat: SeatIndex) -> Result<(), EngineError> {
    let p = occupied_mut(table, seat)?;
    if p.stack.is_zero() {
        return Err(EngineError::NoChips(seat));
    }
    p.sitting_out = false;

    schedule_next_hand(table);
    Ok(())
}

/// Отметить дисконнект/реконнект. Реконнект сбрасывает счётчик дисконнекта.
pub fn set_disconnected(table: &mut Table, seat: SeatIndex, disconnected: bool) -> Result<(), EngineError> {
    let p = occupied_mut(table, seat)?;
    p.disconnected = disconnected;
    if !disconnected {
        p.timers.disconnected_ticks = 0;
    }
    info!(table_id = table.id, seat, disconnected, "статус соединения");

    if !disconnected {
        schedule_next_hand(table);
    }
    Ok(())
}

/// Единая точка диспетчеризации действий места.
pub fn apply_table_action(
    table: &mut Table,
    seat: SeatIndex,
    action: TableAction,
) -> Result<HandStatus, EngineError> {
    match action {
        TableAction::Play(kind) => apply_action(table, seat, kind),
        TableAction::SitOut => sit_out(table, seat).map(|_| HandStatus::Ongoing),
        TableAction::SitIn => sit_in(table, seat).map(|_| HandStatus::Ongoing),
        TableAction::CallClock => call_clock(table, seat).map(|_| HandStatus::Ongoing),
    }
}
