//! Тик стола: турнирные часы, runout, отсчёт до раздачи, таймеры хода.
//!
//! Тик нужен только пока есть что считать (`Table::needs_tick`),
//! иначе хост должен остановить таймер.

use tracing::{debug, info};

use crate::domain::{SeatIndex, Table, TournamentTimeEvent};
use crate::engine::actions::PlayerActionKind;
use crate::engine::errors::EngineError;
use crate::engine::game_loop::{apply_action, start_hand, sync_tournament_stakes, HandStatus};
use crate::engine::runout::deal_runout_street;
use crate::engine::RandomSource;
use crate::time_ctrl::AutoActionDecision;

impl Table {
    /// Нужен ли столу периодический тик.
    pub fn needs_tick(&self) -> bool {
        if self.countdown.is_some() || self.runout.is_some() {
            return true;
        }
        if self.tournament.as_ref().map_or(false, |t| !t.is_finished()) {
            return true;
        }
        self.hand
            .acting_seat
            .and_then(|seat| self.player(seat))
            .map_or(false, |p| p.timers.is_running(p.disconnected))
    }
}

/// Один тик стола. Возвращает true, если состояние изменилось
/// и его стоит разослать клиентам.
pub fn on_tick<R: RandomSource>(table: &mut Table, rng: &mut R) -> bool {
    let mut changed = tick_tournament_clock(table);

    if let Some(runout) = table.runout.as_mut() {
        runout.ticks_left = runout.ticks_left.saturating_sub(1);
        if runout.ticks_left == 0 {
            deal_runout_street(table);
            changed = true;
        }
    } else if let Some(left) = table.countdown {
        let on_break = table.tournament.as_ref().map_or(false, |t| t.on_break);
        if !on_break {
            let left = left.saturating_sub(1);
            if left == 0 {
                table.countdown = None;
                match start_hand(table, rng) {
                    Ok(_) => {}
                    Err(err) => debug!(table_id = table.id, error = %err, "раздача не стартовала"),
                }
                changed = true;
            } else {
                table.countdown = Some(left);
            }
        }
    }

    changed |= tick_acting_seat(table);
    changed
}

fn tick_tournament_clock(table: &mut Table) -> bool {
    let Some(tournament) = table.tournament.as_mut() else {
        return false;
    };

    let changed = match tournament.tick() {
        TournamentTimeEvent::None | TournamentTimeEvent::Ended => false,
        TournamentTimeEvent::LevelAdvanced { from, to, new_blinds } => {
            info!(
                table_id = table.id,
                from,
                to,
                sb = %new_blinds.small_blind,
                bb = %new_blinds.big_blind,
                ante = %new_blinds.ante,
                "новый уровень блайндов"
            );
            true
        }
        TournamentTimeEvent::BreakStarted { level } => {
            info!(table_id = table.id, level, "перерыв");
            true
        }
        TournamentTimeEvent::BreakEnded { new_blinds } => {
            info!(table_id = table.id, level = ?new_blinds.map(|b| b.level), "перерыв окончен");
            true
        }
    };

    // Посреди раздачи блайнды не меняются – подхватятся на старте следующей.
    if changed && !table.hand_in_progress() {
        sync_tournament_stakes(table);
    }
    changed
}

fn tick_acting_seat(table: &mut Table) -> bool {
    if table.runout.is_some() || !table.hand.phase.is_betting() {
        return false;
    }
    let Some(seat) = table.hand.acting_seat else {
        return false;
    };

    let rules = table.config.timing.time_rules;
    let decision = match table.player_mut(seat) {
        Some(p) => {
            let disconnected = p.disconnected;
            p.timers.on_tick(disconnected, &rules)
        }
        None => AutoActionDecision::None,
    };

    match decision {
        AutoActionDecision::None => false,
        AutoActionDecision::TimeoutCheckOrFold => perform_auto_action(table, seat).is_ok(),
    }
}

/// Авто-ход места, не успевшего сходить (дисконнект или call clock):
/// check, если ставка уравнена, иначе fold. Отключившееся место уходит в sit out.
pub fn perform_auto_action(table: &mut Table, seat: SeatIndex) -> Result<HandStatus, EngineError> {
    if table.hand.acting_seat != Some(seat) {
        return Err(EngineError::NotYourTurn {
            seat,
            acting: table.hand.acting_seat,
        });
    }

    let current_bet = table.hand.current_bet;
    let is_cash = !table.is_tournament();
    let p = table.player_mut(seat).ok_or(EngineError::EmptySeat(seat))?;
    let kind = if p.bet >= current_bet {
        PlayerActionKind::Check
    } else {
        PlayerActionKind::Fold
    };
    if p.disconnected {
        p.sitting_out = true;
        p.missed_big_blind = is_cash;
    }

    info!(table_id = table.id, hand = table.hand_counter, seat, action = ?kind, "авто-действие по таймауту");
    apply_action(table, seat, kind)
}

/// Объявить call clock текущему ходящему месту.
pub fn call_clock(table: &mut Table, requested_by: SeatIndex) -> Result<(), EngineError> {
    let requester = table
        .seats
        .get(requested_by as usize)
        .ok_or(EngineError::InvalidSeat(requested_by))?;
    if requester.is_empty() {
        return Err(EngineError::EmptySeat(requested_by));
    }

    let acting = table.hand.acting_seat.ok_or(EngineError::NoActiveHand)?;
    if let Some(p) = table.player_mut(acting) {
        p.timers.call_clock();
    }
    info!(table_id = table.id, seat = acting, requested_by, "call clock");
    Ok(())
}
