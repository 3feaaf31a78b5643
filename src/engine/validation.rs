use crate::domain::{Chips, SeatIndex, Table};
use crate::engine::actions::PlayerActionKind;
use crate::engine::betting::{call_amount, min_raise};
use crate::engine::errors::EngineError;

/// Проверка, может ли место выполнить действие прямо сейчас.
///
/// Ничего не меняет; при ошибке состояние стола остаётся прежним.
pub fn validate_action(
    table: &Table,
    seat: SeatIndex,
    action: &PlayerActionKind,
) -> Result<(), EngineError> {
    if !table.hand.phase.is_betting() || table.runout.is_some() {
        return Err(EngineError::NoActiveHand);
    }

    let player = table
        .seats
        .get(seat as usize)
        .ok_or(EngineError::InvalidSeat(seat))?
        .player()
        .ok_or(EngineError::EmptySeat(seat))?;

    if !player.in_hand {
        return Err(EngineError::NotInHand(seat));
    }
    if player.folded {
        return Err(EngineError::SeatFolded(seat));
    }
    if player.all_in {
        return Err(EngineError::AlreadyAllIn(seat));
    }
    if table.hand.acting_seat != Some(seat) {
        return Err(EngineError::NotYourTurn {
            seat,
            acting: table.hand.acting_seat,
        });
    }

    let current_bet = table.hand.current_bet;
    let to_call = current_bet.saturating_sub(player.bet);
    // Всё, что место может иметь в ставке раунда.
    let max_total = player.bet + player.stack;

    match *action {
        PlayerActionKind::Fold => Ok(()),

        PlayerActionKind::Check => {
            if to_call.is_zero() {
                Ok(())
            } else {
                Err(EngineError::CannotCheck { to_call })
            }
        }

        PlayerActionKind::Call => {
            if call_amount(table, seat).is_zero() {
                Err(EngineError::CannotCall)
            } else {
                Ok(())
            }
        }

        PlayerActionKind::Bet(amount) => {
            if !current_bet.is_zero() {
                return Err(EngineError::CannotBet { current_bet });
            }
            if amount.is_zero() {
                return Err(EngineError::ZeroAmount);
            }
            if player.acted {
                return Err(EngineError::RaiseNotReopened(seat));
            }
            check_total(amount, table.config.stakes.big_blind, max_total, player.stack, true)
        }

        PlayerActionKind::Raise(total) => {
            if current_bet.is_zero() {
                return Err(EngineError::CannotRaise);
            }
            if player.acted {
                return Err(EngineError::RaiseNotReopened(seat));
            }
            if max_total <= current_bet {
                // Стека хватает только на колл.
                return Err(EngineError::NotEnoughChips {
                    needed: min_raise(table).saturating_sub(player.bet),
                    stack: player.stack,
                });
            }
            check_total(total, min_raise(table), max_total, player.stack, false)
        }

        PlayerActionKind::AllIn => {
            // All-in сверх колла – это рейз; после своего хода без
            // переоткрытия торговли можно только уравнять.
            if player.acted && max_total > current_bet {
                return Err(EngineError::RaiseNotReopened(seat));
            }
            Ok(())
        }
    }
}

/// Сумма "до" должна быть не меньше минимума, кроме all-in на меньшую сумму.
fn check_total(
    total: Chips,
    min: Chips,
    max_total: Chips,
    stack: Chips,
    is_bet: bool,
) -> Result<(), EngineError> {
    if total > max_total {
        return Err(EngineError::NotEnoughChips {
            needed: total,
            stack,
        });
    }
    if total < min && total != max_total {
        return Err(if is_bet {
            EngineError::BetTooSmall { attempted: total, min }
        } else {
            EngineError::RaiseTooSmall { attempted: total, min }
        });
    }
    Ok(())
}
