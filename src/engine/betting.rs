//! Очередь хода и размеры ставок внутри одного раунда.
//!
//! Раунд закрыт, когда `hand.acting_seat == None`.

use crate::domain::{Chips, Phase, SeatIndex, SeatedPlayer, Table};
use crate::engine::positions::{blind_seats, next_seat_where};

/// Должно ли место ещё действовать в текущем раунде.
fn needs_action(p: &SeatedPlayer, current_bet: Chips) -> bool {
    p.can_act() && (!p.acted || p.bet < current_bet)
}

/// Сколько мест ещё могут добровольно действовать (не fold, не all-in).
pub fn seats_able_to_act(table: &Table) -> usize {
    table.players().filter(|(_, p)| p.can_act()).count()
}

/// Сколько мест претендуют на банк.
pub fn contesting_seats(table: &Table) -> Vec<SeatIndex> {
    table
        .players()
        .filter(|(_, p)| p.is_contesting())
        .map(|(s, _)| s)
        .collect()
}

/// Минимальный рейз "до": текущая ставка + max(последний рейз, BB).
pub fn min_raise(table: &Table) -> Chips {
    let step = table.hand.last_raise_size.max(table.config.stakes.big_blind);
    table.hand.current_bet + step
}

/// Сколько месту нужно доставить до колла. Не больше стека (неполный колл = all-in).
pub fn call_amount(table: &Table, seat: SeatIndex) -> Chips {
    match table.player(seat) {
        Some(p) => table.hand.current_bet.saturating_sub(p.bet).min(p.stack),
        None => Chips::ZERO,
    }
}

/// Кто ходит следующим после `from`.
///
/// None – раунд закрыт: все, кто может действовать, уже действовали и
/// уравняли ставку, либо действовать может меньше двух мест и
/// оставшемуся не нужно отвечать на ставку.
pub fn next_actor(table: &Table, from: SeatIndex) -> Option<SeatIndex> {
    let current_bet = table.hand.current_bet;
    let able: Vec<&SeatedPlayer> = table
        .players()
        .filter(|(_, p)| p.can_act())
        .map(|(_, p)| p)
        .collect();

    match able.as_slice() {
        [] => return None,
        [only] if only.bet >= current_bet => return None,
        _ => {}
    }

    next_seat_where(table, from, false, |p| needs_action(p, current_bet))
}

/// Первый ходящий на улице.
///
/// Префлоп – первое место после BB; heads-up это кнопка (она же SB).
/// Постфлоп – первое место после кнопки; heads-up это не-кнопка.
pub fn first_to_act(table: &Table, phase: Phase) -> Option<SeatIndex> {
    let button = table.button?;
    let anchor = match phase {
        Phase::Preflop => match blind_seats(table) {
            Some((_, bb)) => bb,
            None => button,
        },
        _ => button,
    };
    next_actor(table, anchor)
}

/// Открыть раунд ставок на текущей улице.
///
/// Постфлоп обнуляет текущую ставку и шаг рейза; префлоп их не трогает
/// (блайнды уже выставлены). Если оппоненты ставящего уже в all-in и
/// отвечать некому – раунд сразу закрывается.
pub fn start_betting_round(table: &mut Table) {
    let phase = table.hand.phase;
    if phase != Phase::Preflop {
        table.hand.current_bet = Chips::ZERO;
        table.hand.last_raise_size = Chips::ZERO;
        table.hand.last_raiser = None;
    }

    for (_, p) in table.players_mut() {
        p.acted = false;
        p.timers.clear();
    }

    table.hand.acting_seat = first_to_act(table, phase);
}
