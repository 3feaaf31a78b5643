use crate::domain::{SeatIndex, SeatedPlayer, Table};

/// Следующее место по кругу, удовлетворяющее `pred`.
///
/// Обход начинается с `start + 1` (или со `start`, если `include_start`)
/// и проходит все места ровно один раз.
pub fn next_seat_where<F>(
    table: &Table,
    start: SeatIndex,
    include_start: bool,
    pred: F,
) -> Option<SeatIndex>
where
    F: Fn(&SeatedPlayer) -> bool,
{
    let max = table.seats.len();
    if max == 0 {
        return None;
    }

    let first = if include_start {
        start as usize % max
    } else {
        (start as usize + 1) % max
    };

    (0..max)
        .map(|offset| (first + offset) % max)
        .find(|&idx| table.seats[idx].player().map_or(false, &pred))
        .map(|idx| idx as SeatIndex)
}

/// Найти следующее занятое место по кругу.
pub fn next_occupied_seat(table: &Table, start: SeatIndex, include_start: bool) -> Option<SeatIndex> {
    next_seat_where(table, start, include_start, |_| true)
}

/// Предыдущее занятое место (против часовой стрелки), не включая `start`.
pub fn prev_occupied_seat(table: &Table, start: SeatIndex) -> Option<SeatIndex> {
    let max = table.seats.len();
    (1..max)
        .map(|offset| (start as usize + max - offset) % max)
        .find(|&idx| table.seats[idx].is_occupied())
        .map(|idx| idx as SeatIndex)
}

/// Места, получившие карты в текущей раздаче, по кругу начиная после `start`.
pub fn dealt_seats_after(table: &Table, start: SeatIndex) -> Vec<SeatIndex> {
    let max = table.seats.len();
    (1..=max)
        .map(|offset| (start as usize + offset) % max)
        .filter(|&idx| table.seats[idx].player().map_or(false, |p| p.in_hand))
        .map(|idx| idx as SeatIndex)
        .collect()
}

/// (SB, BB) текущей раздачи.
///
/// Heads-up: кнопка ставит малый блайнд, второе место – большой.
/// Иначе – два места, получивших карты, сразу после кнопки.
pub fn blind_seats(table: &Table) -> Option<(SeatIndex, SeatIndex)> {
    let button = table.button?;
    let order = dealt_seats_after(table, button);
    match order.len() {
        0 | 1 => None,
        2 => {
            // order = [не-кнопка, кнопка]
            Some((order[1], order[0]))
        }
        _ => Some((order[0], order[1])),
    }
}

/// Кнопка для новой раздачи: текущая, если место получает карты,
/// иначе – следующее место, получающее карты.
pub fn resolve_button(table: &Table) -> Option<SeatIndex> {
    match table.button {
        Some(button) => next_seat_where(table, button, true, |p| p.in_hand),
        None => next_seat_where(table, 0, true, |p| p.in_hand),
    }
}
