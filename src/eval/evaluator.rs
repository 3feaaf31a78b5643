use crate::domain::card::{Card, Rank};

use super::hand_rank::EvaluatedHand;

/// Оценка строго 5-карточной комбинации.
///
/// Сначала смотрим группы рангов (каре, сет, пары), затем стрит/флеш.
/// Туз старший, но при поиске стрита пробуется и как единица (A-2-3-4-5).
pub fn classify(cards: &[Card; 5]) -> EvaluatedHand {
    // (ранг, количество), по убыванию количества, затем ранга.
    let mut groups: Vec<(Rank, u8)> = Vec::with_capacity(5);
    for card in cards {
        match groups.iter_mut().find(|(r, _)| *r == card.rank) {
            Some((_, n)) => *n += 1,
            None => groups.push((card.rank, 1)),
        }
    }
    groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

    let singles: Vec<Rank> = groups
        .iter()
        .filter(|(_, n)| *n == 1)
        .map(|(r, _)| *r)
        .collect();

    match (groups[0].1, groups.get(1).map(|g| g.1)) {
        (4, _) => {
            return EvaluatedHand::FourOfAKind {
                quads: groups[0].0,
                kicker: groups[1].0,
            }
        }
        (3, Some(2)) => {
            return EvaluatedHand::FullHouse {
                trips: groups[0].0,
                pair: groups[1].0,
            }
        }
        _ => {}
    }

    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight_high = if groups.len() == 5 {
        straight_high(cards)
    } else {
        None
    };

    match (is_flush, straight_high) {
        (true, Some(Rank::Ace)) => return EvaluatedHand::RoyalFlush,
        (true, Some(high)) => return EvaluatedHand::StraightFlush { high },
        (true, None) => {
            let mut ranks = [cards[0].rank, cards[1].rank, cards[2].rank, cards[3].rank, cards[4].rank];
            ranks.sort_unstable_by(|a, b| b.cmp(a));
            return EvaluatedHand::Flush { ranks };
        }
        (false, Some(high)) => return EvaluatedHand::Straight { high },
        (false, None) => {}
    }

    match (groups[0].1, groups[1].1) {
        (3, _) => EvaluatedHand::ThreeOfAKind {
            trips: groups[0].0,
            kickers: [singles[0], singles[1]],
        },
        (2, 2) => EvaluatedHand::TwoPair {
            high: groups[0].0,
            low: groups[1].0,
            kicker: singles[0],
        },
        (2, _) => EvaluatedHand::Pair {
            pair: groups[0].0,
            kickers: [singles[0], singles[1], singles[2]],
        },
        _ => EvaluatedHand::HighCard {
            kickers: [singles[0], singles[1], singles[2], singles[3], singles[4]],
        },
    }
}

/// Стрит: пять разных рангов с разбросом ровно 4.
/// Возвращает старшую карту стрита.
fn straight_high(cards: &[Card; 5]) -> Option<Rank> {
    let mut values: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    values.sort_unstable();
    if values[4] - values[0] == 4 {
        return Rank::from_value(values[4]);
    }

    // Туз как единица.
    if values[4] == Rank::Ace.value() {
        let mut low: Vec<u8> = values
            .iter()
            .map(|&v| if v == Rank::Ace.value() { 1 } else { v })
            .collect();
        low.sort_unstable();
        if low[4] - low[0] == 4 {
            return Rank::from_value(low[4]);
        }
    }

    None
}

/// Лучшая 5-карточная рука из hole + board (обычно 2 + 5 = 21 комбинация).
///
/// Возвращает руку и пять карт, которые её составили.
/// Если карт меньше пяти или больше семи – None.
pub fn best_of_seven(hole: &[Card], board: &[Card]) -> Option<(EvaluatedHand, [Card; 5])> {
    let mut all = Vec::with_capacity(hole.len() + board.len());
    all.extend_from_slice(hole);
    all.extend_from_slice(board);
    best_hand(&all)
}

/// Перебор всех 5-карточных подмножеств из N (N = 5..=7).
pub fn best_hand(cards: &[Card]) -> Option<(EvaluatedHand, [Card; 5])> {
    let n = cards.len();
    if !(5..=7).contains(&n) {
        return None;
    }

    let mut best: Option<(EvaluatedHand, [Card; 5])> = None;

    for a in 0..(n - 4) {
        for b in (a + 1)..(n - 3) {
            for c in (b + 1)..(n - 2) {
                for d in (c + 1)..(n - 1) {
                    for e in (d + 1)..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let rank = classify(&five);
                        if best.map_or(true, |(best_rank, _)| rank > best_rank) {
                            best = Some((rank, five));
                        }
                    }
                }
            }
        }
    }

    best
}
