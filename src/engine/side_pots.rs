use serde::{Deserialize, Serialize};

use crate::domain::{Chips, Seat, SeatIndex};

/// Банк (основной или сайд-пот): сумма и места, которые могут его выиграть.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    pub amount: Chips,
    pub eligible_seats: Vec<SeatIndex>,
}

/// Разложить вклады раздачи (`total_invested`) на банки.
///
/// Уровни – различные положительные вклады по возрастанию. Банк уровня:
/// `(уровень − предыдущий) × число мест с вкладом ≥ уровня`, претенденты –
/// не сфолдившие места с вкладом ≥ уровня. Уровень без претендентов
/// (сверху только сфолдившие) доливается в предыдущий банк.
/// Каждый следующий банк – подмножество претендентов предыдущего.
pub fn calculate_pots(seats: &[Seat]) -> Vec<Pot> {
    let entries: Vec<(SeatIndex, Chips, bool)> = seats
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.player().map(|p| (i as SeatIndex, p.total_invested, p.folded)))
        .filter(|(_, invested, _)| !invested.is_zero())
        .collect();

    let mut tiers: Vec<Chips> = entries.iter().map(|(_, c, _)| *c).collect();
    tiers.sort_unstable();
    tiers.dedup();

    let mut pots: Vec<Pot> = Vec::new();
    let mut prev_tier = Chips::ZERO;
    // Деньги уровня без претендентов, если предыдущего банка ещё нет.
    let mut carry = Chips::ZERO;

    for tier in tiers {
        let contributors = entries.iter().filter(|(_, c, _)| *c >= tier).count() as u64;
        let amount = Chips((tier - prev_tier).0 * contributors) + carry;
        carry = Chips::ZERO;

        let eligible_seats: Vec<SeatIndex> = entries
            .iter()
            .filter(|(_, c, folded)| *c >= tier && !folded)
            .map(|(s, _, _)| *s)
            .collect();

        if eligible_seats.is_empty() {
            match pots.last_mut() {
                Some(last) => last.amount += amount,
                None => carry = amount,
            }
        } else {
            pots.push(Pot {
                amount,
                eligible_seats,
            });
        }

        prev_tier = tier;
    }

    pots
}
