use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::card::Rank;

/// Категория покерной руки по силе (от слабой к сильной).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandCategory {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl HandCategory {
    pub fn name(self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::Pair => "Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
            HandCategory::RoyalFlush => "Royal Flush",
        }
    }
}

/// Оценённая 5-карточная рука.
///
/// Варианты объявлены от слабого к сильному, поэтому derive(Ord)
/// сравнивает сначала категорию, затем поля варианта слева направо.
/// Каждый вариант хранит только то, что нужно для разрешения ничьей.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EvaluatedHand {
    HighCard { kickers: [Rank; 5] },
    Pair { pair: Rank, kickers: [Rank; 3] },
    TwoPair { high: Rank, low: Rank, kicker: Rank },
    ThreeOfAKind { trips: Rank, kickers: [Rank; 2] },
    /// `high` – старшая карта стрита; для A-2-3-4-5 это пятёрка.
    Straight { high: Rank },
    Flush { ranks: [Rank; 5] },
    FullHouse { trips: Rank, pair: Rank },
    FourOfAKind { quads: Rank, kicker: Rank },
    StraightFlush { high: Rank },
    RoyalFlush,
}

impl EvaluatedHand {
    pub fn category(&self) -> HandCategory {
        match self {
            EvaluatedHand::HighCard { .. } => HandCategory::HighCard,
            EvaluatedHand::Pair { .. } => HandCategory::Pair,
            EvaluatedHand::TwoPair { .. } => HandCategory::TwoPair,
            EvaluatedHand::ThreeOfAKind { .. } => HandCategory::ThreeOfAKind,
            EvaluatedHand::Straight { .. } => HandCategory::Straight,
            EvaluatedHand::Flush { .. } => HandCategory::Flush,
            EvaluatedHand::FullHouse { .. } => HandCategory::FullHouse,
            EvaluatedHand::FourOfAKind { .. } => HandCategory::FourOfAKind,
            EvaluatedHand::StraightFlush { .. } => HandCategory::StraightFlush,
            EvaluatedHand::RoyalFlush => HandCategory::RoyalFlush,
        }
    }

    /// Человеческое описание для истории раздач ("Straight, Five to Nine").
    pub fn describe(&self) -> String {
        match *self {
            EvaluatedHand::HighCard { kickers } => format!("High Card, {}", kickers[0].name()),
            EvaluatedHand::Pair { pair, .. } => format!("Pair of {}", plural(pair)),
            EvaluatedHand::TwoPair { high, low, .. } => {
                format!("Two Pair, {} and {}", plural(high), plural(low))
            }
            EvaluatedHand::ThreeOfAKind { trips, .. } => {
                format!("Three of a Kind, {}", plural(trips))
            }
            EvaluatedHand::Straight { high } => {
                format!("Straight, {} to {}", straight_low(high).name(), high.name())
            }
            EvaluatedHand::Flush { ranks } => format!("Flush, {} high", ranks[0].name()),
            EvaluatedHand::FullHouse { trips, pair } => {
                format!("Full House, {} full of {}", plural(trips), plural(pair))
            }
            EvaluatedHand::FourOfAKind { quads, .. } => {
                format!("Four of a Kind, {}", plural(quads))
            }
            EvaluatedHand::StraightFlush { high } => format!(
                "Straight Flush, {} to {}",
                straight_low(high).name(),
                high.name()
            ),
            EvaluatedHand::RoyalFlush => "Royal Flush".to_string(),
        }
    }
}

impl fmt::Display for EvaluatedHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Младшая карта стрита по старшей (для пятёрки – туз).
fn straight_low(high: Rank) -> Rank {
    Rank::from_value(high.value().saturating_sub(4)).unwrap_or(Rank::Ace)
}

fn plural(rank: Rank) -> String {
    match rank {
        Rank::Six => "Sixes".to_string(),
        r => format!("{}s", r.name()),
    }
}
