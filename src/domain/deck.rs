use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank, Suit};
use crate::engine::RandomSource;

/// Колода карт. В домене – просто упорядоченный список карт.
/// Перемешивание делает вызывающий код через `RandomSource`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    /// Стандартная 52-карточная колода в порядке:
    /// Clubs 2..A, Diamonds 2..A, Hearts 2..A, Spades 2..A.
    pub fn standard_52() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck { cards }
    }

    /// Новая перемешанная колода.
    pub fn shuffled<R: RandomSource>(rng: &mut R) -> Self {
        let mut deck = Self::standard_52();
        rng.shuffle(&mut deck.cards);
        deck
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Взять одну карту сверху колоды.
    pub fn draw_one(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Взять n карт сверху.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        let mut taken = Vec::with_capacity(n);
        for _ in 0..n {
            match self.cards.pop() {
                Some(card) => taken.push(card),
                None => break,
            }
        }
        taken
    }
}
