//! Оценка силы покерных рук (Texas Hold'em).
//!
//! Основные функции:
//!   `classify(5 карт) -> EvaluatedHand`
//!   `best_of_seven(hole, board) -> (EvaluatedHand, 5 карт)`

pub mod evaluator;
pub mod hand_rank;

pub use evaluator::{best_hand, best_of_seven, classify};
pub use hand_rank::{EvaluatedHand, HandCategory};
