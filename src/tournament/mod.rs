//! Турнирная сводка: порядок вылета и итоговые места.

pub mod summary;

pub use summary::{FinishingPosition, SummaryRecorder, TournamentSummary};
