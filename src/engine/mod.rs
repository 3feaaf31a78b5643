//! Покерный движок: ставки, переход улиц, сайд-поты, шоудаун, тики.
//!
//! Основные операции:
//!   - `start_hand` – запустить новую раздачу
//!   - `apply_action` – применить действие игрока
//!   - `process_street_advance` – закрытие раунда / следующая улица / runout / шоудаун
//!   - `on_tick` – тик стола (часы турнира, runout, отсчёт, таймауты)
//!   - `end_hand` – закрытие раздачи

pub mod actions;
pub mod betting;
pub mod errors;
pub mod game_loop;
pub mod hand_history;
pub mod positions;
pub mod runout;
pub mod scheduler;
pub mod seating;
pub mod showdown;
pub mod side_pots;
pub mod validation;

pub use actions::{ActionParseError, PlayerActionKind, TableAction};
pub use betting::{call_amount, first_to_act, min_raise, next_actor, start_betting_round};
pub use errors::EngineError;
pub use game_loop::{apply_action, end_hand, process_street_advance, start_hand, HandStatus};
pub use hand_history::{HandRecord, HandRecorder};
pub use runout::deal_runout_street;
pub use scheduler::{call_clock, on_tick, perform_auto_action};
pub use seating::{add_chips, apply_table_action, set_disconnected, sit_down, sit_in, sit_out, stand_up};
pub use showdown::{award_pot, determine_winners_for_pot};
pub use side_pots::{calculate_pots, Pot};

/// RNG интерфейс для engine. Реализации – в `infra::rng`.
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
