//! Авторитетный движок стола No-Limit Hold'em.
//!
//! Слои:
//!   - `domain` – карты, фишки, места, стол, блайнды, турнирное состояние;
//!   - `eval` – оценка комбинаций;
//!   - `engine` – раздача, ставки, банки, шоудаун, тики;
//!   - `time_ctrl` – тиковые таймеры хода;
//!   - `tournament` – турнирная сводка;
//!   - `recovery` – подъём стола из лога раздач;
//!   - `runtime` – tokio-актор на стол и реестр столов;
//!   - `infra` – RNG, конфиг, логирование, запись истории;
//!   - `api` – входящие действия и снапшоты для транспорта.

pub mod api;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
pub mod recovery;
pub mod runtime;
pub mod time_ctrl;
pub mod tournament;
