//! Рантайм столов: один tokio-актор на стол, реестр столов.
//!
//! Все мутации стола идут через очередь актора, поэтому действия,
//! тики и посадка никогда не пересекаются.

pub mod actor;
pub mod manager;

use thiserror::Error;

use crate::api::ApiError;
use crate::domain::TableId;
use crate::recovery::RecoveryError;

pub use actor::{spawn_table, TableCommand, TableHandle};
pub use manager::TableManager;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Актор стола остановлен, команда не доставлена.
    #[error("Стол {0} закрыт")]
    TableClosed(TableId),

    #[error("Стол {0} уже запущен")]
    TableExists(TableId),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    #[error("Фоновая задача упала: {0}")]
    Join(String),
}
