use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PlayerId, SeatIndex, TableId};
use crate::engine::{ActionParseError, EngineError};

/// Ошибки внешнего API (то, что отдаём клиенту).
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Неправильные входные данные (битое имя действия, нет суммы).
    #[error("Некорректный запрос: {0}")]
    BadRequest(String),

    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    #[error("Игрок {0} не сидит за столом")]
    PlayerNotAtTable(PlayerId),

    #[error("Место {0} не существует или пустое")]
    SeatNotFound(SeatIndex),

    /// Действие отклонено движком; стол не изменился.
    #[error("Действие отклонено: {0}")]
    Rejected(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::PlayerNotAtTable(id) => ApiError::PlayerNotAtTable(id),
            other => ApiError::Rejected(other.to_string()),
        }
    }
}

impl From<ActionParseError> for ApiError {
    fn from(err: ActionParseError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
