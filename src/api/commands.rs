use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::domain::{PlayerId, SeatIndex, Table, TableId};
use crate::engine::{apply_table_action, HandStatus, TableAction};

/// Кто действует: место или игрок (транспорт знает одно из двух).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActorRef {
    Seat(SeatIndex),
    Player(PlayerId),
}

/// Входящее действие с транспорта: `(table_id, seat | player_id, action, amount)`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionRequest {
    pub table_id: TableId,
    pub actor: ActorRef,
    pub action: String,
    #[serde(default)]
    pub amount: Option<u64>,
}

impl ActionRequest {
    pub fn new(table_id: TableId, actor: ActorRef, action: impl Into<String>, amount: Option<u64>) -> Self {
        Self {
            table_id,
            actor,
            action: action.into(),
            amount,
        }
    }

    pub fn to_table_action(&self) -> Result<TableAction, ApiError> {
        Ok(TableAction::parse(&self.action, self.amount)?)
    }
}

/// Найти место действующего.
pub fn resolve_actor(table: &Table, actor: ActorRef) -> Result<SeatIndex, ApiError> {
    match actor {
        ActorRef::Seat(seat) => table
            .player(seat)
            .map(|_| seat)
            .ok_or(ApiError::SeatNotFound(seat)),
        ActorRef::Player(player_id) => table
            .find_player(player_id)
            .ok_or(ApiError::PlayerNotAtTable(player_id)),
    }
}

/// Разобрать запрос и применить к столу. Ошибка – стол не тронут.
pub fn dispatch(table: &mut Table, request: &ActionRequest) -> Result<HandStatus, ApiError> {
    if request.table_id != table.id {
        return Err(ApiError::TableNotFound(request.table_id));
    }
    let action = request.to_table_action()?;
    let seat = resolve_actor(table, request.actor)?;
    Ok(apply_table_action(table, seat, action)?)
}
