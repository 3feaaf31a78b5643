use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Chips;

/// Тип действия игрока в раунде ставок.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerActionKind {
    Fold,
    Check,
    Call,
    /// Bet на улице без ставки (размер ставки).
    Bet(Chips),
    /// Raise существующей ставки: сумма "до" (total to), а не добавка.
    Raise(Chips),
    /// All-in – поставить весь стек.
    AllIn,
}

/// Всё, что место может сделать за столом, кроме посадки/ухода.
///
/// Закрытый enum: имя действия с транспорта разбирается один раз,
/// дальше – только исчерпывающий `match`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TableAction {
    Play(PlayerActionKind),
    SitOut,
    SitIn,
    CallClock,
}

/// Почему имя действия не удалось разобрать.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ActionParseError {
    #[error("Неизвестное действие: {0}")]
    Unknown(String),

    #[error("Для {0} нужна сумма")]
    MissingAmount(&'static str),
}

impl TableAction {
    /// Разобрать имя действия с транспорта (`"raise"`, `"allin"`, ...).
    pub fn parse(name: &str, amount: Option<u64>) -> Result<Self, ActionParseError> {
        let name = name.trim().to_ascii_lowercase();
        let action = match name.as_str() {
            "fold" => TableAction::Play(PlayerActionKind::Fold),
            "check" => TableAction::Play(PlayerActionKind::Check),
            "call" => TableAction::Play(PlayerActionKind::Call),
            "bet" => {
                let amount = amount.ok_or(ActionParseError::MissingAmount("bet"))?;
                TableAction::Play(PlayerActionKind::Bet(Chips(amount)))
            }
            "raise" => {
                let amount = amount.ok_or(ActionParseError::MissingAmount("raise"))?;
                TableAction::Play(PlayerActionKind::Raise(Chips(amount)))
            }
            "allin" | "all-in" | "all_in" => TableAction::Play(PlayerActionKind::AllIn),
            "sitout" | "sit_out" => TableAction::SitOut,
            "sitin" | "sit_in" => TableAction::SitIn,
            "callclock" | "call_clock" => TableAction::CallClock,
            _ => return Err(ActionParseError::Unknown(name)),
        };
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!(
            TableAction::parse("Raise", Some(300)),
            Ok(TableAction::Play(PlayerActionKind::Raise(Chips(300))))
        );
        assert_eq!(TableAction::parse("sitout", None), Ok(TableAction::SitOut));
        assert_eq!(
            TableAction::parse("bet", None),
            Err(ActionParseError::MissingAmount("bet"))
        );
        assert!(matches!(
            TableAction::parse("shove", None),
            Err(ActionParseError::Unknown(_))
        ));
    }
}
