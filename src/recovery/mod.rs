//! Восстановление стола из лога раздач после рестарта.
//!
//! Лог только читается: битые записи пропускаются, отсутствие файла –
//! это "стола нет", а не ошибка.

pub mod log;
pub mod rebuild;
pub mod tracker;

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::domain::{BlindStructure, Table, TableId, TournamentRules};
use crate::infra::persistence::{hand_log_path, summary_path};

pub use log::{parse_hand_log, parse_summary};
pub use rebuild::rebuild_table;
pub use tracker::{hand_contributions, hand_winnings, PlayerTotals, RecoveryTracker};

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("Ошибка чтения лога: {0}")]
    Io(#[from] io::Error),
}

/// Восстановить стол из текста лога и (необязательно) турнирной сводки.
pub fn recover_from_str(
    table_id: TableId,
    log: &str,
    summary: Option<&str>,
    blinds: &BlindStructure,
    rules: TournamentRules,
) -> Option<Table> {
    let records = parse_hand_log(log);
    let summary = summary.and_then(parse_summary);
    rebuild_table(table_id, &records, summary.as_ref(), blinds, rules)
}

/// Восстановить стол из каталога логов. Нет файла лога – `Ok(None)`.
pub fn recover_table_from_dir(
    table_id: TableId,
    dir: &Path,
    blinds: &BlindStructure,
    rules: TournamentRules,
) -> Result<Option<Table>, RecoveryError> {
    let Some(log) = read_lossy(&hand_log_path(dir, table_id))? else {
        return Ok(None);
    };

    // Сводка необязательна: без неё уровень берётся по блайндам.
    let summary = match read_lossy(&summary_path(dir, table_id)) {
        Ok(text) => text,
        Err(err) => {
            warn!(table_id, error = %err, "турнирная сводка недоступна");
            None
        }
    };

    Ok(recover_from_str(table_id, &log, summary.as_deref(), blinds, rules))
}

/// Хвост файла после падения может оказаться не UTF-8.
fn read_lossy(path: &Path) -> Result<Option<String>, io::Error> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}
