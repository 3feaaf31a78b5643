use tracing::warn;

use crate::engine::hand_history::{HandRecord, OhhLine};
use crate::tournament::TournamentSummary;

/// Разобрать лог раздач: одна запись `{"ohh": {...}}` на непустую строку.
///
/// Битые строки (например, недописанная запись после падения) пропускаются
/// с предупреждением; остальные записи возвращаются в исходном порядке.
pub fn parse_hand_log(text: &str) -> Vec<HandRecord> {
    let mut records = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<OhhLine>(line) {
            Ok(entry) => records.push(entry.ohh),
            Err(err) => warn!(line = index + 1, error = %err, "пропускаем битую запись лога"),
        }
    }

    records
}

/// Разобрать турнирную сводку. Битая сводка не мешает восстановлению.
pub fn parse_summary(text: &str) -> Option<TournamentSummary> {
    match serde_json::from_str(text) {
        Ok(summary) => Some(summary),
        Err(err) => {
            warn!(error = %err, "турнирная сводка не читается, игнорируем");
            None
        }
    }
}
