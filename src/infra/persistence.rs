//! Куда уходят готовые записи раздач и турнирные сводки.
//!
//! Формат лога: одна запись на строку `{"ohh": {...}}`, записи разделены
//! пустой строкой. Файл на стол, только дозапись.

use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::domain::TableId;
use crate::engine::hand_history::{HandRecord, OhhLine};
use crate::tournament::TournamentSummary;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка сериализации: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Хранилище недоступно: {0}")]
    Unavailable(String),
}

/// Путь лога раздач стола.
pub fn hand_log_path(dir: &Path, table_id: TableId) -> PathBuf {
    dir.join(format!("table-{table_id}.ohh.jsonl"))
}

/// Путь турнирной сводки стола.
pub fn summary_path(dir: &Path, table_id: TableId) -> PathBuf {
    dir.join(format!("table-{table_id}.summary.json"))
}

/// Одна строка лога (без разделителя).
pub fn encode_hand_line(record: &HandRecord) -> Result<String, PersistenceError> {
    let line = OhhLine {
        ohh: record.clone(),
    };
    Ok(serde_json::to_string(&line)?)
}

/// Приёмник истории. Вызывается вне актора стола (в blocking-пуле),
/// ошибки только логируются.
pub trait HandLogSink: Send + Sync {
    fn append_hand(&self, table_id: TableId, record: &HandRecord) -> Result<(), PersistenceError>;

    fn write_summary(&self, summary: &TournamentSummary) -> Result<(), PersistenceError>;
}

/// Файловый лог: `<dir>/table-<id>.ohh.jsonl`.
#[derive(Clone, Debug)]
pub struct FileHandLog {
    dir: PathBuf,
}

impl FileHandLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl HandLogSink for FileHandLog {
    fn append_hand(&self, table_id: TableId, record: &HandRecord) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        let line = encode_hand_line(record)?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(hand_log_path(&self.dir, table_id))?;
        // Хвост после падения без перевода строки: начинаем запись с новой строки,
        // иначе она склеится с обрывком и потеряется при разборе.
        let mut chunk = String::with_capacity(line.len() + 3);
        if ends_mid_line(&mut file)? {
            chunk.push('\n');
        }
        chunk.push_str(&line);
        chunk.push_str("\n\n");
        // Одна запись – один write.
        file.write_all(chunk.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    fn write_summary(&self, summary: &TournamentSummary) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(summary)?;
        fs::write(summary_path(&self.dir, summary.table_id), json)?;
        Ok(())
    }
}

/// Непустой файл, последний байт которого не `\n`.
fn ends_mid_line(file: &mut fs::File) -> Result<bool, PersistenceError> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// In-memory приёмник для тестов.
#[derive(Clone, Debug, Default)]
pub struct MemoryHandLog {
    hands: Arc<Mutex<Vec<(TableId, HandRecord)>>>,
    summaries: Arc<Mutex<Vec<TournamentSummary>>>,
}

impl MemoryHandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hands(&self) -> Vec<(TableId, HandRecord)> {
        self.hands.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn summaries(&self) -> Vec<TournamentSummary> {
        self.summaries.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Содержимое лога стола в том же виде, что и на диске.
    pub fn render_log(&self, table_id: TableId) -> Result<String, PersistenceError> {
        let mut out = String::new();
        for (id, record) in self.hands() {
            if id == table_id {
                out.push_str(&encode_hand_line(&record)?);
                out.push_str("\n\n");
            }
        }
        Ok(out)
    }
}

impl HandLogSink for MemoryHandLog {
    fn append_hand(&self, table_id: TableId, record: &HandRecord) -> Result<(), PersistenceError> {
        self.hands
            .lock()
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?
            .push((table_id, record.clone()));
        Ok(())
    }

    fn write_summary(&self, summary: &TournamentSummary) -> Result<(), PersistenceError> {
        self.summaries
            .lock()
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?
            .push(summary.clone());
        Ok(())
    }
}
