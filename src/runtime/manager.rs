//! Реестр столов процесса.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::domain::{BlindStructure, Table, TableId};
use crate::infra::{EngineConfig, HandLogSink, SystemRng};
use crate::recovery::recover_table_from_dir;
use crate::runtime::actor::{spawn_table, TableHandle};
use crate::runtime::RuntimeError;

/// Держит ручки живых столов. Стол, которого нет в памяти, поднимается
/// из лога раздач при первом обращении.
pub struct TableManager {
    tables: Mutex<HashMap<TableId, TableHandle>>,
    config: EngineConfig,
    sink: Arc<dyn HandLogSink>,
    /// Структура блайндов для восстановления турнирных столов.
    blinds: BlindStructure,
}

impl TableManager {
    pub fn new(config: EngineConfig, sink: Arc<dyn HandLogSink>, blinds: BlindStructure) -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            config,
            sink,
            blinds,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Запустить новый стол.
    pub async fn create(&self, table: Table) -> Result<TableHandle, RuntimeError> {
        let mut tables = self.tables.lock().await;
        if tables.get(&table.id).map_or(false, |h| !h.is_closed()) {
            return Err(RuntimeError::TableExists(table.id));
        }
        let handle = spawn_table(table, &self.config, Arc::clone(&self.sink), SystemRng);
        tables.insert(handle.table_id(), handle.clone());
        Ok(handle)
    }

    pub async fn get(&self, table_id: TableId) -> Option<TableHandle> {
        let tables = self.tables.lock().await;
        tables.get(&table_id).filter(|h| !h.is_closed()).cloned()
    }

    /// Живой стол, либо восстановленный из лога. Нет ни того ни другого – `None`.
    pub async fn get_or_recover(&self, table_id: TableId) -> Result<Option<TableHandle>, RuntimeError> {
        // Лок держим на время восстановления, чтобы стол не подняли дважды.
        let mut tables = self.tables.lock().await;
        if let Some(handle) = tables.get(&table_id).filter(|h| !h.is_closed()) {
            return Ok(Some(handle.clone()));
        }

        let dir = self.config.hand_log_dir.clone();
        let blinds = self.blinds.clone();
        let rules = self.config.tournament_rules();
        let recovered = tokio::task::spawn_blocking(move || {
            recover_table_from_dir(table_id, &dir, &blinds, rules)
        })
        .await
        .map_err(|err| RuntimeError::Join(err.to_string()))??;

        let Some(table) = recovered else {
            return Ok(None);
        };

        info!(table_id, "стол поднят из лога раздач");
        let handle = spawn_table(table, &self.config, Arc::clone(&self.sink), SystemRng);
        tables.insert(table_id, handle.clone());
        Ok(Some(handle))
    }

    pub async fn table_ids(&self) -> Vec<TableId> {
        let tables = self.tables.lock().await;
        let mut ids: Vec<TableId> = tables.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Остановить все столы.
    pub async fn shutdown(&self) {
        let handles: Vec<TableHandle> = self.tables.lock().await.drain().map(|(_, h)| h).collect();
        for handle in handles {
            handle.shutdown().await;
        }
    }
}
