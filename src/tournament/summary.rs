use serde::{Deserialize, Serialize};

use crate::domain::{Chips, PlayerId, TableId, TournamentState};

/// Итоговое место игрока в турнире (1 – победитель).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FinishingPosition {
    pub position: u32,
    pub player_id: PlayerId,
    pub name: String,
}

/// Сводка завершённого турнира. Одна запись на турнир.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TournamentSummary {
    pub table_id: TableId,
    pub buy_in: u64,
    pub initial_stack: u64,
    pub start_date_utc: u64,
    pub end_date_utc: u64,
    /// Уровень блайндов на момент завершения.
    pub level: u32,
    pub finishing_positions: Vec<FinishingPosition>,
}

impl TournamentSummary {
    pub fn winner(&self) -> Option<PlayerId> {
        self.finishing_positions
            .iter()
            .find(|p| p.position == 1)
            .map(|p| p.player_id)
    }
}

/// Сборщик сводки. Принадлежит турнирному столу.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryRecorder {
    buy_in: Chips,
    initial_stack: Chips,
    started_at_ts: u64,
    /// Порядок вылета: первый вылетевший – худшее место.
    eliminated: Vec<(PlayerId, String)>,
    completed: Option<TournamentSummary>,
}

impl SummaryRecorder {
    pub fn new(tournament: &TournamentState) -> Self {
        Self {
            buy_in: tournament.buy_in,
            initial_stack: tournament.initial_stack,
            started_at_ts: tournament.started_at_ts,
            eliminated: Vec::new(),
            completed: None,
        }
    }

    pub fn record_elimination(&mut self, player_id: PlayerId, name: String) {
        if self.eliminated.iter().any(|(id, _)| *id == player_id) {
            return;
        }
        self.eliminated.push((player_id, name));
    }

    pub fn eliminated(&self) -> &[(PlayerId, String)] {
        &self.eliminated
    }

    /// Зафиксировать победителя и собрать сводку.
    pub fn finish(
        &mut self,
        table_id: TableId,
        winner_id: PlayerId,
        winner_name: String,
        level: u32,
        end_ts: u64,
    ) -> &TournamentSummary {
        let mut finishing_positions = vec![FinishingPosition {
            position: 1,
            player_id: winner_id,
            name: winner_name,
        }];
        finishing_positions.extend(self.eliminated.iter().rev().enumerate().map(
            |(i, (player_id, name))| FinishingPosition {
                position: i as u32 + 2,
                player_id: *player_id,
                name: name.clone(),
            },
        ));

        self.completed.insert(TournamentSummary {
            table_id,
            buy_in: self.buy_in.0,
            initial_stack: self.initial_stack.0,
            start_date_utc: self.started_at_ts,
            end_date_utc: end_ts,
            level,
            finishing_positions,
        })
    }

    /// Забрать готовую сводку (для записи на диск).
    pub fn take_completed(&mut self) -> Option<TournamentSummary> {
        self.completed.take()
    }
}
