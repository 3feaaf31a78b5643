//! Актор стола: очередь команд + тик, пока столу есть что считать.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::api::{build_snapshot, dispatch, ActionRequest, ApiError, TableSnapshot};
use crate::domain::{Chips, PlayerId, SeatIndex, SeatedPlayer, Table, TableId};
use crate::engine::game_loop::schedule_next_hand;
use crate::engine::{self, HandRecord, HandStatus, RandomSource};
use crate::infra::{EngineConfig, HandLogSink};
use crate::runtime::RuntimeError;
use crate::tournament::TournamentSummary;

const COMMAND_BUFFER: usize = 64;
const SNAPSHOT_BUFFER: usize = 32;

type Reply<T> = oneshot::Sender<Result<T, ApiError>>;

/// Команды актору стола.
#[derive(Debug)]
pub enum TableCommand {
    Act {
        request: ActionRequest,
        reply: Reply<HandStatus>,
    },
    SitDown {
        seat: SeatIndex,
        player_id: PlayerId,
        name: String,
        buy_in: Chips,
        reply: Reply<()>,
    },
    StandUp {
        seat: SeatIndex,
        reply: Reply<SeatedPlayer>,
    },
    AddChips {
        seat: SeatIndex,
        amount: Chips,
        reply: Reply<()>,
    },
    SetConnected {
        player_id: PlayerId,
        connected: bool,
        reply: Reply<()>,
    },
    /// Немедленный старт раздачи, минуя отсчёт.
    StartHand {
        reply: Reply<HandStatus>,
    },
    Snapshot {
        viewer: Option<PlayerId>,
        reply: oneshot::Sender<TableSnapshot>,
    },
    Shutdown,
}

/// Клонируемая ручка стола.
#[derive(Clone, Debug)]
pub struct TableHandle {
    table_id: TableId,
    sender: mpsc::Sender<TableCommand>,
    updates: broadcast::Sender<TableSnapshot>,
}

impl TableHandle {
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Поток снапшотов (вид наблюдателя) после каждой мутации стола.
    pub fn subscribe(&self) -> broadcast::Receiver<TableSnapshot> {
        self.updates.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn call<T>(&self, build: impl FnOnce(Reply<T>) -> TableCommand) -> Result<T, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(build(reply))
            .await
            .map_err(|_| RuntimeError::TableClosed(self.table_id))?;
        let result = rx.await.map_err(|_| RuntimeError::TableClosed(self.table_id))?;
        Ok(result?)
    }

    pub async fn act(&self, request: ActionRequest) -> Result<HandStatus, RuntimeError> {
        self.call(|reply| TableCommand::Act { request, reply }).await
    }

    pub async fn sit_down(
        &self,
        seat: SeatIndex,
        player_id: PlayerId,
        name: impl Into<String>,
        buy_in: Chips,
    ) -> Result<(), RuntimeError> {
        let name = name.into();
        self.call(|reply| TableCommand::SitDown {
            seat,
            player_id,
            name,
            buy_in,
            reply,
        })
        .await
    }

    pub async fn stand_up(&self, seat: SeatIndex) -> Result<SeatedPlayer, RuntimeError> {
        self.call(|reply| TableCommand::StandUp { seat, reply }).await
    }

    pub async fn add_chips(&self, seat: SeatIndex, amount: Chips) -> Result<(), RuntimeError> {
        self.call(|reply| TableCommand::AddChips { seat, amount, reply }).await
    }

    pub async fn set_connected(&self, player_id: PlayerId, connected: bool) -> Result<(), RuntimeError> {
        self.call(|reply| TableCommand::SetConnected {
            player_id,
            connected,
            reply,
        })
        .await
    }

    pub async fn start_hand(&self) -> Result<HandStatus, RuntimeError> {
        self.call(|reply| TableCommand::StartHand { reply }).await
    }

    pub async fn snapshot(&self, viewer: Option<PlayerId>) -> Result<TableSnapshot, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(TableCommand::Snapshot { viewer, reply })
            .await
            .map_err(|_| RuntimeError::TableClosed(self.table_id))?;
        rx.await.map_err(|_| RuntimeError::TableClosed(self.table_id))
    }

    /// Остановить актор. Уже закрытый стол – не ошибка.
    pub async fn shutdown(&self) {
        let _ = self.sender.send(TableCommand::Shutdown).await;
    }
}

/// Задание фоновому писателю истории.
enum PersistJob {
    Hand(TableId, HandRecord),
    Summary(TournamentSummary),
}

/// Последовательный писатель: записи одного стола уходят строго по порядку,
/// а файловый I/O – в blocking-пул, мимо актора.
fn spawn_writer(sink: Arc<dyn HandLogSink>) -> mpsc::UnboundedSender<PersistJob> {
    let (tx, mut rx) = mpsc::unbounded_channel::<PersistJob>();

    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            let sink = Arc::clone(&sink);
            let result = tokio::task::spawn_blocking(move || match &job {
                PersistJob::Hand(table_id, record) => sink.append_hand(*table_id, record),
                PersistJob::Summary(summary) => sink.write_summary(summary),
            })
            .await;

            match result {
                Ok(Ok(())) => {}
                Ok(Err(err)) => error!(error = %err, "не удалось записать историю"),
                Err(err) => error!(error = %err, "задача записи истории упала"),
            }
        }
    });

    tx
}

struct TableActor<R> {
    table: Table,
    rng: R,
    inbox: mpsc::Receiver<TableCommand>,
    updates: broadcast::Sender<TableSnapshot>,
    writer: mpsc::UnboundedSender<PersistJob>,
    tick: Duration,
}

/// Запустить актор стола. Тайминги стола берутся из `config`.
pub fn spawn_table<R>(mut table: Table, config: &EngineConfig, sink: Arc<dyn HandLogSink>, rng: R) -> TableHandle
where
    R: RandomSource + Send + 'static,
{
    table.config.timing = config.table_timing();
    if let Some(t) = table.tournament.as_mut() {
        t.rules = config.tournament_rules();
    }
    schedule_next_hand(&mut table);

    let table_id = table.id;
    let (sender, inbox) = mpsc::channel(COMMAND_BUFFER);
    let (updates, _) = broadcast::channel(SNAPSHOT_BUFFER);

    let actor = TableActor {
        table,
        rng,
        inbox,
        updates: updates.clone(),
        writer: spawn_writer(sink),
        tick: Duration::from_millis(config.tick_ms.max(1)),
    };
    tokio::spawn(actor.run());

    TableHandle {
        table_id,
        sender,
        updates,
    }
}

impl<R: RandomSource> TableActor<R> {
    async fn run(mut self) {
        info!(table_id = self.table.id, name = %self.table.name, "стол запущен");

        let mut ticker = time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticking = self.table.needs_tick();

        loop {
            tokio::select! {
                command = self.inbox.recv() => {
                    match command {
                        Some(TableCommand::Shutdown) | None => break,
                        Some(command) => self.handle(command),
                    }
                }
                _ = ticker.tick(), if ticking => {
                    if engine::on_tick(&mut self.table, &mut self.rng) {
                        self.publish();
                    }
                }
            }

            // Тик включается заново – отсчитываем полный период с этого момента.
            let needs_tick = self.table.needs_tick();
            if needs_tick && !ticking {
                ticker.reset();
            }
            ticking = needs_tick;
        }

        self.flush_history();
        info!(table_id = self.table.id, "стол остановлен");
    }

    fn handle(&mut self, command: TableCommand) {
        let table = &mut self.table;
        let changed = match command {
            TableCommand::Act { request, reply } => {
                let result = dispatch(table, &request);
                if let Err(err) = &result {
                    debug!(table_id = table.id, ?request, error = %err, "действие отклонено");
                }
                respond(reply, result)
            }
            TableCommand::SitDown {
                seat,
                player_id,
                name,
                buy_in,
                reply,
            } => respond(reply, engine::sit_down(table, seat, player_id, name, buy_in).map_err(ApiError::from)),
            TableCommand::StandUp { seat, reply } => {
                respond(reply, engine::stand_up(table, seat).map_err(ApiError::from))
            }
            TableCommand::AddChips { seat, amount, reply } => {
                respond(reply, engine::add_chips(table, seat, amount).map_err(ApiError::from))
            }
            TableCommand::SetConnected {
                player_id,
                connected,
                reply,
            } => {
                let result = match table.find_player(player_id) {
                    Some(seat) => engine::set_disconnected(table, seat, !connected).map_err(ApiError::from),
                    None => Err(ApiError::PlayerNotAtTable(player_id)),
                };
                respond(reply, result)
            }
            TableCommand::StartHand { reply } => {
                let result = engine::start_hand(table, &mut self.rng).map_err(ApiError::from);
                respond(reply, result)
            }
            TableCommand::Snapshot { viewer, reply } => {
                let _ = reply.send(build_snapshot(table, viewer));
                false
            }
            TableCommand::Shutdown => false,
        };

        if changed {
            self.publish();
        }
    }

    /// Разослать снапшот и отдать готовую историю писателю.
    fn publish(&mut self) {
        self.flush_history();
        // Подписчиков может не быть – это нормально.
        let _ = self.updates.send(build_snapshot(&self.table, None));
    }

    fn flush_history(&mut self) {
        let table_id = self.table.id;
        for record in self.table.recorder.drain_completed() {
            if self.writer.send(PersistJob::Hand(table_id, record)).is_err() {
                error!(table_id, "писатель истории недоступен");
            }
        }
        if let Some(summary) = self.table.summary.as_mut().and_then(|s| s.take_completed()) {
            if self.writer.send(PersistJob::Summary(summary)).is_err() {
                error!(table_id, "писатель истории недоступен");
            }
        }
    }
}

/// Ответить вызывающему. Возвращает true, если стол изменился.
fn respond<T>(reply: Reply<T>, result: Result<T, ApiError>) -> bool {
    let changed = result.is_ok();
    let _ = reply.send(result);
    changed
}
