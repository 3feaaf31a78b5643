// tests/runtime_tests.rs
//
// Актор стола поверх tokio: автостарт раздачи по отсчёту, видимость карт,
// ошибки запросов, запись истории, подъём стола из лога через TableManager.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use holdem_table::api::{ActionRequest, ActorRef, ApiError, TableSnapshot};
use holdem_table::domain::{BlindStructure, Chips, Phase, Table, TableConfig, TableSize, TableStakes};
use holdem_table::engine::{apply_action, sit_down, start_hand, HandStatus, PlayerActionKind, RandomSource};
use holdem_table::infra::{EngineConfig, FileHandLog, HandLogSink, MemoryHandLog};
use holdem_table::runtime::{spawn_table, RuntimeError, TableHandle, TableManager};

#[derive(Default)]
struct DummyRng;

impl RandomSource for DummyRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {
        // no-op
    }
}

/// Быстрый тик, но без авто-действий за живых игроков.
fn fast_config() -> EngineConfig {
    EngineConfig {
        disconnect_timeout_ticks: 10_000,
        call_clock_ticks: 10_000,
        ..EngineConfig::testing()
    }
}

fn cash_table(id: u64) -> Table {
    let stakes = TableStakes::new(Chips(50), Chips(100), Chips::ZERO);
    Table::new(id, "runtime", TableConfig::cash(TableSize::HeadsUp, stakes))
}

/// Ждём снапшот, удовлетворяющий условию (не дольше 2 секунд).
async fn wait_for(handle: &TableHandle, pred: impl Fn(&TableSnapshot) -> bool) -> TableSnapshot {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let snap = handle.snapshot(None).await.expect("стол жив");
        if pred(&snap) {
            return snap;
        }
        assert!(tokio::time::Instant::now() < deadline, "не дождались состояния стола");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

fn temp_dir(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let dir = std::env::temp_dir().join(format!("holdem_runtime_{name}_{}_{nanos}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[tokio::test]
async fn actor_starts_hand_and_persists_history() {
    let sink = Arc::new(MemoryHandLog::new());
    let handle = spawn_table(cash_table(1), &fast_config(), sink.clone(), DummyRng);

    handle.sit_down(0, 1, "p1", Chips(1_000)).await.unwrap();
    handle.sit_down(1, 2, "p2", Chips(1_000)).await.unwrap();

    // Отсчёт в один тик – раздача стартует сама.
    let snap = wait_for(&handle, |s| s.hand_number == 1 && s.phase == Phase::Preflop).await;
    assert_eq!(snap.button, Some(0));
    assert_eq!(snap.acting_seat, Some(0), "heads-up: префлоп начинает кнопка");
    assert_eq!(snap.total_pot, Chips(150));

    // Свои карты видны, чужие – нет.
    let mine = handle.snapshot(Some(1)).await.unwrap();
    let me = mine.seats[0].player.as_ref().unwrap();
    let other = mine.seats[1].player.as_ref().unwrap();
    assert_eq!(me.hole_cards.as_ref().map(Vec::len), Some(2));
    assert!(other.hole_cards.is_none());
    assert_eq!(other.card_count, 2);

    // Наблюдатель не видит ничьих карт.
    assert!(snap.seats.iter().filter_map(|s| s.player.as_ref()).all(|p| p.hole_cards.is_none()));

    let mut updates = handle.subscribe();
    let status = handle
        .act(ActionRequest::new(1, ActorRef::Player(1), "fold", None))
        .await
        .unwrap();
    assert_eq!(status, HandStatus::Finished);

    let published = tokio::time::timeout(Duration::from_secs(1), updates.recv())
        .await
        .expect("снапшот разослан")
        .unwrap();
    assert!(published.seats[1].player.as_ref().unwrap().stack >= Chips(1_050));

    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while sink.hands().is_empty() {
        assert!(tokio::time::Instant::now() < deadline, "раздача не записана");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let (table_id, record) = &sink.hands()[0];
    assert_eq!(*table_id, 1);
    assert_eq!(record.game_number, "1-1");
    assert_eq!(record.pots[0].player_wins[0].player_id, 2);

    handle.shutdown().await;
}

#[tokio::test]
async fn bad_requests_are_rejected_without_changes() {
    let config = EngineConfig {
        next_hand_delay_ticks: 10_000,
        ..fast_config()
    };
    let handle = spawn_table(cash_table(2), &config, Arc::new(MemoryHandLog::new()), DummyRng);
    handle.sit_down(0, 1, "p1", Chips(1_000)).await.unwrap();
    handle.sit_down(1, 2, "p2", Chips(1_000)).await.unwrap();
    handle.start_hand().await.unwrap();

    let before = handle.snapshot(None).await.unwrap();

    let err = handle
        .act(ActionRequest::new(2, ActorRef::Seat(0), "shove", None))
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Api(ApiError::BadRequest(_))));

    let err = handle
        .act(ActionRequest::new(2, ActorRef::Seat(0), "raise", None))
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Api(ApiError::BadRequest(_))));

    let err = handle
        .act(ActionRequest::new(99, ActorRef::Seat(0), "fold", None))
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Api(ApiError::TableNotFound(99))));

    let err = handle
        .act(ActionRequest::new(2, ActorRef::Player(42), "fold", None))
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Api(ApiError::PlayerNotAtTable(42))));

    // Не его ход.
    let err = handle
        .act(ActionRequest::new(2, ActorRef::Seat(1), "check", None))
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Api(ApiError::Rejected(_))));

    let after = handle.snapshot(None).await.unwrap();
    assert_eq!(before, after);

    handle.shutdown().await;
}

#[tokio::test]
async fn closed_table_reports_table_closed() {
    let handle = spawn_table(cash_table(3), &fast_config(), Arc::new(MemoryHandLog::new()), DummyRng);
    handle.shutdown().await;

    let err = handle
        .act(ActionRequest::new(3, ActorRef::Seat(0), "fold", None))
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::TableClosed(3)));
    assert!(handle.snapshot(None).await.is_err());
}

#[tokio::test]
async fn manager_recovers_table_from_hand_log() {
    let dir = temp_dir("manager");

    // Одна сыгранная раздача на диске.
    let mut table = cash_table(9);
    sit_down(&mut table, 0, 1, "p1", Chips(1_000)).unwrap();
    sit_down(&mut table, 1, 2, "p2", Chips(1_000)).unwrap();
    start_hand(&mut table, &mut DummyRng).unwrap();
    apply_action(&mut table, 0, PlayerActionKind::Raise(Chips(300))).unwrap();
    apply_action(&mut table, 1, PlayerActionKind::Fold).unwrap();
    let sink = FileHandLog::new(&dir);
    for record in table.recorder.drain_completed() {
        sink.append_hand(9, &record).unwrap();
    }

    let config = EngineConfig {
        next_hand_delay_ticks: 10_000,
        hand_log_dir: dir.clone(),
        ..fast_config()
    };
    let manager = TableManager::new(
        config,
        Arc::new(MemoryHandLog::new()),
        BlindStructure::standard_tournament(),
    );

    assert!(manager.get(9).await.is_none());
    assert!(manager.get_or_recover(777).await.unwrap().is_none());

    let handle = manager.get_or_recover(9).await.unwrap().expect("стол из лога");
    let snap = handle.snapshot(None).await.unwrap();
    let p1 = snap.seats[0].player.as_ref().unwrap();
    let p2 = snap.seats[1].player.as_ref().unwrap();
    assert_eq!((p1.player_id, p1.stack), (1, Chips(1_100)));
    assert_eq!((p2.player_id, p2.stack), (2, Chips(900)));
    assert!(p1.disconnected && p2.disconnected);
    assert_eq!(snap.hand_number, 1);
    assert_eq!(snap.phase, Phase::Waiting);

    // Повторное обращение – тот же живой стол.
    assert!(manager.get_or_recover(9).await.unwrap().is_some());
    assert_eq!(manager.table_ids().await, vec![9]);

    // Игрок вернулся.
    handle.set_connected(1, true).await.unwrap();
    let snap = handle.snapshot(None).await.unwrap();
    assert!(!snap.seats[0].player.as_ref().unwrap().disconnected);

    let err = manager.create(cash_table(9)).await.unwrap_err();
    assert!(matches!(err, RuntimeError::TableExists(9)));

    manager.shutdown().await;
    let _ = fs::remove_dir_all(&dir);
}
