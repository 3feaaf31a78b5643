// src/bin/table_sim.rs
//
// Симуляция одного стола: актор + боты, которые ходят по снапшотам.
//
//   table_sim [HANDS] [cash|tournament] [fast|env]
//
// Профиль fast – быстрые тики, история в HOLDEM_HAND_LOG_DIR (по умолчанию –
// временный каталог). Профиль env – EngineConfig::from_env().

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use holdem_table::api::{ActionRequest, ActorRef, TableSnapshot};
use holdem_table::domain::{
    BlindStructure, Chips, Phase, Table, TableConfig, TableSize, TableStakes, TournamentState,
};
use holdem_table::infra::{init_tracing, now_ts, DeterministicRng, EngineConfig, FileHandLog};
use holdem_table::runtime::{spawn_table, TableHandle};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

const TABLE_ID: u64 = 1;
const BOTS: u8 = 4;
const STARTING_STACK: u64 = 2_000;

#[derive(Parser, Debug)]
#[command(name = "table_sim")]
#[command(about = "Симуляция одного стола с ботами")]
struct Args {
    /// Сколько раздач сыграть.
    #[arg(default_value_t = 20)]
    hands: u64,

    #[arg(value_enum, default_value_t = Mode::Cash)]
    mode: Mode,

    #[arg(value_enum, default_value_t = Profile::Fast)]
    profile: Profile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Cash,
    Tournament,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Profile {
    /// Быстрые тики, лог в HOLDEM_HAND_LOG_DIR.
    Fast,
    /// EngineConfig::from_env().
    Env,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing("table_sim");

    let hands = args.hands;
    let tournament = args.mode == Mode::Tournament;
    let config = match args.profile {
        Profile::Env => match EngineConfig::from_env() {
            Ok(config) => config,
            Err(err) => {
                error!(error = %err, "конфигурация из окружения не разобрана");
                return;
            }
        },
        Profile::Fast => {
            let mut config = EngineConfig::testing();
            if let Ok(dir) = std::env::var("HOLDEM_HAND_LOG_DIR") {
                config.hand_log_dir = dir.into();
            }
            config
        }
    };
    info!(hands, tournament, log_dir = %config.hand_log_dir.display(), "старт симуляции");

    let table = build_table(tournament, &config);
    let sink = Arc::new(FileHandLog::new(config.hand_log_dir.clone()));
    let handle = spawn_table(table, &config, sink, DeterministicRng::from_seed(now_ts()));

    let mut updates = handle.subscribe();
    for seat in 0..BOTS {
        let player_id = u64::from(seat) + 1;
        if let Err(err) = handle
            .sit_down(seat, player_id, format!("bot-{player_id}"), Chips(STARTING_STACK))
            .await
        {
            warn!(seat, error = %err, "бот не сел за стол");
        }
    }

    let mut brain = DeterministicRng::from_seed(7);
    let run = async {
        loop {
            let snapshot = match updates.recv().await {
                Ok(snapshot) => snapshot,
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "бот пропустил снапшоты");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            if snapshot.tournament.as_ref().map_or(false, |t| t.finished) {
                info!(winner = ?snapshot.tournament.as_ref().and_then(|t| t.winner), "турнир окончен");
                break;
            }
            if snapshot.hand_number >= hands && snapshot.phase == Phase::Waiting {
                break;
            }

            if let Some(seat) = snapshot.acting_seat {
                play_turn(&handle, &snapshot, seat, &mut brain).await;
            }
        }
    };

    if tokio::time::timeout(Duration::from_secs(120), run).await.is_err() {
        warn!("симуляция не уложилась в отведённое время");
    }

    if let Ok(snapshot) = handle.snapshot(None).await {
        for seat in snapshot.seats.iter().filter_map(|s| s.player.as_ref()) {
            info!(
                player = %seat.name,
                stack = %seat.stack,
                buy_in = %seat.total_buy_in,
                hands = seat.hands_played,
                "итог"
            );
        }
    }
    handle.shutdown().await;
}

fn build_table(tournament: bool, config: &EngineConfig) -> Table {
    let size = TableSize::SixMax;
    if tournament {
        let blinds = BlindStructure::standard_tournament();
        let rules = config.tournament_rules();
        let state = TournamentState::new(
            blinds.clone(),
            rules,
            Chips(STARTING_STACK),
            Chips(100),
            now_ts(),
        );
        let stakes = blinds
            .first_level()
            .map(TableStakes::from)
            .unwrap_or_else(|| TableStakes::new(Chips(10), Chips(20), Chips::ZERO));
        Table::new_tournament(TABLE_ID, "sim sng", size, state, stakes)
    } else {
        let stakes = TableStakes::new(Chips(10), Chips(20), Chips::ZERO);
        Table::new(TABLE_ID, "sim cash", TableConfig::cash(size, stakes))
    }
}

/// Простой бот: чаще коллит/чекает, иногда рейзит минимум, иногда фолдит.
async fn play_turn(handle: &TableHandle, snapshot: &TableSnapshot, seat: u8, brain: &mut DeterministicRng) {
    let Some(me) = snapshot.seats.get(seat as usize).and_then(|s| s.player.as_ref()) else {
        return;
    };
    let to_call = snapshot.current_bet.saturating_sub(me.bet);
    let roll = brain.below(100);

    let (action, amount) = if to_call.is_zero() {
        if roll < 20 && me.stack > snapshot.big_blind {
            if snapshot.current_bet.is_zero() {
                ("bet", Some(snapshot.big_blind.0))
            } else {
                ("raise", Some(snapshot.min_raise_to.0))
            }
        } else {
            ("check", None)
        }
    } else if roll < 15 {
        ("fold", None)
    } else if roll < 25 && me.stack + me.bet > snapshot.min_raise_to {
        ("raise", Some(snapshot.min_raise_to.0))
    } else {
        ("call", None)
    };

    // Отклонённый ход не даёт нового снапшота, поэтому сразу пробуем попроще.
    let passive = if to_call.is_zero() { "check" } else { "call" };
    let attempts = [(action, amount), (passive, None), ("fold", None)];
    for (action, amount) in attempts {
        let request = ActionRequest::new(snapshot.table_id, ActorRef::Seat(seat), action, amount);
        match handle.act(request).await {
            Ok(status) => {
                debug!(seat, action, ?status, "ход бота");
                return;
            }
            Err(err) => debug!(seat, action, error = %err, "ход бота отклонён"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_default_to_short_cash_run() {
        let args = Args::try_parse_from(["table_sim"]).unwrap();
        assert_eq!(args.hands, 20);
        assert_eq!(args.mode, Mode::Cash);
        assert_eq!(args.profile, Profile::Fast);

        let args = Args::try_parse_from(["table_sim", "50", "tournament", "env"]).unwrap();
        assert_eq!(args.hands, 50);
        assert_eq!(args.mode, Mode::Tournament);
        assert_eq!(args.profile, Profile::Env);
    }

    #[test]
    fn malformed_args_are_rejected() {
        assert!(Args::try_parse_from(["table_sim", "ten"]).is_err());
        assert!(Args::try_parse_from(["table_sim", "10", "tournmant"]).is_err());
        assert!(Args::try_parse_from(["table_sim", "10", "cash", "slow"]).is_err());
    }
}
