// tests/betting_tests.rs
//
// Раунд ставок:
// - очередь хода префлоп/постфлоп (heads-up и 3-max);
// - закрытие раунда: check-around, bet-call, all-in без ответа;
// - минимальный рейз;
// - короткий all-in не переоткрывает торговлю;
// - новая улица, где действовать может один игрок, закрыта сразу.

use holdem_table::domain::{Chips, Phase, Table, TableConfig, TableSize, TableStakes};
use holdem_table::engine::{
    apply_action, min_raise, on_tick, sit_down, start_betting_round, start_hand, EngineError,
    HandStatus, PlayerActionKind, RandomSource,
};

/// shuffle ничего не делает => колода остаётся в стандартном порядке.
#[derive(Default)]
struct DummyRng;

impl RandomSource for DummyRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {
        // no-op
    }
}

fn make_table(size: TableSize, stacks: &[u64]) -> Table {
    let stakes = TableStakes::new(Chips(50), Chips(100), Chips::ZERO);
    let mut table = Table::new(1, "betting", TableConfig::cash(size, stakes));
    for (i, &stack) in stacks.iter().enumerate() {
        let seat = i as u8;
        sit_down(&mut table, seat, u64::from(seat) + 1, format!("p{}", seat + 1), Chips(stack))
            .expect("место свободно");
    }
    table
}

fn started(size: TableSize, stacks: &[u64]) -> Table {
    let mut table = make_table(size, stacks);
    start_hand(&mut table, &mut DummyRng).expect("раздача стартует");
    table
}

fn bet_of(table: &Table, seat: u8) -> Chips {
    table.player(seat).map(|p| p.bet).unwrap_or_default()
}

#[test]
fn heads_up_button_posts_small_blind_and_acts_first_preflop() {
    let table = started(TableSize::HeadsUp, &[10_000, 10_000]);

    assert_eq!(table.button, Some(0));
    assert_eq!(bet_of(&table, 0), Chips(50));
    assert_eq!(bet_of(&table, 1), Chips(100));
    assert_eq!(table.hand.acting_seat, Some(0));
    assert_eq!(table.hand.current_bet, Chips(100));
}

#[test]
fn heads_up_non_button_acts_first_postflop() {
    let mut table = started(TableSize::HeadsUp, &[10_000, 10_000]);

    apply_action(&mut table, 0, PlayerActionKind::Call).unwrap();
    // BB ещё не действовал – у него есть опция.
    assert_eq!(table.hand.acting_seat, Some(1));

    let status = apply_action(&mut table, 1, PlayerActionKind::Check).unwrap();
    assert_eq!(status, HandStatus::StreetDealt(Phase::Flop));
    assert_eq!(table.board.len(), 3);
    assert_eq!(table.hand.acting_seat, Some(1));
    assert_eq!(table.hand.current_bet, Chips::ZERO);
    assert_eq!(table.hand.pot, Chips(200));
}

#[test]
fn check_around_and_bet_call_close_the_round() {
    let mut table = started(TableSize::HeadsUp, &[10_000, 10_000]);
    apply_action(&mut table, 0, PlayerActionKind::Call).unwrap();
    apply_action(&mut table, 1, PlayerActionKind::Check).unwrap();

    // Флоп: check-check.
    apply_action(&mut table, 1, PlayerActionKind::Check).unwrap();
    assert_eq!(table.hand.acting_seat, Some(0));
    let status = apply_action(&mut table, 0, PlayerActionKind::Check).unwrap();
    assert_eq!(status, HandStatus::StreetDealt(Phase::Turn));

    // Тёрн: bet-call.
    apply_action(&mut table, 1, PlayerActionKind::Bet(Chips(300))).unwrap();
    let status = apply_action(&mut table, 0, PlayerActionKind::Call).unwrap();
    assert_eq!(status, HandStatus::StreetDealt(Phase::River));
    assert_eq!(table.hand.pot, Chips(800));
    assert_eq!(table.total_chips(), Chips(20_000));
}

#[test]
fn bet_cannot_be_checked_behind() {
    let mut table = started(TableSize::HeadsUp, &[10_000, 10_000]);
    apply_action(&mut table, 0, PlayerActionKind::Call).unwrap();
    apply_action(&mut table, 1, PlayerActionKind::Check).unwrap();
    apply_action(&mut table, 1, PlayerActionKind::Bet(Chips(200))).unwrap();

    let err = apply_action(&mut table, 0, PlayerActionKind::Check).unwrap_err();
    assert_eq!(err, EngineError::CannotCheck { to_call: Chips(200) });
}

#[test]
fn acting_out_of_turn_is_rejected_without_changes() {
    let mut table = started(TableSize::HeadsUp, &[10_000, 10_000]);
    let before = table.clone();

    let err = apply_action(&mut table, 1, PlayerActionKind::Check).unwrap_err();
    assert_eq!(
        err,
        EngineError::NotYourTurn {
            seat: 1,
            acting: Some(0)
        }
    );
    assert_eq!(table.hand, before.hand);
    assert_eq!(table.seats, before.seats);
}

#[test]
fn minimum_raise_tracks_last_raise_size() {
    // 3 игрока: кнопка 0, SB 1, BB 2, первым ходит 0.
    let mut table = started(TableSize::SixMax, &[10_000, 10_000, 10_000]);
    assert_eq!(table.hand.acting_seat, Some(0));
    assert_eq!(min_raise(&table), Chips(200));

    let err = apply_action(&mut table, 0, PlayerActionKind::Raise(Chips(150))).unwrap_err();
    assert_eq!(
        err,
        EngineError::RaiseTooSmall {
            attempted: Chips(150),
            min: Chips(200)
        }
    );

    apply_action(&mut table, 0, PlayerActionKind::Raise(Chips(300))).unwrap();
    assert_eq!(table.hand.last_raise_size, Chips(200));
    assert_eq!(min_raise(&table), Chips(500));

    let err = apply_action(&mut table, 1, PlayerActionKind::Raise(Chips(400))).unwrap_err();
    assert!(matches!(err, EngineError::RaiseTooSmall { .. }));

    apply_action(&mut table, 1, PlayerActionKind::Raise(Chips(800))).unwrap();
    assert_eq!(table.hand.last_raise_size, Chips(500));
    assert_eq!(min_raise(&table), Chips(1_300));
    assert_eq!(table.hand.last_raiser, Some(1));
}

#[test]
fn short_all_in_does_not_reopen_betting() {
    // SB (место 1) может дойти только до 400: добавка 100 < шага 200.
    let mut table = started(TableSize::SixMax, &[10_000, 400, 10_000]);

    apply_action(&mut table, 0, PlayerActionKind::Raise(Chips(300))).unwrap();
    apply_action(&mut table, 1, PlayerActionKind::AllIn).unwrap();
    assert_eq!(table.hand.current_bet, Chips(400));
    // Шаг рейза не изменился.
    assert_eq!(table.hand.last_raise_size, Chips(200));
    assert_eq!(table.hand.last_raiser, Some(0));

    apply_action(&mut table, 2, PlayerActionKind::Call).unwrap();
    assert_eq!(table.hand.acting_seat, Some(0));

    let err = apply_action(&mut table, 0, PlayerActionKind::Raise(Chips(1_000))).unwrap_err();
    assert_eq!(err, EngineError::RaiseNotReopened(0));
    let err = apply_action(&mut table, 0, PlayerActionKind::AllIn).unwrap_err();
    assert_eq!(err, EngineError::RaiseNotReopened(0));

    let status = apply_action(&mut table, 0, PlayerActionKind::Call).unwrap();
    assert_eq!(status, HandStatus::StreetDealt(Phase::Flop));
}

#[test]
fn full_raise_reopens_betting() {
    let mut table = started(TableSize::SixMax, &[10_000, 10_000, 10_000]);

    apply_action(&mut table, 0, PlayerActionKind::Raise(Chips(300))).unwrap();
    apply_action(&mut table, 1, PlayerActionKind::Raise(Chips(500))).unwrap();
    apply_action(&mut table, 2, PlayerActionKind::Call).unwrap();

    assert_eq!(table.hand.acting_seat, Some(0));
    apply_action(&mut table, 0, PlayerActionKind::Raise(Chips(700))).unwrap();
    assert_eq!(table.hand.current_bet, Chips(700));
}

#[test]
fn all_in_with_no_one_left_to_respond_runs_out_the_board() {
    let mut table = started(TableSize::HeadsUp, &[1_000, 5_000]);

    apply_action(&mut table, 0, PlayerActionKind::AllIn).unwrap();
    // Место 1 должно ответить на all-in.
    assert_eq!(table.hand.acting_seat, Some(1));

    let status = apply_action(&mut table, 1, PlayerActionKind::Call).unwrap();
    assert_eq!(status, HandStatus::Runout);
    assert!(table.hand.acting_seat.is_none());
    assert_eq!(table.total_chips(), Chips(6_000));

    let mut rng = DummyRng;
    for _ in 0..20 {
        if !table.hand_in_progress() {
            break;
        }
        on_tick(&mut table, &mut rng);
    }

    assert!(!table.hand_in_progress());
    assert_eq!(table.total_chips(), Chips(6_000));
    assert_eq!(table.board.len(), 5);
}

#[test]
fn blinds_all_in_close_preflop_immediately() {
    // У BB фишек меньше большого блайнда: после колла SB решать некому.
    let mut table = make_table(TableSize::HeadsUp, &[10_000, 60]);
    start_hand(&mut table, &mut DummyRng).unwrap();

    assert!(table.player(1).unwrap().all_in);
    assert_eq!(table.hand.acting_seat, Some(0));
    let err = apply_action(&mut table, 0, PlayerActionKind::Check).unwrap_err();
    assert!(matches!(err, EngineError::CannotCheck { .. }));

    let status = apply_action(&mut table, 0, PlayerActionKind::Call).unwrap();
    assert_eq!(status, HandStatus::Runout);
}

/// Стол посреди раздачи на флопе: у каждого места своя роль.
fn flop_table(roles: &[&str]) -> Table {
    let stacks: Vec<u64> = roles.iter().map(|_| 1_000).collect();
    let mut table = make_table(TableSize::SixMax, &stacks);
    table.button = Some(0);
    table.hand.phase = Phase::Flop;
    // Хвост префлопа: ставка улицы ещё не обнулена.
    table.hand.current_bet = Chips(300);
    table.hand.last_raise_size = Chips(200);

    for (seat, role) in roles.iter().enumerate() {
        let p = table.player_mut(seat as u8).unwrap();
        p.in_hand = true;
        p.acted = true;
        match *role {
            "all-in" => {
                p.all_in = true;
                p.stack = Chips::ZERO;
            }
            "folded" => p.folded = true,
            _ => {}
        }
    }
    table
}

#[test]
fn next_street_with_single_actor_closes_immediately() {
    let mut table = flop_table(&["all-in", "folded", "active"]);
    start_betting_round(&mut table);

    assert_eq!(table.hand.acting_seat, None);
    assert_eq!(table.hand.current_bet, Chips::ZERO);
}

#[test]
fn next_street_with_two_all_ins_and_one_actor_closes_immediately() {
    let mut table = flop_table(&["all-in", "active", "all-in"]);
    start_betting_round(&mut table);

    assert_eq!(table.hand.acting_seat, None);
}

#[test]
fn next_street_with_two_actors_opens_after_button() {
    let mut table = flop_table(&["active", "all-in", "active"]);
    start_betting_round(&mut table);

    // Место 1 в all-in, первым ходит место 2.
    assert_eq!(table.hand.acting_seat, Some(2));
    assert!(table.players().all(|(_, p)| !p.acted));
}
