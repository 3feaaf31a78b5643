// tests/tournament_clock_tests.rs
//
// Турнирные часы и завершение турнира:
// 1) уровень растёт ровно на границе длительности;
// 2) на уровне-перерыве вместо повышения начинается перерыв;
// 3) после перерыва – следующий уровень; последний уровень не растёт;
// 4) блайнды стола меняются только между раздачами;
// 5) вылет, победитель и турнирная сводка;
// 6) с фишками из идущего турнира не встать.

use holdem_table::domain::card::parse_cards;
use holdem_table::domain::{
    BlindLevel, BlindStructure, Chips, Table, TableSize, TableStakes, TournamentRules,
    TournamentState, TournamentTimeEvent,
};
use holdem_table::engine::{
    apply_action, on_tick, sit_down, stand_up, start_hand, EngineError, PlayerActionKind,
    RandomSource,
};

#[derive(Default)]
struct DummyRng;

impl RandomSource for DummyRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {
        // no-op
    }
}

fn three_levels() -> BlindStructure {
    BlindStructure::new(vec![
        BlindLevel::new(1, 10, 20, 0),
        BlindLevel::new(2, 20, 40, 0),
        BlindLevel::new(3, 40, 80, 10),
    ])
}

fn rules(break_every_levels: u32) -> TournamentRules {
    TournamentRules {
        level_duration_ticks: 10,
        break_duration_ticks: 3,
        break_every_levels,
    }
}

fn state(break_every_levels: u32) -> TournamentState {
    TournamentState::new(three_levels(), rules(break_every_levels), Chips(1_000), Chips(50), 0)
}

#[test]
fn level_advances_exactly_at_duration() {
    let mut t = state(0);
    t.level_ticks = 9;

    let event = t.tick();
    assert_eq!(
        event,
        TournamentTimeEvent::LevelAdvanced {
            from: 1,
            to: 2,
            new_blinds: BlindLevel::new(2, 20, 40, 0),
        }
    );
    assert_eq!(t.level, 2);
    assert_eq!(t.level_ticks, 0);
}

#[test]
fn level_does_not_advance_before_duration() {
    let mut t = state(0);
    for _ in 0..9 {
        assert_eq!(t.tick(), TournamentTimeEvent::None);
    }
    assert_eq!(t.level, 1);
    assert_eq!(t.level_ticks, 9);
}

#[test]
fn break_level_enters_break_instead_of_advancing() {
    let mut t = state(1);
    t.level_ticks = 9;

    assert_eq!(t.tick(), TournamentTimeEvent::BreakStarted { level: 1 });
    assert!(t.on_break);
    assert_eq!(t.level, 1);
    assert_eq!(t.level_ticks, 0);

    assert_eq!(t.tick(), TournamentTimeEvent::None);
    assert_eq!(t.tick(), TournamentTimeEvent::None);
    assert_eq!(
        t.tick(),
        TournamentTimeEvent::BreakEnded {
            new_blinds: Some(BlindLevel::new(2, 20, 40, 0))
        }
    );
    assert!(!t.on_break);
    assert_eq!(t.level, 2);
}

#[test]
fn last_level_never_advances() {
    let mut t = state(0);
    t.level = 3;
    t.level_ticks = 9;

    assert_eq!(t.tick(), TournamentTimeEvent::None);
    assert_eq!(t.level, 3);
    assert_eq!(t.level_ticks, 0);
}

#[test]
fn finished_tournament_clock_stops() {
    let mut t = state(0);
    assert!(t.record_winner(1));
    assert!(!t.record_winner(0));
    assert_eq!(t.tick(), TournamentTimeEvent::Ended);
    assert_eq!(t.winner, Some(1));
}

fn tournament_table(stacks: &[u64]) -> Table {
    let t = state(0);
    let stakes = TableStakes::from(&BlindLevel::new(1, 10, 20, 0));
    let mut table = Table::new_tournament(1, "sng", TableSize::SixMax, t, stakes);
    for (i, &stack) in stacks.iter().enumerate() {
        let seat = i as u8;
        sit_down(&mut table, seat, u64::from(seat) + 1, format!("p{}", seat + 1), Chips(stack)).unwrap();
    }
    table
}

#[test]
fn stakes_change_only_between_hands() {
    let mut table = tournament_table(&[1_000, 1_000, 1_000]);
    start_hand(&mut table, &mut DummyRng).unwrap();
    if let Some(t) = table.tournament.as_mut() {
        t.level_ticks = 9;
    }

    on_tick(&mut table, &mut DummyRng);
    assert_eq!(table.tournament.as_ref().map(|t| t.level), Some(2));
    // Посреди раздачи блайнды прежние.
    assert_eq!(table.config.stakes.big_blind, Chips(20));

    while table.hand_in_progress() {
        let seat = table.hand.acting_seat.unwrap();
        apply_action(&mut table, seat, PlayerActionKind::Fold).unwrap();
    }
    start_hand(&mut table, &mut DummyRng).unwrap();
    assert_eq!(table.config.stakes.big_blind, Chips(40));
    assert_eq!(table.hand.current_bet, Chips(40));
}

#[test]
fn countdown_is_held_during_break() {
    let mut table = tournament_table(&[1_000, 1_000]);
    if let Some(t) = table.tournament.as_mut() {
        t.on_break = true;
        t.rules.break_duration_ticks = 100;
    }
    let before = table.countdown;
    assert!(before.is_some());

    on_tick(&mut table, &mut DummyRng);
    assert_eq!(table.countdown, before);
    assert!(!table.hand_in_progress());
}

#[test]
fn bust_out_produces_winner_and_summary() {
    let mut table = tournament_table(&[1_000, 1_000]);
    start_hand(&mut table, &mut DummyRng).unwrap();

    // Подкладываем карты: у места 0 тузы, у места 1 7-2, борд без совпадений.
    table.player_mut(0).unwrap().hole_cards = parse_cards(&["Ah", "Ad"]).unwrap();
    table.player_mut(1).unwrap().hole_cards = parse_cards(&["7h", "2d"]).unwrap();
    // Карты снимаются с конца колоды.
    let mut board = parse_cards(&["3c", "8d", "9h", "Jc", "Ks"]).unwrap();
    board.reverse();
    table.deck.cards = board;

    // Кнопка 0 (SB) идёт all-in, место 1 отвечает.
    apply_action(&mut table, 0, PlayerActionKind::AllIn).unwrap();
    apply_action(&mut table, 1, PlayerActionKind::Call).unwrap();

    let mut rng = DummyRng;
    for _ in 0..20 {
        if !table.hand_in_progress() {
            break;
        }
        on_tick(&mut table, &mut rng);
    }

    assert_eq!(table.player(0).unwrap().stack, Chips(2_000));
    let loser = table.player(1).unwrap();
    assert!(loser.stack.is_zero());
    assert!(loser.sitting_out);

    let t = table.tournament.as_ref().unwrap();
    assert!(t.is_finished());
    assert_eq!(t.winner, Some(0));

    let summary = table
        .summary
        .as_mut()
        .and_then(|s| s.take_completed())
        .expect("сводка собрана");
    assert_eq!(summary.winner(), Some(1));
    assert_eq!(summary.finishing_positions.len(), 2);
    assert_eq!(summary.finishing_positions[1].player_id, 2);
    assert_eq!(summary.finishing_positions[1].position, 2);
    assert_eq!(summary.buy_in, 50);

    // После победы раздачи не стартуют.
    assert!(table.countdown.is_none());
    assert!(start_hand(&mut table, &mut DummyRng).is_err());
}

#[test]
fn stand_up_with_chips_is_refused_while_tournament_runs() {
    let mut table = tournament_table(&[1_000, 1_000, 1_000]);

    assert_eq!(stand_up(&mut table, 0), Err(EngineError::TournamentSeatLocked(0)));
    assert_eq!(table.player(0).unwrap().stack, Chips(1_000));

    // Вылетевший (стек 0) уходит свободно.
    table.player_mut(1).unwrap().stack = Chips::ZERO;
    let left = stand_up(&mut table, 1).unwrap();
    assert_eq!(left.player_id, 2);

    // После победы уйти может и победитель.
    assert!(table.tournament.as_mut().unwrap().record_winner(0));
    assert!(stand_up(&mut table, 0).is_ok());
}
