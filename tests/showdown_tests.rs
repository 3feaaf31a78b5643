// tests/showdown_tests.rs
//
// Шоудаун и банки:
// - трёхсторонний сплит с нечётной фишкой (34/33/33);
// - сайд-поты при all-in разного размера;
// - сфолдивший крупный вкладчик не создаёт "ничейный" банк;
// - банк без вскрытия.

use holdem_table::domain::card::parse_cards;
use holdem_table::domain::{
    Chips, Phase, Seat, SeatedPlayer, Table, TableConfig, TableSize, TableStakes,
};
use holdem_table::engine::showdown::run_showdown;
use holdem_table::engine::{
    apply_action, award_pot, calculate_pots, sit_down, start_hand, HandStatus, PlayerActionKind,
    Pot, RandomSource,
};

#[derive(Default)]
struct DummyRng;

impl RandomSource for DummyRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {
        // no-op
    }
}

fn stakes() -> TableStakes {
    TableStakes::new(Chips(50), Chips(100), Chips::ZERO)
}

/// Стол "на ривере": каждому месту – вклад, карты и флаг fold.
fn river_table(board: &[&str], seats: &[(u64, [&str; 2], bool)]) -> Table {
    let mut table = Table::new(1, "showdown", TableConfig::cash(TableSize::SixMax, stakes()));
    for (i, (invested, hole, folded)) in seats.iter().enumerate() {
        let mut p = SeatedPlayer::new(i as u64 + 1, format!("p{}", i + 1), Chips(1_000));
        p.in_hand = true;
        p.total_invested = Chips(*invested);
        p.hole_cards = parse_cards(&hole[..]).unwrap();
        p.folded = *folded;
        table.seats[i] = Seat::Occupied(p);
    }
    table.board = parse_cards(board).unwrap();
    table.hand.phase = Phase::River;
    table.hand.pot = Chips(seats.iter().map(|(c, _, _)| *c).sum());
    table
}

fn stack(table: &Table, seat: u8) -> u64 {
    table.player(seat).map(|p| p.stack.0).unwrap_or(0)
}

#[test]
fn odd_chip_goes_to_lowest_seat_in_three_way_split() {
    assert_eq!(
        award_pot(Chips(100), &[2, 0, 1]),
        vec![(0, Chips(34)), (1, Chips(33)), (2, Chips(33))]
    );
}

#[test]
fn three_way_tie_on_the_board_splits_34_33_33() {
    // Роял-флеш на борде: все оставшиеся делят банк 100.
    // Сфолдившее место 3 внесло 1 фишку.
    let mut table = river_table(
        &["As", "Ks", "Qs", "Js", "Ts"],
        &[
            (33, ["2c", "3d"], false),
            (33, ["2d", "3h"], false),
            (33, ["2h", "3c"], false),
            (1, ["4c", "5d"], true),
        ],
    );

    run_showdown(&mut table);

    assert_eq!(stack(&table, 0), 1_034);
    assert_eq!(stack(&table, 1), 1_033);
    assert_eq!(stack(&table, 2), 1_033);
    assert_eq!(stack(&table, 3), 1_000);
    assert_eq!(table.hand.pot, Chips::ZERO);
    assert_eq!(table.player(0).unwrap().hand_result, Some(1));
    assert_eq!(table.player(3).unwrap().hand_result, Some(-1));
}

#[test]
fn side_pots_pay_each_level_to_its_best_eligible_hand() {
    // Место 0 в all-in на 100, места 1 и 2 – по 300.
    // Лучшая рука у 0 (тузы), затем 1 (короли), хуже всех 2 (дамы).
    let board = ["2c", "7d", "9h", "Jc", "4s"];
    let mut table = river_table(
        &board,
        &[
            (100, ["Ah", "Ad"], false),
            (300, ["Kh", "Kd"], false),
            (300, ["Qh", "Qd"], false),
        ],
    );

    let pots = calculate_pots(&table.seats);
    assert_eq!(
        pots,
        vec![
            Pot {
                amount: Chips(300),
                eligible_seats: vec![0, 1, 2]
            },
            Pot {
                amount: Chips(400),
                eligible_seats: vec![1, 2]
            },
        ]
    );

    run_showdown(&mut table);

    assert_eq!(stack(&table, 0), 1_300);
    assert_eq!(stack(&table, 1), 1_400);
    assert_eq!(stack(&table, 2), 1_000);
    assert_eq!(table.player(2).unwrap().hand_result, Some(-300));
    assert_eq!(table.player(0).unwrap().winning_cards.len(), 5);
}

#[test]
fn folded_top_contributor_money_merges_into_lower_pot() {
    // Место 0 поставило 500 и сфолдило; 1 и 2 в all-in по 200.
    let table = river_table(
        &["2c", "7d", "9h", "Jc", "4s"],
        &[
            (500, ["Ah", "Ad"], true),
            (200, ["Kh", "Kd"], false),
            (200, ["Qh", "Qd"], false),
        ],
    );

    let pots = calculate_pots(&table.seats);
    assert_eq!(
        pots,
        vec![Pot {
            amount: Chips(900),
            eligible_seats: vec![1, 2]
        }]
    );
}

#[test]
fn pot_amounts_always_sum_to_total_invested() {
    let table = river_table(
        &["2c", "7d", "9h", "Jc", "4s"],
        &[
            (50, ["Ah", "Ad"], false),
            (120, ["Kh", "Kd"], true),
            (300, ["Qh", "Qd"], false),
            (300, ["Th", "Td"], false),
            (75, ["8h", "8d"], false),
        ],
    );

    let pots = calculate_pots(&table.seats);
    let total: Chips = pots.iter().map(|p| p.amount).sum();
    assert_eq!(total, Chips(845));

    // Каждый следующий банк – подмножество претендентов предыдущего.
    for pair in pots.windows(2) {
        assert!(pair[1]
            .eligible_seats
            .iter()
            .all(|s| pair[0].eligible_seats.contains(s)));
    }
}

#[test]
fn fold_win_pays_pot_without_evaluation() {
    let mut table = Table::new(1, "fold", TableConfig::cash(TableSize::HeadsUp, stakes()));
    sit_down(&mut table, 0, 1, "p1", Chips(10_000)).unwrap();
    sit_down(&mut table, 1, 2, "p2", Chips(10_000)).unwrap();
    start_hand(&mut table, &mut DummyRng).unwrap();

    let status = apply_action(&mut table, 0, PlayerActionKind::Fold).unwrap();
    assert_eq!(status, HandStatus::Finished);

    assert_eq!(stack(&table, 0), 9_950);
    assert_eq!(stack(&table, 1), 10_050);
    assert_eq!(table.player(0).unwrap().hand_result, Some(-50));
    assert_eq!(table.player(1).unwrap().hand_result, Some(50));
    assert!(!table.player(1).unwrap().shown_cards);
    assert_eq!(table.player(0).unwrap().hands_played, 1);
    assert_eq!(table.player(1).unwrap().hands_played, 1);
    // Кнопка ушла на следующее место.
    assert_eq!(table.button, Some(1));
    assert_eq!(table.hand.phase, Phase::Waiting);

    let records = table.recorder.drain_completed();
    assert_eq!(records.len(), 1);
    let pot = &records[0].pots[0];
    assert_eq!(pot.amount, 150);
    assert_eq!(pot.winner_seats, vec![2]);
    assert!(pot.winning_hand.is_none());
}
