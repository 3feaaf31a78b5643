//! Автоматическое доигрывание улиц, когда решений больше нет.
//!
//! Каждый шаг – отдельное состояние стола (`RunoutState`), между шагами
//! проходит `runout_delay_ticks` тиков; хост может рассылать снапшот после каждого.

use tracing::info;

use crate::domain::{Phase, RunoutState, RunoutStep, Table};
use crate::engine::game_loop::{end_hand, HandStatus};
use crate::engine::showdown::run_showdown;

/// Открыть карты улицы `phase` и начать её раунд в истории раздачи.
pub fn deal_street(table: &mut Table, phase: Phase) {
    let cards = table.deck.draw_n(phase.board_cards_dealt());
    table.board.extend_from_slice(&cards);
    table.hand.phase = phase;
    table.recorder.start_round(phase, cards);
}

fn step_after(phase: Phase) -> RunoutStep {
    match phase {
        Phase::Preflop => RunoutStep::Flop,
        Phase::Flop => RunoutStep::Turn,
        Phase::Turn => RunoutStep::River,
        _ => RunoutStep::Showdown,
    }
}

/// Войти в runout: ставок больше не будет, карты претендентов открываются сразу.
pub fn start_runout(table: &mut Table) {
    table.hand.acting_seat = None;
    for (_, p) in table.players_mut() {
        if p.is_contesting() {
            p.shown_cards = true;
        }
    }

    let next_step = step_after(table.hand.phase);
    table.runout = Some(RunoutState {
        next_step,
        ticks_left: table.config.timing.runout_delay_ticks,
    });

    info!(
        table_id = table.id,
        hand = table.hand_counter,
        from = %table.hand.phase,
        "все в all-in, доигрываем улицы"
    );
}

/// Выполнить очередной шаг runout.
pub fn deal_runout_street(table: &mut Table) -> HandStatus {
    let Some(state) = table.runout else {
        return HandStatus::Ongoing;
    };

    let phase = match state.next_step {
        RunoutStep::Flop => Phase::Flop,
        RunoutStep::Turn => Phase::Turn,
        RunoutStep::River => Phase::River,
        RunoutStep::Showdown => {
            table.runout = None;
            run_showdown(table);
            end_hand(table);
            return HandStatus::Finished;
        }
    };

    deal_street(table, phase);
    table.runout = Some(RunoutState {
        next_step: step_after(phase),
        ticks_left: table.config.timing.runout_delay_ticks,
    });
    HandStatus::StreetDealt(phase)
}
