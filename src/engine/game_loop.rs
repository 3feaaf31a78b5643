//! Жизненный цикл раздачи: блайнды → карты → раунды ставок →
//! шоудаун / банк без вскрытия → закрытие раздачи.

use tracing::{debug, info};

use crate::domain::{
    Chips, Deck, Hand, LastAction, Phase, PlayerId, SeatIndex, Table, TableStakes,
};
use crate::engine::actions::PlayerActionKind;
use crate::engine::betting::{
    contesting_seats, next_actor, seats_able_to_act, start_betting_round,
};
use crate::engine::errors::EngineError;
use crate::engine::hand_history::{new_record, ActionKind};
use crate::engine::positions::{blind_seats, dealt_seats_after, next_occupied_seat, resolve_button};
use crate::engine::runout::{deal_street, start_runout};
use crate::engine::showdown::{award_fold_win, collect_bets, run_showdown};
use crate::engine::validation::validate_action;
use crate::engine::RandomSource;
use crate::infra::clock::now_ts;

/// Что стало с раздачей после операции.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandStatus {
    /// Раунд ставок продолжается (или раздачи нет).
    Ongoing,
    /// Открыта новая улица и новый раунд ставок.
    StreetDealt(Phase),
    /// Решений больше нет, улицы открываются по тикам.
    Runout,
    /// Раздача закрыта, банк выплачен.
    Finished,
}

/// Старт новой раздачи.
///
/// Нужно минимум два места с фишками, не в sit out; иначе
/// `InsufficientPlayers` и стол не меняется.
pub fn start_hand<R: RandomSource>(table: &mut Table, rng: &mut R) -> Result<HandStatus, EngineError> {
    if table.hand_in_progress() {
        return Err(EngineError::HandAlreadyInProgress);
    }
    if table.tournament.as_ref().map_or(false, |t| t.is_finished()) {
        return Err(EngineError::TournamentFinished);
    }
    let eligible = table.eligible_count();
    if eligible < 2 {
        return Err(EngineError::InsufficientPlayers { eligible });
    }

    sync_tournament_stakes(table);

    table.countdown = None;
    table.runout = None;
    table.hand_counter += 1;
    table.deck = Deck::shuffled(rng);
    table.board.clear();
    table.hand = Hand {
        phase: Phase::Preflop,
        ..Hand::default()
    };

    for (_, p) in table.players_mut() {
        p.reset_for_hand();
        p.in_hand = p.is_eligible_for_hand();
    }

    table.button = resolve_button(table);
    let Some((sb_seat, bb_seat)) = blind_seats(table) else {
        return Err(EngineError::InsufficientPlayers { eligible });
    };

    let record = new_record(table, now_ts());
    table.recorder.begin_hand(record);

    post_forced_bets(table, sb_seat, bb_seat);
    deal_hole_cards(table);
    start_betting_round(table);

    info!(
        table_id = table.id,
        hand = table.hand_counter,
        button = ?table.button,
        sb = sb_seat,
        bb = bb_seat,
        players = eligible,
        "раздача началась"
    );

    Ok(process_street_advance(table))
}

/// Турнирный стол: стейки берутся из текущего уровня блайндов.
pub(crate) fn sync_tournament_stakes(table: &mut Table) {
    let level = table
        .tournament
        .as_ref()
        .and_then(|t| t.current_blind_level())
        .copied();
    if let Some(level) = level {
        table.config.stakes = TableStakes::from(&level);
    }
}

/// Анте, блайнды и пропущенный большой блайнд.
///
/// Анте – мёртвые фишки прямо в банк. Блайнды – в ставку раунда;
/// если стека не хватает, ставится всё (неполный блайнд, all-in).
fn post_forced_bets(table: &mut Table, sb_seat: SeatIndex, bb_seat: SeatIndex) {
    let stakes = table.config.stakes;
    let is_cash = !table.is_tournament();
    let Some(button) = table.button else {
        return;
    };
    let order = dealt_seats_after(table, button);

    if !stakes.ante.is_zero() {
        for &seat in &order {
            let Some(p) = table.player_mut(seat) else {
                continue;
            };
            let paid = p.commit_dead(stakes.ante);
            p.last_action = Some(LastAction::PostAnte(paid));
            let (player_id, all_in) = (p.player_id, p.all_in);
            table.hand.pot += paid;
            table
                .recorder
                .record_action(player_id, ActionKind::PostAnte, paid.0, all_in, None);
        }
    }

    post_blind(table, sb_seat, stakes.small_blind, ActionKind::PostSmallBlind);
    post_blind(table, bb_seat, stakes.big_blind, ActionKind::PostBigBlind);

    for &seat in &order {
        let Some(p) = table.player_mut(seat) else {
            continue;
        };
        let owes = is_cash && p.missed_big_blind && seat != sb_seat && seat != bb_seat;
        p.missed_big_blind = false;
        if owes {
            post_blind(table, seat, stakes.big_blind, ActionKind::PostExtraBlind);
        }
    }

    table.hand.current_bet = stakes.big_blind;
    table.hand.last_raise_size = stakes.big_blind;
}

fn post_blind(table: &mut Table, seat: SeatIndex, amount: Chips, kind: ActionKind) {
    let Some(p) = table.player_mut(seat) else {
        return;
    };
    let paid = p.commit(amount);
    p.last_action = Some(match kind {
        ActionKind::PostSmallBlind => LastAction::PostSmallBlind(paid),
        _ => LastAction::PostBigBlind(paid),
    });
    let (player_id, all_in) = (p.player_id, p.all_in);
    table
        .recorder
        .record_action(player_id, kind, paid.0, all_in, None);
}

/// По две карты каждому месту в раздаче, по кругу от места после кнопки.
fn deal_hole_cards(table: &mut Table) {
    let Some(button) = table.button else {
        return;
    };
    let order = dealt_seats_after(table, button);

    for _ in 0..2 {
        for &seat in &order {
            let card = table.deck.draw_one();
            if let (Some(card), Some(p)) = (card, table.player_mut(seat)) {
                p.hole_cards.push(card);
            }
        }
    }

    for &seat in &order {
        if let Some(p) = table.player(seat) {
            let (player_id, cards) = (p.player_id, p.hole_cards.clone());
            table
                .recorder
                .record_action(player_id, ActionKind::DealtCards, 0, false, Some(cards));
        }
    }
}

/// Применить действие места. При ошибке стол не меняется.
pub fn apply_action(
    table: &mut Table,
    seat: SeatIndex,
    kind: PlayerActionKind,
) -> Result<HandStatus, EngineError> {
    if let Err(err) = validate_action(table, seat, &kind) {
        debug!(table_id = table.id, seat, action = ?kind, error = %err, "действие отклонено");
        return Err(err);
    }

    let current_bet = table.hand.current_bet;
    let min_step = table.hand.last_raise_size.max(table.config.stakes.big_blind);

    let (player_id, record_kind, amount, all_in, new_bet) = {
        let p = table.player_mut(seat).ok_or(EngineError::EmptySeat(seat))?;

        let (record_kind, last) = match kind {
            PlayerActionKind::Fold => {
                p.folded = true;
                (ActionKind::Fold, LastAction::Fold)
            }
            PlayerActionKind::Check => (ActionKind::Check, LastAction::Check),
            PlayerActionKind::Call => {
                let to_call = current_bet.saturating_sub(p.bet);
                p.commit(to_call);
                (ActionKind::Call, LastAction::Call(p.bet))
            }
            PlayerActionKind::Bet(total) => {
                let added = total.saturating_sub(p.bet);
                p.commit(added);
                (ActionKind::Bet, LastAction::Bet(p.bet))
            }
            PlayerActionKind::Raise(total) => {
                let added = total.saturating_sub(p.bet);
                p.commit(added);
                (ActionKind::Raise, LastAction::Raise(p.bet))
            }
            PlayerActionKind::AllIn => {
                let stack = p.stack;
                p.commit(stack);
                let record_kind = if p.bet <= current_bet {
                    ActionKind::Call
                } else if current_bet.is_zero() {
                    ActionKind::Bet
                } else {
                    ActionKind::Raise
                };
                (record_kind, LastAction::AllIn(p.bet))
            }
        };

        p.last_action = Some(if p.all_in { LastAction::AllIn(p.bet) } else { last });
        p.acted = true;
        p.timers.clear();

        let amount = match record_kind {
            ActionKind::Fold | ActionKind::Check => 0,
            _ => p.bet.0,
        };
        (p.player_id, record_kind, amount, p.all_in, p.bet)
    };

    if new_bet > current_bet {
        register_raise(table, seat, current_bet, new_bet, min_step);
    }

    table
        .recorder
        .record_action(player_id, record_kind, amount, all_in, None);

    table.hand.acting_seat = next_actor(table, seat);

    debug!(
        table_id = table.id,
        hand = table.hand_counter,
        seat,
        action = ?kind,
        next = ?table.hand.acting_seat,
        "действие принято"
    );

    Ok(process_street_advance(table))
}

/// Повышение ставки. Полный рейз (не меньше минимального шага)
/// переоткрывает торговлю для всех остальных; короткий all-in только
/// поднимает текущую ставку.
fn register_raise(
    table: &mut Table,
    seat: SeatIndex,
    previous_bet: Chips,
    new_bet: Chips,
    min_step: Chips,
) {
    let increment = new_bet - previous_bet;
    table.hand.current_bet = new_bet;

    if increment >= min_step {
        table.hand.last_raise_size = increment;
        table.hand.last_raiser = Some(seat);
        for (other, p) in table.players_mut() {
            if other != seat {
                p.acted = false;
            }
        }
    }
}

/// Проверка после каждого действия и на каждом тике:
/// банк без вскрытия, закрытие раунда, следующая улица, runout, шоудаун.
pub fn process_street_advance(table: &mut Table) -> HandStatus {
    if table.runout.is_some() {
        return HandStatus::Runout;
    }
    if !table.hand.phase.is_betting() {
        return HandStatus::Ongoing;
    }

    match contesting_seats(table).as_slice() {
        [winner] => {
            award_fold_win(table, *winner);
            end_hand(table);
            return HandStatus::Finished;
        }
        [] => {
            end_hand(table);
            return HandStatus::Finished;
        }
        _ => {}
    }

    if table.hand.acting_seat.is_some() {
        return HandStatus::Ongoing;
    }

    collect_bets(table);

    let phase = table.hand.phase;
    if phase == Phase::River {
        run_showdown(table);
        end_hand(table);
        return HandStatus::Finished;
    }

    if seats_able_to_act(table) < 2 {
        start_runout(table);
        return HandStatus::Runout;
    }

    let Some(next) = phase.next_street() else {
        return HandStatus::Ongoing;
    };
    deal_street(table, next);
    start_betting_round(table);

    debug!(table_id = table.id, hand = table.hand_counter, street = %next, "новая улица");
    HandStatus::StreetDealt(next)
}

/// Закрытие раздачи: счётчики, вылеты в турнире, кнопка, сброс `Hand`.
pub fn end_hand(table: &mut Table) {
    for (_, p) in table.players_mut() {
        if p.in_hand {
            p.hands_played += 1;
        }
        p.timers.clear();
    }

    table.recorder.finish_hand();

    if table.is_tournament() {
        settle_tournament(table);
    }

    if let Some(button) = table.button {
        table.button = next_occupied_seat(table, button, false).or(Some(button));
    }

    table.hand = Hand::default();
    table.runout = None;

    info!(
        table_id = table.id,
        hand = table.hand_counter,
        next_button = ?table.button,
        "раздача завершена"
    );

    schedule_next_hand(table);
}

/// Вылеты и победитель турнира.
///
/// Вылетевшие в одной раздаче упорядочены по стартовому стеку:
/// у кого было больше, тот занимает место выше.
fn settle_tournament(table: &mut Table) {
    // Для вылетевшего стартовый стек = всё вложенное в раздачу.
    let mut busted: Vec<(SeatIndex, Chips, PlayerId, String)> = table
        .players()
        .filter(|(_, p)| p.in_hand && p.stack.is_zero())
        .map(|(seat, p)| (seat, p.total_invested, p.player_id, p.name.clone()))
        .collect();
    busted.sort_by_key(|(seat, invested, _, _)| (*invested, *seat));

    for (seat, _, player_id, name) in busted {
        if let Some(p) = table.player_mut(seat) {
            p.sitting_out = true;
        }
        if let Some(summary) = table.summary.as_mut() {
            summary.record_elimination(player_id, name);
        }
        info!(table_id = table.id, seat, player_id, "игрок вылетел из турнира");
    }

    let funded = table.funded_seats();
    let [winner] = funded.as_slice() else {
        return;
    };
    let winner = *winner;

    let newly = table
        .tournament
        .as_mut()
        .map_or(false, |t| t.record_winner(winner));
    if !newly {
        return;
    }

    let level = table.tournament.as_ref().map_or(1, |t| t.level);
    let (player_id, name) = match table.player(winner) {
        Some(p) => (p.player_id, p.name.clone()),
        None => return,
    };
    let table_id = table.id;
    if let Some(summary) = table.summary.as_mut() {
        summary.finish(table_id, player_id, name, level, now_ts());
    }
    info!(table_id, seat = winner, player_id, "турнир завершён");
}

/// Запустить отсчёт до следующей раздачи, если есть кому играть.
pub fn schedule_next_hand(table: &mut Table) {
    let finished = table.tournament.as_ref().map_or(false, |t| t.is_finished());
    if table.hand_in_progress() || table.countdown.is_some() || finished {
        return;
    }
    if table.eligible_count() >= 2 {
        table.countdown = Some(table.config.timing.next_hand_delay_ticks);
    }
}
