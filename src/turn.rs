//! # Turn Protocol
//!
//! The rendezvous two seated players run on one match. Both hold the
//! match's gameplay lock only while acting; every other moment is spent in a
//! predicate wait on the match's condition variable, which releases it.
//!
//! ## Sequence
//! 1. Wait until the match is no longer awaiting players (seats may fill in
//!    either order).
//! 2. Wait until it is this seat's turn or the match is terminal.
//! 3. On a terminal match, report the result without moving.
//! 4. Otherwise place one mark, flip the turn, broadcast, and loop. A move
//!    that ends the match returns immediately after the broadcast.

use crate::error::InvariantViolation;
use crate::match_state::{Lifecycle, MatchState, PlayerId, Seat};
use crate::random::RandomMoveSelector;
use log::{debug, error, info};

/// How a finished match went for one participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchOutcome {
    Won,
    Lost,
    Drawn,
}

/// Result for `seat` once `lifecycle` is terminal, `None` while play goes on.
fn settle(
    lifecycle: Lifecycle,
    seat: Seat,
    game: usize,
) -> Option<Result<MatchOutcome, InvariantViolation>> {
    match lifecycle {
        Lifecycle::Won(winner) if winner == seat => Some(Ok(MatchOutcome::Won)),
        Lifecycle::Won(_) => Some(Ok(MatchOutcome::Lost)),
        Lifecycle::Draw => Some(Ok(MatchOutcome::Drawn)),
        Lifecycle::Aborted => Some(Err(InvariantViolation::MatchAborted { game })),
        Lifecycle::AwaitingPlayers | Lifecycle::InProgress => None,
    }
}

fn log_outcome(game: usize, player: PlayerId, outcome: &Result<MatchOutcome, InvariantViolation>) {
    match outcome {
        Ok(MatchOutcome::Won) => info!("Game {}: Player {} - Won", game, player),
        Ok(MatchOutcome::Lost) => info!("Game {}: Player {} - Lost", game, player),
        Ok(MatchOutcome::Drawn) => info!("Game {}: Player {} - Draw", game, player),
        Err(violation) => debug!("Game {}: Player {} - {}", game, player, violation),
    }
}

/// Plays `state` to completion from `seat` as `player`.
///
/// The caller must already hold `seat` through a successful claim. Returns
/// the participant's outcome, or the violation that stopped the match. On a
/// violation the match is aborted and the opponent is woken, so neither
/// side stays blocked.
pub fn play(
    state: &MatchState,
    seat: Seat,
    player: PlayerId,
    selector: &mut RandomMoveSelector,
) -> Result<MatchOutcome, InvariantViolation> {
    let number = state.number();
    let mut game = state.lock_game();

    state.wait_while(&mut game, |g| g.lifecycle == Lifecycle::AwaitingPlayers);
    debug!("Game {}: Player {} sees both seats filled", number, player);

    loop {
        state.wait_while(&mut game, |g| g.turn != seat && !g.lifecycle.is_terminal());

        if let Some(outcome) = settle(game.lifecycle, seat, number) {
            log_outcome(number, player, &outcome);
            return outcome;
        }

        let record = match game.apply_move(number, seat, selector) {
            Ok(record) => record,
            Err(violation) => {
                error!("Game {}: Player {}: {}", number, player, violation);
                game.abort();
                drop(game);
                state.notify_all();
                return Err(violation);
            }
        };
        info!("Game {}: Player {}: Picked {}", number, player, record.cell);
        debug!("Game {}:\n{}", number, game.board);

        state.notify_all();
        if let Some(outcome) = settle(record.lifecycle, seat, number) {
            log_outcome(number, player, &outcome);
            return outcome;
        }
    }
}
