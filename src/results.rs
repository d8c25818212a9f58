//! # Round Results
//!
//! Aggregates player tallies and final match states once a round is over,
//! checks them against each other, and renders the results tables.

use crate::match_state::{Lifecycle, MatchSnapshot, PlayerId, Seat};
use crate::player::{Player, PlayerStats};
use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// A player's tallies at the end of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub stats: PlayerStats,
}

/// Column totals over players and over matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub players: usize,
    pub played: usize,
    pub wins: usize,
    pub losses: usize,
    /// Sum of per-player draws; each drawn match counts twice
    pub draws: usize,
    pub games: usize,
    pub games_started: usize,
    pub games_won: usize,
    pub games_drawn: usize,
}

/// Disagreement between player tallies and match results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    #[error("players played {played} match seats but {started} matches started")]
    SeatsPlayed { played: usize, started: usize },

    #[error("{wins} wins and {losses} losses across players for {won} won matches")]
    WinsLosses { wins: usize, losses: usize, won: usize },

    #[error("{draws} player draws for {drawn} drawn matches")]
    Draws { draws: usize, drawn: usize },

    #[error("player {0}: played count differs from wins + losses + draws")]
    PlayerTally(PlayerId),

    #[error("player {player}: seated in {seated} started matches but played {played}")]
    PlayerSeats { player: PlayerId, seated: usize, played: usize },

    #[error("game {0}: occupancy does not match its seats")]
    Occupancy(usize),

    #[error("game {0}: still in progress after the round")]
    Unfinished(usize),

    #[error("game {0}: won without the winner's last move completing a line")]
    BadWin(usize),

    #[error("game {0}: drawn with empty cells or a complete line")]
    BadDraw(usize),
}

/// Everything the orchestrator knows after a round's completion gate.
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub round: usize,
    pub players: Vec<PlayerRecord>,
    pub matches: Vec<MatchSnapshot>,
}

impl RoundReport {
    pub fn new(round: usize, players: &[Player], matches: Vec<MatchSnapshot>) -> Self {
        Self {
            round,
            players: players
                .iter()
                .map(|p| PlayerRecord {
                    id: p.id(),
                    stats: p.stats(),
                })
                .collect(),
            matches,
        }
    }

    pub fn totals(&self) -> Totals {
        let mut totals = Totals {
            players: self.players.len(),
            games: self.matches.len(),
            ..Totals::default()
        };
        for record in &self.players {
            totals.played += record.stats.played;
            totals.wins += record.stats.won;
            totals.losses += record.stats.lost;
            totals.draws += record.stats.drawn;
        }
        for snap in &self.matches {
            if snap.lifecycle.was_started() {
                totals.games_started += 1;
            }
            match snap.lifecycle {
                Lifecycle::Won(_) => totals.games_won += 1,
                Lifecycle::Draw => totals.games_drawn += 1,
                _ => {}
            }
        }
        totals
    }

    /// Cross-checks player tallies against the final match states.
    pub fn check_consistency(&self) -> Result<(), Inconsistency> {
        for snap in &self.matches {
            check_match(snap)?;
        }

        let totals = self.totals();
        if totals.played != 2 * totals.games_started {
            return Err(Inconsistency::SeatsPlayed {
                played: totals.played,
                started: totals.games_started,
            });
        }
        if totals.wins != totals.games_won || totals.losses != totals.games_won {
            return Err(Inconsistency::WinsLosses {
                wins: totals.wins,
                losses: totals.losses,
                won: totals.games_won,
            });
        }
        if totals.draws != 2 * totals.games_drawn {
            return Err(Inconsistency::Draws {
                draws: totals.draws,
                drawn: totals.games_drawn,
            });
        }

        for record in &self.players {
            let stats = record.stats;
            if stats.played != stats.won + stats.lost + stats.drawn {
                return Err(Inconsistency::PlayerTally(record.id));
            }
            let seated = self
                .matches
                .iter()
                .filter(|m| m.lifecycle.was_started())
                .filter(|m| m.first == Some(record.id) || m.second == Some(record.id))
                .count();
            if seated != stats.played {
                return Err(Inconsistency::PlayerSeats {
                    player: record.id,
                    seated,
                    played: stats.played,
                });
            }
        }
        Ok(())
    }
}

fn check_match(snap: &MatchSnapshot) -> Result<(), Inconsistency> {
    let seats = snap.first.is_some() as u8 + snap.second.is_some() as u8;
    if snap.occupancy > 2 || snap.occupancy != seats {
        return Err(Inconsistency::Occupancy(snap.number));
    }
    if snap.lifecycle.was_started() && seats != 2 {
        return Err(Inconsistency::Occupancy(snap.number));
    }
    match snap.lifecycle {
        Lifecycle::InProgress => Err(Inconsistency::Unfinished(snap.number)),
        Lifecycle::Won(winner) => {
            let completed = snap.last_move.map_or(false, |(seat, cell)| {
                seat == winner && snap.board.line_through(cell, winner.mark())
            });
            // A last move can complete at most two lines at once.
            let lines = snap.board.lines_of(winner.mark());
            if completed && lines <= 2 && !snap.board.has_line(winner.other().mark()) {
                Ok(())
            } else {
                Err(Inconsistency::BadWin(snap.number))
            }
        }
        Lifecycle::Draw => {
            let no_lines = !snap.board.has_line(Seat::First.mark())
                && !snap.board.has_line(Seat::Second.mark());
            if snap.board.is_full() && no_lines {
                Ok(())
            } else {
                Err(Inconsistency::BadDraw(snap.number))
            }
        }
        Lifecycle::AwaitingPlayers | Lifecycle::Aborted => Ok(()),
    }
}

fn seat_label(holder: Option<PlayerId>) -> String {
    holder.map_or_else(|| "-".to_string(), |id| id.to_string())
}

fn result_label(lifecycle: Lifecycle) -> &'static str {
    match lifecycle {
        Lifecycle::Won(_) => "Won",
        Lifecycle::Draw => "Draw",
        Lifecycle::InProgress => "Unfinished",
        Lifecycle::AwaitingPlayers => "Not played",
        Lifecycle::Aborted => "Aborted",
    }
}

impl fmt::Display for RoundReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let totals = self.totals();

        writeln!(f, "{}", "********* Player Results **********".bold())?;
        for record in &self.players {
            let s = record.stats;
            writeln!(
                f,
                "Player {}, Played {} game(s), Won {}, Lost {}, Draw {}",
                record.id, s.played, s.won, s.lost, s.drawn
            )?;
        }
        writeln!(
            f,
            "Total Players {}, Wins {}, Losses {}, Draws {}",
            totals.players,
            totals.wins,
            totals.losses,
            totals.draws / 2
        )?;
        writeln!(f)?;

        writeln!(f, "{}", "********* Game Results **********".bold())?;
        for snap in &self.matches {
            writeln!(
                f,
                "Game {} - 'X' player {}, 'O' player {}, game result {}",
                snap.number,
                seat_label(snap.first),
                seat_label(snap.second),
                result_label(snap.lifecycle)
            )?;
        }
        write!(
            f,
            "Total Games = {}, {} Games Won, {} Games were a Draw, {} Games not played",
            totals.games,
            totals.games_won,
            totals.games_drawn,
            totals.games - totals.games_started
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::{Board, Cell, Mark};
    use crate::random::RandomMoveSelector;

    fn snapshot(number: usize, first: Option<PlayerId>, second: Option<PlayerId>) -> MatchSnapshot {
        MatchSnapshot {
            number,
            first,
            second,
            occupancy: first.is_some() as u8 + second.is_some() as u8,
            board: Board::new(),
            turn: Seat::First,
            lifecycle: Lifecycle::AwaitingPlayers,
            last_move: None,
            moves: 0,
        }
    }

    fn x_wins_top_row() -> (Board, (Seat, Cell)) {
        let mut board = Board::new();
        for (cell, mark) in [(0, Mark::X), (3, Mark::O), (1, Mark::X), (4, Mark::O), (2, Mark::X)] {
            board.place(Cell(cell), mark);
        }
        (board, (Seat::First, Cell(2)))
    }

    fn player(id: PlayerId, played: usize, won: usize, lost: usize, drawn: usize) -> PlayerRecord {
        PlayerRecord {
            id,
            stats: PlayerStats {
                played,
                won,
                lost,
                drawn,
            },
        }
    }

    #[test]
    fn test_consistent_round() {
        let (board, last) = x_wins_top_row();
        let mut won = snapshot(1, Some(0), Some(1));
        won.board = board;
        won.last_move = Some(last);
        won.lifecycle = Lifecycle::Won(Seat::First);
        let unplayed = snapshot(2, None, None);

        let report = RoundReport {
            round: 1,
            players: vec![player(0, 1, 1, 0, 0), player(1, 1, 0, 1, 0), player(2, 0, 0, 0, 0)],
            matches: vec![won, unplayed],
        };
        assert_eq!(report.check_consistency(), Ok(()));
        let totals = report.totals();
        assert_eq!(totals.games_started, 1);
        assert_eq!(totals.games_won, 1);
        assert_eq!(totals.played, 2);
    }

    #[test]
    fn test_detects_missing_loss() {
        let (board, last) = x_wins_top_row();
        let mut won = snapshot(1, Some(0), Some(1));
        won.board = board;
        won.last_move = Some(last);
        won.lifecycle = Lifecycle::Won(Seat::First);
        let report = RoundReport {
            round: 1,
            players: vec![player(0, 1, 1, 0, 0), player(1, 1, 0, 0, 1)],
            matches: vec![won],
        };
        assert!(matches!(
            report.check_consistency(),
            Err(Inconsistency::WinsLosses { .. })
        ));
    }

    #[test]
    fn test_detects_win_not_completed_by_last_move() {
        let (board, _) = x_wins_top_row();
        let mut won = snapshot(4, Some(0), Some(1));
        won.board = board;
        won.last_move = Some((Seat::Second, Cell(4)));
        won.lifecycle = Lifecycle::Won(Seat::First);
        assert_eq!(check_match(&won), Err(Inconsistency::BadWin(4)));
    }

    #[test]
    fn test_detects_bad_draw_and_bad_occupancy() {
        let mut draw = snapshot(2, Some(0), Some(1));
        draw.lifecycle = Lifecycle::Draw;
        assert_eq!(check_match(&draw), Err(Inconsistency::BadDraw(2)));

        let mut lonely = snapshot(3, None, Some(1));
        lonely.lifecycle = Lifecycle::Draw;
        assert_eq!(check_match(&lonely), Err(Inconsistency::Occupancy(3)));

        let mut running = snapshot(5, Some(0), Some(1));
        running.lifecycle = Lifecycle::InProgress;
        assert_eq!(check_match(&running), Err(Inconsistency::Unfinished(5)));
    }

    #[test]
    fn test_report_from_players_and_display() {
        colored::control::set_override(false);
        let players = vec![
            Player::new(0, RandomMoveSelector::seeded(1, 0)),
            Player::new(1, RandomMoveSelector::seeded(1, 1)),
        ];
        let report = RoundReport::new(1, &players, vec![snapshot(1, None, None)]);
        assert_eq!(report.check_consistency(), Ok(()));
        let text = report.to_string();
        assert!(text.contains("Player 0, Played 0 game(s), Won 0, Lost 0, Draw 0"));
        assert!(text.contains("Game 1 - 'X' player -, 'O' player -, game result Not played"));
        assert!(text.ends_with("Total Games = 1, 0 Games Won, 0 Games were a Draw, 1 Games not played"));
    }
}
