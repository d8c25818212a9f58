//! Non-interactive stress runner.
//!
//! Plays many rounds back to back on one arena, resetting in between, and
//! cross-checks every round's report. Stops at the first inconsistency or
//! invariant violation.

use arena::{logging, Arena, ArenaConfig, ArenaError};
use clap::Parser;
use log::{error, info};
use std::process::ExitCode;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of player threads per round
    #[arg(short, long, default_value_t = 16)]
    players: i64,

    /// Number of match slots
    #[arg(short, long, default_value_t = 8)]
    games: i64,

    /// Number of rounds to play
    #[arg(short, long, default_value_t = 1000)]
    rounds: usize,

    /// Base seed; rounds still differ because selectors keep advancing
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print every round's results tables
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    tables: bool,

    /// Log moves and boards (very noisy)
    #[arg(short, long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Debug, Default)]
struct StressStats {
    rounds: usize,
    matches: usize,
    won: usize,
    drawn: usize,
}

fn print_stats(stats: &StressStats, duration: Duration) {
    let secs = duration.as_secs_f64();
    println!("Stress Results:");
    println!("  Rounds: {}", stats.rounds);
    println!("  Matches played: {}", stats.matches);
    println!("  Won: {}, Drawn: {}", stats.won, stats.drawn);
    println!("  Time: {:.3}s", secs);
    println!("  {:.1} rounds/sec", stats.rounds as f64 / secs);
    println!("  {:.1} matches/sec", stats.matches as f64 / secs);
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    logging::init(level);

    let config = match ArenaConfig::new(args.players, args.games) {
        Ok(config) => match args.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        },
        Err(err) => {
            let err = ArenaError::from(err);
            error!("{}", err);
            return ExitCode::from(err.exit_code());
        }
    };

    println!(
        "Running {} round(s) of {} players over {} games...",
        args.rounds, config.players, config.games
    );
    let mut arena = Arena::new(config);
    let mut stats = StressStats::default();
    let start = Instant::now();

    for _ in 0..args.rounds {
        let report = match arena.run_round() {
            Ok(report) => report,
            Err(err) => {
                error!("{}", err);
                print_stats(&stats, start.elapsed());
                return ExitCode::from(err.exit_code());
            }
        };
        if args.tables {
            println!("{report}");
        }
        if let Err(inconsistency) = report.check_consistency() {
            error!("Round {}: {}", report.round, inconsistency);
            print_stats(&stats, start.elapsed());
            return ExitCode::from(2);
        }

        let totals = report.totals();
        stats.rounds += 1;
        stats.matches += totals.games_started;
        stats.won += totals.games_won;
        stats.drawn += totals.games_drawn;

        if let Err(violation) = arena.reset() {
            error!("{}", violation);
            return ExitCode::from(2);
        }
    }

    info!("All {} round(s) consistent", stats.rounds);
    print_stats(&stats, start.elapsed());
    ExitCode::SUCCESS
}
