//! # Tic-Tac-Toe Arena
//!
//! Interactive entry point. Asks for the player and match counts (unless
//! given on the command line), runs a round, prints the results tables and
//! offers another round until the operator declines.
//!
//! ## Usage
//! `cargo run --release --bin play -- --players 6 --games 4`

use arena::{logging, Arena, ArenaConfig, ArenaError};
use clap::Parser;
use dialoguer::{Confirm, Input};
use log::{error, info};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of player threads (at least 2); prompted for if absent
    #[clap(short, long, allow_negative_numbers = true)]
    players: Option<i64>,

    /// Number of match slots; prompted for if absent
    #[clap(short, long, allow_negative_numbers = true)]
    games: Option<i64>,

    /// Base seed for every player's move selector
    #[clap(short, long)]
    seed: Option<u64>,

    /// Play exactly this many rounds without asking to replay
    #[clap(short, long)]
    rounds: Option<usize>,

    /// Also log every board after every move
    #[clap(short, long, action = clap::ArgAction::SetTrue)]
    verbose: bool,

    /// Only log warnings and errors
    #[clap(short, long, action = clap::ArgAction::SetTrue)]
    quiet: bool,
}

fn prompt_count(prompt: &str, given: Option<i64>) -> Result<i64, ArenaError> {
    match given {
        Some(n) => Ok(n),
        None => Ok(Input::<i64>::new().with_prompt(prompt).interact_text()?),
    }
}

fn play_again() -> Result<bool, ArenaError> {
    Ok(Confirm::new()
        .with_prompt("Do you want to play again?")
        .default(false)
        .interact()?)
}

fn run(args: Args) -> Result<(), ArenaError> {
    let players = prompt_count("Enter the number of players", args.players)?;
    let games = prompt_count("Enter the number of games", args.games)?;
    let mut config = ArenaConfig::new(players, games)?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut arena = Arena::new(config);
    loop {
        let report = arena.run_round()?;
        println!("{report}");

        let again = match args.rounds {
            Some(rounds) => arena.rounds_played() < rounds,
            None => play_again()?,
        };
        if !again {
            break;
        }
        arena.reset()?;
    }
    info!("Done after {} round(s)", arena.rounds_played());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(logging::level(args.verbose, args.quiet));

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
