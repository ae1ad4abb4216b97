//! Rock-Paper-Scissors against a bot that reads the player's statistics.
//!
//! Each player move is recorded as a key press. Before every round the
//! bot takes a snapshot, assumes the player repeats their favourite move,
//! and plays whatever beats it.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use playstats_common::clock::MonotonicClock;
use playstats_model::{InputEvent, StatsSnapshot};
use playstats_recorder::{InputRecorder, RecorderConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    /// Key code recorded for this move.
    pub fn key(self) -> &'static str {
        match self {
            Move::Rock => "R",
            Move::Paper => "P",
            Move::Scissors => "S",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_uppercase().as_str() {
            "R" | "ROCK" => Some(Move::Rock),
            "P" | "PAPER" => Some(Move::Paper),
            "S" | "SCISSORS" => Some(Move::Scissors),
            _ => None,
        }
    }

    pub fn beats(self, other: Move) -> bool {
        matches!(
            (self, other),
            (Move::Rock, Move::Scissors) | (Move::Paper, Move::Rock) | (Move::Scissors, Move::Paper)
        )
    }

    /// The move that beats `self`.
    pub fn counter(self) -> Move {
        match self {
            Move::Rock => Move::Paper,
            Move::Paper => Move::Scissors,
            Move::Scissors => Move::Rock,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        };
        f.write_str(name)
    }
}

/// Counter the player's most frequent move. Rock with no history.
pub fn opponent_move(snapshot: &StatsSnapshot) -> Move {
    snapshot
        .most_frequent_key()
        .and_then(|(key, _)| Move::from_key(key))
        .map(Move::counter)
        .unwrap_or(Move::Rock)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub player: u32,
    pub opponent: u32,
    pub draws: u32,
}

/// Play up to `rounds` rounds reading moves from `input`.
///
/// Unrecognized lines are skipped without using up a round. Stops early
/// at end of input.
pub fn play<R: BufRead, W: Write>(
    recorder: &mut InputRecorder,
    rounds: u32,
    input: R,
    mut output: W,
) -> anyhow::Result<Score> {
    let mut score = Score::default();
    let mut lines = input.lines();
    let mut played = 0;
    let mut tick = 0u64;

    while played < rounds {
        write!(output, "Round {} [r/p/s]: ", played + 1)?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;
        let Some(player) = Move::from_key(&line) else {
            writeln!(output, "Unknown move '{}'", line.trim())?;
            continue;
        };

        let opponent = opponent_move(&recorder.snapshot());
        recorder.ingest(&InputEvent::key(tick, player.key()));
        tick += 1;
        played += 1;

        if player.beats(opponent) {
            score.player += 1;
            writeln!(output, "You played {player}, bot played {opponent}. You win!")?;
        } else if opponent.beats(player) {
            score.opponent += 1;
            writeln!(output, "You played {player}, bot played {opponent}. Bot wins.")?;
        } else {
            score.draws += 1;
            writeln!(output, "You played {player}, bot played {opponent}. Draw.")?;
        }
    }

    writeln!(
        output,
        "Final score: you {} / bot {} / draws {}",
        score.player, score.opponent, score.draws
    )?;
    Ok(score)
}

pub fn run(rounds: u32, csv: Option<PathBuf>) -> anyhow::Result<()> {
    let mut recorder = InputRecorder::new(
        RecorderConfig::default(),
        Box::new(MonotonicClock::start()),
    );
    recorder.start_recording();

    let stdin = std::io::stdin();
    let score = play(&mut recorder, rounds, stdin.lock(), std::io::stdout())?;
    recorder.end_recording();

    tracing::info!(
        player = score.player,
        opponent = score.opponent,
        draws = score.draws,
        "Game finished"
    );

    if let Some(path) = csv {
        let written = recorder.export_csv(&path)?;
        println!("Statistics written to {}", written.display());
    }

    Ok(())
}
