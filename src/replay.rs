// Replay module for analyzing historical game states and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Replay the engine on historical states with a pinned random source
// 3. Compare logged vs replayed moves
// 4. Generate detailed analysis reports

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::engine::{self, MoveScore};
use crate::types::{Board, Direction};

/// Represents a single log entry from the debug JSONL file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    pub turn: i32,
    /// Id of the snake that made the move. Older logs omit it; the first snake is assumed.
    #[serde(default)]
    pub you_id: String,
    pub chosen_move: String,
    pub board: Board,
    pub timestamp: String,
}

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub matches: bool,
    pub replayed_score: Option<i32>,
    pub rankings: Vec<MoveScore>,
    pub computation_time_us: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

impl ReplayStats {
    pub fn from_results(results: &[ReplayResult]) -> Self {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let match_rate = if total_turns == 0 {
            0.0
        } else {
            matches as f64 * 100.0 / total_turns as f64
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches: total_turns - matches,
            match_rate,
        }
    }
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
    seed: u64,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine {
            config,
            verbose,
            seed: 0,
        }
    }

    /// Base seed for the per-turn tie-break shuffle
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Replays the engine on a single board state.
    /// The same seed and turn always give the same move.
    pub fn replay_turn(
        &self,
        board: &Board,
        our_snake_id: &str,
        turn: i32,
    ) -> Result<(Direction, Vec<MoveScore>, u128), String> {
        let our_snake = board
            .snakes
            .iter()
            .find(|s| s.id == our_snake_id)
            .ok_or_else(|| format!("Snake with id '{}' not found in board state", our_snake_id))?;

        let start_time = Instant::now();
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(turn as u64));
        let decision = engine::choose_move(board, our_snake, turn, &self.config, &mut rng);

        Ok((
            decision.direction,
            decision.rankings,
            start_time.elapsed().as_micros(),
        ))
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        if self.verbose {
            info!("Replaying turn {}...", entry.turn);
        }

        let our_snake_id = if entry.you_id.is_empty() {
            entry
                .board
                .snakes
                .first()
                .map(|s| s.id.as_str())
                .ok_or("No snakes found in board state")?
        } else {
            entry.you_id.as_str()
        };

        let original_move: Direction = entry.chosen_move.parse()?;

        let (replayed_move, rankings, computation_time) =
            self.replay_turn(&entry.board, our_snake_id, entry.turn)?;

        let matches = original_move == replayed_move;
        let replayed_score = rankings.first().map(MoveScore::total);

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: ✓ MATCH - {} (score: {:?}, time: {}us)",
                    entry.turn,
                    replayed_move.as_str(),
                    replayed_score,
                    computation_time
                );
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - Original: {}, Replayed: {} (score: {:?}, time: {}us)",
                    entry.turn,
                    original_move.as_str(),
                    replayed_move.as_str(),
                    replayed_score,
                    computation_time
                );
            }
        }

        Ok(ReplayResult {
            turn: entry.turn,
            original_move,
            replayed_move,
            matches,
            replayed_score,
            rankings,
            computation_time_us: computation_time,
        })
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        let mut results = Vec::new();

        for entry in entries {
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                }
            }
        }

        results
    }

    /// Replays the given turns, failing if any of them is not in the log
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        turn_numbers
            .iter()
            .map(|turn| self.replay_entry(find_turn(entries, *turn)?))
            .collect()
    }

    /// Prints the match summary and every turn's rankings, best first
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = ReplayStats::from_results(results);
        println!(
            "Replayed {} turns: {} match, {} differ ({:.1}%)",
            stats.total_turns, stats.matches, stats.mismatches, stats.match_rate
        );

        for result in results {
            let rankings: Vec<String> = result.rankings.iter().map(|r| r.to_string()).collect();
            println!(
                "{} turn {:>4}: logged {:<5} replayed {:<5} [{}]",
                if result.matches { "✓" } else { "✗" },
                result.turn,
                result.original_move.as_str(),
                result.replayed_move.as_str(),
                rankings.join(", ")
            );
        }
    }

    /// Replays each listed turn and checks the engine's move is one of the acceptable ones
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(i32, Vec<Direction>)],
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let result = self.replay_entry(find_turn(entries, *turn)?)?;

            if !acceptable.contains(&result.replayed_move) {
                return Err(format!(
                    "Turn {}: expected one of {:?}, engine chose {}",
                    turn,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    result.replayed_move.as_str()
                ));
            }
        }

        Ok(())
    }
}

fn find_turn(entries: &[LogEntry], turn: i32) -> Result<&LogEntry, String> {
    entries
        .iter()
        .find(|e| e.turn == turn)
        .ok_or_else(|| format!("Turn {} not found in log file", turn))
}
