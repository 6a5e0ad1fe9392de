// Replay module for analyzing logged decisions
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Re-run the engine on the logged snapshots (in parallel with rayon)
// 3. Compare logged vs replayed moves and stages
// 4. Print a summary report

use log::{info, warn};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use crate::bot::{Bot, Stage};
use crate::config::Config;
use crate::debug_logger::DebugLogEntry;
use crate::simple_profiler;
use crate::types::Direction;

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub original_stage: String,
    pub replayed_stage: Stage,
    pub matches: bool,
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

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    bot: Bot,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine {
            bot: Bot::new(config),
            verbose,
        }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<DebugLogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: DebugLogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &DebugLogEntry) -> Result<ReplayResult, String> {
        entry
            .board
            .validate()
            .map_err(|e| format!("Turn {}: invalid board: {}", entry.turn, e))?;

        let original_move = Direction::parse(&entry.chosen_move)?;
        let budget = Duration::from_millis(self.bot.config().timing.default_budget_ms);
        let decision = self.bot.decide(&entry.board, budget);
        simple_profiler::merge_thread_local();
        let matches = original_move == decision.direction;

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: ✓ MATCH - {} via {} ({}us)",
                    entry.turn,
                    decision.direction.as_str(),
                    decision.stage.as_str(),
                    decision.elapsed.as_micros()
                );
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - Original: {} ({}), Replayed: {} ({})",
                    entry.turn,
                    original_move.as_str(),
                    entry.stage,
                    decision.direction.as_str(),
                    decision.stage.as_str()
                );
            }
        }

        Ok(ReplayResult {
            turn: entry.turn,
            original_move,
            replayed_move: decision.direction,
            original_stage: entry.stage.clone(),
            replayed_stage: decision.stage,
            matches,
            computation_time_us: decision.elapsed.as_micros(),
        })
    }

    /// Replays all entries; each turn is independent so they run in parallel
    pub fn replay_all(&self, entries: &[DebugLogEntry]) -> Vec<ReplayResult> {
        let results: Vec<Option<ReplayResult>> = entries
            .par_iter()
            .map(|entry| match self.replay_entry(entry) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                    None
                }
            })
            .collect();

        results.into_iter().flatten().collect()
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[DebugLogEntry],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        let selected = turn_numbers
            .iter()
            .map(|turn_num| {
                entries
                    .iter()
                    .find(|e| e.turn == *turn_num)
                    .cloned()
                    .ok_or_else(|| format!("Turn {} not found in log file", turn_num))
            })
            .collect::<Result<Vec<_>, String>>()?;

        Ok(self.replay_all(&selected))
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_turns - matches;
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_us as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average Decision Time:      {:.1}us", avg_time);

            for stage in [
                Stage::FoodSeek,
                Stage::TailChase,
                Stage::SafestDirection,
                Stage::Degenerate,
            ] {
                let count = results.iter().filter(|r| r.replayed_stage == stage).count();
                println!("  {:<18} {}", stage.as_str(), count);
            }
            println!();
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Turn {}: {} ({}) → {} ({})",
                    result.turn,
                    result.original_move.as_str(),
                    result.original_stage,
                    result.replayed_move.as_str(),
                    result.replayed_stage.as_str()
                );
            }
            println!();
        }
    }

    /// Validates that specific expected moves were made
    pub fn validate_expected_moves(
        &self,
        entries: &[DebugLogEntry],
        expected_moves: &[(i32, Vec<Direction>)], // (turn, acceptable_moves)
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            let actual_move = Direction::parse(&entry.chosen_move)?;

            if !acceptable.contains(&actual_move) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual_move.as_str()
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoardSnapshot, Cell};

    fn entry(turn: i32, chosen_move: &str) -> DebugLogEntry {
        let board = BoardSnapshot::new(10, 10, vec![Cell::new(5, 5)], Direction::Right)
            .unwrap()
            .with_food(&[Cell::new(5, 8)])
            .unwrap();
        DebugLogEntry {
            turn,
            chosen_move: chosen_move.to_string(),
            stage: "food_seek".to_string(),
            board,
            timestamp: "2025-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_replay_detects_match_and_mismatch() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![entry(1, "right"), entry(2, "up")];

        let results = engine.replay_all(&entries);
        assert_eq!(results.len(), 2);
        assert!(results[0].matches);
        assert!(!results[1].matches);

        let stats = engine.generate_stats(&results);
        assert_eq!(stats.matches, 1);
        assert_eq!(stats.mismatches, 1);
        assert_eq!(stats.match_rate, 50.0);
    }

    #[test]
    fn test_replay_turns_missing_turn_is_error() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![entry(1, "right")];
        assert!(engine.replay_turns(&entries, &[3]).is_err());
        assert_eq!(engine.replay_turns(&entries, &[1]).unwrap().len(), 1);
    }

    #[test]
    fn test_validate_expected_moves() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![entry(4, "right")];
        assert!(engine
            .validate_expected_moves(&entries, &[(4, vec![Direction::Right, Direction::Up])])
            .is_ok());
        assert!(engine
            .validate_expected_moves(&entries, &[(4, vec![Direction::Down])])
            .is_err());
    }
}
