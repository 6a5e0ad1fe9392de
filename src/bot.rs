// Move policy: the per-turn decision procedure of the snake agent
//
// Each turn runs through the stages in order and stops at the first one that
// produces a usable direction:
//   1. food-seek      - path to the chosen food, kept only if it does not trap us
//   2. tail-chase     - path to our own tail, which vacates next turn
//   3. safest move    - score the non-reverse legal moves by reachable space
//   4. degenerate     - nothing is legal, keep the current heading
//
// The engine keeps no state between turns. Tie-breaking randomness is derived
// from a fixed seed and the snapshot, so the same board always gives the same move.

use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::pathfinder::{find_path, PathWeights};
use crate::reachability::{reachable_count, space_cap};
use crate::simple_profiler::{Category, ProfileGuard};
use crate::target::select_target;
use crate::types::{BoardSnapshot, Cell, Direction, GridQuery};

/// Policy stage that produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    FoodSeek,
    TailChase,
    SafestDirection,
    Degenerate,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::FoodSeek => "food_seek",
            Stage::TailChase => "tail_chase",
            Stage::SafestDirection => "safest_direction",
            Stage::Degenerate => "degenerate",
        }
    }
}

/// Outcome of one decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub direction: Direction,
    pub stage: Stage,
    pub elapsed: Duration,
}

/// A scored candidate of the safest-direction stage
#[derive(Debug, Clone, Copy)]
struct Candidate {
    direction: Direction,
    space: usize,
    score: f64,
}

/// Snake agent
/// Takes static configuration and a tie-break seed; holds no per-game state
#[derive(Clone)]
pub struct Bot {
    config: Config,
    seed: u64,
}

impl Bot {
    /// Creates a new Bot using the seed from the configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        let seed = config.tie_break.seed;
        Bot { config, seed }
    }

    /// Creates a Bot with an explicit tie-break seed
    pub fn with_seed(config: Config, seed: u64) -> Self {
        Bot { config, seed }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns agent metadata
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "engine": "risk-weighted-astar",
            "color": "#2E8B57",
            "stages": [
                Stage::FoodSeek.as_str(),
                Stage::TailChase.as_str(),
                Stage::SafestDirection.as_str(),
            ],
        })
    }

    /// Picks the next move for the snake on `grid`
    ///
    /// # Arguments
    /// * `grid` - Read-only board snapshot for this turn
    /// * `remaining` - Time left before the host needs an answer
    ///
    /// # Returns
    /// * `Direction` - Never fails; falls back to the current heading
    pub fn decide_move<G: GridQuery + ?Sized>(&self, grid: &G, remaining: Duration) -> Direction {
        self.decide(grid, remaining).direction
    }

    /// Computes the move for POST /move
    ///
    /// The search is CPU-bound, so it runs on tokio's blocking pool on a clone
    /// of the bot and the async caller only awaits the result.
    ///
    /// # Arguments
    /// * `turn` - Current turn number
    /// * `board` - Board snapshot for this turn
    /// * `remaining` - Time left before the host needs an answer
    pub async fn get_move(
        &self,
        turn: i32,
        board: BoardSnapshot,
        remaining: Duration,
    ) -> Decision {
        let heading = board.heading;
        let bot = self.clone();

        match tokio::task::spawn_blocking(move || bot.decide(&board, remaining)).await {
            Ok(decision) => decision,
            Err(e) => {
                error!("Turn {}: move computation failed: {}", turn, e);
                Decision {
                    direction: heading,
                    stage: Stage::Degenerate,
                    elapsed: Duration::from_millis(0),
                }
            }
        }
    }

    /// Same as `decide_move` but also reports which stage decided and how long it took
    pub fn decide<G: GridQuery + ?Sized>(&self, grid: &G, remaining: Duration) -> Decision {
        let _guard = ProfileGuard::new(Category::Decide);
        let start_time = Instant::now();
        let heading = grid.heading();

        let head = match grid.head() {
            Some(head) => head,
            None => {
                debug!("Empty snake body, keeping heading {}", heading.as_str());
                return Decision {
                    direction: heading,
                    stage: Stage::Degenerate,
                    elapsed: start_time.elapsed(),
                };
            }
        };
        let snake_len = grid.snake_len();

        let min_budget = Duration::from_millis(self.config.timing.min_search_budget_ms);
        let searches_allowed = remaining >= min_budget;
        if !searches_allowed {
            info!(
                "Budget {}ms below search minimum, going straight to fallback",
                remaining.as_millis()
            );
        }

        let mut outcome = None;
        if searches_allowed {
            outcome = self
                .seek_food(grid, head, snake_len)
                .map(|dir| (dir, Stage::FoodSeek));
        }
        if outcome.is_none() && searches_allowed && start_time.elapsed() < remaining {
            outcome = self
                .chase_tail(grid, head, snake_len)
                .map(|dir| (dir, Stage::TailChase));
        }
        let (direction, stage) = outcome
            .or_else(|| {
                self.safest_direction(grid, head, snake_len)
                    .map(|dir| (dir, Stage::SafestDirection))
            })
            .unwrap_or_else(|| {
                debug!("No legal direction, keeping heading {}", heading.as_str());
                (heading, Stage::Degenerate)
            });

        let elapsed = start_time.elapsed();
        info!(
            "Chose {} via {} (length: {}, time: {}us)",
            direction.as_str(),
            stage.as_str(),
            snake_len,
            elapsed.as_micros()
        );

        Decision { direction, stage, elapsed }
    }

    /// Stage 1: follow the path to the selected food if it leaves enough room
    fn seek_food<G: GridQuery + ?Sized>(
        &self,
        grid: &G,
        head: Cell,
        snake_len: usize,
    ) -> Option<Direction> {
        let target = select_target(grid, head, snake_len, &self.config)?;
        let weights = PathWeights::from_config(&self.config);

        let path = match find_path(grid, head, target, &weights, snake_len) {
            Some(path) => path,
            None => {
                debug!("No path to food at ({}, {})", target.row, target.col);
                return None;
            }
        };
        let direction = path.first_direction()?;
        if direction == grid.heading().opposite() {
            debug!("Food path starts with a reversal, rejected");
            return None;
        }

        let required = self.config.safety.required_food_space(snake_len);
        let cap = space_cap(grid, &self.config).max(required);
        let path_cells: HashSet<Cell> = path.cells().into_iter().collect();
        let space = reachable_count(grid, target, cap, &path_cells);

        if space >= required {
            Some(direction)
        } else {
            debug!(
                "Food path rejected: {} reachable after eating, need {}",
                space, required
            );
            None
        }
    }

    /// Stage 2: head towards our own tail
    fn chase_tail<G: GridQuery + ?Sized>(
        &self,
        grid: &G,
        head: Cell,
        snake_len: usize,
    ) -> Option<Direction> {
        let tail = grid.tail()?;
        if tail == head {
            return None;
        }

        let weights = PathWeights::from_config(&self.config);
        let path = find_path(grid, head, tail, &weights, snake_len)?;
        let direction = path.first_direction()?;
        if direction == grid.heading().opposite() {
            return None;
        }

        let next = head.step(direction);
        if !grid.is_traversable(&next) {
            debug!("Tail chase step is blocked");
            return None;
        }

        if self.config.safety.tail_chase_space_check {
            let cap = space_cap(grid, &self.config).max(snake_len);
            let space = reachable_count(grid, next, cap, &HashSet::new());
            if space < snake_len {
                debug!("Tail chase rejected: {} reachable, need {}", space, snake_len);
                return None;
            }
        }

        Some(direction)
    }

    /// Directions that stay on board, avoid the body and do not reverse
    pub fn legal_moves<G: GridQuery + ?Sized>(grid: &G) -> Vec<Direction> {
        let head = match grid.head() {
            Some(head) => head,
            None => return vec![],
        };
        let reverse = grid.heading().opposite();

        Direction::all()
            .iter()
            .copied()
            .filter(|&dir| dir != reverse && grid.is_traversable(&head.step(dir)))
            .collect()
    }

    /// Stage 3: best-scoring legal direction
    fn safest_direction<G: GridQuery + ?Sized>(
        &self,
        grid: &G,
        head: Cell,
        snake_len: usize,
    ) -> Option<Direction> {
        let _guard = ProfileGuard::new(Category::Fallback);

        let candidates: Vec<Candidate> = Self::legal_moves(grid)
            .into_iter()
            .map(|dir| self.score_direction(grid, head, dir, snake_len))
            .collect();
        if candidates.is_empty() {
            return None;
        }

        for c in &candidates {
            debug!(
                "  {} -> space {}, score {:.2}",
                c.direction.as_str(),
                c.space,
                c.score
            );
        }

        let min_space = self.config.fallback.min_space(snake_len);
        let viable: Vec<Candidate> = candidates
            .iter()
            .copied()
            .filter(|c| c.space >= min_space)
            .collect();
        let pool = if viable.is_empty() {
            debug!("No direction has {} cells of room, taking best legal", min_space);
            candidates
        } else {
            viable
        };

        let best_score = pool
            .iter()
            .map(|c| c.score)
            .fold(f64::NEG_INFINITY, f64::max);
        let tied: Vec<Direction> = pool
            .iter()
            .filter(|c| c.score == best_score)
            .map(|c| c.direction)
            .collect();

        if self.config.tie_break.randomize && tied.len() > 1 {
            let mut rng = self.rng_for(grid);
            tied.choose(&mut rng).copied()
        } else {
            tied.first().copied()
        }
    }

    fn score_direction<G: GridQuery + ?Sized>(
        &self,
        grid: &G,
        head: Cell,
        direction: Direction,
        snake_len: usize,
    ) -> Candidate {
        let fallback = &self.config.fallback;
        let next = head.step(direction);

        let space = reachable_count(grid, next, space_cap(grid, &self.config), &HashSet::new());
        let mut score = space as f64 * fallback.space_weight;

        if let Some(tail) = grid.tail() {
            if tail != head && next.manhattan(&tail) < head.manhattan(&tail) {
                score += fallback.tail_closer_bonus;
            }
        }

        if grid.is_near_wall(&next, fallback.wall_margin) {
            score -= fallback.wall_penalty;
        }

        let body_neighbors = next
            .neighbors()
            .iter()
            .filter(|n| **n != head && grid.is_body(n))
            .count();
        score -= fallback.body_adjacent_penalty * body_neighbors as f64;

        if snake_len >= fallback.center_bias_min_length {
            let center = Cell::new(grid.rows() / 2, grid.cols() / 2);
            score -= fallback.center_weight * next.manhattan(&center) as f64;
        }

        Candidate { direction, space, score }
    }

    /// Fresh RNG for one decision, derived from the seed and the snapshot
    fn rng_for<G: GridQuery + ?Sized>(&self, grid: &G) -> StdRng {
        let mut mix = self.seed;
        for cell in grid.snake_body() {
            mix = mix
                .rotate_left(7)
                .wrapping_add(((cell.row as u64) << 32) ^ (cell.col as u32 as u64));
        }
        StdRng::seed_from_u64(mix)
    }
}
