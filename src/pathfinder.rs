//! Risk-weighted A* from the snake's head to a target cell
//!
//! Edge costs are 1 plus surcharges for stepping next to the snake's body, near
//! the board edge and (for long snakes) into tight corridors. Manhattan distance
//! stays admissible because every edge costs at least 1.
//!
//! Search nodes live in an arena owned by a single `find_path` call; parents are
//! arena indices, so the parent chain is a plain acyclic list back to the start.

use log::debug;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::config::Config;
use crate::reachability::reachable_count;
use crate::simple_profiler::{Category, ProfileGuard};
use crate::types::{Cell, Direction, GridQuery};

/// Cost surcharges applied by the search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathWeights {
    pub snake_proximity_penalty: f64,
    pub wall_proximity_penalty: f64,
    pub wall_margin: i32,
    pub corridor_length_threshold: usize,
    pub corridor_probe_cap: usize,
    pub corridor_penalty: f64,
}

impl PathWeights {
    pub fn from_config(config: &Config) -> Self {
        let p = &config.pathfinding;
        PathWeights {
            snake_proximity_penalty: p.snake_proximity_penalty,
            wall_proximity_penalty: p.wall_proximity_penalty,
            wall_margin: p.wall_margin,
            corridor_length_threshold: p.corridor_length_threshold,
            corridor_probe_cap: p.corridor_probe_cap,
            corridor_penalty: p.corridor_penalty,
        }
    }

    /// Plain unit-cost shortest path
    pub fn uniform() -> Self {
        PathWeights {
            snake_proximity_penalty: 0.0,
            wall_proximity_penalty: 0.0,
            wall_margin: 0,
            corridor_length_threshold: usize::MAX,
            corridor_probe_cap: 0,
            corridor_penalty: 0.0,
        }
    }
}

/// Arena entry of the search
#[derive(Debug, Clone, Copy)]
pub struct SearchNode {
    pub cell: Cell,
    pub parent: Option<usize>,
    pub g_score: f64,
    pub f_score: f64,
}

/// Frontier entry; `BinaryHeap` is a max-heap so the ordering is reversed
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f_score: f64,
    h_score: f64,
    seq: usize,
    node: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lowest f first, then lowest h, then oldest entry
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.h_score.total_cmp(&self.h_score))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Result of a successful search. Owns the node arena of that search.
#[derive(Debug, Clone)]
pub struct Path {
    nodes: Vec<SearchNode>,
    goal: usize,
}

impl Path {
    fn goal_node(&self) -> &SearchNode {
        &self.nodes[self.goal]
    }

    pub fn goal_cell(&self) -> Cell {
        self.goal_node().cell
    }

    /// Accumulated weighted cost of the path
    pub fn cost(&self) -> f64 {
        self.goal_node().g_score
    }

    /// Cells from start to goal, both included
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells = Vec::new();
        let mut current = Some(self.goal);
        while let Some(idx) = current {
            cells.push(self.nodes[idx].cell);
            current = self.nodes[idx].parent;
        }
        cells.reverse();
        cells
    }

    /// Number of cells on the path, start included
    pub fn cell_count(&self) -> usize {
        let mut len = 0;
        let mut current = Some(self.goal);
        while let Some(idx) = current {
            len += 1;
            current = self.nodes[idx].parent;
        }
        len
    }

    /// The cell right after the start, `None` when start == goal
    pub fn first_step(&self) -> Option<Cell> {
        let mut idx = self.goal;
        loop {
            let parent = self.nodes[idx].parent?;
            if self.nodes[parent].parent.is_none() {
                return Some(self.nodes[idx].cell);
            }
            idx = parent;
        }
    }

    /// Direction from the start cell to `first_step`
    pub fn first_direction(&self) -> Option<Direction> {
        let step = self.first_step()?;
        let start = self.nodes.first()?.cell;
        start.direction_to(&step)
    }
}

/// Cost of moving into `neighbor`
///
/// The corridor term is skipped for the goal, which may be the tail and so
/// has no room of its own.
fn step_cost<G: GridQuery + ?Sized>(
    grid: &G,
    neighbor: &Cell,
    goal: &Cell,
    weights: &PathWeights,
    snake_len: usize,
) -> f64 {
    let mut cost = 1.0;

    if grid.is_near_body(neighbor) {
        cost += weights.snake_proximity_penalty;
    }
    if grid.is_near_wall(neighbor, weights.wall_margin) {
        cost += weights.wall_proximity_penalty;
    }
    if neighbor != goal
        && snake_len > weights.corridor_length_threshold
        && weights.corridor_probe_cap > 0
    {
        let wanted = snake_len.min(weights.corridor_probe_cap);
        let room = reachable_count(grid, *neighbor, weights.corridor_probe_cap, &HashSet::new());
        let shortfall = wanted.saturating_sub(room);
        cost += weights.corridor_penalty * shortfall as f64;
    }

    cost
}

/// Weighted A* from `start` to `goal`
///
/// Body cells and off-board cells are never expanded, except the goal itself,
/// which may be a body cell (the tail vacates before the head arrives).
///
/// # Returns
/// * `Some(Path)` ending at `goal`, or `None` when the frontier empties or the
///   frontier has been popped `rows * cols` times
pub fn find_path<G: GridQuery + ?Sized>(
    grid: &G,
    start: Cell,
    goal: Cell,
    weights: &PathWeights,
    snake_len: usize,
) -> Option<Path> {
    let _guard = ProfileGuard::new(Category::Pathfind);

    if !grid.in_bounds(&start) || !grid.in_bounds(&goal) {
        return None;
    }

    let mut nodes: Vec<SearchNode> = Vec::new();
    let mut open = BinaryHeap::new();
    let mut g_scores: HashMap<Cell, f64> = HashMap::new();
    let mut closed: HashSet<Cell> = HashSet::new();
    let mut seq = 0;

    let h = start.manhattan(&goal) as f64;
    nodes.push(SearchNode {
        cell: start,
        parent: None,
        g_score: 0.0,
        f_score: h,
    });
    g_scores.insert(start, 0.0);
    open.push(OpenEntry { f_score: h, h_score: h, seq, node: 0 });

    let max_iterations = grid.area();
    let mut iterations = 0;

    while let Some(entry) = open.pop() {
        let current = nodes[entry.node];

        if current.cell == goal {
            return Some(Path { nodes, goal: entry.node });
        }

        iterations += 1;
        if iterations > max_iterations {
            debug!("Path search hit iteration limit ({})", max_iterations);
            return None;
        }

        // Stale duplicate of a cell that was already finalized
        if !closed.insert(current.cell) {
            continue;
        }

        for neighbor in grid.board_neighbors(&current.cell) {
            if closed.contains(&neighbor) {
                continue;
            }
            if neighbor != goal && !grid.is_traversable(&neighbor) {
                continue;
            }

            let tentative = current.g_score + step_cost(grid, &neighbor, &goal, weights, snake_len);
            let known = g_scores.get(&neighbor).copied().unwrap_or(f64::INFINITY);
            if tentative < known {
                g_scores.insert(neighbor, tentative);
                let h = neighbor.manhattan(&goal) as f64;
                nodes.push(SearchNode {
                    cell: neighbor,
                    parent: Some(entry.node),
                    g_score: tentative,
                    f_score: tentative + h,
                });
                seq += 1;
                open.push(OpenEntry {
                    f_score: tentative + h,
                    h_score: h,
                    seq,
                    node: nodes.len() - 1,
                });
            }
        }
    }

    None
}
