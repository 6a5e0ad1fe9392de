// Bounded flood fill used to estimate how much room the snake has
//
// The cap keeps each call O(cap) no matter how large the board is, so the
// per-turn cost stays bounded even on big boards with a long body.

use std::collections::{HashSet, VecDeque};

use crate::config::Config;
use crate::simple_profiler::{Category, ProfileGuard};
use crate::types::{Cell, GridQuery};

/// Counts traversable cells connected to `start`, stopping at `cap`
///
/// # Arguments
/// * `grid` - Board snapshot
/// * `start` - Cell to fill from; counted if traversable even when excluded
/// * `cap` - Maximum number of cells to count
/// * `excluded` - Cells treated as already visited (a hypothetical path)
///
/// # Returns
/// Number of visited cells, 0 when `start` is not traversable
pub fn reachable_count<G: GridQuery + ?Sized>(
    grid: &G,
    start: Cell,
    cap: usize,
    excluded: &HashSet<Cell>,
) -> usize {
    let _guard = ProfileGuard::new(Category::FloodFill);

    if cap == 0 || !grid.is_traversable(&start) {
        return 0;
    }

    let mut visited: HashSet<Cell> = excluded.clone();
    visited.insert(start);
    let mut queue = VecDeque::new();
    queue.push_back(start);
    let mut count = 0;

    while let Some(cell) = queue.pop_front() {
        count += 1;
        if count >= cap {
            break;
        }

        for neighbor in cell.neighbors() {
            if grid.is_traversable(&neighbor) && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    count
}

/// Flood fill cap scaled by snake length and clamped to the board area
pub fn space_cap<G: GridQuery + ?Sized>(grid: &G, config: &Config) -> usize {
    let scaled = grid.snake_len() * config.reachability.cap_length_multiplier;
    scaled.max(config.reachability.min_cap).min(grid.area())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoardSnapshot, Direction};

    fn open_board(rows: i32, cols: i32) -> BoardSnapshot {
        BoardSnapshot::new(rows, cols, vec![Cell::new(0, 0)], Direction::Right).unwrap()
    }

    #[test]
    fn test_counts_whole_open_region() {
        let board = open_board(4, 4);
        // 16 cells minus the single body cell
        assert_eq!(reachable_count(&board, Cell::new(3, 3), 100, &HashSet::new()), 15);
    }

    #[test]
    fn test_respects_cap() {
        let board = open_board(10, 10);
        for cap in [1, 5, 17, 50] {
            assert_eq!(reachable_count(&board, Cell::new(5, 5), cap, &HashSet::new()), cap);
        }
    }

    #[test]
    fn test_non_traversable_start_is_zero() {
        let board = open_board(4, 4);
        assert_eq!(reachable_count(&board, Cell::new(0, 0), 10, &HashSet::new()), 0);
        assert_eq!(reachable_count(&board, Cell::new(-1, 2), 10, &HashSet::new()), 0);
        assert_eq!(reachable_count(&board, Cell::new(2, 2), 0, &HashSet::new()), 0);
    }

    #[test]
    fn test_excluded_cells_block_the_fill() {
        // Wall the bottom-right corner off with a hypothetical path
        let board = open_board(3, 3);
        let excluded: HashSet<Cell> = vec![Cell::new(1, 2), Cell::new(2, 1)].into_iter().collect();
        assert_eq!(reachable_count(&board, Cell::new(2, 2), 100, &excluded), 1);

        // The start cell itself may be part of the excluded path
        let mut with_start = excluded.clone();
        with_start.insert(Cell::new(2, 2));
        assert_eq!(reachable_count(&board, Cell::new(2, 2), 100, &with_start), 1);
    }

    #[test]
    fn test_body_splits_regions() {
        // Vertical body wall down column 2 of a 3x5 board
        let board = BoardSnapshot::new(
            3,
            5,
            vec![Cell::new(0, 2), Cell::new(1, 2), Cell::new(2, 2)],
            Direction::Down,
        )
        .unwrap();
        assert_eq!(reachable_count(&board, Cell::new(0, 0), 100, &HashSet::new()), 6);
        assert_eq!(reachable_count(&board, Cell::new(1, 4), 100, &HashSet::new()), 6);
    }

    #[test]
    fn test_space_cap_bounds() {
        let config = Config::default_hardcoded();
        let small = open_board(2, 2);
        assert_eq!(space_cap(&small, &config), 4);

        let board = open_board(10, 10);
        assert_eq!(space_cap(&board, &config), config.reachability.min_cap);
    }
}
