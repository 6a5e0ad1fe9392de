// Food target selection
//
// Short snakes chase the nearest food. Longer snakes weigh the room around each
// food cell against its distance, trading speed for safety as they grow.

use std::collections::HashSet;

use crate::config::Config;
use crate::reachability::reachable_count;
use crate::simple_profiler::Category;
use crate::types::{Cell, GridQuery};

/// Nearest food by Manhattan distance; ties keep the first cell in scan order
pub fn nearest_food<G: GridQuery + ?Sized>(grid: &G, head: Cell) -> Option<Cell> {
    grid.food_cells()
        .into_iter()
        .min_by_key(|food| head.manhattan(food))
}

/// Score of a single food cell for a snake of `snake_len`
pub fn food_score<G: GridQuery + ?Sized>(
    grid: &G,
    head: Cell,
    food: Cell,
    snake_len: usize,
    config: &Config,
) -> f64 {
    let targeting = &config.targeting;
    let space = reachable_count(grid, food, targeting.food_space_cap, &HashSet::new()) as f64;
    let distance = head.manhattan(&food) as f64;

    space * targeting.space_weight(snake_len) - distance * targeting.distance_weight(snake_len)
}

/// Picks the food cell the pathfinder should aim for
///
/// # Returns
/// * `None` when the board holds no food
pub fn select_target<G: GridQuery + ?Sized>(
    grid: &G,
    head: Cell,
    snake_len: usize,
    config: &Config,
) -> Option<Cell> {
    crate::profile!(Category::TargetSelect, {
        let food = grid.food_cells();
        if food.is_empty() {
            return None;
        }

        if snake_len < config.targeting.scoring_length_threshold {
            return nearest_food(grid, head);
        }

        let mut best: Option<Cell> = None;
        let mut best_score = f64::NEG_INFINITY;
        for cell in food {
            let score = food_score(grid, head, cell, snake_len, config);
            if score > best_score {
                best_score = score;
                best = Some(cell);
            }
        }

        best.or_else(|| nearest_food(grid, head))
    })
}
