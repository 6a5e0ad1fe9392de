// Integration tests for the per-turn decision stages
//
// Each scenario builds a board snapshot by hand and checks both the chosen
// direction and the stage of the policy that produced it.

use snake_pathfinder::bot::{Bot, Stage};
use snake_pathfinder::config::Config;
use snake_pathfinder::types::{BoardSnapshot, Cell, Direction};
use std::time::Duration;

const BUDGET: Duration = Duration::from_millis(200);

fn bot() -> Bot {
    Bot::new(Config::default_hardcoded())
}

/// 10x10 board, single-cell snake at (5,5) heading right, food at (5,8)
#[test]
fn test_open_board_heads_straight_for_food() {
    let board = BoardSnapshot::new(10, 10, vec![Cell::new(5, 5)], Direction::Right)
        .unwrap()
        .with_food(&[Cell::new(5, 8)])
        .unwrap();

    let decision = bot().decide(&board, BUDGET);
    assert_eq!(decision.direction, Direction::Right);
    assert_eq!(decision.stage, Stage::FoodSeek);
}

/// Food sealed in the corner behind the body, so only the tail is reachable
///
///   col: 0 1 2 3 4 5
///   r0   F S S T . .
///   r1   S S . . . .
///   r2   H . . . . .
#[test]
fn test_sealed_food_falls_back_to_tail_chase() {
    let body = vec![
        Cell::new(2, 0),
        Cell::new(1, 0),
        Cell::new(1, 1),
        Cell::new(0, 1),
        Cell::new(0, 2),
        Cell::new(0, 3),
    ];
    let board = BoardSnapshot::new(6, 6, body, Direction::Down)
        .unwrap()
        .with_food(&[Cell::new(0, 0)])
        .unwrap();

    let decision = bot().decide(&board, BUDGET);
    assert_eq!(decision.stage, Stage::TailChase);
    assert_eq!(decision.direction, Direction::Right);
}

/// Single-cell snake at the end of a one-row corridor; the only open cell is behind it
#[test]
fn test_dead_end_keeps_heading() {
    let board = BoardSnapshot::new(1, 5, vec![Cell::new(0, 4)], Direction::Right).unwrap();

    let decision = bot().decide(&board, BUDGET);
    // Expected to collide: the reverse is forbidden and nothing else is legal
    assert_eq!(decision.direction, Direction::Right);
    assert_eq!(decision.stage, Stage::Degenerate);
}

/// No food at all and a single-cell snake still yields a legal, non-reverse move
#[test]
fn test_empty_board_single_cell_snake() {
    let board = BoardSnapshot::new(5, 5, vec![Cell::new(2, 2)], Direction::Left).unwrap();

    let decision = bot().decide(&board, BUDGET);
    assert_ne!(decision.direction, Direction::Right);
    assert_eq!(decision.stage, Stage::SafestDirection);
}

/// A food path into a sealed pocket is rejected even though it reaches the food
///
///   col: 0 1 2 3 4
///   r0   . . S S .
///   r1   F H S S .
///   r2   T S S S .
///   r3   . . . . .
/// After eating, only the 3-cell pocket is left for a snake of length 9.
#[test]
fn test_trapping_food_path_is_rejected() {
    let body = vec![
        Cell::new(1, 1),
        Cell::new(1, 2),
        Cell::new(0, 2),
        Cell::new(0, 3),
        Cell::new(1, 3),
        Cell::new(2, 3),
        Cell::new(2, 2),
        Cell::new(2, 1),
        Cell::new(2, 0),
    ];
    let board = BoardSnapshot::new(4, 5, body, Direction::Left)
        .unwrap()
        .with_food(&[Cell::new(1, 0)])
        .unwrap();

    let decision = bot().decide(&board, BUDGET);
    assert_ne!(decision.stage, Stage::FoodSeek);
    // The tail at (2,0) is right next to the pocket
    assert_eq!(decision.stage, Stage::TailChase);
    assert_eq!(decision.direction, Direction::Left);
}

/// The stricter "length + 1" setting is honoured
#[test]
fn test_strict_food_space_extra() {
    // Food at the end of a 1x3 corridor: after eating, only the food cell is free
    let board = BoardSnapshot::new(1, 3, vec![Cell::new(0, 0)], Direction::Right)
        .unwrap()
        .with_food(&[Cell::new(0, 2)])
        .unwrap();

    let relaxed = bot().decide(&board, BUDGET);
    assert_eq!(relaxed.stage, Stage::FoodSeek);

    let mut config = Config::default_hardcoded();
    config.safety.food_space_extra = 1;
    let strict = Bot::new(config).decide(&board, BUDGET);
    assert_ne!(strict.stage, Stage::FoodSeek);
    assert_eq!(strict.direction, Direction::Right);
}

/// Tail is reachable, but only through a 3-cell strip too short for the body
///
///   col: 0 1 2 3
///   r0   H . . .
///   r1   S S S T
#[test]
fn test_strict_tail_chase_rejects_short_strip() {
    let body = vec![
        Cell::new(0, 0),
        Cell::new(1, 0),
        Cell::new(1, 1),
        Cell::new(1, 2),
        Cell::new(1, 3),
    ];
    let board = BoardSnapshot::new(2, 4, body, Direction::Up).unwrap();

    let relaxed = bot().decide(&board, BUDGET);
    assert_eq!(relaxed.stage, Stage::TailChase);
    assert_eq!(relaxed.direction, Direction::Right);

    let mut config = Config::default_hardcoded();
    config.safety.tail_chase_space_check = true;
    let strict = Bot::new(config).decide(&board, BUDGET);
    assert_eq!(strict.stage, Stage::SafestDirection);
    assert_eq!(strict.direction, Direction::Right);
}

/// Same snapshot twice, same answer (also with randomized tie-breaking)
#[test]
fn test_decisions_are_idempotent() {
    let board = BoardSnapshot::new(7, 7, vec![Cell::new(3, 3)], Direction::Up).unwrap();

    let mut config = Config::default_hardcoded();
    config.tie_break.randomize = true;
    let b = Bot::with_seed(config, 1234);

    let first = b.decide_move(&board, BUDGET);
    for _ in 0..10 {
        assert_eq!(b.decide_move(&board, BUDGET), first);
    }
}
