// Grid and snake types consumed by the move-selection engine
//
// The board snapshot is supplied fresh every turn by the host and is never
// mutated by the engine. Everything the engine needs to know about the board
// goes through the `GridQuery` trait.

use serde::{Deserialize, Serialize};

/// Grid coordinate. May lie off-board; the grid decides validity.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Cell { row, col }
    }

    /// The four 4-connected cells in `Direction::all()` order
    pub fn neighbors(&self) -> [Cell; 4] {
        let dirs = Direction::all();
        [
            self.step(dirs[0]),
            self.step(dirs[1]),
            self.step(dirs[2]),
            self.step(dirs[3]),
        ]
    }

    /// Cell reached by moving one step in `dir`
    pub fn step(&self, dir: Direction) -> Cell {
        dir.apply(self)
    }

    /// Direction leading from this cell to an adjacent one
    pub fn direction_to(&self, other: &Cell) -> Option<Direction> {
        Direction::all()
            .iter()
            .copied()
            .find(|dir| dir.apply(self) == *other)
    }

    pub fn manhattan(&self, other: &Cell) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

/// The four possible movement directions
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Converts direction to string representation for API response
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Case-insensitive parse of "up" / "down" / "left" / "right"
    pub fn parse(s: &str) -> Result<Direction, String> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }

    /// Calculates the next cell when moving in this direction.
    /// Rows grow downwards, so `Up` decreases the row.
    pub fn apply(&self, cell: &Cell) -> Cell {
        match self {
            Direction::Up => Cell { row: cell.row - 1, col: cell.col },
            Direction::Down => Cell { row: cell.row + 1, col: cell.col },
            Direction::Left => Cell { row: cell.row, col: cell.col - 1 },
            Direction::Right => Cell { row: cell.row, col: cell.col + 1 },
        }
    }
}

/// Contents of a single grid cell
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Empty,
    Food,
    Snake,
}

/// Read-only view of the board used by every engine component
pub trait GridQuery {
    fn rows(&self) -> i32;
    fn cols(&self) -> i32;

    /// Occupancy at `cell`, `None` when off-board
    fn kind_at(&self, cell: &Cell) -> Option<CellKind>;

    /// Snake body ordered head to tail
    fn snake_body(&self) -> &[Cell];

    fn heading(&self) -> Direction;

    fn in_bounds(&self, cell: &Cell) -> bool {
        cell.row >= 0 && cell.row < self.rows() && cell.col >= 0 && cell.col < self.cols()
    }

    fn is_body(&self, cell: &Cell) -> bool {
        self.kind_at(cell) == Some(CellKind::Snake)
    }

    /// On-board and not occupied by the snake
    fn is_traversable(&self, cell: &Cell) -> bool {
        matches!(self.kind_at(cell), Some(kind) if kind != CellKind::Snake)
    }

    fn head(&self) -> Option<Cell> {
        self.snake_body().first().copied()
    }

    fn tail(&self) -> Option<Cell> {
        self.snake_body().last().copied()
    }

    fn snake_len(&self) -> usize {
        self.snake_body().len()
    }

    fn area(&self) -> usize {
        (self.rows().max(0) as usize) * (self.cols().max(0) as usize)
    }

    /// On-board 4-neighbors of `cell`
    fn board_neighbors(&self, cell: &Cell) -> Vec<Cell> {
        cell.neighbors()
            .iter()
            .copied()
            .filter(|n| self.in_bounds(n))
            .collect()
    }

    /// Number of body cells 4-adjacent to `cell`
    fn adjacent_body_count(&self, cell: &Cell) -> usize {
        cell.neighbors().iter().filter(|n| self.is_body(n)).count()
    }

    fn is_near_body(&self, cell: &Cell) -> bool {
        self.adjacent_body_count(cell) > 0
    }

    /// True when `cell` lies within `margin` cells of the board edge
    fn is_near_wall(&self, cell: &Cell, margin: i32) -> bool {
        cell.row <= margin
            || cell.row >= self.rows() - 1 - margin
            || cell.col <= margin
            || cell.col >= self.cols() - 1 - margin
    }

    /// Food cells in row-major scan order
    fn food_cells(&self) -> Vec<Cell> {
        let mut food = Vec::new();
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                let cell = Cell { row, col };
                if self.kind_at(&cell) == Some(CellKind::Food) {
                    food.push(cell);
                }
            }
        }
        food
    }
}

/// Immutable per-turn board snapshot
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub rows: i32,
    pub cols: i32,
    pub grid: Vec<Vec<CellKind>>,
    pub snake: Vec<Cell>,
    pub heading: Direction,
}

impl BoardSnapshot {
    /// Builds an empty board with the snake body marked on it
    ///
    /// # Arguments
    /// * `rows`, `cols` - Board dimensions
    /// * `snake` - Body cells ordered head to tail
    /// * `heading` - Current direction of travel
    pub fn new(rows: i32, cols: i32, snake: Vec<Cell>, heading: Direction) -> Result<Self, String> {
        if rows <= 0 || cols <= 0 {
            return Err(format!("Invalid board dimensions {}x{}", rows, cols));
        }
        if snake.is_empty() {
            return Err("Snake body must not be empty".to_string());
        }

        let mut grid = vec![vec![CellKind::Empty; cols as usize]; rows as usize];
        for cell in &snake {
            if cell.row < 0 || cell.row >= rows || cell.col < 0 || cell.col >= cols {
                return Err(format!("Snake cell ({}, {}) is off-board", cell.row, cell.col));
            }
            grid[cell.row as usize][cell.col as usize] = CellKind::Snake;
        }

        Ok(BoardSnapshot { rows, cols, grid, snake, heading })
    }

    /// Places food on every given cell
    pub fn with_food(mut self, food: &[Cell]) -> Result<Self, String> {
        for cell in food {
            self.add_food(*cell)?;
        }
        Ok(self)
    }

    pub fn add_food(&mut self, cell: Cell) -> Result<(), String> {
        match self.kind_at(&cell) {
            None => Err(format!("Food cell ({}, {}) is off-board", cell.row, cell.col)),
            Some(CellKind::Snake) => Err(format!(
                "Food cell ({}, {}) overlaps the snake",
                cell.row, cell.col
            )),
            Some(_) => {
                self.grid[cell.row as usize][cell.col as usize] = CellKind::Food;
                Ok(())
            }
        }
    }

    /// Checks a deserialized snapshot for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.rows <= 0 || self.cols <= 0 {
            return Err(format!("Invalid board dimensions {}x{}", self.rows, self.cols));
        }
        if self.grid.len() != self.rows as usize {
            return Err(format!(
                "Grid has {} rows, expected {}",
                self.grid.len(),
                self.rows
            ));
        }
        if let Some((i, row)) = self
            .grid
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.cols as usize)
        {
            return Err(format!(
                "Grid row {} has {} columns, expected {}",
                i,
                row.len(),
                self.cols
            ));
        }
        if self.snake.is_empty() {
            return Err("Snake body must not be empty".to_string());
        }
        for cell in &self.snake {
            if self.kind_at(cell) != Some(CellKind::Snake) {
                return Err(format!(
                    "Snake cell ({}, {}) is off-board or not marked as snake",
                    cell.row, cell.col
                ));
            }
        }
        Ok(())
    }
}

impl GridQuery for BoardSnapshot {
    fn rows(&self) -> i32 {
        self.rows
    }

    fn cols(&self) -> i32 {
        self.cols
    }

    fn kind_at(&self, cell: &Cell) -> Option<CellKind> {
        if !self.in_bounds(cell) {
            return None;
        }
        self.grid
            .get(cell.row as usize)
            .and_then(|row| row.get(cell.col as usize))
            .copied()
    }

    fn snake_body(&self) -> &[Cell] {
        &self.snake
    }

    fn heading(&self) -> Direction {
        self.heading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_pairs() {
        for dir in Direction::all() {
            assert_ne!(dir, dir.opposite());
            assert_eq!(dir, dir.opposite().opposite());
        }
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn test_direction_to_adjacent() {
        let c = Cell::new(3, 3);
        assert_eq!(c.direction_to(&Cell::new(2, 3)), Some(Direction::Up));
        assert_eq!(c.direction_to(&Cell::new(4, 3)), Some(Direction::Down));
        assert_eq!(c.direction_to(&Cell::new(3, 2)), Some(Direction::Left));
        assert_eq!(c.direction_to(&Cell::new(3, 4)), Some(Direction::Right));
        assert_eq!(c.direction_to(&Cell::new(5, 3)), None);
        assert_eq!(c.direction_to(&c), None);
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(Direction::parse("UP").unwrap(), Direction::Up);
        assert_eq!(Direction::parse("Right").unwrap(), Direction::Right);
        assert!(Direction::parse("north").is_err());
    }

    #[test]
    fn test_snapshot_marks_body_and_food() {
        let board = BoardSnapshot::new(
            5,
            5,
            vec![Cell::new(2, 2), Cell::new(2, 1)],
            Direction::Right,
        )
        .unwrap()
        .with_food(&[Cell::new(0, 4)])
        .unwrap();

        assert!(board.is_body(&Cell::new(2, 1)));
        assert!(!board.is_traversable(&Cell::new(2, 2)));
        assert!(board.is_traversable(&Cell::new(0, 4)));
        assert!(!board.is_traversable(&Cell::new(-1, 0)));
        assert_eq!(board.food_cells(), vec![Cell::new(0, 4)]);
        assert_eq!(board.head(), Some(Cell::new(2, 2)));
        assert_eq!(board.tail(), Some(Cell::new(2, 1)));
        assert!(board.validate().is_ok());
    }

    #[test]
    fn test_snapshot_rejects_bad_input() {
        assert!(BoardSnapshot::new(0, 5, vec![Cell::new(0, 0)], Direction::Up).is_err());
        assert!(BoardSnapshot::new(5, 5, vec![], Direction::Up).is_err());
        assert!(BoardSnapshot::new(5, 5, vec![Cell::new(5, 0)], Direction::Up).is_err());

        let board = BoardSnapshot::new(5, 5, vec![Cell::new(1, 1)], Direction::Up).unwrap();
        assert!(board.clone().with_food(&[Cell::new(1, 1)]).is_err());

        let mut broken = board;
        broken.grid.pop();
        assert!(broken.validate().is_err());
    }

    #[test]
    fn test_near_wall_margin() {
        let board = BoardSnapshot::new(10, 10, vec![Cell::new(5, 5)], Direction::Up).unwrap();
        assert!(board.is_near_wall(&Cell::new(0, 5), 0));
        assert!(board.is_near_wall(&Cell::new(5, 9), 0));
        assert!(!board.is_near_wall(&Cell::new(1, 5), 0));
        assert!(board.is_near_wall(&Cell::new(1, 5), 1));
    }

    #[test]
    fn test_snapshot_json_roundtrip_uses_lowercase_names() {
        let board = BoardSnapshot::new(1, 2, vec![Cell::new(0, 0)], Direction::Left).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.contains("\"heading\":\"left\""));
        assert!(json.contains("\"snake\""));
        let parsed: BoardSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, board);
    }
}
