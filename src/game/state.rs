use std::time::Duration;

use super::config::{ConfigError, GameConfig};
use super::direction::Direction;
use super::spawner::FoodSpawner;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0. Never empty.
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction.
    /// Extra segments are laid out behind the head.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        let (dx, dy) = direction.delta();
        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(-dx, -dy));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Check if any segment, head included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Move one cell in the current direction. Every segment after the head
    /// takes its predecessor's old place. Returns where the tail was before
    /// the move.
    pub fn advance(&mut self) -> Position {
        let old_tail = self.tail();
        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }
        self.body[0] = self.head().moved_in_direction(self.direction);
        old_tail
    }

    /// Append a segment at the end of the body
    pub fn grow(&mut self, at: Position) {
        self.body.push(at);
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake covers every cell, no food can be placed
    BoardFilled,
}

/// Complete game state for one round, plus what is needed to start the next
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    /// `None` only once the snake fills the whole grid
    pub food: Option<Position>,
    pub score: u32,
    pub steps: u32,
    /// Set when the round has ended, cleared by `reset`
    pub game_over: Option<GameOverReason>,
    pub(super) config: GameConfig,
    pub(super) spawner: FoodSpawner,
}

impl GameState {
    /// Start a round with food placed from an entropy-seeded generator
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let spawner = FoodSpawner::new(&config)?;
        Ok(Self::with_spawner(config, spawner))
    }

    /// Start a round whose food sequence is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        let spawner = FoodSpawner::with_seed(&config, seed)?;
        Ok(Self::with_spawner(config, spawner))
    }

    fn with_spawner(config: GameConfig, spawner: FoodSpawner) -> Self {
        let mut state = Self {
            snake: Snake::new(Position::new(0, 0), Direction::Up, 1),
            food: None,
            score: 0,
            steps: 0,
            game_over: None,
            config,
            spawner,
        };
        state.reset();
        state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid_size(&self) -> usize {
        self.config.grid_size
    }

    /// Fixed time between two ticks
    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval()
    }

    /// The cell the snake starts from
    pub fn center(&self) -> Position {
        let mid = (self.config.grid_size / 2) as i32;
        Position::new(mid, mid)
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        let size = self.config.grid_size as i32;
        pos.x >= 0 && pos.x < size && pos.y >= 0 && pos.y < size
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }
}
