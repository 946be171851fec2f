use tracing::{debug, info};

use super::direction::Direction;
use super::state::{GameOverReason, GameState, Position, Snake};

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The round goes on
    Continue,
    /// The round is over, the caller should `reset`
    GameOver(GameOverReason),
}

impl TickOutcome {
    pub fn is_game_over(&self) -> bool {
        matches!(self, TickOutcome::GameOver(_))
    }
}

impl GameState {
    /// Put the round back in its initial state: a one-cell snake in the
    /// middle of the grid heading up, score zero, fresh food.
    pub fn reset(&mut self) {
        self.snake = Snake::new(self.center(), Direction::Up, 1);
        self.score = 0;
        self.steps = 0;
        self.game_over = None;
        self.food = self.spawner.spawn(&self.snake.body);

        debug!(head = ?self.snake.head(), food = ?self.food, "Round started");
    }

    /// Change heading. A 180-degree turn is ignored; returns whether the
    /// direction was accepted.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.snake.direction.is_opposite(direction) {
            return false;
        }
        self.snake.direction = direction;
        true
    }

    /// Advance the simulation by one step.
    ///
    /// Collisions are checked before food, so a head that leaves the grid or
    /// bites the body never eats. Once the round is over further ticks change
    /// nothing and keep reporting the same outcome.
    pub fn tick(&mut self) -> TickOutcome {
        if let Some(reason) = self.game_over {
            return TickOutcome::GameOver(reason);
        }

        let old_tail = self.snake.advance();
        self.steps += 1;
        let head = self.snake.head();

        if let Some(reason) = self.check_collision(head) {
            return self.end_round(reason);
        }

        if self.food == Some(head) {
            self.snake.grow(old_tail);
            self.score += 1;
            self.food = self.spawner.spawn(&self.snake.body);
            debug!(score = self.score, length = self.snake.len(), "Food eaten");

            if self.food.is_none() {
                return self.end_round(GameOverReason::BoardFilled);
            }
        }

        TickOutcome::Continue
    }

    fn check_collision(&self, head: Position) -> Option<GameOverReason> {
        if !self.is_in_bounds(head) {
            return Some(GameOverReason::Wall);
        }

        if self.snake.collides_with_body(head) {
            return Some(GameOverReason::SelfCollision);
        }

        None
    }

    fn end_round(&mut self, reason: GameOverReason) -> TickOutcome {
        self.game_over = Some(reason);
        info!(
            ?reason,
            score = self.score,
            length = self.snake.len(),
            steps = self.steps,
            "Game over"
        );
        TickOutcome::GameOver(reason)
    }
}
