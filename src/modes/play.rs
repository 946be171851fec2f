use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::game::{Direction, GameState, TickOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionStats;
use crate::render::Renderer;

/// Render at roughly 30 FPS
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Interactive play in the terminal.
///
/// The select loop is the only owner of the game state, so key presses and
/// ticks are applied one after the other.
pub struct PlayMode {
    state: GameState,
    stats: SessionStats,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    /// Latest turn requested since the last tick
    pending_direction: Option<Direction>,
}

impl PlayMode {
    pub fn new(state: GameState) -> Self {
        let renderer = Renderer::new(state.config().cell_width);

        Self {
            state,
            stats: SessionStats::new(),
            renderer,
            input_handler: InputHandler::new(),
            should_quit: false,
            pending_direction: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.state.tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of an interval fires immediately
        tick_timer.tick().await;

        let mut render_timer = interval(RENDER_INTERVAL);

        info!(
            grid_size = self.state.grid_size(),
            tick_ms = self.state.tick_interval().as_millis() as u64,
            "Game loop started"
        );

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                _ = tick_timer.tick() => {
                    if self.update_game() {
                        // New round, count the full interval from now
                        tick_timer.reset();
                    }
                }

                _ = render_timer.tick() => {
                    self.stats.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.stats);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!(
                    rounds = self.stats.rounds_played,
                    best_score = self.stats.best_score,
                    "Quitting"
                );
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Turn(direction) => {
                self.pending_direction = Some(direction);
            }
            KeyAction::Restart => self.reset_game(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    /// Run one tick. Returns true when the round ended and a new one began.
    ///
    /// Only the last key pressed since the previous tick is applied, so the
    /// reversal check always compares against the direction actually moved.
    fn update_game(&mut self) -> bool {
        if let Some(direction) = self.pending_direction.take() {
            if !self.state.set_direction(direction) {
                debug!(?direction, "Ignored reversal");
            }
        }

        match self.state.tick() {
            TickOutcome::Continue => false,
            TickOutcome::GameOver(reason) => {
                self.stats.on_round_over(self.state.score, reason);
                self.reset_game();
                true
            }
        }
    }

    fn reset_game(&mut self) {
        self.state.reset();
        self.stats.on_round_start();
        self.pending_direction = None;
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameOverReason, Position, Snake};
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    fn mode() -> PlayMode {
        PlayMode::new(GameState::with_seed(GameConfig::default(), 21).unwrap())
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert!(!mode.state.is_game_over());
        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.stats.rounds_played, 0);
    }

    #[test]
    fn test_turn_applies_on_next_tick() {
        let mut mode = mode();
        mode.state.food = Some(Position::new(0, 0));

        mode.handle_event(key(KeyCode::Left, KeyEventKind::Press));
        assert_eq!(mode.state.snake.direction, Direction::Up);

        // Releases are ignored
        mode.handle_event(key(KeyCode::Down, KeyEventKind::Release));
        assert_eq!(mode.pending_direction, Some(Direction::Left));

        assert!(!mode.update_game());
        assert_eq!(mode.state.snake.direction, Direction::Left);
        assert_eq!(mode.state.snake.head(), Position::new(9, 10));
        assert_eq!(mode.pending_direction, None);
    }

    #[test]
    fn test_two_presses_in_one_tick_cannot_reverse() {
        let mut mode = mode();
        mode.state.snake = Snake::new(Position::new(10, 10), Direction::Up, 3);
        mode.state.food = Some(Position::new(0, 0));

        // Left then Down before the tick would be a 180-degree turn
        mode.handle_event(key(KeyCode::Left, KeyEventKind::Press));
        mode.handle_event(key(KeyCode::Down, KeyEventKind::Press));

        assert!(!mode.update_game());
        assert_eq!(mode.state.snake.direction, Direction::Up);
        assert_eq!(mode.state.snake.head(), Position::new(10, 9));
        assert_eq!(mode.stats.rounds_played, 0);
        assert_eq!(mode.stats.last_round, None);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('q'), KeyEventKind::Press));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_game_over_resets_round() {
        let mut mode = mode();
        mode.state.snake = Snake::new(Position::new(19, 4), Direction::Right, 3);
        mode.state.score = 2;

        assert!(mode.update_game());

        assert_eq!(mode.stats.rounds_played, 1);
        assert_eq!(mode.stats.best_score, 2);
        assert_eq!(mode.stats.last_round, Some((2, GameOverReason::Wall)));
        assert!(!mode.state.is_game_over());
        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.state.snake.len(), 1);
        assert_eq!(mode.state.snake.head(), Position::new(10, 10));
    }

    #[test]
    fn test_restart_key_does_not_count_a_round() {
        let mut mode = mode();
        mode.state.score = 10;

        mode.handle_event(key(KeyCode::Left, KeyEventKind::Press));

        mode.handle_event(key(KeyCode::Char('r'), KeyEventKind::Press));

        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.pending_direction, None);
        assert_eq!(mode.stats.rounds_played, 0);
    }
}
