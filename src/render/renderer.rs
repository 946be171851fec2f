use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameOverReason, GameState, Position};
use crate::metrics::SessionStats;

/// What occupies a grid cell, in drawing priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Head,
    Body,
    Food,
    Empty,
}

impl Cell {
    fn glyph(&self) -> char {
        match self {
            Cell::Head | Cell::Body | Cell::Food => '█',
            Cell::Empty => '·',
        }
    }

    fn style(&self) -> Style {
        match self {
            Cell::Head => Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
            Cell::Body => Style::default().fg(Color::Red),
            Cell::Food => Style::default().fg(Color::Green),
            Cell::Empty => Style::default().fg(Color::DarkGray),
        }
    }
}

pub struct Renderer {
    cell_width: usize,
}

impl Renderer {
    pub fn new(cell_width: u16) -> Self {
        Self {
            cell_width: usize::from(cell_width.max(1)),
        }
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, stats: &SessionStats) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, stats), chunks[0]);
        frame.render_widget(self.render_grid(state), chunks[1]);
        frame.render_widget(self.render_controls(), chunks[2]);
    }

    pub fn cell_at(state: &GameState, pos: Position) -> Cell {
        if pos == state.snake.head() {
            Cell::Head
        } else if state.snake.collides_with_body(pos) {
            Cell::Body
        } else if state.food == Some(pos) {
            Cell::Food
        } else {
            Cell::Empty
        }
    }

    /// One line per grid row, each cell `cell_width` columns wide
    pub fn grid_lines(&self, state: &GameState) -> Vec<Line<'static>> {
        let size = state.grid_size() as i32;

        (0..size)
            .map(|y| {
                let spans: Vec<Span<'static>> = (0..size)
                    .map(|x| {
                        let cell = Self::cell_at(state, Position::new(x, y));
                        let text: String =
                            std::iter::repeat_n(cell.glyph(), self.cell_width).collect();
                        Span::styled(text, cell.style())
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'static> {
        Paragraph::new(self.grid_lines(state))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &GameState, stats: &SessionStats) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let mut lines = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(stats.best_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Rounds: ", label),
            Span::styled(stats.rounds_played.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(stats.format_time(), value),
        ])];

        if let Some((score, reason)) = stats.last_round {
            lines.push(Line::from(Span::styled(
                format!("Last round: {} ({})", score, describe(reason)),
                Style::default().fg(Color::Gray),
            )));
        }

        Paragraph::new(lines).alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

fn describe(reason: GameOverReason) -> &'static str {
    match reason {
        GameOverReason::Wall => "hit the wall",
        GameOverReason::SelfCollision => "bit itself",
        GameOverReason::BoardFilled => "filled the board",
    }
}
