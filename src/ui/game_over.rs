use super::{key_hints, minutes_seconds};
use crate::consts;
use crate::game::{EndReason, GameOverReport};
use crate::util::center_rect;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Clear, Widget,
    },
};

/// Pop-up summarizing a finished session, drawn over the final board
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GameOverScreen<'a>(pub(crate) &'a GameOverReport);

impl GameOverScreen<'_> {
    const WIDTH: u16 = 44;

    fn lines(&self) -> Vec<Line<'static>> {
        let report = self.0;
        let headline = match report.reason {
            EndReason::OutOfLives => "Out of lives!",
            EndReason::TimeUp => "Time's up!",
            EndReason::BoardCleared => "You cleared the board!",
        };
        let high = if report.new_high_score {
            Span::styled(
                format!("New high score! (was {})", report.previous_high_score),
                consts::HIGHLIGHT_STYLE,
            )
        } else {
            Span::raw(format!("High score: {}", report.previous_high_score))
        };
        let hints = if report.final_score > 0 {
            key_hints(&[("Enter", "Save score"), ("r", "Menu"), ("q", "Quit")])
        } else {
            key_hints(&[("Enter", "Menu"), ("q", "Quit")])
        };
        vec![
            Line::raw(headline).centered(),
            Line::default(),
            Line::raw(format!("Difficulty:    {}", report.difficulty)),
            Line::raw(format!("Final score:   {}", report.final_score)),
            Line::from_iter([Span::raw("               "), high]),
            Line::raw(format!(
                "Snake length:  {} (best {})",
                report.snake_length, report.longest_snake_length
            )),
            Line::raw(format!(
                "Time played:   {}",
                minutes_seconds(report.played_secs)
            )),
            Line::default(),
            hints.centered(),
        ]
    }
}

impl Widget for GameOverScreen<'_> {
    // `area` is the whole display area; the pop-up centers itself within it
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        let height = u16::try_from(lines.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let block_area = center_rect(
            area,
            Size {
                width: Self::WIDTH,
                height,
            },
        );
        let title = if self.0.reason.is_win() {
            " YOU WIN "
        } else {
            " GAME OVER "
        };
        let block = Block::bordered()
            .title(title)
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(block_area);
        Clear.render(block_area, buf);
        block.render(block_area, buf);
        for (line, row) in lines.into_iter().zip(inner.rows()) {
            line.render(row, buf);
        }
    }
}
