use super::key_hints;
use crate::command::Command;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Widget,
};

const PAGES: [(&str, &str); 6] = [
    (
        "Welcome to Snake!",
        "Learn how to play in this quick tutorial.",
    ),
    (
        "Basic Controls",
        "Use the arrow keys or WASD to steer the snake.",
    ),
    (
        "Collect Food",
        "Eat the food to grow longer and score points.",
    ),
    ("Avoid Collisions", "Don't hit the walls or your own tail!"),
    (
        "Score Points",
        "Build combos by eating food quickly: every two meals in a row raise your multiplier.",
    ),
    (
        "You're Ready!",
        "Choose your difficulty and start playing!",
    ),
];

/// The multi-page introduction shown at startup
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Tutorial {
    page: usize,
}

impl Tutorial {
    const TEXT_WIDTH: u16 = 60;

    /// Returns `true` once the user is done with the tutorial, either by
    /// paging past the end or by skipping it
    pub(crate) fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Right | Command::Enter | Command::Next | Command::Char(' ' | 'n') => {
                if self.page + 1 < PAGES.len() {
                    self.page += 1;
                } else {
                    return true;
                }
            }
            Command::Left | Command::Prev | Command::Char('b') => {
                self.page = self.page.saturating_sub(1);
            }
            Command::Home => self.page = 0,
            Command::End => self.page = PAGES.len() - 1,
            Command::Esc | Command::Char('s') => return true,
            _ => (),
        }
        false
    }
}

impl Widget for &Tutorial {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, content) = PAGES[self.page.min(PAGES.len() - 1)];
        let body = textwrap::wrap(content, usize::from(Tutorial::TEXT_WIDTH));
        let body_height = u16::try_from(body.len()).unwrap_or(u16::MAX);
        let [title_area, body_area, dots_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(body_height),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);
        Line::styled(title, Style::new().add_modifier(Modifier::BOLD))
            .centered()
            .render(title_area, buf);
        for (line, row) in body.into_iter().zip(body_area.rows()) {
            Line::raw(line).centered().render(row, buf);
        }
        let dots = (0..PAGES.len())
            .map(|i| if i == self.page { "●" } else { "○" })
            .collect::<Vec<_>>()
            .join(" ");
        Line::from(dots).centered().render(dots_area, buf);
        let hints = if self.page + 1 < PAGES.len() {
            key_hints(&[("←", "Back"), ("→", "Next"), ("Esc", "Skip")])
        } else {
            key_hints(&[("←", "Back"), ("Enter", "Choose difficulty")])
        };
        hints.centered().render(hints_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::buffer_rows;
    use pretty_assertions::assert_eq;

    fn rendered(tutorial: &Tutorial) -> Vec<String> {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        tutorial.render(area, &mut buffer);
        buffer_rows(&buffer)
            .into_iter()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }

    #[test]
    fn first_page() {
        assert_eq!(
            rendered(&Tutorial::default()),
            [
                "Welcome to Snake!",
                "Learn how to play in this quick tutorial.",
                "● ○ ○ ○ ○ ○",
                "← Back   → Next   Esc Skip",
            ]
        );
    }

    #[test]
    fn long_page_wraps() {
        let tutorial = Tutorial { page: 4 };
        assert_eq!(
            rendered(&tutorial),
            [
                "Score Points",
                "Build combos by eating food quickly: every two meals in a",
                "row raise your multiplier.",
                "○ ○ ○ ○ ● ○",
                "← Back   → Next   Esc Skip",
            ]
        );
    }

    #[test]
    fn page_through() {
        let mut tutorial = Tutorial::default();
        assert!(!tutorial.handle_command(Command::Left));
        assert_eq!(tutorial.page, 0);
        for expected in 1..PAGES.len() {
            assert!(!tutorial.handle_command(Command::Right));
            assert_eq!(tutorial.page, expected);
        }
        assert_eq!(
            rendered(&tutorial).last().map(String::as_str),
            Some("← Back   Enter Choose difficulty")
        );
        assert!(tutorial.handle_command(Command::Enter));
        assert!(!tutorial.handle_command(Command::Char('b')));
        assert_eq!(tutorial.page, PAGES.len() - 2);
    }

    #[test]
    fn skip() {
        let mut tutorial = Tutorial::default();
        assert!(!tutorial.handle_command(Command::End));
        assert_eq!(tutorial.page, PAGES.len() - 1);
        assert!(!tutorial.handle_command(Command::Home));
        assert!(tutorial.handle_command(Command::Esc));
    }
}
