use crate::command::Command;
use crate::util::center_rect;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect, Size},
    text::{Line, Text},
    widgets::{
        block::{Block, Padding},
        Clear, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};
use std::borrow::Cow;

/// Pop-up shown when loading fails, listing the error and its causes
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ErrorPopup {
    lines: Vec<String>,
    scroll_offset: usize,
    max_scroll: usize,
}

impl ErrorPopup {
    const MAX_LINES: u16 = 16;
    const TEXT_WIDTH: u16 = 48;
    const WIDTH: u16 = Self::TEXT_WIDTH + 4;

    pub(crate) fn handle_command(&mut self, cmd: Command) -> Option<ErrorOutcome> {
        match (cmd, self.scrolling()) {
            (Command::Enter | Command::Char('r'), _) => return Some(ErrorOutcome::Retry),
            (Command::Quit | Command::Esc | Command::Char('q'), _) => {
                return Some(ErrorOutcome::Quit)
            }
            (Command::Up, true) => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            (Command::Down, true) => {
                if self.scroll_offset < self.max_scroll.saturating_sub(1) {
                    self.scroll_offset += 1;
                }
            }
            _ => (),
        }
        None
    }

    fn scrolling(&self) -> bool {
        self.lines.len() > usize::from(Self::MAX_LINES)
    }

    fn from_error_messages(msgs: Vec<String>) -> Self {
        let mut msgs = msgs.into_iter();
        let Some(first) = msgs.next() else {
            return ErrorPopup {
                lines: vec![String::from("Unknown error")],
                scroll_offset: 0,
                max_scroll: 0,
            };
        };
        let width = usize::from(ErrorPopup::TEXT_WIDTH);
        let mut lines = Vec::new();
        lines.extend(
            textwrap::wrap(&first, textwrap::Options::new(width).break_words(true))
                .into_iter()
                .map(Cow::into_owned),
        );
        let causes = msgs.collect::<Vec<_>>();
        if !causes.is_empty() {
            lines.push(String::new());
            lines.push(String::from("Caused by:"));
            if let [cause] = &causes[..] {
                let opts = textwrap::Options::new(width)
                    .break_words(true)
                    .initial_indent("    ")
                    .subsequent_indent("    ");
                lines.extend(textwrap::wrap(cause, opts).into_iter().map(Cow::into_owned));
            } else {
                for (i, m) in causes.iter().enumerate() {
                    let init_indent = format!("{i:>5}: ");
                    let opts = textwrap::Options::new(width)
                        .break_words(true)
                        .initial_indent(&init_indent)
                        .subsequent_indent("       ");
                    lines.extend(textwrap::wrap(m, opts).into_iter().map(Cow::into_owned));
                }
            }
        }
        let max_scroll = lines
            .len()
            .saturating_sub(usize::from(ErrorPopup::MAX_LINES) - 1);
        ErrorPopup {
            lines,
            scroll_offset: 0,
            max_scroll,
        }
    }
}

/// What the user chose to do about the error
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ErrorOutcome {
    Retry,
    Quit,
}

impl<E: std::error::Error> From<E> for ErrorPopup {
    fn from(e: E) -> ErrorPopup {
        let mut msgs = vec![e.to_string()];
        let mut source = e.source();
        while let Some(src) = source {
            msgs.push(src.to_string());
            source = src.source();
        }
        ErrorPopup::from_error_messages(msgs)
    }
}

impl Widget for &ErrorPopup {
    // `area` is the whole display area; the pop-up centers itself within it
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = u16::try_from(self.lines.len())
            .unwrap_or(u16::MAX)
            .min(ErrorPopup::MAX_LINES)
            .saturating_add(4);
        let block_area = center_rect(
            area,
            Size {
                width: ErrorPopup::WIDTH.saturating_add(u16::from(self.scrolling()) * 2),
                height,
            },
        );
        let block = Block::bordered()
            .title(" ERROR ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1));
        let [text_area, button_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)])
                .flex(Flex::Start)
                .spacing(1)
                .areas(block.inner(block_area));
        Clear.render(block_area, buf);
        block.render(block_area, buf);
        if self.scrolling() {
            let [text_area, scrollbar_area] =
                Layout::horizontal([Constraint::Fill(1), Constraint::Length(1)])
                    .flex(Flex::Start)
                    .spacing(1)
                    .areas(text_area);
            Text::from_iter(
                self.lines
                    .iter()
                    .skip(self.scroll_offset)
                    .take(usize::from(ErrorPopup::MAX_LINES))
                    .map(String::as_str),
            )
            .render(text_area, buf);
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .track_symbol(Some(ratatui::symbols::shade::MEDIUM));
            let mut scroll_state =
                ScrollbarState::new(self.max_scroll).position(self.scroll_offset);
            scrollbar.render(scrollbar_area, buf, &mut scroll_state);
        } else {
            Text::from_iter(self.lines.iter().map(String::as_str)).render(text_area, buf);
        }

        Line::from("[Retry (Enter)]  [Quit (q)]")
            .centered()
            .render(button_area, buf);
    }
}
