use super::key_hints;
use crate::command::Command;
use crate::consts;
use crate::game::{Difficulty, GameOverReport};
use crate::util::center_rect;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect, Size},
    style::{Modifier, Style},
    text::Line,
    widgets::{
        block::{Block, Padding},
        Clear, Widget,
    },
};
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const NAME_LABEL: &str = "Name: ";

/// Single-line editor for the name recorded on the leaderboard
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct NameInput {
    text: String,

    /// Byte offset into `text`; always on a grapheme boundary
    cursor: usize,

    score: u32,
    difficulty: Difficulty,
}

impl NameInput {
    const WIDTH: u16 = 40;
    const HEIGHT: u16 = 7;

    /// Start editing with `initial` filled in and the cursor at the end
    pub(crate) fn new(initial: &str, report: &GameOverReport) -> NameInput {
        let mut input = NameInput {
            text: String::new(),
            cursor: 0,
            score: report.final_score,
            difficulty: report.difficulty,
        };
        for ch in initial.chars() {
            input.insert(ch);
        }
        input
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` when the user submits the name
    pub(crate) fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Enter => return true,
            Command::Char(ch) => self.insert(ch),
            Command::Backspace => {
                if let Some((i, _)) = self.text[..self.cursor].grapheme_indices(true).next_back() {
                    self.text.replace_range(i..self.cursor, "");
                    self.cursor = i;
                }
            }
            Command::Left => {
                if let Some((i, _)) = self.text[..self.cursor].grapheme_indices(true).next_back() {
                    self.cursor = i;
                }
            }
            Command::Right => {
                if let Some(g) = self.text[self.cursor..].graphemes(true).next() {
                    self.cursor += g.len();
                }
            }
            Command::Home => self.cursor = 0,
            Command::End => self.cursor = self.text.len(),
            Command::Esc => {
                self.text.clear();
                self.cursor = 0;
            }
            _ => (),
        }
        false
    }

    /// Insert `ch` at the cursor unless it is a control or formatting
    /// character or would make the name too wide
    fn insert(&mut self, ch: char) {
        if ch.general_category_group() == GeneralCategoryGroup::Other {
            return;
        }
        let mut candidate = self.text.clone();
        candidate.insert(self.cursor, ch);
        if candidate.width() > usize::from(consts::MAX_NAME_WIDTH) {
            return;
        }
        self.text = candidate;
        self.cursor += ch.len_utf8();
    }
}

impl Widget for &NameInput {
    /*
     * ┌───────────── NEW SCORE ──────────────┐
     * │ You scored 45 on Easy!               │
     * │                                      │
     * │ Name: Player_________                │
     * │                                      │
     * │ Enter Save   Esc Clear               │
     * └──────────────────────────────────────┘
     */

    // `area` is the whole display area; the pop-up centers itself within it
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block_area = center_rect(
            area,
            Size {
                width: NameInput::WIDTH,
                height: NameInput::HEIGHT,
            },
        );
        let block = Block::bordered()
            .title(" NEW SCORE ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(block_area);
        Clear.render(block_area, buf);
        block.render(block_area, buf);
        let mut rows = inner.rows();
        if let Some(row) = rows.next() {
            Line::raw(format!("You scored {} on {}!", self.score, self.difficulty)).render(row, buf);
        }
        if let Some(row) = rows.nth(1) {
            Line::raw(NAME_LABEL).render(row, buf);
            let label_width = u16::try_from(NAME_LABEL.width()).unwrap_or(u16::MAX);
            let field = Rect {
                x: row.x.saturating_add(label_width),
                width: consts::MAX_NAME_WIDTH + 1,
                ..row
            }
            .intersection(row);
            buf.set_style(field, Style::new().add_modifier(Modifier::UNDERLINED));
            Line::raw(self.text.as_str()).render(field, buf);
            let cursor_col = u16::try_from(self.text[..self.cursor].width()).unwrap_or(u16::MAX);
            if let Some(cell) = buf.cell_mut((field.x.saturating_add(cursor_col), field.y)) {
                cell.modifier.insert(Modifier::REVERSED);
            }
        }
        if let Some(row) = rows.nth(1) {
            key_hints(&[("Enter", "Save"), ("Esc", "Clear")]).render(row, buf);
        }
    }
}
