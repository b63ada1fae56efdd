use super::key_hints;
use crate::command::Command;
use crate::consts;
use crate::storage::{Leaderboard, LeaderboardEntry};
use crate::util::center_rect;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect, Size},
    style::{Modifier, Style},
    text::Line,
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

/// Paginated view of the leaderboard, opened on the page holding the entry
/// that was just added
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct LeaderboardView {
    board: Leaderboard,
    highlight: Option<u64>,
    page: usize,
}

impl LeaderboardView {
    const WIDTH: u16 = 56;
    const HEIGHT: u16 = 13;

    pub(crate) fn new(board: Leaderboard, highlight: Option<u64>) -> LeaderboardView {
        let page = highlight.and_then(|id| board.page_of(id)).unwrap_or(0);
        LeaderboardView {
            board,
            highlight,
            page,
        }
    }

    /// Returns `Some` if the user chose to leave the leaderboard
    pub(crate) fn handle_command(&mut self, cmd: Command) -> Option<LeaderboardExit> {
        let last_page = self.board.page_count() - 1;
        match cmd {
            Command::Enter | Command::Esc | Command::Char(' ' | 'r') => {
                return Some(LeaderboardExit::Menu)
            }
            Command::Char('q') | Command::Quit => return Some(LeaderboardExit::Quit),
            Command::Left | Command::Up | Command::Prev => {
                self.page = self.page.saturating_sub(1);
            }
            Command::Right | Command::Down | Command::Next => {
                self.page = (self.page + 1).min(last_page);
            }
            Command::Home => self.page = 0,
            Command::End => self.page = last_page,
            _ => (),
        }
        None
    }

    fn entry_line(&self, rank: usize, entry: &LeaderboardEntry) -> Line<'static> {
        let date = entry.achieved_at.format("%Y-%m-%d");
        let name = &entry.player_name;
        let pad = usize::from(consts::MAX_NAME_WIDTH).saturating_sub(name.width());
        let line = Line::raw(format!(
            "{rank:>4}  {name}{:pad$}  {:>6}  {:<10}  {date}",
            "", entry.score, entry.difficulty
        ));
        if self.highlight == Some(entry.id) {
            line.style(consts::HIGHLIGHT_STYLE)
        } else {
            line
        }
    }
}

/// Where to go from the leaderboard
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum LeaderboardExit {
    Menu,
    Quit,
}

impl Widget for &LeaderboardView {
    /*
     *                        Leaderboard
     *
     * Rank  Name                 Score  Difficulty  Date
     *    1  Alice                  255  Easy        2026-10-15
     *    2  Bob                    120  Hard        2026-10-14
     *
     *                        Page 1 of 1
     *
     * ←/→ Page   Enter Menu   q Quit
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = center_rect(
            area,
            Size {
                width: LeaderboardView::WIDTH,
                height: LeaderboardView::HEIGHT,
            },
        );
        let page_size = u16::try_from(Leaderboard::PAGE_SIZE).unwrap_or(u16::MAX);
        let [title_area, table_area, page_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(page_size + 1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .flex(Flex::Start)
        .spacing(1)
        .areas(area);
        Line::styled("Leaderboard", Style::new().add_modifier(Modifier::BOLD))
            .centered()
            .render(title_area, buf);
        let mut rows = table_area.rows();
        if let Some(row) = rows.next() {
            Line::styled(
                format!(
                    "Rank  {:w$}   Score  Difficulty  Date",
                    "Name",
                    w = usize::from(consts::MAX_NAME_WIDTH)
                ),
                Style::new().add_modifier(Modifier::UNDERLINED),
            )
            .render(row, buf);
        }
        let (first_rank, entries) = self.board.page(self.page);
        if entries.is_empty() {
            if let Some(row) = rows.next() {
                Line::raw("No scores yet").centered().render(row, buf);
            }
        }
        for ((i, entry), row) in entries.iter().enumerate().zip(rows) {
            self.entry_line(first_rank + i, entry).render(row, buf);
        }
        Line::raw(format!(
            "Page {} of {}",
            self.page + 1,
            self.board.page_count()
        ))
        .centered()
        .render(page_area, buf);
        key_hints(&[("←/→", "Page"), ("Enter", "Menu"), ("q", "Quit")]).render(hints_area, buf);
    }
}
