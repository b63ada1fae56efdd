//! Widgets for each phase of the program
mod board;
mod error;
mod game_over;
mod leaderboard;
mod menu;
mod name_input;
mod paused;
mod tutorial;
pub(crate) use self::board::Board;
pub(crate) use self::error::{ErrorOutcome, ErrorPopup};
pub(crate) use self::game_over::GameOverScreen;
pub(crate) use self::leaderboard::{LeaderboardExit, LeaderboardView};
pub(crate) use self::menu::DifficultyMenu;
pub(crate) use self::name_input::NameInput;
pub(crate) use self::paused::{PauseMenu, PauseOpt};
pub(crate) use self::tutorial::Tutorial;
use crate::consts;
use ratatui::text::{Line, Span};

/// Render a row of `(key, action)` pairs as a line of hints
fn key_hints(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut line = Line::default();
    for (i, &(key, action)) in hints.iter().enumerate() {
        if i > 0 {
            line.push_span("   ");
        }
        line.push_span(Span::styled(key, consts::KEY_STYLE));
        line.push_span(" ");
        line.push_span(action);
    }
    line
}

/// Format a number of seconds as `M:SS`
fn minutes_seconds(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// The symbols in each row of `buf`, skipping cells hidden by wide
/// characters
#[cfg(test)]
pub(crate) fn buffer_rows(buf: &ratatui::buffer::Buffer) -> Vec<String> {
    use unicode_width::UnicodeWidthStr;
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            let mut row = String::new();
            let mut hidden = 0;
            for x in area.left()..area.right() {
                if hidden > 0 {
                    hidden -= 1;
                    continue;
                }
                let symbol = buf[(x, y)].symbol();
                row.push_str(symbol);
                hidden = symbol.width().saturating_sub(1);
            }
            row
        })
        .collect()
}
