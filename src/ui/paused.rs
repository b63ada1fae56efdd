use crate::command::Command;
use crate::consts;
use crate::util::EnumExt;
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Clear, Widget,
    },
};

/// The pause menu pop-up
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct PauseMenu {
    selection: PauseOpt,
}

impl PauseMenu {
    pub(crate) const HEIGHT: u16 = 5;
    pub(crate) const WIDTH: u16 = 22;

    pub(crate) fn new() -> PauseMenu {
        PauseMenu {
            selection: PauseOpt::first(),
        }
    }

    /// Returns `Some` if the user made a choice
    pub(crate) fn handle_command(&mut self, cmd: Command) -> Option<PauseOpt> {
        match cmd {
            Command::Esc | Command::Char('p') => return Some(PauseOpt::Resume),
            Command::Char('m') => return Some(PauseOpt::Menu),
            Command::Char('q') | Command::Quit => return Some(PauseOpt::Quit),
            Command::Enter | Command::Char(' ') => return Some(self.selection),
            Command::Up => {
                if let Some(opt) = self.selection.prev() {
                    self.selection = opt;
                }
            }
            Command::Down => {
                if let Some(opt) = self.selection.next() {
                    self.selection = opt;
                }
            }
            Command::Next => self.selection = self.selection.next().unwrap_or_else(PauseOpt::first),
            Command::Prev => self.selection = self.selection.prev().unwrap_or_else(PauseOpt::last),
            Command::Home => self.selection = PauseOpt::first(),
            Command::End => self.selection = PauseOpt::last(),
            _ => (),
        }
        None
    }
}

impl Default for PauseMenu {
    fn default() -> PauseMenu {
        PauseMenu::new()
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum PauseOpt {
    Resume,

    /// Abandon the session and go back to the difficulty menu
    Menu,

    /// Exit the program
    Quit,
}

impl PauseOpt {
    fn to_line(self, selected: bool) -> Line<'static> {
        let (label, key) = match self {
            PauseOpt::Resume => ("Resume (", "Esc"),
            PauseOpt::Menu => ("Quit to Menu (", "m"),
            PauseOpt::Quit => ("Exit (", "q"),
        };
        let line = Line::from_iter([
            Span::raw(if selected { "» " } else { "  " }),
            Span::raw(label),
            Span::styled(key, consts::KEY_STYLE),
            Span::raw(")"),
        ]);
        if selected {
            line.style(consts::MENU_SELECTION_STYLE)
        } else {
            line
        }
    }
}

impl Widget for PauseMenu {
    /*
     * ┌────── PAUSED ──────┐
     * │ » Resume (Esc)     │
     * │   Quit to Menu (m) │
     * │   Exit (q)         │
     * └────────────────────┘
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" PAUSED ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(area);
        Clear.render(area, buf);
        block.render(area, buf);
        for (opt, row) in PauseOpt::iter().zip(inner.rows()) {
            opt.to_line(self.selection == opt).render(row, buf);
        }
    }
}
