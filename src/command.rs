use crate::game::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key press normalized into the handful of inputs the program responds to
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Quit,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Backspace,
    Home,
    End,
    Next,
    Prev,
    /// A printable character, possibly shifted
    Char(char),
}

impl Command {
    pub(crate) fn from_key_event(ev: KeyEvent) -> Option<Command> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        match (ev.modifiers, ev.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Command::Quit),
            (_, KeyCode::Up) => Some(Command::Up),
            (_, KeyCode::Down) => Some(Command::Down),
            (_, KeyCode::Left) => Some(Command::Left),
            (_, KeyCode::Right) => Some(Command::Right),
            (_, KeyCode::Enter) => Some(Command::Enter),
            (_, KeyCode::Esc) => Some(Command::Esc),
            (_, KeyCode::Backspace) => Some(Command::Backspace),
            (_, KeyCode::Home) => Some(Command::Home),
            (_, KeyCode::End) => Some(Command::End),
            (_, KeyCode::Tab | KeyCode::PageDown) => Some(Command::Next),
            (_, KeyCode::BackTab | KeyCode::PageUp) => Some(Command::Prev),
            (m, KeyCode::Char(c)) if normal_modifiers.contains(m) => Some(Command::Char(c)),
            _ => None,
        }
    }

    /// The heading this command requests during play, if any
    pub(crate) fn direction(self) -> Option<Direction> {
        match self {
            Command::Up | Command::Char('w' | 'k') => Some(Direction::Up),
            Command::Down | Command::Char('s' | 'j') => Some(Direction::Down),
            Command::Left | Command::Char('a' | 'h') => Some(Direction::Left),
            Command::Right | Command::Char('d' | 'l') => Some(Direction::Right),
            _ => None,
        }
    }
}
