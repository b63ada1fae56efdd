use super::minutes_seconds;
use crate::consts;
use crate::game::{Cell, Direction, Phase, Snapshot};
use crate::util::center_rect;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
};

/// The playfield with the snake & food, topped by a status bar
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Board<'a> {
    pub(crate) snapshot: &'a Snapshot,

    /// Draw the walls as passable
    pub(crate) wrap: bool,
}

impl Board<'_> {
    /// Terminal columns per playfield cell
    const CELL_WIDTH: u16 = 2;

    fn field_size() -> Size {
        Size {
            width: consts::PLAYFIELD.width * Self::CELL_WIDTH + 1 + 2,
            height: consts::PLAYFIELD.height + 2,
        }
    }
}

impl Widget for Board<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [status_area, field_area, message_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);
        StatusBar(self.snapshot).render(status_area, buf);

        let block_area = center_rect(field_area, Self::field_size());
        if self.wrap {
            DottedBorder.render(block_area, buf);
        } else {
            Block::bordered().render(block_area, buf);
        }
        let mut canvas = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            buf,
        };
        let snap = self.snapshot;
        for &c in snap.snake.iter().skip(1) {
            canvas.draw_cell(c, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        }
        if let Some(food) = snap.food {
            canvas.draw_cell(food, consts::FOOD_SYMBOL, consts::FOOD_STYLE);
        }
        // Draw the head last so that, if it's a collision, we overwrite
        // whatever it's colliding with
        if let Some(&head) = snap.snake.first() {
            if snap.alive {
                canvas.draw_cell(head, head_symbol(snap.heading), consts::SNAKE_STYLE);
            } else {
                canvas.draw_cell(head, consts::COLLISION_SYMBOL, consts::COLLISION_STYLE);
            }
        }

        let message = match (snap.phase, snap.last_gain) {
            (Phase::Ready, _) => Line::from_iter([
                Span::raw(" Press "),
                Span::styled("Enter", consts::KEY_STYLE),
                Span::raw(" to start"),
            ]),
            (Phase::Playing, Some(gain)) => Line::from_iter([
                Span::raw(" Last meal: "),
                Span::styled(format!("+{gain}"), consts::COMBO_STYLE),
            ]),
            (Phase::Playing, None) => Line::from_iter([
                Span::raw(" Pause: "),
                Span::styled("p", consts::KEY_STYLE),
            ]),
            _ => Line::default(),
        };
        message.render(message_area, buf);
    }
}

fn head_symbol(heading: Direction) -> char {
    match heading {
        Direction::Up => consts::SNAKE_HEAD_NORTH_SYMBOL,
        Direction::Down => consts::SNAKE_HEAD_SOUTH_SYMBOL,
        Direction::Left => consts::SNAKE_HEAD_WEST_SYMBOL,
        Direction::Right => consts::SNAKE_HEAD_EAST_SYMBOL,
    }
}

/// Score, combo, time, and lives
#[derive(Clone, Copy, Debug, PartialEq)]
struct StatusBar<'a>(&'a Snapshot);

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snap = self.0;
        let combo_style = if snap.combo >= 3 {
            consts::COMBO_STYLE
        } else {
            Style::new()
        };
        let mut line = Line::from_iter([
            Span::raw(format!(" Score: {}", snap.score)),
            Span::raw("  Combo: "),
            Span::styled(
                format!("{} (×{:.1})", snap.combo, snap.multiplier),
                combo_style,
            ),
            Span::raw(format!("  Time: {}", minutes_seconds(snap.time_remaining_secs))),
            Span::raw(format!("  Lives: {}", snap.lives)),
        ]);
        if let Some(tier) = snap.difficulty {
            line.push_span(Span::raw(format!("  [{tier}]")));
        }
        line.style(consts::SCORE_BAR_STYLE).render(area, buf);
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_char(&mut self, x: u16, y: u16, symbol: char) {
        let Some(x) = self.area.x.checked_add(x) else {
            return;
        };
        let Some(y) = self.area.y.checked_add(y) else {
            return;
        };
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(symbol);
        }
    }

    /// Draw `symbol` at playfield cell `pos`.  Cells outside the playfield
    /// are skipped.
    fn draw_cell(&mut self, pos: Cell, symbol: char, style: Style) {
        let (Ok(col), Ok(row)) = (u16::try_from(pos.x), u16::try_from(pos.y)) else {
            return;
        };
        let Some(x) = col
            .checked_mul(Board::CELL_WIDTH)
            .and_then(|x| x.checked_add(1))
            .and_then(|x| self.area.x.checked_add(x))
        else {
            return;
        };
        let Some(y) = self.area.y.checked_add(row) else {
            return;
        };
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }
}

/// Border drawn around the playfield when the snake can pass through walls
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DottedBorder;

impl Widget for DottedBorder {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let max_x = area.width.saturating_sub(1);
        let max_y = area.height.saturating_sub(1);
        let mut canvas = Canvas { area, buf };
        canvas.draw_char(0, 0, '·');
        canvas.draw_char(max_x, 0, '·');
        canvas.draw_char(max_x, max_y, '·');
        canvas.draw_char(0, max_y, '·');
        for x in 1..max_x {
            canvas.draw_char(x, 0, '⋯');
            canvas.draw_char(x, max_y, '⋯');
        }
        for y in 1..max_y {
            canvas.draw_char(0, y, '⋮');
            canvas.draw_char(max_x, y, '⋮');
        }
    }
}
