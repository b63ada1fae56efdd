//! Assorted constants & hard-coded configuration
use crate::game::{Bounds, Cell, Direction};
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Dimensions of the playfield in cells
pub(crate) const PLAYFIELD: Bounds = Bounds::new(17, 17);

/// Where the snake's head is placed at the start of a session and after
/// losing a life
pub(crate) const START_CELL: Cell = Cell::new(8, 8);

/// The direction the snake faces when placed at [`START_CELL`]
pub(crate) const START_HEADING: Direction = Direction::Right;

/// Snake length at the start of a session and after losing a life
pub(crate) const INITIAL_SNAKE_LENGTH: usize = 3;

/// Points for one food item before any multipliers
pub(crate) const BASE_SCORE: u32 = 10;

/// Time between countdown ticks
pub(crate) const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// The leaderboard keeps at most this many entries
pub(crate) const MAX_LEADERBOARD_ENTRIES: usize = 100;

/// Maximum display width of a player name
pub(crate) const MAX_NAME_WIDTH: u16 = 16;

/// Recorded in place of a blank player name
pub(crate) const ANONYMOUS: &str = "Anonymous";

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// Glyph for the snake's head when it is moving north/up
pub(crate) const SNAKE_HEAD_NORTH_SYMBOL: char = 'v';

/// Glyph for the snake's head when it is moving south/down
pub(crate) const SNAKE_HEAD_SOUTH_SYMBOL: char = '^';

/// Glyph for the snake's head when it is moving east/right
pub(crate) const SNAKE_HEAD_EAST_SYMBOL: char = '<';

/// Glyph for the snake's head when it is moving west/left
pub(crate) const SNAKE_HEAD_WEST_SYMBOL: char = '>';

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: char = '⚬';

/// Glyph for the food
pub(crate) const FOOD_SYMBOL: char = '●';

/// Glyph for the snake's head once it has crashed
pub(crate) const COLLISION_SYMBOL: char = '×';

/// Style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Style for the food
pub(crate) const FOOD_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the status bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the currently-selected menu item
pub(crate) const MENU_SELECTION_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);

/// Style for the combo readout once a multiplier is in effect
pub(crate) const COMBO_STYLE: Style = Style::new().fg(Color::LightYellow).add_modifier(Modifier::BOLD);

/// Style for a freshly-set high score or freshly-added leaderboard entry
pub(crate) const HIGHLIGHT_STYLE: Style = Style::new().fg(Color::LightCyan).add_modifier(Modifier::BOLD);
