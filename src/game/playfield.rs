use super::direction::Direction;
use std::fmt;

/// A discrete position on the playfield grid.  `x` counts columns from the
/// left edge and `y` counts rows from the top edge.
///
/// Coordinates are signed so that a candidate head position one step past an
/// edge can be represented and judged before anything moves.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Cell {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Cell {
    pub(crate) const fn new(x: i32, y: i32) -> Cell {
        Cell { x, y }
    }

    /// Return the cell one step away from `self` in direction `dir`
    pub(crate) fn step(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.offset();
        Cell {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The dimensions of the playfield
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Bounds {
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl Bounds {
    pub(crate) const fn new(width: u16, height: u16) -> Bounds {
        Bounds { width, height }
    }

    pub(crate) fn contains(self, cell: Cell) -> bool {
        (0..i32::from(self.width)).contains(&cell.x) && (0..i32::from(self.height)).contains(&cell.y)
    }

    /// Map a cell that has left the playfield back onto the opposite edge.
    /// Cells already inside the playfield are returned unchanged.
    pub(crate) fn wrap(self, cell: Cell) -> Cell {
        if self.is_empty() {
            return cell;
        }
        Cell {
            x: cell.x.rem_euclid(i32::from(self.width)),
            y: cell.y.rem_euclid(i32::from(self.height)),
        }
    }

    /// The cell at (or just up-left of) the middle of the playfield
    pub(crate) fn center(self) -> Cell {
        Cell::new(i32::from(self.width / 2), i32::from(self.height / 2))
    }

    /// Iterate over every cell in the playfield in row-major order
    pub(crate) fn cells(self) -> impl Iterator<Item = Cell> {
        let width = i32::from(self.width);
        (0..i32::from(self.height)).flat_map(move |y| (0..width).map(move |x| Cell::new(x, y)))
    }

    pub(crate) fn area(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}
