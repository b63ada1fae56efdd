use super::direction::Direction;
use super::playfield::Cell;
use crate::consts;
use std::collections::VecDeque;

/// The player's snake
///
/// `segments[0]` is the head; the remaining cells trail behind it in order.
/// While the snake is alive, no two segments share a cell.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    pub(super) segments: VecDeque<Cell>,

    /// The direction the snake moved in on its most recent step
    pub(super) heading: Direction,

    /// The most recently requested turn, applied at the start of the next
    /// movement tick
    pub(super) pending: Option<Direction>,

    pub(super) alive: bool,
}

impl Snake {
    /// Create a snake of
    /// [`INITIAL_SNAKE_LENGTH`][consts::INITIAL_SNAKE_LENGTH] cells with its
    /// head at `start`, facing [`START_HEADING`][consts::START_HEADING], with
    /// its body trailing directly behind it.
    pub(crate) fn new(start: Cell) -> Snake {
        let mut snake = Snake {
            segments: VecDeque::with_capacity(consts::INITIAL_SNAKE_LENGTH),
            heading: consts::START_HEADING,
            pending: None,
            alive: true,
        };
        snake.reset(start);
        snake
    }

    /// Restore the initial body at `start` and bring the snake back to life
    pub(crate) fn reset(&mut self, start: Cell) {
        self.heading = consts::START_HEADING;
        self.pending = None;
        self.alive = true;
        let back = self.heading.opposite();
        self.segments.clear();
        self.segments.extend(
            std::iter::successors(Some(start), |&c| Some(c.step(back)))
                .take(consts::INITIAL_SNAKE_LENGTH),
        );
    }

    pub(crate) fn head(&self) -> Cell {
        self.segments[0]
    }

    pub(crate) fn segments(&self) -> &VecDeque<Cell> {
        &self.segments
    }

    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn heading(&self) -> Direction {
        self.heading
    }

    pub(crate) fn alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn occupies(&self, cell: Cell) -> bool {
        self.segments.contains(&cell)
    }

    /// Request a turn.  A request for the exact reverse of the current
    /// heading is ignored and `false` is returned; otherwise the request
    /// replaces any pending one and takes effect on the next movement tick.
    pub(crate) fn set_heading(&mut self, requested: Direction) -> bool {
        if requested == self.heading.opposite() {
            return false;
        }
        self.pending = Some(requested);
        true
    }

    /// Make the pending turn, if any, the current heading
    pub(crate) fn apply_pending_heading(&mut self) {
        if let Some(dir) = self.pending.take() {
            self.heading = dir;
        }
    }

    /// Return the cell the head would move into on its next step.  Nothing is
    /// mutated, so the move can be judged before it is committed.
    pub(crate) fn advance(&self) -> Cell {
        self.head().step(self.heading)
    }

    /// Move every segment into the cell its predecessor occupied and place
    /// the head at `next`.  If `grow` is true, the old tail cell is kept as a
    /// new final segment.
    pub(crate) fn commit_move(&mut self, next: Cell, grow: bool) {
        self.segments.push_front(next);
        if !grow {
            let _ = self.segments.pop_back();
        }
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }

    /// Does every segment occupy a distinct cell?
    pub(crate) fn is_untangled(&self) -> bool {
        self.segments
            .iter()
            .enumerate()
            .all(|(i, c)| !self.segments.iter().skip(i + 1).any(|d| d == c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn snake() -> Snake {
        Snake::new(Cell::new(8, 8))
    }

    #[test]
    fn new_snake() {
        let snake = snake();
        assert_eq!(
            snake.segments,
            [Cell::new(8, 8), Cell::new(7, 8), Cell::new(6, 8)]
        );
        assert_eq!(snake.heading(), Direction::Right);
        assert!(snake.alive());
        assert!(snake.is_untangled());
    }

    #[test]
    fn advance_is_pure() {
        let snake = snake();
        let before = snake.clone();
        assert_eq!(snake.advance(), Cell::new(9, 8));
        assert_eq!(snake, before);
    }

    #[test]
    fn commit_shifts_body() {
        let mut snake = snake();
        snake.commit_move(Cell::new(9, 8), false);
        assert_eq!(
            snake.segments,
            [Cell::new(9, 8), Cell::new(8, 8), Cell::new(7, 8)]
        );
    }

    #[test]
    fn commit_grow_keeps_tail() {
        let mut snake = snake();
        snake.commit_move(Cell::new(9, 8), true);
        assert_eq!(
            snake.segments,
            [
                Cell::new(9, 8),
                Cell::new(8, 8),
                Cell::new(7, 8),
                Cell::new(6, 8)
            ]
        );
    }

    #[rstest]
    #[case(1)]
    #[case(4)]
    #[case(11)]
    fn grows_by_one_per_meal(#[case] meals: usize) {
        let mut snake = snake();
        let turns = [Direction::Down, Direction::Left, Direction::Down, Direction::Right];
        for i in 0..meals {
            assert!(snake.set_heading(turns[i % turns.len()]));
            snake.apply_pending_heading();
            let next = snake.advance();
            snake.commit_move(next, true);
        }
        assert_eq!(snake.len(), consts::INITIAL_SNAKE_LENGTH + meals);
        assert!(snake.is_untangled());
    }

    #[test]
    fn reverse_is_ignored() {
        let mut snake = snake();
        for _ in 0..5 {
            assert!(!snake.set_heading(Direction::Left));
            snake.apply_pending_heading();
            assert_eq!(snake.heading(), Direction::Right);
            let next = snake.advance();
            snake.commit_move(next, false);
        }
        assert_eq!(snake.head(), Cell::new(13, 8));
    }

    #[test]
    fn turn_waits_for_next_tick() {
        let mut snake = snake();
        assert!(snake.set_heading(Direction::Up));
        assert_eq!(snake.heading(), Direction::Right);
        assert_eq!(snake.advance(), Cell::new(9, 8));
        snake.apply_pending_heading();
        assert_eq!(snake.heading(), Direction::Up);
        assert_eq!(snake.advance(), Cell::new(8, 7));
    }

    #[test]
    fn latest_request_wins() {
        let mut snake = snake();
        assert!(snake.set_heading(Direction::Up));
        assert!(snake.set_heading(Direction::Down));
        snake.apply_pending_heading();
        assert_eq!(snake.heading(), Direction::Down);
    }

    #[test]
    fn reverse_checked_against_current_heading() {
        let mut snake = snake();
        assert!(snake.set_heading(Direction::Up));
        // Still heading right, so left is a reversal even with "up" pending
        assert!(!snake.set_heading(Direction::Left));
        snake.apply_pending_heading();
        assert_eq!(snake.heading(), Direction::Up);
    }

    #[test]
    fn reset_revives() {
        let mut snake = snake();
        assert!(snake.set_heading(Direction::Down));
        snake.apply_pending_heading();
        snake.commit_move(snake.advance(), true);
        snake.kill();
        snake.reset(Cell::new(3, 3));
        assert!(snake.alive());
        assert_eq!(snake.heading(), Direction::Right);
        assert_eq!(
            snake.segments,
            [Cell::new(3, 3), Cell::new(2, 3), Cell::new(1, 3)]
        );
    }

    #[test]
    fn tangled() {
        let mut snake = snake();
        snake.segments.push_back(Cell::new(8, 8));
        assert!(!snake.is_untangled());
    }
}
