use super::playfield::{Bounds, Cell};
use super::snake::Snake;
use rand::{seq::IteratorRandom, Rng};

/// A food item on the playfield
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Food {
    pub(crate) cell: Cell,

    /// Session play time (accumulated movement-tick time) at which the food
    /// appeared
    pub(crate) spawned_at_ms: u64,
}

impl Food {
    /// Place a new food item on a uniformly random free cell of the
    /// playfield.  Returns `None` if the snake covers every cell.
    pub(crate) fn spawn<R: Rng>(
        rng: &mut R,
        bounds: Bounds,
        snake: &Snake,
        now_ms: u64,
    ) -> Option<Food> {
        bounds
            .cells()
            .filter(|&c| !snake.occupies(c))
            .choose(rng)
            .map(|cell| Food {
                cell,
                spawned_at_ms: now_ms,
            })
    }

    pub(crate) fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.spawned_at_ms)
    }

    /// Has the food sat uneaten for at least `timeout_ms`?  Food never
    /// expires when there is no timeout.
    pub(crate) fn expired(&self, now_ms: u64, timeout_ms: Option<u64>) -> bool {
        timeout_ms.is_some_and(|t| self.age_ms(now_ms) >= t)
    }
}
