use super::difficulty::DifficultyProfile;
use super::playfield::{Bounds, Cell};
use super::snake::Snake;

/// The judgement on a candidate move
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Outcome {
    /// A plain move
    Continue,
    /// The head reaches the food
    Grow,
    /// The head leaves the playfield while walls are solid
    WallHit,
    /// The head runs into the snake's own body
    SelfHit,
}

impl Outcome {
    pub(crate) fn is_fatal(self) -> bool {
        matches!(self, Outcome::WallHit | Outcome::SelfHit)
    }
}

/// Classify moving the head of `snake` into `candidate`.
///
/// Checks run in a fixed order so that the result is deterministic: walls
/// first, then the body as it is *before* the move (every segment except the
/// head), then the food.
pub(crate) fn classify(
    candidate: Cell,
    snake: &Snake,
    food: Option<Cell>,
    bounds: Bounds,
    profile: &DifficultyProfile,
) -> Outcome {
    if profile.wall_collision && !bounds.contains(candidate) {
        Outcome::WallHit
    } else if snake.segments().iter().skip(1).any(|&c| c == candidate) {
        Outcome::SelfHit
    } else if food == Some(candidate) {
        Outcome::Grow
    } else {
        Outcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::difficulty::Difficulty;
    use std::collections::VecDeque;

    const BOUNDS: Bounds = Bounds::new(10, 10);

    fn walled() -> DifficultyProfile {
        Difficulty::Easy.profile()
    }

    fn open() -> DifficultyProfile {
        DifficultyProfile {
            wall_collision: false,
            ..Difficulty::Easy.profile()
        }
    }

    fn coiled() -> Snake {
        // Head at (5, 5) facing up, body wrapping around to its right
        let mut snake = Snake::new(Cell::new(5, 5));
        snake.segments = VecDeque::from([
            Cell::new(5, 5),
            Cell::new(5, 6),
            Cell::new(6, 6),
            Cell::new(6, 5),
            Cell::new(6, 4),
        ]);
        snake
    }

    #[test]
    fn plain_move() {
        let snake = Snake::new(Cell::new(5, 5));
        assert_eq!(
            classify(Cell::new(6, 5), &snake, Some(Cell::new(0, 0)), BOUNDS, &walled()),
            Outcome::Continue
        );
    }

    #[test]
    fn eats_food() {
        let snake = Snake::new(Cell::new(5, 5));
        assert_eq!(
            classify(Cell::new(6, 5), &snake, Some(Cell::new(6, 5)), BOUNDS, &walled()),
            Outcome::Grow
        );
    }

    #[test]
    fn no_food_on_board() {
        let snake = Snake::new(Cell::new(5, 5));
        assert_eq!(
            classify(Cell::new(6, 5), &snake, None, BOUNDS, &walled()),
            Outcome::Continue
        );
    }

    #[test]
    fn hits_wall() {
        let snake = Snake::new(Cell::new(9, 5));
        let outcome = classify(Cell::new(10, 5), &snake, None, BOUNDS, &walled());
        assert_eq!(outcome, Outcome::WallHit);
        assert!(outcome.is_fatal());
    }

    #[test]
    fn open_walls() {
        let snake = Snake::new(Cell::new(9, 5));
        assert_eq!(
            classify(Cell::new(10, 5), &snake, None, BOUNDS, &open()),
            Outcome::Continue
        );
    }

    #[test]
    fn hits_self() {
        let snake = coiled();
        let outcome = classify(Cell::new(6, 5), &snake, None, BOUNDS, &walled());
        assert_eq!(outcome, Outcome::SelfHit);
        assert!(outcome.is_fatal());
    }

    #[test]
    fn tail_counts_as_body() {
        let snake = coiled();
        assert_eq!(
            classify(Cell::new(6, 4), &snake, None, BOUNDS, &walled()),
            Outcome::SelfHit
        );
    }

    #[test]
    fn body_beats_food() {
        let snake = coiled();
        assert_eq!(
            classify(Cell::new(6, 5), &snake, Some(Cell::new(6, 5)), BOUNDS, &walled()),
            Outcome::SelfHit
        );
    }

    #[test]
    fn wall_beats_body() {
        let mut snake = coiled();
        // A body segment somehow outside the field must not mask a wall hit
        snake.segments.push_back(Cell::new(-1, 5));
        assert_eq!(
            classify(Cell::new(-1, 5), &snake, None, BOUNDS, &walled()),
            Outcome::WallHit
        );
    }
}
