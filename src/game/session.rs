use super::difficulty::{Difficulty, DifficultyProfile};
use super::direction::Direction;
use super::food::Food;
use super::playfield::{Bounds, Cell};
use super::score::Score;
use super::snake::Snake;
use super::Phase;
use crate::consts;
use rand::Rng;
use thiserror::Error;

/// The mutable state of one run of gameplay, from difficulty selection
/// through game over.  Only the state machine in [`super::Game`] touches it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Session {
    pub(super) profile: DifficultyProfile,
    pub(super) lives: u32,
    pub(super) time_remaining_secs: u32,
    pub(super) score: Score,
    pub(super) snake: Snake,
    pub(super) food: Option<Food>,

    /// Play time accumulated from movement ticks; the clock for food expiry
    pub(super) elapsed_ms: u64,

    /// Whole seconds of countdown consumed so far
    pub(super) played_secs: u32,

    pub(super) longest_len: usize,

    /// Points awarded by the most recent meal, for presentation feedback
    pub(super) last_gain: Option<u32>,
}

impl Session {
    pub(super) fn new<R: Rng>(
        profile: DifficultyProfile,
        bounds: Bounds,
        start: Cell,
        rng: &mut R,
    ) -> Session {
        let snake = Snake::new(start);
        let food = Food::spawn(rng, bounds, &snake, 0);
        let longest_len = snake.len();
        Session {
            profile,
            lives: profile.starting_lives,
            time_remaining_secs: profile.time_limit_secs,
            score: Score::default(),
            snake,
            food,
            elapsed_ms: 0,
            played_secs: 0,
            longest_len,
            last_gain: None,
        }
    }

    pub(crate) fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    /// Check that the session is fit to enter play
    pub(super) fn validate(&self, bounds: Bounds) -> Result<(), InvariantViolation> {
        if self.lives == 0 {
            return Err(InvariantViolation::NoLivesLeft);
        }
        if self.lives > self.profile.starting_lives {
            return Err(InvariantViolation::TooManyLives {
                lives: self.lives,
                starting: self.profile.starting_lives,
            });
        }
        if self.time_remaining_secs == 0 {
            return Err(InvariantViolation::OutOfTime);
        }
        if self.time_remaining_secs > self.profile.time_limit_secs {
            return Err(InvariantViolation::TooMuchTime {
                remaining: self.time_remaining_secs,
                limit: self.profile.time_limit_secs,
            });
        }
        if self.snake.segments().is_empty() {
            return Err(InvariantViolation::EmptySnake);
        }
        if !self.snake.is_untangled() {
            return Err(InvariantViolation::OverlappingSegments);
        }
        if let Some(&cell) = self.snake.segments().iter().find(|&&c| !bounds.contains(c)) {
            return Err(InvariantViolation::SnakeOutOfBounds(cell));
        }
        if let Some(food) = self.food.filter(|f| !bounds.contains(f.cell)) {
            return Err(InvariantViolation::FoodOutOfBounds(food.cell));
        }
        Ok(())
    }
}

/// A session state that must never be allowed into play
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum InvariantViolation {
    #[error("no lives remaining")]
    NoLivesLeft,
    #[error("{lives} lives remaining exceeds the starting count of {starting}")]
    TooManyLives { lives: u32, starting: u32 },
    #[error("no time remaining")]
    OutOfTime,
    #[error("{remaining}s remaining exceeds the time limit of {limit}s")]
    TooMuchTime { remaining: u32, limit: u32 },
    #[error("snake has no segments")]
    EmptySnake,
    #[error("snake segments overlap")]
    OverlappingSegments,
    #[error("snake segment {0} lies outside the playfield")]
    SnakeOutOfBounds(Cell),
    #[error("food at {0} lies outside the playfield")]
    FoodOutOfBounds(Cell),
}

/// A read-only view of the engine for the presentation layer, taken after
/// each tick or transition
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Snapshot {
    pub(crate) phase: Phase,
    pub(crate) difficulty: Option<Difficulty>,
    /// Head first
    pub(crate) snake: Vec<Cell>,
    pub(crate) heading: Direction,
    pub(crate) alive: bool,
    pub(crate) food: Option<Cell>,
    pub(crate) score: u32,
    pub(crate) combo: u32,
    pub(crate) multiplier: f64,
    pub(crate) last_gain: Option<u32>,
    pub(crate) time_remaining_secs: u32,
    pub(crate) lives: u32,
}

impl Snapshot {
    pub(super) fn new(phase: Phase, session: Option<&Session>) -> Snapshot {
        match session {
            Some(s) => Snapshot {
                phase,
                difficulty: Some(s.profile.tier),
                snake: s.snake.segments().iter().copied().collect(),
                heading: s.snake.heading(),
                alive: s.snake.alive(),
                food: s.food.map(|f| f.cell),
                score: s.score.total(),
                combo: s.score.streak(),
                multiplier: s.score.multiplier(),
                last_gain: s.last_gain,
                time_remaining_secs: s.time_remaining_secs,
                lives: s.lives,
            },
            None => Snapshot {
                phase,
                difficulty: None,
                snake: Vec::new(),
                heading: consts::START_HEADING,
                alive: false,
                food: None,
                score: 0,
                combo: 0,
                multiplier: 1.0,
                last_gain: None,
                time_remaining_secs: 0,
                lives: 0,
            },
        }
    }
}
