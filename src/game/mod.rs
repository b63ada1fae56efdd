//! The simulation engine: snake movement, collisions, food, scoring, and the
//! state machine that sequences a play session
mod collision;
mod difficulty;
mod direction;
mod food;
mod playfield;
mod score;
mod session;
mod snake;
pub(crate) use self::collision::Outcome;
pub(crate) use self::difficulty::{Difficulty, DifficultyProfile, Profiles};
pub(crate) use self::direction::Direction;
pub(crate) use self::playfield::{Bounds, Cell};
pub(crate) use self::session::Snapshot;
use self::collision::classify;
use self::food::Food;
use self::session::Session;
use crate::assets::Assets;
use crate::consts;
use crate::storage::{LeaderboardEntry, SettingsPatch, Store};
use chrono::{DateTime, Utc};
use rand::{rngs::ThreadRng, Rng};

/// The top-level phase of the program
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Phase {
    Loading,
    Tutorial,
    DifficultySelect,
    Ready,
    Playing,
    Paused,
    GameOver,
    NameInput,
    Leaderboard,
}

/// Why a session ended
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum EndReason {
    OutOfLives,
    TimeUp,
    /// The snake filled the playfield, leaving nowhere to put food
    BoardCleared,
}

impl EndReason {
    pub(crate) fn is_win(self) -> bool {
        self == EndReason::BoardCleared
    }
}

/// Summary computed once upon entering [`Phase::GameOver`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GameOverReport {
    pub(crate) reason: EndReason,
    pub(crate) difficulty: Difficulty,
    pub(crate) final_score: u32,
    /// The stored high score for the difficulty before this session
    pub(crate) previous_high_score: u32,
    pub(crate) new_high_score: bool,
    /// Length of the snake when the session ended
    pub(crate) snake_length: usize,
    /// Longest snake across all sessions, including this one
    pub(crate) longest_snake_length: u32,
    pub(crate) played_secs: u32,
}

/// The game session state machine.
///
/// Every mutation of a [`Session`] goes through the operations here.  Each
/// operation applies only in certain phases; in any other phase it is
/// ignored.
#[derive(Debug)]
pub(crate) struct Game<R = ThreadRng> {
    rng: R,
    phase: Phase,
    profiles: Profiles,
    store: Store,
    bounds: Bounds,
    start: Cell,

    /// The tier highlighted on the difficulty menu; initialized from the
    /// stored settings
    selected: Difficulty,

    session: Option<Session>,
    report: Option<GameOverReport>,

    /// The entry most recently added to the leaderboard
    new_entry: Option<LeaderboardEntry>,
}

impl Game<ThreadRng> {
    pub(crate) fn new() -> Self {
        Game::new_with_rng(rand::rng())
    }
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(rng: R) -> Game<R> {
        Game {
            rng,
            phase: Phase::Loading,
            profiles: Profiles::default(),
            store: Store::ephemeral(),
            bounds: consts::PLAYFIELD,
            start: consts::START_CELL,
            selected: Difficulty::default(),
            session: None,
            report: None,
            new_entry: None,
        }
    }

    /// `LOADING → TUTORIAL`: install the loaded difficulty table & storage
    pub(crate) fn assets_ready(&mut self, assets: Assets) {
        if self.phase != Phase::Loading {
            self.ignore("assets_ready");
            return;
        }
        self.profiles = assets.profiles;
        self.store = assets.store;
        self.selected = self.store.settings().difficulty;
        self.set_phase(Phase::Tutorial);
    }

    /// `TUTORIAL → DIFFICULTY_SELECT`
    pub(crate) fn finish_tutorial(&mut self) {
        if self.phase != Phase::Tutorial {
            self.ignore("finish_tutorial");
            return;
        }
        self.set_phase(Phase::DifficultySelect);
    }

    /// Move the difficulty menu highlight.  The choice is not saved until
    /// [`Game::choose_difficulty()`] is called.
    pub(crate) fn highlight_difficulty(&mut self, tier: Difficulty) {
        if self.phase != Phase::DifficultySelect {
            self.ignore("highlight_difficulty");
            return;
        }
        self.selected = tier;
    }

    /// `DIFFICULTY_SELECT → READY`: create a fresh session for `tier` and
    /// remember the choice in the stored settings
    pub(crate) fn choose_difficulty(&mut self, tier: Difficulty) {
        if self.phase != Phase::DifficultySelect {
            self.ignore("choose_difficulty");
            return;
        }
        self.selected = tier;
        self.store.save_settings(SettingsPatch {
            difficulty: Some(tier),
            ..SettingsPatch::default()
        });
        self.session = Some(self.fresh_session(tier));
        self.report = None;
        self.new_entry = None;
        self.set_phase(Phase::Ready);
    }

    /// `READY → PLAYING`
    pub(crate) fn start(&mut self) {
        if self.phase != Phase::Ready {
            self.ignore("start");
            return;
        }
        self.enter_playing();
    }

    /// `PLAYING → PAUSED`
    pub(crate) fn pause(&mut self) {
        if self.phase != Phase::Playing {
            self.ignore("pause");
            return;
        }
        self.set_phase(Phase::Paused);
    }

    /// `PAUSED → PLAYING`
    pub(crate) fn resume(&mut self) {
        if self.phase != Phase::Paused {
            self.ignore("resume");
            return;
        }
        self.enter_playing();
    }

    pub(crate) fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Playing => self.pause(),
            Phase::Paused => self.resume(),
            _ => self.ignore("toggle_pause"),
        }
    }

    /// `PAUSED → DIFFICULTY_SELECT`: give up on the current session without
    /// recording anything
    pub(crate) fn abandon(&mut self) {
        if self.phase != Phase::Paused {
            self.ignore("abandon");
            return;
        }
        self.session = None;
        self.set_phase(Phase::DifficultySelect);
    }

    /// Request a change of heading for the next movement tick.  Returns
    /// `false` if the request was rejected.
    pub(crate) fn steer(&mut self, dir: Direction) -> bool {
        if self.phase == Phase::Playing {
            if let Some(session) = self.session.as_mut() {
                return session.snake.set_heading(dir);
            }
        }
        self.ignore("steer");
        false
    }

    /// Advance the snake one cell and apply the consequences.  Returns the
    /// outcome of the move, or `None` if the game is not in play.
    pub(crate) fn movement_tick(&mut self) -> Option<Outcome> {
        if self.phase != Phase::Playing {
            self.ignore("movement_tick");
            return None;
        }
        let bounds = self.bounds;
        let start = self.start;
        let session = self.session.as_mut()?;
        let profile = session.profile;
        session.elapsed_ms = session.elapsed_ms.saturating_add(profile.tick_interval_ms);
        session.snake.apply_pending_heading();
        let mut candidate = session.snake.advance();
        if !profile.wall_collision {
            candidate = bounds.wrap(candidate);
        }
        let outcome = classify(
            candidate,
            &session.snake,
            session.food.map(|f| f.cell),
            bounds,
            &profile,
        );
        let mut board_cleared = false;
        match outcome {
            Outcome::Continue => {
                session.snake.commit_move(candidate, false);
                let now = session.elapsed_ms;
                if session
                    .food
                    .is_some_and(|f| f.expired(now, profile.food_timeout_ms))
                {
                    tracing::debug!("Food expired; replacing");
                    session.food = Food::spawn(&mut self.rng, bounds, &session.snake, now);
                    board_cleared = session.food.is_none();
                }
            }
            Outcome::Grow => {
                session.snake.commit_move(candidate, true);
                let gain = session
                    .score
                    .on_food_consumed(consts::BASE_SCORE, profile.tier);
                session.last_gain = Some(gain);
                session.longest_len = session.longest_len.max(session.snake.len());
                session.food =
                    Food::spawn(&mut self.rng, bounds, &session.snake, session.elapsed_ms);
                board_cleared = session.food.is_none();
            }
            Outcome::WallHit | Outcome::SelfHit => {
                session.snake.kill();
                session.score.on_failure();
                session.lives = session.lives.saturating_sub(1);
                tracing::debug!(?outcome, lives = session.lives, "Snake crashed");
                if session.lives > 0 {
                    session.snake.reset(start);
                    if session.food.is_some_and(|f| session.snake.occupies(f.cell)) {
                        session.food =
                            Food::spawn(&mut self.rng, bounds, &session.snake, session.elapsed_ms);
                    }
                } else {
                    self.enter_game_over(EndReason::OutOfLives);
                    return Some(outcome);
                }
            }
        }
        if board_cleared {
            self.enter_game_over(EndReason::BoardCleared);
        }
        Some(outcome)
    }

    /// Count down one second of play time
    pub(crate) fn countdown_tick(&mut self) {
        if self.phase != Phase::Playing {
            self.ignore("countdown_tick");
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.time_remaining_secs = session.time_remaining_secs.saturating_sub(1);
        session.played_secs = session.played_secs.saturating_add(1);
        if session.time_remaining_secs == 0 {
            self.enter_game_over(EndReason::TimeUp);
        }
    }

    /// `GAME_OVER → NAME_INPUT` if anything was scored, else
    /// `GAME_OVER → DIFFICULTY_SELECT`
    pub(crate) fn confirm(&mut self) {
        if self.phase != Phase::GameOver {
            self.ignore("confirm");
            return;
        }
        if self.report.is_some_and(|r| r.final_score > 0) {
            self.set_phase(Phase::NameInput);
        } else {
            self.session = None;
            self.set_phase(Phase::DifficultySelect);
        }
    }

    /// `NAME_INPUT → LEADERBOARD`: record the session's score under `name`.
    /// A blank name is recorded as [`ANONYMOUS`][consts::ANONYMOUS]; any
    /// other name is remembered for next time.
    pub(crate) fn submit_name(&mut self, name: &str, achieved_at: DateTime<Utc>) {
        if self.phase != Phase::NameInput {
            self.ignore("submit_name");
            return;
        }
        let Some(report) = self.report else {
            return;
        };
        let name = name.trim();
        let player_name = if name.is_empty() {
            String::from(consts::ANONYMOUS)
        } else {
            self.store.save_settings(SettingsPatch {
                username: Some(name.to_owned()),
                ..SettingsPatch::default()
            });
            name.to_owned()
        };
        let entry = self.store.save_score(
            player_name,
            report.final_score,
            report.difficulty,
            achieved_at,
        );
        tracing::info!(id = entry.id, score = entry.score, "Recorded leaderboard entry");
        self.new_entry = Some(entry);
        self.session = None;
        self.set_phase(Phase::Leaderboard);
    }

    /// `LEADERBOARD | GAME_OVER → DIFFICULTY_SELECT`
    pub(crate) fn restart(&mut self) {
        if !matches!(self.phase, Phase::Leaderboard | Phase::GameOver) {
            self.ignore("restart");
            return;
        }
        self.session = None;
        self.set_phase(Phase::DifficultySelect);
    }

    fn fresh_session(&mut self, tier: Difficulty) -> Session {
        Session::new(self.profiles.get(tier), self.bounds, self.start, &mut self.rng)
    }

    /// Validate the session and enter PLAYING.  A session that fails
    /// validation is replaced by a fresh one for the same tier.
    fn enter_playing(&mut self) {
        let tier = self.session.as_ref().map_or(self.selected, |s| s.profile.tier);
        match self.session.as_ref().map(|s| s.validate(self.bounds)) {
            Some(Ok(())) => (),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Session failed validation; starting afresh");
                self.session = Some(self.fresh_session(tier));
            }
            None => {
                tracing::warn!("No session to play; starting afresh");
                self.session = Some(self.fresh_session(tier));
            }
        }
        self.set_phase(Phase::Playing);
    }

    fn enter_game_over(&mut self, reason: EndReason) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let tier = session.profile.tier;
        let final_score = session.score.total();
        let played_secs = session.played_secs;
        let longest = u32::try_from(session.longest_len).unwrap_or(u32::MAX);
        let mut previous_high_score = 0;
        let progress = self.store.update_progress(|p| {
            previous_high_score = p.high_scores.get(tier);
            if final_score > previous_high_score {
                p.high_scores.set(tier, final_score);
            }
            p.total_games = p.total_games.saturating_add(1);
            p.total_score = p.total_score.saturating_add(u64::from(final_score));
            p.longest_snake_length = p.longest_snake_length.max(longest);
            if reason.is_win() {
                let secs = played_secs.max(1);
                if p.fastest_win_secs == 0 || secs < p.fastest_win_secs {
                    p.fastest_win_secs = secs;
                }
            }
        });
        let report = GameOverReport {
            reason,
            difficulty: tier,
            final_score,
            previous_high_score,
            new_high_score: final_score > previous_high_score,
            snake_length: session.snake.len(),
            longest_snake_length: progress.longest_snake_length,
            played_secs,
        };
        tracing::info!(?reason, score = final_score, "Game over");
        self.report = Some(report);
        self.set_phase(Phase::GameOver);
    }
}

impl<R> Game<R> {
    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    /// A read-only view of the current state for drawing
    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.phase, self.session.as_ref())
    }

    /// The active session's difficulty profile, if any
    pub(crate) fn profile(&self) -> Option<&DifficultyProfile> {
        self.session.as_ref().map(Session::profile)
    }

    pub(crate) fn profiles(&self) -> &Profiles {
        &self.profiles
    }

    pub(crate) fn selected_difficulty(&self) -> Difficulty {
        self.selected
    }

    pub(crate) fn report(&self) -> Option<&GameOverReport> {
        self.report.as_ref()
    }

    pub(crate) fn new_entry(&self) -> Option<&LeaderboardEntry> {
        self.new_entry.as_ref()
    }

    pub(crate) fn store(&self) -> &Store {
        &self.store
    }

    /// Put the food at `cell`
    #[cfg(test)]
    pub(crate) fn place_food(&mut self, cell: Cell) {
        if let Some(s) = self.session.as_mut() {
            s.food = Some(Food {
                cell,
                spawned_at_ms: s.elapsed_ms,
            });
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "Changing phase");
        self.phase = phase;
    }

    fn ignore(&self, trigger: &'static str) {
        tracing::trace!(phase = ?self.phase, trigger, "Ignoring trigger");
    }
}
