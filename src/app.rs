use crate::assets::Assets;
use crate::clock::{Schedule, Tick};
use crate::command::Command;
use crate::game::{Game, Phase};
use crate::storage::Progress;
use crate::ui::{
    Board, DifficultyMenu, ErrorOutcome, ErrorPopup, GameOverScreen, LeaderboardExit,
    LeaderboardView, NameInput, PauseMenu, PauseOpt, Tutorial,
};
use crate::util::{center_rect, get_display_area, EnumExt};
use chrono::Utc;
use crossterm::event::{poll, read, Event};
use rand::{rngs::ThreadRng, Rng};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Rect, Size},
    text::Line,
    widgets::Widget,
    Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::Instant;

/// Runs the engine against the terminal: draws each phase, turns key
/// presses into engine triggers, and fires the session timers
#[derive(Debug)]
pub(crate) struct App<R = ThreadRng> {
    game: Game<R>,

    /// Configuration file given on the command line, if any
    config_path: Option<PathBuf>,

    schedule: Schedule,

    /// The phase for which `screen` was built
    shown: Phase,

    screen: Screen,
    quitting: bool,
}

/// Presentation state for the current phase
#[derive(Clone, Debug, Eq, PartialEq)]
enum Screen {
    Blank,
    LoadFailed(ErrorPopup),
    Tutorial(Tutorial),
    Menu(Progress),
    Paused(PauseMenu),
    NameInput(NameInput),
    Leaderboard(LeaderboardView),
}

impl App<ThreadRng> {
    pub(crate) fn new(config_path: Option<PathBuf>) -> App<ThreadRng> {
        App::with_game(Game::new(), config_path)
    }
}

impl<R: Rng> App<R> {
    fn with_game(game: Game<R>, config_path: Option<PathBuf>) -> App<R> {
        App {
            game,
            config_path,
            schedule: Schedule::default(),
            shown: Phase::Loading,
            screen: Screen::Blank,
            quitting: false,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting {
            if self.game.phase() == Phase::Loading && self.screen == Screen::Blank {
                self.load();
            }
            terminal.draw(|frame| frame.render_widget(&self, frame.area()))?;
            self.process_input()?;
        }
        Ok(())
    }

    fn load(&mut self) {
        match Assets::load(self.config_path.as_deref()) {
            Ok(assets) => self.game.assets_ready(assets),
            Err(e) => {
                let err: &dyn std::error::Error = &e;
                tracing::error!(error = err, "Asset loading failed");
                self.screen = Screen::LoadFailed(ErrorPopup::from(e));
            }
        }
        self.sync(Instant::now());
    }

    fn process_input(&mut self) -> io::Result<()> {
        if let Some(when) = self.schedule.next_deadline() {
            let wait = when.saturating_duration_since(Instant::now());
            if wait.is_zero() || !poll(wait)? {
                self.fire_due(Instant::now());
                return Ok(());
            }
        }
        self.handle_event(read()?);
        Ok(())
    }

    /// Fire every timer whose deadline is at or before `now`.  Each timer
    /// fires at most once per call, however late the wakeup.
    fn fire_due(&mut self, now: Instant) {
        while let Some(tick) = self.schedule.pop_due(now) {
            match tick {
                Tick::Movement => {
                    if let Some(outcome) = self.game.movement_tick() {
                        tracing::trace!(?outcome, crashed = outcome.is_fatal(), "Snake moved");
                    }
                }
                Tick::Countdown => self.game.countdown_tick(),
            }
            self.sync(now);
        }
    }

    fn handle_event(&mut self, event: Event) {
        if event == Event::FocusLost {
            self.game.pause();
        } else if let Some(cmd) = event
            .as_key_press_event()
            .and_then(Command::from_key_event)
        {
            self.handle_command(cmd);
        }
        self.sync(Instant::now());
    }

    fn handle_command(&mut self, cmd: Command) {
        match self.game.phase() {
            Phase::Loading => {
                if let Screen::LoadFailed(ref mut popup) = self.screen {
                    match popup.handle_command(cmd) {
                        Some(ErrorOutcome::Retry) => self.screen = Screen::Blank,
                        Some(ErrorOutcome::Quit) => self.quitting = true,
                        None => (),
                    }
                } else if cmd == Command::Quit {
                    self.quitting = true;
                }
            }
            Phase::Tutorial => {
                if cmd == Command::Quit {
                    self.quitting = true;
                } else if let Screen::Tutorial(ref mut tutorial) = self.screen {
                    if tutorial.handle_command(cmd) {
                        self.game.finish_tutorial();
                    }
                }
            }
            Phase::DifficultySelect => {
                let selected = self.game.selected_difficulty();
                match cmd {
                    Command::Quit | Command::Esc | Command::Char('q') => self.quitting = true,
                    Command::Enter | Command::Char(' ') => self.game.choose_difficulty(selected),
                    Command::Up | Command::Prev | Command::Char('w' | 'k') => {
                        if let Some(tier) = selected.prev() {
                            self.game.highlight_difficulty(tier);
                        }
                    }
                    Command::Down | Command::Next | Command::Char('s' | 'j') => {
                        if let Some(tier) = selected.next() {
                            self.game.highlight_difficulty(tier);
                        }
                    }
                    _ => (),
                }
            }
            Phase::Ready => match cmd {
                Command::Enter | Command::Char(' ') => self.game.start(),
                Command::Quit | Command::Char('q') => self.quitting = true,
                _ => (),
            },
            Phase::Playing => match cmd {
                Command::Quit => self.quitting = true,
                Command::Esc | Command::Char('p' | ' ') => self.game.toggle_pause(),
                _ => {
                    if let Some(dir) = cmd.direction() {
                        self.game.steer(dir);
                    }
                }
            },
            Phase::Paused => {
                if let Screen::Paused(ref mut menu) = self.screen {
                    match menu.handle_command(cmd) {
                        Some(PauseOpt::Resume) => self.game.resume(),
                        Some(PauseOpt::Menu) => self.game.abandon(),
                        Some(PauseOpt::Quit) => self.quitting = true,
                        None => (),
                    }
                }
            }
            Phase::GameOver => match cmd {
                Command::Enter | Command::Char(' ') => self.game.confirm(),
                Command::Char('r') => self.game.restart(),
                Command::Quit | Command::Char('q') => self.quitting = true,
                _ => (),
            },
            Phase::NameInput => {
                if cmd == Command::Quit {
                    self.quitting = true;
                } else if let Screen::NameInput(ref mut input) = self.screen {
                    if input.handle_command(cmd) {
                        self.game.submit_name(input.text(), Utc::now());
                    }
                }
            }
            Phase::Leaderboard => {
                if let Screen::Leaderboard(ref mut view) = self.screen {
                    match view.handle_command(cmd) {
                        Some(LeaderboardExit::Menu) => self.game.restart(),
                        Some(LeaderboardExit::Quit) => self.quitting = true,
                        None => (),
                    }
                }
            }
        }
    }

    /// Rebuild the screen if the phase has changed, and arm or cancel the
    /// timers to match
    fn sync(&mut self, now: Instant) {
        let phase = self.game.phase();
        if phase != self.shown {
            self.screen = self.screen_for(phase);
            self.shown = phase;
        }
        let playing = phase == Phase::Playing;
        if playing && !self.schedule.is_armed() {
            if let Some(profile) = self.game.profile() {
                self.schedule.arm(now, profile.tick_interval());
            }
        } else if !playing && self.schedule.is_armed() {
            self.schedule.cancel();
        }
    }

    fn screen_for(&self, phase: Phase) -> Screen {
        let store = self.game.store();
        match phase {
            Phase::Tutorial => Screen::Tutorial(Tutorial::default()),
            Phase::DifficultySelect => Screen::Menu(store.progress()),
            Phase::Paused => Screen::Paused(PauseMenu::new()),
            Phase::NameInput => match self.game.report() {
                Some(report) => Screen::NameInput(NameInput::new(&store.settings().username, report)),
                None => Screen::Blank,
            },
            Phase::Leaderboard => Screen::Leaderboard(LeaderboardView::new(
                store.leaderboard(),
                self.game.new_entry().map(|e| e.id),
            )),
            Phase::Loading | Phase::Ready | Phase::Playing | Phase::GameOver => Screen::Blank,
        }
    }
}

impl<R> Widget for &App<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let game = &self.game;
        let phase = game.phase();
        if matches!(
            phase,
            Phase::Ready | Phase::Playing | Phase::Paused | Phase::GameOver | Phase::NameInput
        ) {
            let snapshot = game.snapshot();
            Board {
                snapshot: &snapshot,
                wrap: game.profile().is_some_and(|p| !p.wall_collision),
            }
            .render(display, buf);
        }
        match (&self.screen, phase) {
            (Screen::LoadFailed(popup), _) => popup.render(display, buf),
            (Screen::Tutorial(tutorial), _) => tutorial.render(display, buf),
            (Screen::Menu(progress), _) => DifficultyMenu {
                selected: game.selected_difficulty(),
                profiles: game.profiles(),
                progress,
            }
            .render(display, buf),
            (Screen::Paused(menu), _) => {
                let popup_area = center_rect(
                    display,
                    Size {
                        width: PauseMenu::WIDTH,
                        height: PauseMenu::HEIGHT,
                    },
                );
                menu.render(popup_area, buf);
            }
            (Screen::NameInput(input), _) => input.render(display, buf),
            (Screen::Leaderboard(view), _) => view.render(display, buf),
            (Screen::Blank, Phase::Loading) => {
                Line::raw("Loading…").centered().render(
                    center_rect(display, Size::new(display.width, 1)),
                    buf,
                );
            }
            (Screen::Blank, Phase::GameOver) => {
                if let Some(report) = game.report() {
                    GameOverScreen(report).render(display, buf);
                }
            }
            (Screen::Blank, _) => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, Difficulty, Direction, EndReason};
    use crate::ui::buffer_rows;
    use crossterm::event::{KeyCode, KeyEvent};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    /// An app whose configuration turns off saving data, with assets loaded
    fn loaded() -> (App<ChaCha12Rng>, TempDir) {
        let tmp = tempdir().unwrap();
        let cfg = tmp.path().join("config.toml");
        fs_err::write(&cfg, "[files]\nsave-data = false\n").unwrap();
        let mut app = App::with_game(
            Game::new_with_rng(ChaCha12Rng::seed_from_u64(RNG_SEED)),
            Some(cfg),
        );
        app.load();
        (app, tmp)
    }

    fn rendered(app: &App<ChaCha12Rng>) -> Vec<String> {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer_rows(&buffer)
    }

    fn shows(app: &App<ChaCha12Rng>, text: &str) -> bool {
        rendered(app).iter().any(|row| row.contains(text))
    }

    /// Skip the tutorial and start a session on Easy
    fn playing() -> (App<ChaCha12Rng>, TempDir) {
        let (mut app, tmp) = loaded();
        app.handle_command(Command::Esc);
        app.handle_command(Command::Up);
        app.handle_command(Command::Up);
        app.handle_command(Command::Enter);
        app.sync(Instant::now());
        app.handle_command(Command::Enter);
        (app, tmp)
    }

    /// Wake up every 50 ms after `start` until `end`
    fn run_until(app: &mut App<ChaCha12Rng>, start: Instant, end: Instant) {
        let mut now = start;
        while now < end {
            now += Duration::from_millis(50);
            app.fire_due(now);
        }
    }

    #[test]
    fn loads_into_tutorial() {
        let (app, _tmp) = loaded();
        assert_eq!(app.game.phase(), Phase::Tutorial);
        assert_eq!(app.screen, Screen::Tutorial(Tutorial::default()));
        assert!(shows(&app, "Welcome to Snake!"));
    }

    #[test]
    fn load_failure_offers_retry() {
        let tmp = tempdir().unwrap();
        let mut app = App::with_game(
            Game::new_with_rng(ChaCha12Rng::seed_from_u64(RNG_SEED)),
            Some(tmp.path().join("nope.toml")),
        );
        app.load();
        assert_eq!(app.game.phase(), Phase::Loading);
        assert!(matches!(app.screen, Screen::LoadFailed(_)));
        assert!(shows(&app, "Failed to load game assets"));
        app.handle_command(Command::Enter);
        assert_eq!(app.screen, Screen::Blank);
        assert!(shows(&app, "Loading…"));
        assert!(!app.quitting);
    }

    #[test]
    fn load_failure_quit() {
        let tmp = tempdir().unwrap();
        let mut app = App::with_game(
            Game::new_with_rng(ChaCha12Rng::seed_from_u64(RNG_SEED)),
            Some(tmp.path().join("nope.toml")),
        );
        app.load();
        app.handle_command(Command::Char('q'));
        assert!(app.quitting);
    }

    #[test]
    fn menu_to_play() {
        let (mut app, _tmp) = loaded();
        app.handle_command(Command::Esc);
        app.sync(Instant::now());
        assert_eq!(app.game.phase(), Phase::DifficultySelect);
        assert!(matches!(app.screen, Screen::Menu(_)));
        assert!(shows(&app, "Choose Difficulty"));
        app.handle_command(Command::Up);
        app.handle_command(Command::Up);
        assert_eq!(app.game.selected_difficulty(), Difficulty::Easy);
        app.handle_command(Command::Down);
        assert_eq!(app.game.selected_difficulty(), Difficulty::Medium);
        app.handle_command(Command::Enter);
        app.sync(Instant::now());
        assert_eq!(app.game.phase(), Phase::Ready);
        assert!(!app.schedule.is_armed());
        assert!(shows(&app, "Press Enter to start"));
        app.handle_command(Command::Enter);
        app.sync(Instant::now());
        assert_eq!(app.game.phase(), Phase::Playing);
        assert!(app.schedule.is_armed());
        assert!(shows(&app, "[Medium]"));
    }

    #[test]
    fn steering() {
        let (mut app, _tmp) = playing();
        app.sync(Instant::now());
        app.handle_command(Command::Char('w'));
        assert!(!app.game.movement_tick().unwrap().is_fatal());
        let head = app.game.snapshot().snake[0];
        assert_eq!(head, crate::consts::START_CELL.step(Direction::Up));
    }

    #[test]
    fn pause_menu() {
        let (mut app, _tmp) = playing();
        let now = Instant::now();
        app.sync(now);
        app.handle_command(Command::Char('p'));
        app.sync(now);
        assert_eq!(app.game.phase(), Phase::Paused);
        assert!(!app.schedule.is_armed());
        assert!(shows(&app, "PAUSED"));
        app.handle_command(Command::Esc);
        app.sync(now);
        assert_eq!(app.game.phase(), Phase::Playing);
        assert!(app.schedule.is_armed());
        app.handle_command(Command::Esc);
        app.sync(now);
        app.handle_command(Command::Char('m'));
        app.sync(now);
        assert_eq!(app.game.phase(), Phase::DifficultySelect);
        assert!(matches!(app.screen, Screen::Menu(_)));
    }

    #[test]
    fn focus_lost_pauses() {
        let (mut app, _tmp) = playing();
        app.sync(Instant::now());
        app.handle_event(Event::FocusLost);
        assert_eq!(app.game.phase(), Phase::Paused);
        assert!(!app.schedule.is_armed());
    }

    #[test]
    fn key_events() {
        let (mut app, _tmp) = loaded();
        app.handle_event(Event::Key(KeyEvent::from(KeyCode::Esc)));
        assert_eq!(app.game.phase(), Phase::DifficultySelect);
        app.handle_event(Event::Key(KeyEvent::from(KeyCode::Char('q'))));
        assert!(app.quitting);
    }

    #[test]
    fn timers_run_session_to_game_over() {
        let (mut app, _tmp) = playing();
        let start = Instant::now();
        app.sync(start);
        assert!(app.schedule.is_armed());
        // Heading straight into the wall, each life lasts nine moves of
        // 150 ms, so all three are gone after 4.05 seconds
        run_until(&mut app, start, start + Duration::from_secs(5));
        assert_eq!(app.game.phase(), Phase::GameOver);
        assert!(!app.schedule.is_armed());
        let report = app.game.report().copied().unwrap();
        assert_eq!(report.reason, EndReason::OutOfLives);
        assert_eq!(report.played_secs, 4);
        assert!(shows(&app, "Out of lives!"));
    }

    #[test]
    fn late_wakeup_moves_once() {
        let (mut app, _tmp) = playing();
        let start = Instant::now();
        app.sync(start);
        let head = app.game.snapshot().snake[0];
        app.fire_due(start + Duration::from_secs(5));
        assert_eq!(app.game.phase(), Phase::Playing);
        assert_eq!(app.game.snapshot().snake[0], head.step(Direction::Right));
    }

    #[test]
    fn game_over_to_leaderboard() {
        let (mut app, _tmp) = playing();
        let start = Instant::now();
        app.sync(start);
        app.game.place_food(Cell::new(9, 8));
        run_until(&mut app, start, start + Duration::from_secs(6));
        let score = app.game.report().map(|r| r.final_score).unwrap();
        assert!(score > 0);
        app.handle_command(Command::Enter);
        app.sync(start);
        assert_eq!(app.game.phase(), Phase::NameInput);
        assert!(shows(&app, "NEW SCORE"));
        for ch in "Zed".chars() {
            app.handle_command(Command::Char(ch));
        }
        app.handle_command(Command::Enter);
        app.sync(start);
        assert_eq!(app.game.phase(), Phase::Leaderboard);
        assert!(shows(&app, "Zed"));
        app.handle_command(Command::Enter);
        app.sync(start);
        assert_eq!(app.game.phase(), Phase::DifficultySelect);
    }

    #[test]
    fn game_over_restart_and_quit() {
        let (mut app, _tmp) = playing();
        let start = Instant::now();
        app.sync(start);
        run_until(&mut app, start, start + Duration::from_secs(5));
        app.handle_command(Command::Char('r'));
        app.sync(start);
        assert_eq!(app.game.phase(), Phase::DifficultySelect);
        app.handle_command(Command::Char('q'));
        assert!(app.quitting);
    }
}
