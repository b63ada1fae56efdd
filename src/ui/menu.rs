use super::{key_hints, minutes_seconds};
use crate::consts;
use crate::game::{Difficulty, Profiles};
use crate::storage::Progress;
use crate::util::{center_rect, EnumExt};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect, Size},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// The difficulty selection screen: the three tiers, a preview of the
/// highlighted one, and lifetime statistics
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DifficultyMenu<'a> {
    pub(crate) selected: Difficulty,
    pub(crate) profiles: &'a Profiles,
    pub(crate) progress: &'a Progress,
}

impl DifficultyMenu<'_> {
    const WIDTH: u16 = 72;
    const HEIGHT: u16 = 13;

    fn tier_line(&self, tier: Difficulty) -> Line<'static> {
        let selected = tier == self.selected;
        let line = Line::from_iter([
            Span::raw(if selected { "» " } else { "  " }),
            Span::raw(format!("{tier:8}")),
            Span::raw(tier.blurb()),
        ]);
        if selected {
            line.style(consts::MENU_SELECTION_STYLE)
        } else {
            line
        }
    }

    fn preview(&self) -> [Line<'static>; 3] {
        let profile = self.profiles.get(self.selected);
        let walls = if profile.wall_collision {
            "solid"
        } else {
            "wrap around"
        };
        let food = match profile.food_timeout_ms {
            Some(ms) => format!("spoils after {}.{}s", ms / 1000, ms % 1000 / 100),
            None => String::from("never spoils"),
        };
        let high = self.progress.high_scores.get(self.selected);
        [
            Line::raw(format!(
                "Speed: {} ms   Time: {}   Lives: {}",
                profile.tick_interval_ms,
                minutes_seconds(profile.time_limit_secs),
                profile.starting_lives,
            )),
            Line::raw(format!("Walls: {walls}   Food: {food}")),
            Line::from_iter([
                Span::raw("High score: "),
                Span::styled(high.to_string(), consts::HIGHLIGHT_STYLE),
            ]),
        ]
    }

    fn stats(&self) -> Line<'static> {
        let p = self.progress;
        let fastest = if p.fastest_win_secs == 0 {
            String::from("-")
        } else {
            minutes_seconds(p.fastest_win_secs)
        };
        Line::raw(format!(
            "Games: {}   Total score: {}   Longest snake: {}   Fastest win: {fastest}",
            p.total_games, p.total_score, p.longest_snake_length
        ))
    }
}

impl Widget for DifficultyMenu<'_> {
    /*
     *                           Choose Difficulty
     *
     *  » Easy    Slow snake, three lives
     *    Medium  Faster snake, one life
     *    Hard    Fastest snake, food spoils
     *
     *  Speed: 150 ms   Time: 0:35   Lives: 3
     *  Walls: solid   Food: never spoils
     *  High score: 120
     *
     *  Games: 4   Total score: 410   Longest snake: 12   Fastest win: -
     *
     *  ↑/↓ Select   Enter Play   q Quit
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = center_rect(
            area,
            Size {
                width: Self::WIDTH,
                height: Self::HEIGHT,
            },
        );
        let [title_area, tiers_area, preview_area, stats_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .flex(Flex::Start)
        .spacing(1)
        .areas(area);
        Line::styled("Choose Difficulty", Style::new().add_modifier(Modifier::BOLD))
            .centered()
            .render(title_area, buf);
        for (tier, row) in Difficulty::iter().zip(tiers_area.rows()) {
            self.tier_line(tier).render(row, buf);
        }
        for (line, row) in self.preview().into_iter().zip(preview_area.rows()) {
            line.render(row, buf);
        }
        self.stats().render(stats_area, buf);
        key_hints(&[("↑/↓", "Select"), ("Enter", "Play"), ("q", "Quit")]).render(hints_area, buf);
    }
}
