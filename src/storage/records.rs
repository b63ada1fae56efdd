use crate::consts;
use crate::game::Difficulty;
use chrono::{DateTime, Utc};
use enum_map::EnumMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which input device the player prefers
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ControlType {
    #[default]
    Keyboard,
    Touch,
    Joystick,
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlType::Keyboard => "keyboard",
            ControlType::Touch => "touch",
            ControlType::Joystick => "joystick",
        };
        f.pad(name)
    }
}

/// Player preferences
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct Settings {
    pub(crate) control_type: ControlType,
    pub(crate) username: String,
    pub(crate) difficulty: Difficulty,
}

impl Settings {
    pub(crate) fn apply(&mut self, patch: SettingsPatch) {
        if let Some(control_type) = patch.control_type {
            self.control_type = control_type;
        }
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty;
        }
    }
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            control_type: ControlType::Keyboard,
            username: String::from("Player"),
            difficulty: Difficulty::Medium,
        }
    }
}

/// A partial update to [`Settings`]; `None` fields keep their stored values
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct SettingsPatch {
    pub(crate) control_type: Option<ControlType>,
    pub(crate) username: Option<String>,
    pub(crate) difficulty: Option<Difficulty>,
}

/// Lifetime statistics across all sessions
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct Progress {
    pub(crate) high_scores: HighScores,
    pub(crate) total_games: u32,
    pub(crate) total_score: u64,
    #[serde(rename = "longestSnake")]
    pub(crate) longest_snake_length: u32,
    /// Shortest time in which the board has been cleared; 0 if never
    #[serde(rename = "fastestWin")]
    pub(crate) fastest_win_secs: u32,
}

/// Best score for each difficulty tier
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "RawHighScores", into = "RawHighScores")]
pub(crate) struct HighScores(EnumMap<Difficulty, u32>);

impl HighScores {
    pub(crate) fn get(&self, tier: Difficulty) -> u32 {
        self.0[tier]
    }

    pub(crate) fn set(&mut self, tier: Difficulty, score: u32) {
        self.0[tier] = score;
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "UPPERCASE")]
struct RawHighScores {
    easy: u32,
    medium: u32,
    hard: u32,
}

impl From<RawHighScores> for HighScores {
    fn from(raw: RawHighScores) -> HighScores {
        HighScores(EnumMap::from_array([raw.easy, raw.medium, raw.hard]))
    }
}

impl From<HighScores> for RawHighScores {
    fn from(hs: HighScores) -> RawHighScores {
        RawHighScores {
            easy: hs.get(Difficulty::Easy),
            medium: hs.get(Difficulty::Medium),
            hard: hs.get(Difficulty::Hard),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct LeaderboardEntry {
    pub(crate) id: u64,
    #[serde(rename = "name")]
    pub(crate) player_name: String,
    pub(crate) score: u32,
    /// Stored as seconds since the Unix epoch
    #[serde(rename = "date", with = "chrono::serde::ts_seconds")]
    pub(crate) achieved_at: DateTime<Utc>,
    pub(crate) difficulty: Difficulty,
}

/// Recorded scores, best first
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct Leaderboard(Vec<LeaderboardEntry>);

impl Leaderboard {
    /// Number of entries shown on one page of the leaderboard screen
    pub(crate) const PAGE_SIZE: usize = 5;

    pub(crate) fn entries(&self) -> &[LeaderboardEntry] {
        &self.0
    }

    /// Add a new entry below any existing entries with the same score,
    /// dropping the lowest entries beyond
    /// [`MAX_LEADERBOARD_ENTRIES`][consts::MAX_LEADERBOARD_ENTRIES]
    pub(super) fn insert(
        &mut self,
        player_name: String,
        score: u32,
        difficulty: Difficulty,
        achieved_at: DateTime<Utc>,
    ) -> LeaderboardEntry {
        let taken = |id: &u64| self.0.iter().any(|e| e.id == *id);
        // Past `u64::MAX`, reuse the lowest free ID
        let id = self
            .0
            .iter()
            .map(|e| e.id)
            .max()
            .map_or(Some(1), |m| m.checked_add(1))
            .or_else(|| (1..).find(|id| !taken(id)))
            .unwrap_or_default();
        let entry = LeaderboardEntry {
            id,
            player_name,
            score,
            achieved_at,
            difficulty,
        };
        // Documents written by hand may be unsorted
        self.0.sort_by(|a, b| b.score.cmp(&a.score));
        let pos = self.0.partition_point(|e| e.score >= score);
        self.0.insert(pos, entry.clone());
        self.0.truncate(consts::MAX_LEADERBOARD_ENTRIES);
        entry
    }

    pub(crate) fn page_count(&self) -> usize {
        self.0.len().div_ceil(Self::PAGE_SIZE).max(1)
    }

    /// Return the entries on page `page` (zero-based) along with the
    /// one-based rank of the first of them
    pub(crate) fn page(&self, page: usize) -> (usize, &[LeaderboardEntry]) {
        let start = page.saturating_mul(Self::PAGE_SIZE).min(self.0.len());
        let end = start.saturating_add(Self::PAGE_SIZE).min(self.0.len());
        (start + 1, &self.0[start..end])
    }

    /// Return the zero-based page on which the entry with the given ID
    /// appears
    pub(crate) fn page_of(&self, id: u64) -> Option<usize> {
        self.0
            .iter()
            .position(|e| e.id == id)
            .map(|i| i / Self::PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn settings_json() {
        let settings = Settings {
            control_type: ControlType::Joystick,
            username: String::from("Ada"),
            difficulty: Difficulty::Easy,
        };
        let src = serde_json::to_string(&settings).unwrap();
        assert_eq!(
            src,
            r#"{"controlType":"joystick","username":"Ada","difficulty":"EASY"}"#
        );
    }

    #[test]
    fn progress_json() {
        let src = r#"{
            "highScores": {"EASY": 120, "HARD": 75},
            "totalGames": 4,
            "totalScore": 300,
            "longestSnake": 17,
            "fastestWin": 0
        }"#;
        let progress = serde_json::from_str::<Progress>(src).unwrap();
        assert_eq!(progress.high_scores.get(Difficulty::Easy), 120);
        assert_eq!(progress.high_scores.get(Difficulty::Medium), 0);
        assert_eq!(progress.high_scores.get(Difficulty::Hard), 75);
        assert_eq!(progress.total_games, 4);
        assert_eq!(progress.total_score, 300);
        assert_eq!(progress.longest_snake_length, 17);
        let back = serde_json::to_value(&progress).unwrap();
        assert_eq!(
            back["highScores"],
            serde_json::json!({"EASY": 120, "MEDIUM": 0, "HARD": 75})
        );
    }

    #[test]
    fn patch_leaves_unset_fields() {
        let mut settings = Settings::default();
        settings.apply(SettingsPatch {
            control_type: Some(ControlType::Touch),
            ..SettingsPatch::default()
        });
        assert_eq!(settings.control_type, ControlType::Touch);
        assert_eq!(settings.username, "Player");
        assert_eq!(settings.difficulty, Difficulty::Medium);
    }

    fn board(scores: &[u32]) -> Leaderboard {
        let mut board = Leaderboard::default();
        for (i, &score) in scores.iter().enumerate() {
            board.insert(
                format!("p{i}"),
                score,
                Difficulty::Medium,
                DateTime::UNIX_EPOCH,
            );
        }
        board
    }

    #[test]
    fn ties_keep_insertion_order() {
        let board = board(&[50, 80, 50, 20]);
        let order = board
            .entries()
            .iter()
            .map(|e| (e.player_name.as_str(), e.score))
            .collect::<Vec<_>>();
        assert_eq!(order, [("p1", 80), ("p0", 50), ("p2", 50), ("p3", 20)]);
    }

    #[test]
    fn capped() {
        let scores = (0..110).collect::<Vec<u32>>();
        let board = board(&scores);
        assert_eq!(board.entries().len(), consts::MAX_LEADERBOARD_ENTRIES);
        assert_eq!(board.entries()[0].score, 109);
        assert_eq!(board.entries().last().map(|e| e.score), Some(10));
    }

    #[test]
    fn entry_date_is_unix_seconds() {
        let src = r#"[{"id": 3, "name": "Ada", "score": 40, "date": 1700000000, "difficulty": "HARD"}]"#;
        let board = serde_json::from_str::<Leaderboard>(src).unwrap();
        let entry = &board.entries()[0];
        assert_eq!(entry.achieved_at.format("%Y-%m-%d").to_string(), "2023-11-14");
        assert_eq!(
            serde_json::to_value(entry).unwrap()["date"],
            serde_json::json!(1_700_000_000)
        );
    }

    #[test]
    fn next_id_after_max() {
        let src = r#"[{"id": 18446744073709551615, "name": "Max", "score": 40, "date": 0, "difficulty": "EASY"}]"#;
        let mut board = serde_json::from_str::<Leaderboard>(src).unwrap();
        let entry = board.insert(
            String::from("Next"),
            10,
            Difficulty::Easy,
            DateTime::UNIX_EPOCH,
        );
        assert_eq!(entry.id, 1);
        assert_eq!(board.entries().len(), 2);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(5, 1)]
    #[case(6, 2)]
    #[case(12, 3)]
    fn test_page_count(#[case] n: usize, #[case] pages: usize) {
        let scores = vec![1; n];
        assert_eq!(board(&scores).page_count(), pages);
    }

    #[test]
    fn pages() {
        let board = board(&[10, 20, 30, 40, 50, 60, 70]);
        let (rank, first) = board.page(0);
        assert_eq!(rank, 1);
        assert_eq!(first.len(), 5);
        assert_eq!(first[0].score, 70);
        let (rank, second) = board.page(1);
        assert_eq!(rank, 6);
        assert_eq!(
            second.iter().map(|e| e.score).collect::<Vec<_>>(),
            [20, 10]
        );
        assert!(board.page(9).1.is_empty());
        let lowest = board.entries().last().map(|e| e.id).unwrap();
        assert_eq!(board.page_of(lowest), Some(1));
        assert_eq!(board.page_of(999), None);
    }
}
