use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Difficulty tier chosen before a session starts
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Enum, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub(crate) enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// The built-in tuning for this tier
    pub(crate) fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                tier: self,
                tick_interval_ms: 150,
                time_limit_secs: 35,
                starting_lives: 3,
                wall_collision: true,
                food_timeout_ms: None,
            },
            Difficulty::Medium => DifficultyProfile {
                tier: self,
                tick_interval_ms: 120,
                time_limit_secs: 60,
                starting_lives: 1,
                wall_collision: true,
                food_timeout_ms: None,
            },
            Difficulty::Hard => DifficultyProfile {
                tier: self,
                tick_interval_ms: 90,
                time_limit_secs: 90,
                starting_lives: 1,
                wall_collision: true,
                food_timeout_ms: Some(5000),
            },
        }
    }

    /// Score multiplier for this tier, in tenths (10 = ×1.0)
    pub(crate) fn score_multiplier_tenths(self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 15,
            Difficulty::Hard => 20,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub(crate) fn blurb(self) -> &'static str {
        match self {
            Difficulty::Easy => "Slow snake, three lives",
            Difficulty::Medium => "Faster snake, one life",
            Difficulty::Hard => "Fastest snake, food spoils",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Tunable session parameters for one difficulty tier
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DifficultyProfile {
    pub(crate) tier: Difficulty,

    /// Milliseconds between movements of the snake
    pub(crate) tick_interval_ms: u64,

    /// Length of the session countdown
    pub(crate) time_limit_secs: u32,

    pub(crate) starting_lives: u32,

    /// When `false`, the snake wraps around to the opposite edge instead of
    /// dying on contact with a wall
    pub(crate) wall_collision: bool,

    /// If set, uneaten food is replaced after this much play time
    pub(crate) food_timeout_ms: Option<u64>,
}

impl DifficultyProfile {
    pub(crate) fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// The difficulty table in effect for a run of the program
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Profiles(EnumMap<Difficulty, DifficultyProfile>);

impl Profiles {
    pub(crate) fn get(&self, tier: Difficulty) -> DifficultyProfile {
        self.0[tier]
    }

    pub(crate) fn set(&mut self, profile: DifficultyProfile) {
        self.0[profile.tier] = profile;
    }
}

impl Default for Profiles {
    fn default() -> Profiles {
        Profiles(EnumMap::from_fn(Difficulty::profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::EnumExt;

    #[test]
    fn easy_profile() {
        let easy = Difficulty::Easy.profile();
        assert_eq!(easy.time_limit_secs, 35);
        assert_eq!(easy.starting_lives, 3);
        assert_eq!(easy.tick_interval(), Duration::from_millis(150));
        assert!(easy.wall_collision);
        assert_eq!(easy.food_timeout_ms, None);
    }

    #[test]
    fn only_hard_spoils_food() {
        for tier in Difficulty::iter() {
            assert_eq!(
                tier.profile().food_timeout_ms.is_some(),
                tier == Difficulty::Hard
            );
        }
    }

    #[test]
    fn profiles_are_tagged_with_their_tier() {
        let profiles = Profiles::default();
        for tier in Difficulty::iter() {
            assert_eq!(profiles.get(tier).tier, tier);
        }
    }

    #[test]
    fn serde_names() {
        assert_eq!(
            serde_json::to_string(&Difficulty::Hard).unwrap(),
            r#""HARD""#
        );
        assert_eq!(
            serde_json::from_str::<Difficulty>(r#""EASY""#).unwrap(),
            Difficulty::Easy
        );
    }

    #[test]
    fn display_pads() {
        assert_eq!(format!("{:8}|", Difficulty::Easy), "Easy    |");
    }
}
