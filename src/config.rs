use crate::game::{Difficulty, DifficultyProfile, Profiles};
use crate::util::EnumExt;
use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the directories in which configuration & data are kept
const APP_DIR: &str = "combo-snake";

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    /// Settings about data files
    #[serde(default)]
    pub(crate) files: FileConfig,

    /// Adjustments to the built-in difficulty table
    #[serde(default)]
    pub(crate) difficulty: DifficultyConfig,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join(APP_DIR).join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// The built-in difficulty table with this configuration's overrides
    /// applied
    pub(crate) fn profiles(&self) -> Profiles {
        let mut profiles = Profiles::default();
        for tier in Difficulty::iter() {
            let mut profile = profiles.get(tier);
            self.difficulty.get(tier).apply(&mut profile);
            profiles.set(profile);
        }
        profiles
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawFileConfig")]
pub(crate) struct FileConfig {
    /// Directory in which settings, progress, and the leaderboard are stored
    data_dir: Option<PathBuf>,

    /// Whether to load & save data in files at all
    pub(crate) save_data: bool,
}

impl FileConfig {
    /// Return the directory in which data should be stored: the one given in
    /// the configuration or, if that is not set, the default.  Return `None`
    /// if no directory is configured and the default could not be computed.
    pub(crate) fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_local_dir().map(|p| p.join(APP_DIR)))
    }
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            data_dir: None,
            save_data: true,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawFileConfig {
    data_dir: Option<String>,
    save_data: bool,
}

impl Default for RawFileConfig {
    fn default() -> RawFileConfig {
        RawFileConfig {
            data_dir: None,
            save_data: true,
        }
    }
}

impl TryFrom<RawFileConfig> for FileConfig {
    type Error = std::io::Error;

    fn try_from(value: RawFileConfig) -> Result<FileConfig, std::io::Error> {
        Ok(FileConfig {
            data_dir: value.data_dir.map(expanduser::expanduser).transpose()?,
            save_data: value.save_data,
        })
    }
}

/// Per-tier overrides, under `[difficulty.easy]` and so on
#[derive(Clone, Copy, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default)]
pub(crate) struct DifficultyConfig {
    easy: ProfileOverride,
    medium: ProfileOverride,
    hard: ProfileOverride,
}

impl DifficultyConfig {
    fn get(&self, tier: Difficulty) -> &ProfileOverride {
        match tier {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}

/// Any subset of a [`DifficultyProfile`]'s tunable fields
#[derive(Clone, Copy, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct ProfileOverride {
    tick_interval_ms: Option<NonZeroU64>,
    time_limit_secs: Option<NonZeroU32>,
    starting_lives: Option<NonZeroU32>,
    wall_collision: Option<bool>,
    /// 0 disables food expiry
    food_timeout_ms: Option<u64>,
}

impl ProfileOverride {
    fn apply(&self, profile: &mut DifficultyProfile) {
        if let Some(ms) = self.tick_interval_ms {
            profile.tick_interval_ms = ms.get();
        }
        if let Some(secs) = self.time_limit_secs {
            profile.time_limit_secs = secs.get();
        }
        if let Some(lives) = self.starting_lives {
            profile.starting_lives = lives.get();
        }
        if let Some(walls) = self.wall_collision {
            profile.wall_collision = walls;
        }
        if let Some(ms) = self.food_timeout_ms {
            profile.food_timeout_ms = (ms > 0).then_some(ms);
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}
