//! Persistent key-value storage for settings, progress, and the leaderboard
mod file;
mod memory;
mod records;
pub(crate) use self::file::FileStore;
pub(crate) use self::memory::MemoryStore;
pub(crate) use self::records::{Leaderboard, LeaderboardEntry, Progress, Settings, SettingsPatch};
use crate::game::Difficulty;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use thiserror::Error;

pub(crate) const SETTINGS_KEY: &str = "snake-game-settings";
pub(crate) const PROGRESS_KEY: &str = "snake-game-progress";
pub(crate) const LEADERBOARD_KEY: &str = "snake-game-leaderboard";

/// A backend mapping string keys to JSON documents
pub(crate) trait Storage: fmt::Debug {
    /// Return the document stored under `key`, or `None` if there is none
    fn load(&self, key: &str) -> Result<Option<String>, LoadError>;

    fn save(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
}

/// Typed access to a [`Storage`] backend.
///
/// Reads that fail for any reason fall back to default values; writes that
/// fail are logged and otherwise ignored.  Neither ever reaches the caller.
#[derive(Debug)]
pub(crate) struct Store {
    backend: Box<dyn Storage>,
}

impl Store {
    pub(crate) fn new(backend: Box<dyn Storage>) -> Store {
        Store { backend }
    }

    /// A store that keeps everything in memory and forgets it on exit
    pub(crate) fn ephemeral() -> Store {
        Store::new(Box::new(MemoryStore::default()))
    }

    pub(crate) fn settings(&self) -> Settings {
        self.read(SETTINGS_KEY)
    }

    /// Merge `patch` into the stored settings and return the result
    pub(crate) fn save_settings(&mut self, patch: SettingsPatch) -> Settings {
        let mut settings = self.settings();
        settings.apply(patch);
        self.write(SETTINGS_KEY, &settings);
        settings
    }

    pub(crate) fn progress(&self) -> Progress {
        self.read(PROGRESS_KEY)
    }

    /// Apply `update` to the stored progress, save it, and return the result
    pub(crate) fn update_progress<F: FnOnce(&mut Progress)>(&mut self, update: F) -> Progress {
        let mut progress = self.progress();
        update(&mut progress);
        self.write(PROGRESS_KEY, &progress);
        progress
    }

    /// Return all leaderboard entries, best score first
    pub(crate) fn leaderboard(&self) -> Leaderboard {
        self.read(LEADERBOARD_KEY)
    }

    /// Record a score on the leaderboard and return the new entry
    pub(crate) fn save_score(
        &mut self,
        player_name: String,
        score: u32,
        difficulty: Difficulty,
        achieved_at: DateTime<Utc>,
    ) -> LeaderboardEntry {
        let mut board = self.leaderboard();
        let entry = board.insert(player_name, score, difficulty, achieved_at);
        self.write(LEADERBOARD_KEY, &board);
        entry
    }

    fn read<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let r: Result<Option<T>, LoadError> = self.backend.load(key).and_then(|doc| {
            doc.map(|src| serde_json::from_str(&src).map_err(|e| LoadError::deserialize(key, e)))
                .transpose()
        });
        match r {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::debug!(key, error = %e, "Falling back to defaults");
                T::default()
            }
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) {
        let r = serde_json::to_string(value)
            .map_err(|e| SaveError::serialize(key, e))
            .and_then(|src| self.backend.save(key, &src));
        if let Err(e) = r {
            tracing::warn!(key, error = %e, "Failed to persist data; continuing without it");
        }
    }
}

#[derive(Debug, Error)]
#[error("failed to load {key:?} from storage")]
pub(crate) struct LoadError {
    key: String,
    #[source]
    source: LoadErrorSource,
}

impl LoadError {
    pub(crate) fn read(key: &str, e: std::io::Error) -> Self {
        LoadError {
            key: key.to_owned(),
            source: LoadErrorSource::Read(e),
        }
    }

    fn deserialize(key: &str, e: serde_json::Error) -> Self {
        LoadError {
            key: key.to_owned(),
            source: LoadErrorSource::Deserialize(e),
        }
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to read stored document")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize stored document")]
    Deserialize(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
#[error("failed to save {key:?} to storage")]
pub(crate) struct SaveError {
    key: String,
    #[source]
    source: SaveErrorSource,
}

impl SaveError {
    pub(crate) fn mkdir(key: &str, e: std::io::Error) -> Self {
        SaveError {
            key: key.to_owned(),
            source: SaveErrorSource::Mkdir(e),
        }
    }

    fn serialize(key: &str, e: serde_json::Error) -> Self {
        SaveError {
            key: key.to_owned(),
            source: SaveErrorSource::Serialize(e),
        }
    }

    pub(crate) fn write(key: &str, e: std::io::Error) -> Self {
        SaveError {
            key: key.to_owned(),
            source: SaveErrorSource::Write(e),
        }
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize document")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write document")]
    Write(#[source] std::io::Error),
}
