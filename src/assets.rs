use crate::config::{Config, ConfigError, FileConfig};
use crate::game::Profiles;
use crate::storage::{FileStore, Store};
use std::path::Path;
use thiserror::Error;

/// Everything the engine needs before play can begin
#[derive(Debug)]
pub(crate) struct Assets {
    pub(crate) profiles: Profiles,
    pub(crate) store: Store,
}

impl Assets {
    /// Read the configuration file at `config_path` (or the default
    /// configuration file, if it exists) and open the data store it names
    pub(crate) fn load(config_path: Option<&Path>) -> Result<Assets, AssetLoadError> {
        let config = match config_path {
            Some(p) => Config::load(p, false)?,
            None => Config::load(&Config::default_path()?, true)?,
        };
        let store = open_store(&config.files)?;
        Ok(Assets {
            profiles: config.profiles(),
            store,
        })
    }
}

fn open_store(files: &FileConfig) -> Result<Store, AssetLoadError> {
    if !files.save_data {
        tracing::info!("Data saving disabled; using in-memory store");
        return Ok(Store::ephemeral());
    }
    let dir = files.data_dir().ok_or(AssetLoadError(AssetLoadErrorSource::NoDataDir))?;
    fs_err::create_dir_all(&dir).map_err(|e| AssetLoadError(AssetLoadErrorSource::DataDir(e)))?;
    tracing::info!(dir = %dir.display(), "Using data directory");
    Ok(Store::new(Box::new(FileStore::new(dir))))
}

#[derive(Debug, Error)]
#[error("Failed to load game assets")]
pub(crate) struct AssetLoadError(#[source] AssetLoadErrorSource);

impl From<ConfigError> for AssetLoadError {
    fn from(e: ConfigError) -> AssetLoadError {
        AssetLoadError(AssetLoadErrorSource::Config(e))
    }
}

#[derive(Debug, Error)]
enum AssetLoadErrorSource {
    #[error("failed to load configuration")]
    Config(#[source] ConfigError),
    #[error("failed to determine path to local data directory")]
    NoDataDir,
    #[error("failed to create data directory")]
    DataDir(#[source] std::io::Error),
}
