use super::{LoadError, SaveError, Storage};
use std::path::PathBuf;

/// Stores each document as `<key>.json` inside a directory
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub(crate) fn new<P: Into<PathBuf>>(dir: P) -> FileStore {
        FileStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, LoadError> {
        match fs_err::read_to_string(self.path_for(key)) {
            Ok(src) => Ok(Some(src)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LoadError::read(key, e)),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        fs_err::create_dir_all(&self.dir).map_err(|e| SaveError::mkdir(key, e))?;
        let mut src = value.to_owned();
        src.push('\n');
        fs_err::write(self.path_for(key), &src).map_err(|e| SaveError::write(key, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Store, PROGRESS_KEY};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_none() {
        let tmp = tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        assert!(store.load(PROGRESS_KEY).unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let tmp = tempdir().unwrap();
        let mut store = FileStore::new(tmp.path().join("nested").join("data"));
        store.save("greeting", r#"{"hello":"world"}"#).unwrap();
        let path = tmp.path().join("nested").join("data").join("greeting.json");
        assert_eq!(
            fs_err::read_to_string(path).unwrap(),
            "{\"hello\":\"world\"}\n"
        );
        assert_eq!(
            store.load("greeting").unwrap().as_deref(),
            Some("{\"hello\":\"world\"}\n")
        );
    }

    #[test]
    fn directory_in_the_way() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs_err::write(&blocker, "").unwrap();
        let mut store = FileStore::new(&blocker);
        let e = store.save(PROGRESS_KEY, "{}").unwrap_err();
        let source = std::error::Error::source(&e).unwrap();
        assert_eq!(source.to_string(), "failed to create parent directories");
    }

    #[test]
    fn store_survives_unwritable_directory() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs_err::write(&blocker, "").unwrap();
        let mut store = Store::new(Box::new(FileStore::new(&blocker)));
        let progress = store.update_progress(|p| p.total_games = 5);
        assert_eq!(progress.total_games, 5);
        assert_eq!(store.progress().total_games, 0);
    }

    #[test]
    fn store_round_trips_through_disk() {
        let tmp = tempdir().unwrap();
        let mut store = Store::new(Box::new(FileStore::new(tmp.path())));
        store.update_progress(|p| p.total_score = 1234);
        let reopened = Store::new(Box::new(FileStore::new(tmp.path())));
        assert_eq!(reopened.progress().total_score, 1234);
    }
}
