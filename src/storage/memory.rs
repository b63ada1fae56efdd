use super::{LoadError, SaveError, Storage};
use std::collections::HashMap;

/// A [`Storage`] backend that never touches the disk
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct MemoryStore(HashMap<String, String>);

impl Storage for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, LoadError> {
        Ok(self.0.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.0.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
