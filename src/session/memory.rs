use std::{collections::HashMap, time::SystemTime};

use crate::session::{
    KeyValueStore,
    db::{SecondsSinceUnix, system_time_to_i64},
    error::SessionError,
};

/// Keeps session values for the lifetime of the process only
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, (String, SecondsSinceUnix)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.values.get(key).map(|(value, _)| value.clone()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        let now = system_time_to_i64(SystemTime::now())?;
        self.values
            .insert(key.to_string(), (value.to_string(), now));
        Ok(())
    }

    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<(), SessionError> {
        let now = system_time_to_i64(SystemTime::now())?;
        for (key, value) in entries {
            self.values
                .insert(key.to_string(), (value.to_string(), now));
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.values.remove(key);
        Ok(())
    }

    fn updated_at(&self, key: &str) -> Result<Option<SecondsSinceUnix>, SessionError> {
        Ok(self.values.get(key).map(|(_, at)| *at))
    }
}
