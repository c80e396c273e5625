use std::{
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, anyhow};
use chrono::{DateTime, Local};
use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    config::SessionConfig,
    session::{
        KeyValueStore,
        error::SessionError,
        schema::{self, columns::*, tables::*},
    },
};

pub type SecondsSinceUnix = i64;

/// Session values kept in a SQLite table, one row per key
pub struct SqliteStore {
    pub(crate) db: Connection,
}

fn open_in_memory() -> Result<Connection, rusqlite::Error> {
    Connection::open_in_memory()
}

fn open_from_file(path: &Path) -> Result<Connection, rusqlite::Error> {
    Connection::open(path)
}

impl SqliteStore {
    pub fn open(config: &SessionConfig) -> Result<Self, SessionError> {
        let db = match (&config.path, config.in_memory) {
            (_, true) => open_in_memory()?,
            (Some(path), false) => open_from_file(path)?,
            (None, false) => {
                return Err(SessionError::Internal(anyhow!(
                    "no session database path configured"
                )));
            }
        };
        schema::init(&db)?;
        Ok(Self::from_existing_conn(db))
    }

    pub fn from_existing_conn(db: Connection) -> Self {
        Self { db }
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let value = self
            .db
            .query_row(
                &format!("SELECT {VALUE} FROM {SESSION} WHERE {KEY} = ?1"),
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        let now = system_time_to_i64(SystemTime::now())?;
        upsert(&self.db, key, value, now)?;
        Ok(())
    }

    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<(), SessionError> {
        let now = system_time_to_i64(SystemTime::now())?;
        let tx = self.db.transaction()?;
        for (key, value) in entries {
            upsert(&tx, key, value, now)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.db.execute(
            &format!("DELETE FROM {SESSION} WHERE {KEY} = ?1"),
            params![key],
        )?;
        Ok(())
    }

    fn updated_at(&self, key: &str) -> Result<Option<SecondsSinceUnix>, SessionError> {
        let updated_at = self
            .db
            .query_row(
                &format!("SELECT {UPDATED_AT} FROM {SESSION} WHERE {KEY} = ?1"),
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(updated_at)
    }
}

fn upsert(
    conn: &Connection,
    key: &str,
    value: &str,
    now: SecondsSinceUnix,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        &format!(
            "INSERT INTO {SESSION} ({KEY}, {VALUE}, {UPDATED_AT}) VALUES (?1, ?2, ?3)
             ON CONFLICT({KEY}) DO UPDATE SET {VALUE} = excluded.{VALUE}, {UPDATED_AT} = excluded.{UPDATED_AT}"
        ),
        params![key, value, now],
    )?;
    Ok(())
}

/// converts time to number of seconds since unix_epoch
pub fn system_time_to_i64(time: SystemTime) -> anyhow::Result<SecondsSinceUnix> {
    i64::try_from(
        time.duration_since(UNIX_EPOCH)
            .with_context(|| "failed to get unix timestamp")?
            .as_secs(),
    )
    .with_context(|| "failed to get timestamp in seconds")
}

/// converts number of seconds since unix epoch to local date time
pub fn i64_seconds_to_local_time(since_unix: i64) -> anyhow::Result<DateTime<Local>> {
    let datetime = DateTime::from_timestamp(since_unix, 0).ok_or(anyhow!(
        "failed to convert {since_unix} s timestamp to datetime"
    ))?;

    Ok(DateTime::from(datetime))
}
