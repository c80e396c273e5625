//! Values that outlive a single command: the nickname, the issued user code
//! and the id of the registered playlist.
//!
//! Every write overwrites the previous value wholesale. There is no
//! versioning, the last writer wins.

use serde::{Deserialize, Serialize};

use crate::{
    domain::code::{ExchangeCode, PlaylistId},
    session::{db::SecondsSinceUnix, error::SessionError},
};

pub mod db;
pub mod error;
pub mod memory;
pub(crate) mod schema;

pub mod keys {
    pub const NICKNAME: &str = "nickname";
    pub const USER_CODE: &str = "userCode";
    pub const PLAYLIST_ID: &str = "playListId";
}

/// Shown wherever a nickname is displayed but none has been saved
pub const DEFAULT_NICKNAME: &str = "사용자";

/// String keyed, string valued persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError>;
    /// Writes every entry or none of them
    fn set_all(&mut self, entries: &[(&str, &str)]) -> Result<(), SessionError>;
    fn remove(&mut self, key: &str) -> Result<(), SessionError>;
    fn updated_at(&self, key: &str) -> Result<Option<SecondsSinceUnix>, SessionError>;
}

#[derive(Serialize, Deserialize)]
struct StoredNickname {
    nickname: String,
}

fn encode_nickname(nickname: &str) -> Result<String, SessionError> {
    Ok(serde_json::to_string(&StoredNickname {
        nickname: nickname.to_string(),
    })?)
}

/// Typed access to the session keys, passed explicitly to every workflow step
pub struct SessionContext {
    store: Box<dyn KeyValueStore>,
}

impl SessionContext {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn nickname(&self) -> Result<Option<String>, SessionError> {
        let Some(raw) = self.store.get(keys::NICKNAME)? else {
            return Ok(None);
        };
        let stored: StoredNickname = serde_json::from_str(&raw).map_err(|_| {
            SessionError::Corrupt {
                key: keys::NICKNAME,
            }
        })?;
        Ok(Some(stored.nickname))
    }

    pub fn display_nickname(&self) -> Result<String, SessionError> {
        Ok(self
            .nickname()?
            .unwrap_or_else(|| DEFAULT_NICKNAME.to_string()))
    }

    pub fn save_nickname(&mut self, nickname: &str) -> Result<(), SessionError> {
        let raw = encode_nickname(nickname)?;
        self.store.set(keys::NICKNAME, &raw)
    }

    pub fn user_code(&self) -> Result<Option<ExchangeCode>, SessionError> {
        self.store
            .get(keys::USER_CODE)?
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                ExchangeCode::parse(&raw).map_err(|_| SessionError::Corrupt {
                    key: keys::USER_CODE,
                })
            })
            .transpose()
    }

    pub fn playlist_id(&self) -> Result<Option<PlaylistId>, SessionError> {
        Ok(self
            .store
            .get(keys::PLAYLIST_ID)?
            .filter(|raw| !raw.trim().is_empty())
            .map(PlaylistId::new))
    }

    /// Stores the receipt of a successful registration together with the
    /// nickname it was made under, replacing any earlier one in a single write
    pub fn save_registration(
        &mut self,
        nickname: &str,
        user_code: &ExchangeCode,
        playlist_id: &PlaylistId,
    ) -> Result<(), SessionError> {
        let raw = encode_nickname(nickname)?;
        self.store.set_all(&[
            (keys::NICKNAME, raw.as_str()),
            (keys::USER_CODE, user_code.as_str()),
            (keys::PLAYLIST_ID, playlist_id.as_str()),
        ])
    }

    pub fn saved_at(&self, key: &str) -> Result<Option<SecondsSinceUnix>, SessionError> {
        self.store.updated_at(key)
    }
}
