//! Request and response bodies of the registry API.
//!
//! Responses are wrapped as `{ "data": ... }`. Anything that does not match
//! these shapes is rejected at decode time.

use serde::{Deserialize, Serialize};

use crate::domain::{
    code::{ExchangeCode, PlaylistId},
    song::Song,
};

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPlaylist {
    pub nickname: String,
    pub generation: String,
    pub favorite_genre: String,
    pub playlist_title: String,
    pub song_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub user_code: ExchangeCode,
    pub playlist_id: PlaylistId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub target_user_code: ExchangeCode,
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub writer_user_code: String,
    pub target_user_code: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub review_id: i64,
    #[serde(default, alias = "writerUserCode")]
    pub writer_code: Option<String>,
    #[serde(default, alias = "targetUserCode")]
    pub target_code: Option<String>,
    #[serde(default)]
    pub writer_nickname: Option<String>,
    #[serde(default)]
    pub writer_generation: Option<String>,
    #[serde(default)]
    pub writer_favorite_genre: Option<String>,
    pub content: String,
    pub created_at: String,
}

/// Reviews written for a code, plus the code owner's generation and genre
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSheet {
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub generation: Option<String>,
    #[serde(default)]
    pub favorite_genre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaylistSongs {
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangePlaylist {
    #[serde(default)]
    pub id: Option<i64>,
    pub songs: Vec<Song>,
    #[serde(default)]
    pub generation: Option<String>,
    #[serde(default)]
    pub favorite_genre: Option<String>,
}

impl ExchangePlaylist {
    /// Creator generation key, falling back to the first song's
    pub fn creator_generation(&self) -> Option<&str> {
        self.generation
            .as_deref()
            .or_else(|| self.songs.first().and_then(|s| s.generation.as_deref()))
    }

    /// Creator genre key, falling back to the first song's
    pub fn creator_genre(&self) -> Option<&str> {
        self.favorite_genre
            .as_deref()
            .or_else(|| self.songs.first().and_then(|s| s.genre.as_deref()))
    }
}
