use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Represents a song as the registry describes it.
///
/// Only `title` and `artist` are guaranteed; songs from the built-in
/// fallback table carry no id and no media link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub generation: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default, rename = "youtubeUrl", alias = "externalMediaLink")]
    pub external_media_link: Option<String>,
}

impl Song {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            artist: artist.into(),
            generation: None,
            genre: None,
            external_media_link: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// (title, artist) pair used to detect duplicates in a draft
    pub fn key(&self) -> SongKey<'_> {
        SongKey {
            title: &self.title,
            artist: &self.artist,
        }
    }

    /// true when either identity field is blank
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() || self.artist.trim().is_empty()
    }

    pub fn media_link(&self) -> Option<&str> {
        self.external_media_link
            .as_deref()
            .filter(|link| !link.trim().is_empty())
    }
}

impl Display for Song {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} – {}", self.artist, self.title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SongKey<'a> {
    pub title: &'a str,
    pub artist: &'a str,
}
