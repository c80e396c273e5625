//! Display labels and machine keys for generations and genres.
//!
//! Every view resolves labels through this module, so the registry's keys
//! (`gen2`, `dance`, `DANCE`, `EMOTIONAL`, ...) map to one consistent label.

use std::fmt::Display;

/// Shown when a generation key is not recognised
pub const UNKNOWN_GENERATION: &str = "?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Genre {
    Vocal,
    Dance,
    Emotional,
    HipHop,
}

impl Genre {
    pub const ALL: [Genre; 4] = [Genre::Vocal, Genre::Dance, Genre::Emotional, Genre::HipHop];

    /// Key sent to the registry when fetching candidates
    pub fn key(self) -> &'static str {
        match self {
            Genre::Vocal => "vocal",
            Genre::Dance => "dance",
            Genre::Emotional => "emo",
            Genre::HipHop => "hip",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Genre::Vocal => "보컬",
            Genre::Dance => "댄스",
            Genre::Emotional => "감성",
            Genre::HipHop => "힙합",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|genre| genre.label() == label)
    }

    /// Case-insensitive, accepts the long forms the registry echoes back
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "vocal" => Some(Genre::Vocal),
            "dance" => Some(Genre::Dance),
            "emo" | "emotional" => Some(Genre::Emotional),
            "hip" | "hiphop" | "hip-hop" => Some(Genre::HipHop),
            _ => None,
        }
    }

    /// Accepts either a display label or a key
    pub fn parse(input: &str) -> Option<Self> {
        Self::from_label(input).or_else(|| Self::from_key(input))
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Maps a display label to its key. Unmapped labels give an empty key.
pub fn genre_key_for_label(label: &str) -> &'static str {
    Genre::from_label(label).map(Genre::key).unwrap_or("")
}

/// Display label for a registry genre key, empty when unrecognised
pub fn genre_label(key: &str) -> &'static str {
    Genre::from_key(key).map(Genre::label).unwrap_or("")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generation {
    Gen1,
    Gen2,
    Gen3,
    Gen4,
}

impl Generation {
    pub const ALL: [Generation; 4] = [
        Generation::Gen1,
        Generation::Gen2,
        Generation::Gen3,
        Generation::Gen4,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Generation::Gen1 => "gen1",
            Generation::Gen2 => "gen2",
            Generation::Gen3 => "gen3",
            Generation::Gen4 => "gen4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Generation::Gen1 => "1",
            Generation::Gen2 => "2",
            Generation::Gen3 => "3",
            Generation::Gen4 => "4",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|generation| generation.key() == key)
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|generation| generation.label() == label)
    }

    /// Accepts `2` as well as `gen2`
    pub fn parse(input: &str) -> Option<Self> {
        Self::from_label(input).or_else(|| Self::from_key(input))
    }
}

impl Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub fn generation_label(key: &str) -> &'static str {
    Generation::from_key(key)
        .map(Generation::label)
        .unwrap_or(UNKNOWN_GENERATION)
}

/// The generation and genre keys a playlist is registered under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taste {
    pub generation_key: String,
    pub genre_key: String,
}

impl Taste {
    /// Resolves user input given as a label (`2`, `댄스`) or a key (`gen2`, `dance`).
    ///
    /// An unrecognised genre yields an empty key; an unrecognised generation
    /// is passed through as `gen<input>`.
    pub fn resolve(generation: &str, genre: &str) -> Self {
        let generation = generation.trim();
        let generation_key = match Generation::parse(generation) {
            Some(generation) => generation.key().to_string(),
            None if generation.to_ascii_lowercase().starts_with("gen") => {
                generation.to_ascii_lowercase()
            }
            None => format!("gen{generation}"),
        };
        let genre_key = Genre::parse(genre).map(Genre::key).unwrap_or("");
        Self {
            generation_key,
            genre_key: genre_key.to_string(),
        }
    }

    /// Genre as the registry stores it on a playlist
    pub fn favorite_genre(&self) -> String {
        self.genre_key.to_uppercase()
    }

    pub fn generation_label(&self) -> &'static str {
        generation_label(&self.generation_key)
    }

    pub fn genre_label(&self) -> &'static str {
        genre_label(&self.genre_key)
    }
}
