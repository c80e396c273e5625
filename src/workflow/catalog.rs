//! Candidate songs for a generation/genre pair

use log::{info, warn};

use crate::{domain::song::Song, http::Registry};

/// Offered when the registry has nothing for the pair, so the picker is never empty
const FALLBACK_SONGS: &[(&str, &str)] = &[
    ("FANTASTIC BABY", "빅뱅"),
    ("NALINA", "BLOCK B"),
    ("우산", "에픽하이"),
    ("WHERE U AT", "태양"),
    ("VERY GOOD", "블락비"),
    ("Gee", "소녀시대"),
    ("I Don't Care", "2NE1"),
    ("Sherlock", "샤이니"),
    ("Fiction", "비스트"),
    ("내꺼하자", "인피니트"),
    ("으르렁", "EXO"),
    ("DNA", "방탄소년단"),
    ("좋은날", "아이유"),
    ("Tell Me", "원더걸스"),
    ("미스터", "카라"),
];

pub fn fallback_songs() -> Vec<Song> {
    FALLBACK_SONGS
        .iter()
        .map(|(title, artist)| Song::new(*title, *artist))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Remote,
    Fallback,
}

/// Result of one catalog fetch. The order of `songs` is stable for the
/// lifetime of this value only.
#[derive(Debug, Clone)]
pub struct CatalogFetch {
    pub songs: Vec<Song>,
    pub source: CatalogSource,
}

pub struct SongCatalog<'a> {
    registry: &'a dyn Registry,
}

impl<'a> SongCatalog<'a> {
    pub fn new(registry: &'a dyn Registry) -> Self {
        Self { registry }
    }

    /// Never fails: an empty answer or an error falls back to the built-in table
    pub fn fetch(&self, generation_key: &str, genre_key: &str) -> CatalogFetch {
        match self.registry.song_candidates(generation_key, genre_key) {
            Ok(songs) if !songs.is_empty() => {
                info!(
                    "{} candidates for {generation_key}/{genre_key}",
                    songs.len()
                );
                CatalogFetch {
                    songs,
                    source: CatalogSource::Remote,
                }
            }
            Ok(_) => {
                warn!("no candidates for {generation_key}/{genre_key}, using built-in songs");
                Self::fallback()
            }
            Err(e) => {
                warn!("failed to fetch candidates for {generation_key}/{genre_key}: {e}");
                Self::fallback()
            }
        }
    }

    fn fallback() -> CatalogFetch {
        CatalogFetch {
            songs: fallback_songs(),
            source: CatalogSource::Fallback,
        }
    }
}
