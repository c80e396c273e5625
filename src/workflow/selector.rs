use std::{collections::HashMap, convert::Infallible, fmt::Display, str::FromStr};

use rand::{Rng, seq::SliceRandom};

use crate::{
    domain::{error::ValidationError, song::Song},
    workflow::catalog::CatalogFetch,
};

pub const SLOT_COUNT: usize = 5;

/// Names a candidate independently of where it sits in the list.
///
/// A number is a registry song id; anything else is matched against titles,
/// ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SongRef {
    Id(i64),
    Title(String),
}

impl FromStr for SongRef {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(id) => SongRef::Id(id),
            Err(_) => SongRef::Title(s.to_string()),
        })
    }
}

impl Display for SongRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SongRef::Id(id) => write!(f, "#{id}"),
            SongRef::Title(title) => f.write_str(title),
        }
    }
}

impl SongRef {
    fn matches(&self, song: &Song) -> bool {
        match self {
            SongRef::Id(id) => song.id == Some(*id),
            SongRef::Title(title) => song.title.trim().to_lowercase() == title.to_lowercase(),
        }
    }
}

/// The draft playlist: five editable slots plus the options a slot can take.
///
/// When fewer than five options exist, the remaining slots start unset and
/// `validate_for_submit` reports them as missing.
#[derive(Debug, Clone)]
pub struct PlaylistSelector {
    slots: [Option<Song>; SLOT_COUNT],
    options: Vec<Song>,
    open_slot: Option<usize>,
}

impl PlaylistSelector {
    /// All slots unset
    pub fn new(options: Vec<Song>) -> Self {
        Self {
            slots: Default::default(),
            options,
            open_slot: None,
        }
    }

    /// Fills the slots with options drawn at random without replacement
    pub fn random<R: Rng + ?Sized>(options: Vec<Song>, rng: &mut R) -> Self {
        let mut selector = Self::new(options);
        let picked = selector
            .options
            .choose_multiple(rng, SLOT_COUNT)
            .cloned()
            .collect::<Vec<_>>();
        for (slot, song) in selector.slots.iter_mut().zip(picked) {
            *slot = Some(song);
        }
        selector
    }

    pub fn from_catalog<R: Rng + ?Sized>(fetch: CatalogFetch, rng: &mut R) -> Self {
        Self::random(fetch.songs, rng)
    }

    pub fn options(&self) -> &[Song] {
        &self.options
    }

    pub fn slots(&self) -> &[Option<Song>] {
        &self.slots
    }

    /// Slot whose picker is currently open, if any
    pub fn open_slot(&self) -> Option<usize> {
        self.open_slot
    }

    /// Opens the picker of `index`, or closes it when it is already open
    pub fn toggle(&mut self, index: usize) -> Result<(), ValidationError> {
        Self::check_slot(index)?;
        self.open_slot = match self.open_slot {
            Some(open) if open == index => None,
            _ => Some(index),
        };
        Ok(())
    }

    /// Replaces the song in `index` and closes any open picker
    pub fn set_slot(&mut self, index: usize, song: Song) -> Result<(), ValidationError> {
        Self::check_slot(index)?;
        self.slots[index] = Some(song);
        self.open_slot = None;
        Ok(())
    }

    /// `set_slot` with the one option `song` refers to
    pub fn choose_song(&mut self, index: usize, song: &SongRef) -> Result<(), ValidationError> {
        let mut found = self.options.iter().filter(|option| song.matches(option));
        let chosen = match (found.next(), found.count()) {
            (Some(chosen), 0) => chosen.clone(),
            (None, _) => {
                return Err(ValidationError::UnknownSong {
                    reference: song.to_string(),
                });
            }
            (Some(_), others) => {
                return Err(ValidationError::AmbiguousSong {
                    reference: song.to_string(),
                    matches: others + 1,
                });
            }
        };
        self.set_slot(index, chosen)
    }

    /// Checked before any network call.
    ///
    /// Returns the five songs in slot order when every slot holds a song
    /// with a title and an artist and no (title, artist) pair repeats.
    pub fn validate_for_submit(&self) -> Result<Vec<Song>, ValidationError> {
        let mut songs = Vec::with_capacity(SLOT_COUNT);
        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Some(song) if !song.is_blank() => songs.push(song),
                _ => return Err(ValidationError::MissingSong { index }),
            }
        }

        let mut seen = HashMap::new();
        for (index, song) in songs.iter().enumerate() {
            if let Some(first) = seen.insert(song.key(), index) {
                return Err(ValidationError::DuplicateSong {
                    first,
                    second: index,
                });
            }
        }

        Ok(songs.into_iter().cloned().collect())
    }

    fn check_slot(index: usize) -> Result<(), ValidationError> {
        if index >= SLOT_COUNT {
            return Err(ValidationError::SlotOutOfRange { index });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        http::fake::{FakeRegistry, numbered_songs},
        workflow::catalog::{SongCatalog, fallback_songs},
    };

    fn full_selector(songs: Vec<Song>) -> PlaylistSelector {
        let mut selector = PlaylistSelector::new(vec![]);
        for (index, song) in songs.into_iter().enumerate() {
            selector.set_slot(index, song).unwrap();
        }
        selector
    }

    #[test]
    fn test_initial_draft_draws_five_distinct_songs() {
        let mut registry = FakeRegistry::new();
        registry.candidates = Some(numbered_songs(15));
        let candidates = numbered_songs(15);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let fetch = SongCatalog::new(&registry).fetch("gen2", "dance");
            let selector = PlaylistSelector::from_catalog(fetch, &mut rng);

            let songs = selector.validate_for_submit().unwrap();
            let keys: HashSet<_> = songs.iter().map(|s| s.key()).collect();

            assert_eq!(songs.len(), SLOT_COUNT);
            assert_eq!(keys.len(), SLOT_COUNT);
            assert!(songs.iter().all(|s| candidates.contains(s)));
        }
    }

    #[test]
    fn test_fewer_candidates_leave_slots_unset() {
        let mut rng = StdRng::seed_from_u64(7);
        let selector = PlaylistSelector::random(numbered_songs(3), &mut rng);

        let filled = selector.slots().iter().filter(|s| s.is_some()).count();
        assert_eq!(filled, 3);
        assert_eq!(
            selector.validate_for_submit(),
            Err(ValidationError::MissingSong { index: 3 })
        );
    }

    #[test]
    fn test_duplicate_pair_is_rejected() {
        let mut songs = numbered_songs(5);
        // same title and artist, different id
        songs[4] = Song::new("title 2", "artist 2").with_id(99);

        let selector = full_selector(songs);

        assert_eq!(
            selector.validate_for_submit(),
            Err(ValidationError::DuplicateSong {
                first: 1,
                second: 4
            })
        );
    }

    #[test]
    fn test_same_title_different_artist_is_allowed() {
        let mut songs = numbered_songs(5);
        songs[0] = Song::new("title 2", "someone else");

        assert!(full_selector(songs).validate_for_submit().is_ok());
    }

    #[test]
    fn test_blank_song_is_missing() {
        let mut songs = numbered_songs(5);
        songs[2] = Song::new("", "artist 3");

        assert_eq!(
            full_selector(songs).validate_for_submit(),
            Err(ValidationError::MissingSong { index: 2 })
        );
    }

    #[test]
    fn test_set_slot_closes_picker() {
        let mut selector = full_selector(numbered_songs(5));

        selector.toggle(3).unwrap();
        assert_eq!(selector.open_slot(), Some(3));

        selector.set_slot(3, Song::new("new", "song")).unwrap();

        assert_eq!(selector.open_slot(), None);
        assert_eq!(selector.slots()[3], Some(Song::new("new", "song")));
    }

    #[test]
    fn test_toggle_same_slot_closes() {
        let mut selector = PlaylistSelector::new(vec![]);

        selector.toggle(1).unwrap();
        selector.toggle(1).unwrap();
        assert_eq!(selector.open_slot(), None);

        selector.toggle(1).unwrap();
        selector.toggle(4).unwrap();
        assert_eq!(selector.open_slot(), Some(4));
    }

    #[test]
    fn test_slot_out_of_range() {
        let mut selector = PlaylistSelector::new(vec![]);

        assert_eq!(
            selector.set_slot(5, Song::new("a", "b")),
            Err(ValidationError::SlotOutOfRange { index: 5 })
        );
        assert_eq!(
            selector.toggle(9),
            Err(ValidationError::SlotOutOfRange { index: 9 })
        );
    }

    #[test]
    fn test_choose_song_by_id_or_title() {
        let mut selector = PlaylistSelector::new(numbered_songs(6));

        selector.choose_song(0, &SongRef::Id(6)).unwrap();
        assert_eq!(selector.slots()[0].as_ref().and_then(|s| s.id), Some(6));

        selector.choose_song(1, &"TITLE 3".parse().unwrap()).unwrap();
        assert_eq!(selector.slots()[1].as_ref().and_then(|s| s.id), Some(3));
    }

    #[test]
    fn test_choose_song_ignores_list_position() {
        // the same id picks the same song whatever order the options arrive in
        let mut songs = numbered_songs(6);
        songs.reverse();
        let mut selector = PlaylistSelector::new(songs);

        selector.choose_song(2, &SongRef::Id(2)).unwrap();

        assert_eq!(
            selector.slots()[2],
            Some(Song::new("title 2", "artist 2").with_id(2))
        );
    }

    #[test]
    fn test_song_id_does_not_match_built_in_songs() {
        let mut selector = PlaylistSelector::new(fallback_songs());

        assert_eq!(
            selector.choose_song(0, &SongRef::Id(7)),
            Err(ValidationError::UnknownSong {
                reference: "#7".into()
            })
        );
        assert_eq!(selector.slots()[0], None);

        selector.choose_song(0, &"gee".parse().unwrap()).unwrap();
        assert_eq!(selector.slots()[0], Some(Song::new("Gee", "소녀시대")));
    }

    #[test]
    fn test_ambiguous_title_is_rejected() {
        let mut selector = PlaylistSelector::new(vec![
            Song::new("Tell Me", "원더걸스").with_id(1),
            Song::new("Tell Me", "인피니트").with_id(2),
        ]);

        assert_eq!(
            selector.choose_song(0, &"tell me".parse().unwrap()),
            Err(ValidationError::AmbiguousSong {
                reference: "tell me".into(),
                matches: 2
            })
        );
        selector.choose_song(0, &SongRef::Id(2)).unwrap();
    }
}
