use log::{debug, info};

use crate::{
    domain::{
        code::ExchangeCode,
        error::ValidationError,
        labels::{generation_label, genre_label},
        song::Song,
    },
    http::{Registry, schema::ExchangePlaylist},
    session::SessionContext,
    workflow::error::WorkflowError,
};

/// Opens an external media link somewhere outside the current view
pub trait LinkOpener {
    fn open(&mut self, url: &str) -> anyhow::Result<()>;
}

/// Playlists exchanged with one code, with a single selected entry
#[derive(Debug, Clone)]
pub struct ExchangeBrowser {
    code: ExchangeCode,
    playlists: Vec<ExchangePlaylist>,
    selected: usize,
}

impl ExchangeBrowser {
    pub fn load(registry: &dyn Registry, code: ExchangeCode) -> Result<Self, WorkflowError> {
        let playlists = registry.exchanges(&code)?;
        info!("{} exchanged playlists for {code}", playlists.len());
        Ok(Self {
            code,
            playlists,
            selected: 0,
        })
    }

    /// Loads the exchanges of the code saved in the session
    pub fn load_own(registry: &dyn Registry, session: &SessionContext) -> Result<Self, WorkflowError> {
        let code = session.user_code()?.ok_or(ValidationError::MissingUserCode)?;
        Self::load(registry, code)
    }

    pub fn code(&self) -> &ExchangeCode {
        &self.code
    }

    pub fn playlists(&self) -> &[ExchangePlaylist] {
        &self.playlists
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&ExchangePlaylist> {
        self.playlists.get(self.selected)
    }

    /// Local only, nothing is fetched again
    pub fn select(&mut self, index: usize) -> Result<(), ValidationError> {
        if index >= self.playlists.len() {
            return Err(ValidationError::SelectionOutOfRange { index });
        }
        self.selected = index;
        Ok(())
    }

    /// Opens the media link of a song in the selected playlist
    pub fn open_song(&self, index: usize, opener: &mut dyn LinkOpener) -> anyhow::Result<bool> {
        let songs = self.selected().map_or(&[][..], |playlist| playlist.songs.as_slice());
        open_song_link(songs, index, opener)
    }
}

/// Opens the media link of `songs[index]`.
///
/// Returns `false` without doing anything when there is no such song or it
/// has no link.
pub fn open_song_link(
    songs: &[Song],
    index: usize,
    opener: &mut dyn LinkOpener,
) -> anyhow::Result<bool> {
    match songs.get(index).and_then(Song::media_link) {
        Some(url) => {
            debug!("opening {url}");
            opener.open(url)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// `"<generation>세대 <genre>"` heading for an exchanged playlist
pub fn creator_label(playlist: &ExchangePlaylist) -> Option<String> {
    playlist.songs.first()?;
    let generation = generation_label(playlist.creator_generation().unwrap_or(""));
    let genre = genre_label(playlist.creator_genre().unwrap_or(""));
    Some(format!("{generation}세대 {genre}").trim_end().to_string())
}
