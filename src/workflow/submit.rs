//! Registering a finished draft with the registry

use log::{error, info};

use crate::{
    domain::{
        code::{ExchangeCode, PlaylistId},
        labels::Taste,
        song::Song,
    },
    http::{Registry, schema::RegisterPlaylist},
    session::SessionContext,
    workflow::{error::WorkflowError, identity::IdentityGate, selector::PlaylistSelector},
};

/// Everything the result view shows after a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub nickname: String,
    pub taste: Taste,
    pub playlist: Vec<Song>,
    pub user_code: ExchangeCode,
    pub playlist_id: PlaylistId,
}

pub fn playlist_title(nickname: &str) -> String {
    format!("{nickname}의 플레이리스트")
}

/// Validates the nickname and the draft, then registers the playlist.
///
/// Both checks run before any request is sent. Songs without an id are left
/// out of `songIds` rather than blocking the submission. On success the
/// nickname, user code and playlist id replace whatever the session held; on
/// failure the draft and the whole session are left as they were.
pub fn submit(
    registry: &dyn Registry,
    session: &mut SessionContext,
    gate: &mut IdentityGate,
    selector: &PlaylistSelector,
    taste: &Taste,
) -> Result<SubmissionReceipt, WorkflowError> {
    let identity = gate.check()?;
    let playlist = selector.validate_for_submit()?;

    let request = RegisterPlaylist {
        nickname: identity.nickname.clone(),
        generation: taste.generation_key.clone(),
        favorite_genre: taste.favorite_genre(),
        playlist_title: playlist_title(&identity.nickname),
        song_ids: playlist.iter().filter_map(|song| song.id).collect(),
    };

    let registration = registry.register_playlist(&request).map_err(|e| {
        error!("failed to register playlist: {e}");
        e
    })?;

    session.save_registration(
        &identity.nickname,
        &registration.user_code,
        &registration.playlist_id,
    )?;
    info!(
        "playlist {} registered with code {}",
        registration.playlist_id, registration.user_code
    );

    Ok(SubmissionReceipt {
        nickname: identity.nickname,
        taste: taste.clone(),
        playlist,
        user_code: registration.user_code,
        playlist_id: registration.playlist_id,
    })
}
