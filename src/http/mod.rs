use crate::{
    domain::{
        code::{ExchangeCode, PlaylistId},
        song::Song,
    },
    http::{
        error::ApiError,
        schema::{
            ExchangePlaylist, NewReview, Recommendation, RegisterPlaylist, Registration,
            ReviewSheet,
        },
    },
};

pub mod client;
pub mod error;
pub mod schema;

#[cfg(test)]
pub(crate) mod fake;

/// The remote service that issues codes and stores playlists, reviews and exchanges
pub trait Registry {
    /// `GET /api/v1/songs/candidates`
    fn song_candidates(&self, generation: &str, genre: &str) -> Result<Vec<Song>, ApiError>;

    /// `POST /api/v1/playlists/register`
    fn register_playlist(&self, request: &RegisterPlaylist) -> Result<Registration, ApiError>;

    /// `GET /api/v1/users/recommendations`
    fn recommendation(&self, user_code: &ExchangeCode) -> Result<Recommendation, ApiError>;

    /// `POST /api/v1/reviews`
    fn post_review(&self, review: &NewReview) -> Result<(), ApiError>;

    /// `GET /api/v1/reviews/:code`
    fn reviews(&self, code: &ExchangeCode) -> Result<ReviewSheet, ApiError>;

    /// `GET /api/v1/playlists/:playlistId`
    fn playlist(&self, id: &PlaylistId) -> Result<Vec<Song>, ApiError>;

    /// `GET /api/v1/exchanges/:userCode`
    fn exchanges(&self, user_code: &ExchangeCode) -> Result<Vec<ExchangePlaylist>, ApiError>;
}
