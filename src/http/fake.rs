//! In-memory registry for workflow tests

use std::{cell::RefCell, collections::HashMap};

use crate::{
    domain::{
        code::{ExchangeCode, PlaylistId},
        song::Song,
    },
    http::{
        Registry,
        error::ApiError,
        schema::{
            ExchangePlaylist, NewReview, Recommendation, RegisterPlaylist, Registration,
            ReviewSheet,
        },
    },
};

#[derive(Default)]
pub(crate) struct FakeRegistry {
    pub candidates: Option<Vec<Song>>,
    pub registration: Option<Registration>,
    pub recommendation: Option<Recommendation>,
    pub reject_reviews: bool,
    pub review_sheets: HashMap<String, ReviewSheet>,
    pub playlists: HashMap<String, Vec<Song>>,
    pub exchanges: HashMap<String, Vec<ExchangePlaylist>>,

    pub calls: RefCell<Vec<String>>,
    pub registered: RefCell<Vec<RegisterPlaylist>>,
    pub posted_reviews: RefCell<Vec<NewReview>>,
}

fn not_found(what: &str) -> ApiError {
    ApiError::NotFound {
        url: format!("fake://{what}"),
    }
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl Registry for FakeRegistry {
    fn song_candidates(&self, generation: &str, genre: &str) -> Result<Vec<Song>, ApiError> {
        self.record(format!("candidates {generation} {genre}"));
        self.candidates
            .clone()
            .ok_or_else(|| not_found("candidates"))
    }

    fn register_playlist(&self, request: &RegisterPlaylist) -> Result<Registration, ApiError> {
        self.record("register".to_string());
        self.registered.borrow_mut().push(request.clone());
        self.registration.clone().ok_or(ApiError::Status {
            status: 500,
            url: "fake://register".to_string(),
        })
    }

    fn recommendation(&self, user_code: &ExchangeCode) -> Result<Recommendation, ApiError> {
        self.record(format!("recommendation {user_code}"));
        self.recommendation
            .clone()
            .ok_or_else(|| not_found("recommendation"))
    }

    fn post_review(&self, review: &NewReview) -> Result<(), ApiError> {
        self.record("post review".to_string());
        if self.reject_reviews {
            return Err(ApiError::Status {
                status: 400,
                url: "fake://reviews".to_string(),
            });
        }
        self.posted_reviews.borrow_mut().push(review.clone());
        Ok(())
    }

    fn reviews(&self, code: &ExchangeCode) -> Result<ReviewSheet, ApiError> {
        self.record(format!("reviews {code}"));
        self.review_sheets
            .get(code.as_str())
            .cloned()
            .ok_or_else(|| not_found("reviews"))
    }

    fn playlist(&self, id: &PlaylistId) -> Result<Vec<Song>, ApiError> {
        self.record(format!("playlist {id}"));
        self.playlists
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| not_found("playlist"))
    }

    fn exchanges(&self, user_code: &ExchangeCode) -> Result<Vec<ExchangePlaylist>, ApiError> {
        self.record(format!("exchanges {user_code}"));
        self.exchanges
            .get(user_code.as_str())
            .cloned()
            .ok_or_else(|| not_found("exchanges"))
    }
}

/// `count` distinct songs with ids starting at 1
pub(crate) fn numbered_songs(count: usize) -> Vec<Song> {
    (1..=count)
        .map(|n| Song::new(format!("title {n}"), format!("artist {n}")).with_id(n as i64))
        .collect()
}
