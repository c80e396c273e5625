use log::info;

use crate::{
    domain::{
        code::ExchangeCode,
        error::ValidationError,
        labels::{generation_label, genre_label},
        song::Song,
    },
    http::{Registry, schema::NewReview},
    session::SessionContext,
    workflow::{
        error::WorkflowError,
        exchange::{LinkOpener, open_song_link},
    },
};

/// A playlist the registry picked for the current user, and who made it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationView {
    pub user_code: ExchangeCode,
    pub target_code: ExchangeCode,
    pub songs: Vec<Song>,
    pub creator_generation: &'static str,
    pub creator_genre: &'static str,
}

impl RecommendationView {
    pub fn load(registry: &dyn Registry, session: &SessionContext) -> Result<Self, WorkflowError> {
        let user_code = session.user_code()?.ok_or(ValidationError::MissingUserCode)?;
        let recommendation = registry.recommendation(&user_code)?;

        let first = recommendation.songs.first();
        let creator_generation =
            generation_label(first.and_then(|s| s.generation.as_deref()).unwrap_or(""));
        let creator_genre = genre_label(first.and_then(|s| s.genre.as_deref()).unwrap_or(""));

        Ok(Self {
            user_code,
            target_code: recommendation.target_user_code,
            songs: recommendation.songs,
            creator_generation,
            creator_genre,
        })
    }

    /// Opens the media link of a recommended song, `false` when it has none
    pub fn open_song(&self, index: usize, opener: &mut dyn LinkOpener) -> anyhow::Result<bool> {
        open_song_link(&self.songs, index, opener)
    }

    /// Leaves a review on the recommended playlist, written as the current user
    pub fn post_review(&self, registry: &dyn Registry, content: &str) -> Result<(), WorkflowError> {
        if content.trim().is_empty() {
            return Err(ValidationError::EmptyReview.into());
        }

        registry.post_review(&NewReview {
            writer_user_code: self.user_code.to_string(),
            target_user_code: self.target_code.to_string(),
            content: content.to_string(),
        })?;
        info!("review for {} saved", self.target_code);
        Ok(())
    }
}
