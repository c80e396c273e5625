use log::{info, warn};

use crate::{
    domain::{
        code::ExchangeCode,
        error::ValidationError,
        labels::{generation_label, genre_label},
        song::Song,
    },
    http::{Registry, schema::Review},
    session::SessionContext,
    workflow::error::WorkflowError,
};

/// A review with its writer's generation and genre already resolved to labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEntry {
    pub review_id: i64,
    pub writer_code: Option<String>,
    pub target_code: Option<String>,
    pub writer_nickname: Option<String>,
    pub writer_generation: &'static str,
    pub writer_genre: &'static str,
    pub content: String,
    pub created_at: String,
}

impl From<Review> for ReviewEntry {
    fn from(review: Review) -> Self {
        Self {
            review_id: review.review_id,
            writer_code: review.writer_code,
            target_code: review.target_code,
            writer_nickname: review.writer_nickname,
            writer_generation: generation_label(review.writer_generation.as_deref().unwrap_or("")),
            writer_genre: genre_label(review.writer_favorite_genre.as_deref().unwrap_or("")),
            content: review.content,
            created_at: review.created_at,
        }
    }
}

/// What a validated code unlocked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCode {
    pub code: ExchangeCode,
    pub songs: Vec<Song>,
    pub reviews: Vec<ReviewEntry>,
    pub author_generation: &'static str,
    pub author_genre: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    CodeEntry,
    CodeValidated(ValidatedCode),
    Navigated { code: ExchangeCode },
}

/// Code-gated view of the reviews left on a playlist.
///
/// The first activation validates a code; the second carries the validated
/// code on to the exchange browser. Once `Navigated`, the instance stays there.
#[derive(Debug)]
pub struct ReviewWorkflow {
    state: ReviewState,
}

impl Default for ReviewWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewWorkflow {
    pub fn new() -> Self {
        Self {
            state: ReviewState::CodeEntry,
        }
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    /// One press of the confirm control with `input` in the code field.
    ///
    /// On error the state is unchanged.
    pub fn activate(
        &mut self,
        input: &str,
        registry: &dyn Registry,
        session: &SessionContext,
    ) -> Result<&ReviewState, WorkflowError> {
        match &self.state {
            ReviewState::CodeEntry => {
                let validated = Self::validate_code(input, registry, session)?;
                info!("code {} validated", validated.code);
                self.state = ReviewState::CodeValidated(validated);
            }
            ReviewState::CodeValidated(validated) => {
                let code = validated.code.clone();
                info!("moving on to exchanges for {code}");
                self.state = ReviewState::Navigated { code };
            }
            ReviewState::Navigated { .. } => {}
        }
        Ok(&self.state)
    }

    /// Both lookups are issued; the code is accepted only if both succeed
    fn validate_code(
        input: &str,
        registry: &dyn Registry,
        session: &SessionContext,
    ) -> Result<ValidatedCode, WorkflowError> {
        let code = ExchangeCode::parse(input)?;
        let playlist_id = session
            .playlist_id()?
            .ok_or(ValidationError::MissingPlaylistId)?;

        let reviews = registry.reviews(&code);
        let songs = registry.playlist(&playlist_id);

        let (sheet, songs) = match (reviews, songs) {
            (Ok(sheet), Ok(songs)) => (sheet, songs),
            (reviews, songs) => {
                if let Err(e) = reviews {
                    warn!("review lookup for {code} failed: {e}");
                }
                if let Err(e) = songs {
                    warn!("playlist lookup for {playlist_id} failed: {e}");
                }
                return Err(WorkflowError::CodeNotFound {
                    code: code.to_string(),
                });
            }
        };

        Ok(ValidatedCode {
            code,
            songs,
            reviews: sheet.reviews.into_iter().map(ReviewEntry::from).collect(),
            author_generation: generation_label(sheet.generation.as_deref().unwrap_or("")),
            author_genre: genre_label(sheet.favorite_genre.as_deref().unwrap_or("")),
        })
    }
}
