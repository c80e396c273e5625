use thiserror::Error;

/// Input rejected locally, before anything reaches the registry.
///
/// Indexes are zero-based; messages count from one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("nickname is empty")]
    EmptyNickname,

    #[error("nickname is {len} characters long, at most {max} are allowed")]
    NicknameTooLong { len: usize, max: usize },

    #[error("code must be exactly 6 characters, got {len}")]
    InvalidCodeLength { len: usize },

    #[error("slots {} and {} hold the same song", .first + 1, .second + 1)]
    DuplicateSong { first: usize, second: usize },

    #[error("slot {} has no song", .index + 1)]
    MissingSong { index: usize },

    #[error("slot {} does not exist", .index + 1)]
    SlotOutOfRange { index: usize },

    #[error("no candidate song matches '{reference}'")]
    UnknownSong { reference: String },

    #[error("{matches} candidate songs match '{reference}', use the song id")]
    AmbiguousSong { reference: String, matches: usize },

    #[error("playlist {} does not exist", .index + 1)]
    SelectionOutOfRange { index: usize },

    #[error("review is empty")]
    EmptyReview,

    #[error("no user code saved, make a playlist first")]
    MissingUserCode,

    #[error("no playlist saved, make a playlist first")]
    MissingPlaylistId,
}
