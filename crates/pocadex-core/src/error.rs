use pocadex_parse::DecodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PocadexError {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("photocard {0:?} is already in the catalog")]
    DuplicateFilename(String),

    #[error("photocard {0} not found in catalog")]
    PhotocardNotFound(i64),

    #[error("photocard {photocard_id} is already in the collection of {user_id:?}")]
    AlreadyCollected { user_id: String, photocard_id: i64 },

    #[error("collection entry {id} not found for user {user_id:?}")]
    CollectionEntryNotFound { id: i64, user_id: String },
}
