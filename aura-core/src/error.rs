use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Weather API key missing or rejected by the provider.
    #[error("credential error: {0}")]
    Credential(String),

    /// Fetch failure, or geolocation denied/unsupported.
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid input: {0}")]
    Validation(String),
}

impl Error {
    /// True when the durable engine could not be opened or a write aborted.
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Io(_))
    }
}
