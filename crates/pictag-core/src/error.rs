use thiserror::Error;

/// Top-level error type for the Pictag system.
///
/// Every failure of an ingest maps to exactly one variant, so callers can
/// always tell which stage broke. Subsystem crates construct these directly
/// and the `?` operator carries them across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PictagError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The submitted byte payload was empty. Rejected before any side effect.
    #[error("Uploaded file is empty")]
    EmptyFile,

    /// No original filename accompanied the upload.
    #[error("Uploaded file has no name")]
    MissingName,

    /// Blob store failure (directory creation, write, or read).
    #[error("Blob store error: {0}")]
    Store(String),

    /// Transport-level failure calling the AI backend (timeout, DNS,
    /// non-2xx status, malformed JSON).
    #[error("AI backend error: {0}")]
    Backend(String),

    /// The AI backend answered but returned no usable candidate.
    #[error("AI backend returned no candidates")]
    EmptyResponse,

    /// Metadata commit failure.
    #[error("Metadata store error: {0}")]
    Persist(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for PictagError {
    fn from(err: toml::de::Error) -> Self {
        PictagError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for PictagError {
    fn from(err: serde_json::Error) -> Self {
        PictagError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Pictag operations.
pub type Result<T> = std::result::Result<T, PictagError>;
