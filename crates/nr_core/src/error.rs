use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),

    /// Network failure or timeout talking to the feed. Retryable.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The feed answered, but not with a usable envelope.
    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Enrichment failed for {article}: {reason}")]
    EnrichmentItem { article: String, reason: String },

    #[error("Recommendation engine has not been trained")]
    UntrainedEngine,

    #[error("Cannot train on an empty corpus: {0}")]
    EmptyCorpus(String),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Only transport failures are worth waiting on and trying again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::InvalidEnvelope(e.to_string())
        } else {
            Error::Transport(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
