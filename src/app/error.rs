use thiserror::Error;

/// Anything that stops a catalogue or show fetch from producing data.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("http client: {0}")]
    Client(#[source] reqwest::Error),
}

impl NetworkError {
    pub const USER_MESSAGE: &'static str = "Data Fetching Failed";

    /// Message shown in place of a view whose fetch failed.
    pub const fn user_message(&self) -> &'static str {
        Self::USER_MESSAGE
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
