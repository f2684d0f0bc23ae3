use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures at the datasource boundary. Filter compilation and result shaping
/// are total and never produce one of these.
///
/// Messages are carried as strings so the error stays `Clone`: a single metadata
/// failure is handed to every caller waiting on the same in-flight fetch.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Missing base URL or API key, detected before any request is made.
    #[error("{0}")]
    Configuration(String),

    /// The request could not be sent or came back with a non-success status.
    #[error("Failed to fetch data from PRTG API: {0}")]
    Transport(String),

    /// The upstream answered, but not with an array of objects.
    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),

    /// The single-object probe request of a connection test failed.
    #[error("Connection test failed: {0}")]
    ConnectionTest(String),
}

impl Error {
    /// The carried message without the variant's prefix.
    pub fn detail(&self) -> &str {
        match self {
            Error::Configuration(m)
            | Error::Transport(m)
            | Error::UnexpectedBody(m)
            | Error::ConnectionTest(m) => m,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}
