use reqwest::StatusCode;

/// Why a feeder send did not land.
#[derive(Debug, thiserror::Error)]
pub enum FeederError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("POST {path} failed: {source}")]
    Request {
        path: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("POST {path}: HTTP {status}: {body}")]
    Rejected {
        path: &'static str,
        status: StatusCode,
        body: String,
    },
}
