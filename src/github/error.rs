use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single API request, before it is attributed to a repository.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("GitHub returned HTTP {status} for {path}")]
    Status { path: String, status: u16 },

    #[error("Invalid request URL for {path}: {message}")]
    InvalidUrl { path: String, message: String },

    #[error("Request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Cache entry {} could not be accessed: {source}", .path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure while fetching everything for one repository (or organization).
///
/// Always carries the name that was being fetched so the caller can tell the
/// operator which repository to check.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(
        "Error fetching data for '{name}' (HTTP {status}). Check the repository name \
         and your GitHub credentials and permissions."
    )]
    AuthenticationOrNotFound { name: String, status: u16 },

    #[error("Unexpected response payload for '{name}': {source}")]
    MalformedResponse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error fetching data for '{name}': {source}")]
    Request {
        name: String,
        #[source]
        source: RequestError,
    },
}

impl FetchError {
    pub fn from_request(name: &str, err: RequestError) -> Self {
        match err {
            RequestError::Status { status, .. } => FetchError::AuthenticationOrNotFound {
                name: name.to_string(),
                status,
            },
            other => FetchError::Request {
                name: name.to_string(),
                source: other,
            },
        }
    }

    /// Repository (or organization) the failed fetch was for
    pub fn name(&self) -> &str {
        match self {
            FetchError::AuthenticationOrNotFound { name, .. }
            | FetchError::MalformedResponse { name, .. }
            | FetchError::Request { name, .. } => name,
        }
    }
}
