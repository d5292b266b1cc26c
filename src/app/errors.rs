use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not logged in or the session has expired")]
    Unauthenticated,
    #[error("You are not authorized to access this resource")]
    Forbidden,
    #[error("The requested resource was not found")]
    NotFound,
    #[error("You are sending messages too quickly. Please wait a moment.")]
    RateLimited,
    #[error("Could not reach the server: {0}")]
    Transport(String),
    #[error("Could not decode the server response: {0}")]
    Decode(String),
    #[error("Unexpected response from the server (status {0})")]
    Unexpected(u16),
}

impl ApiError {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ApiError::Unauthenticated,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            429 => ApiError::RateLimited,
            other => ApiError::Unexpected(other),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ApiError::Unauthenticated)
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            ApiError::Decode(value.to_string())
        } else {
            ApiError::Transport(value.to_string())
        }
    }
}
