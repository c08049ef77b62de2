//! The pluggable checking-service contract.

use thiserror::Error;

use crate::wire::RawMatch;

/// Errors a checking service can surface.
///
/// The gateway recovers from all of these by failing open; they exist so
/// that the degraded state is observable and loggable, not so that they
/// propagate to the UI.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {code}")]
    Status { code: u16 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CheckError>;

/// A backend that checks a block of text and returns raw matches.
///
/// Implementations are expected to be request/response only: no offset
/// interpretation, no filtering. That all happens in the gateway so every
/// backend gets identical treatment.
pub trait CheckerService: Send + Sync {
    /// Check `text` in the given language (BCP 47 style, e.g. `en-US`).
    fn check(&self, text: &str, language: &str) -> Result<Vec<RawMatch>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_the_code() {
        let error = CheckError::Status { code: 503 };
        assert_eq!(error.to_string(), "service returned status 503");
    }
}
