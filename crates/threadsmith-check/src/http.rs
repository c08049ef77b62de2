//! Blocking HTTP implementation of [`CheckerService`].

use reqwest::blocking::Client;

use crate::service::{CheckError, CheckerService, Result};
use crate::wire::{RawMatch, RawResponse};

/// HTTP checker speaking the LanguageTool v2 form-encoded protocol.
///
/// The orchestrator never calls this on its own thread; the host runs
/// check effects on a worker so a slow round trip cannot block editing.
pub struct HttpChecker {
    client: Client,
    endpoint: String,
}

impl HttpChecker {
    /// Create a checker posting to `endpoint` (e.g. `https://host/v2/check`).
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Use a preconfigured client (timeouts, proxies).
    #[must_use]
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

impl CheckerService for HttpChecker {
    fn check(&self, text: &str, language: &str) -> Result<Vec<RawMatch>> {
        let form = [("language", language), ("text", text)];
        let response = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .inspect_err(|error| tracing::warn!(%error, "checker request failed"))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(code = status.as_u16(), "checker returned error status");
            return Err(CheckError::Status {
                code: status.as_u16(),
            });
        }

        let body: RawResponse = response.json()?;
        tracing::debug!(matches = body.matches.len(), "checker response decoded");
        Ok(body.matches)
    }
}
