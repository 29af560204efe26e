//! Upstream router
//!
//! Forwards lookups to the record service's REST listener and hands back the
//! downstream JSON body untouched.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde_json::Value;

use error::{describe, AppError, UpstreamError};

/// Client side of the record service REST listener
#[derive(Debug, Clone)]
pub struct RecordHttpRouter {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl RecordHttpRouter {
    pub fn new(base_url: &str, timeout: Duration) -> error::Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Internal(format!("invalid upstream url {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Internal(format!("upstream url {} cannot be a base", base_url)));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<base>/user/<id>`, with `id` encoded as a single path segment.
    ///
    /// `.` and `..` would be resolved away as dot segments (even
    /// percent-encoded), so those ids go out as `<base>/user?id=<id>`.
    pub fn movie_url(&self, id: &str) -> error::Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                AppError::Internal(format!("upstream url {} cannot be a base", self.base_url))
            })?;
            segments.pop_if_empty().push("user");
            if !is_dot_segment(id) {
                segments.push(id);
            }
        }
        if is_dot_segment(id) {
            url.query_pairs_mut().append_pair("id", id);
        }
        Ok(url)
    }

    /// Fetch the record service's answer for `id`.
    ///
    /// A 404 carries the service's not-found body and is returned like any
    /// other answer; only transport failures, other error statuses and
    /// non-JSON bodies are errors.
    pub async fn get_movie(&self, id: &str) -> error::Result<Value> {
        let url = self.movie_url(id)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(UpstreamError::Status {
                code: status.as_u16().to_string(),
                message: status.canonical_reason().unwrap_or("unknown status").to_string(),
            }
            .into());
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        serde_json::from_slice(&body).map_err(|e| UpstreamError::Malformed(e.to_string()).into())
    }

    fn classify(&self, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.timeout).into()
        } else {
            UpstreamError::Unreachable(describe(&err)).into()
        }
    }
}

fn is_dot_segment(id: &str) -> bool {
    matches!(id, "." | "..")
}
