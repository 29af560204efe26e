//! Upstream router
//!
//! Forwards lookups to the record service over gRPC. Every call opens its
//! own channel; nothing is pooled or reused between requests.

use std::time::Duration;

use tonic::transport::Endpoint;
use tonic::{Code, Status};

use error::{describe, AppError, UpstreamError};
use proto::record_service_client::RecordServiceClient;
use proto::GetRecordRequest;

/// Movie data returned by the record service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieSummary {
    pub user_name: String,
    pub email: String,
}

/// Client side of `record.RecordService`
#[derive(Debug, Clone)]
pub struct RecordRouter {
    upstream_url: String,
    timeout: Duration,
}

impl RecordRouter {
    pub fn new(upstream_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            upstream_url: upstream_url.into(),
            timeout,
        }
    }

    pub fn upstream_url(&self) -> &str {
        &self.upstream_url
    }

    /// Look up a movie, bounded by the configured timeout
    pub async fn get_movie(&self, movie_id: i64) -> error::Result<MovieSummary> {
        match tokio::time::timeout(self.timeout, self.call(movie_id)).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout(self.timeout).into()),
        }
    }

    async fn call(&self, movie_id: i64) -> error::Result<MovieSummary> {
        let endpoint = Endpoint::from_shared(self.upstream_url.clone())
            .map_err(|e| AppError::Internal(format!("invalid upstream url {}: {}", self.upstream_url, e)))?;

        let channel = endpoint
            .connect()
            .await
            .map_err(|e| UpstreamError::Unreachable(describe(&e)))?;

        let response = RecordServiceClient::new(channel)
            .get_record(GetRecordRequest { movie_id })
            .await
            .map_err(from_status)?
            .into_inner();

        if !response.found {
            return Err(AppError::not_found());
        }

        Ok(MovieSummary {
            user_name: response.display_name,
            email: response.detail,
        })
    }
}

/// Map a gRPC status from the record service onto the shared taxonomy
pub fn from_status(status: Status) -> AppError {
    match status.code() {
        Code::NotFound => AppError::not_found(),
        Code::Unavailable => UpstreamError::Unreachable(status.message().to_string()).into(),
        code => UpstreamError::Status {
            code: format!("{:?}", code),
            message: status.message().to_string(),
        }
        .into(),
    }
}
