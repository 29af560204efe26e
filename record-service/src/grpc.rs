//! gRPC listener
//!
//! Implements `record.RecordService` on top of the shared catalog.

use tonic::{Request, Response, Status};

use proto::record_service_server::RecordService;
use proto::{GetRecordRequest, GetRecordResponse, HealthCheckRequest, HealthCheckResponse};

use crate::models::Record;
use crate::service::RecordCatalog;

/// gRPC service implementation
pub struct RecordRpcService {
    catalog: RecordCatalog,
    version: String,
}

impl RecordRpcService {
    pub fn new(catalog: RecordCatalog, version: impl Into<String>) -> Self {
        Self {
            catalog,
            version: version.into(),
        }
    }
}

/// Map a catalog result onto the wire response.
///
/// Absence is reported through `found = false` with empty fields.
pub fn to_response(record: Option<&Record>) -> GetRecordResponse {
    match record {
        Some(record) => GetRecordResponse {
            display_name: record.title().to_string(),
            detail: record.director_line(),
            found: true,
        },
        None => GetRecordResponse {
            display_name: String::new(),
            detail: String::new(),
            found: false,
        },
    }
}

#[tonic::async_trait]
impl RecordService for RecordRpcService {
    async fn get_record(
        &self,
        request: Request<GetRecordRequest>,
    ) -> Result<Response<GetRecordResponse>, Status> {
        let req = request.into_inner();
        let id = req.movie_id.to_string();

        let record = self.catalog.find(&id).await;
        if record.is_none() {
            tracing::info!(movie_id = req.movie_id, "gRPC lookup found no movie");
        }

        Ok(Response::new(to_response(record.as_ref())))
    }

    async fn health_check(
        &self,
        _request: Request<HealthCheckRequest>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        let response = HealthCheckResponse {
            healthy: true,
            version: self.version.clone(),
        };
        Ok(Response::new(response))
    }
}
