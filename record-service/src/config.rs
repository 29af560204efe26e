use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Record service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordServiceConfig {
    /// gRPC server address
    pub grpc_addr: String,

    /// HTTP server address
    pub http_addr: String,

    /// Path of the JSON movie store
    pub data_path: PathBuf,

    /// Maximum gRPC calls handled at once
    pub grpc_workers: usize,

    /// Service version
    pub version: String,
}

impl Default for RecordServiceConfig {
    fn default() -> Self {
        Self {
            grpc_addr: "[::]:50051".to_string(),
            http_addr: "0.0.0.0:8000".to_string(),
            data_path: PathBuf::from("data/movies.json"),
            grpc_workers: 10,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl RecordServiceConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("RECORD_GRPC_ADDR") {
            config.grpc_addr = addr;
        }

        if let Ok(addr) = std::env::var("RECORD_HTTP_ADDR") {
            config.http_addr = addr;
        }

        if let Ok(path) = std::env::var("RECORD_DATA_PATH") {
            config.data_path = PathBuf::from(path);
        }

        if let Ok(workers) = std::env::var("RECORD_GRPC_WORKERS") {
            match workers.parse() {
                Ok(n) if n > 0 => config.grpc_workers = n,
                _ => tracing::warn!("Ignoring invalid RECORD_GRPC_WORKERS={}", workers),
            }
        }

        config
    }
}
