//! Movie Record Service
//!
//! Owns the movie dataset and serves lookups over two listeners: gRPC
//! (`record.RecordService`) and HTTP/JSON.

pub mod config;
pub mod grpc;
pub mod http;
pub mod models;
pub mod repository;
pub mod server;
pub mod service;

pub use config::RecordServiceConfig;
pub use grpc::RecordRpcService;
pub use models::{Record, RecordError};
pub use repository::{InMemoryStore, JsonFileStore, RecordStore};
pub use server::{RecordServer, ServerError};
pub use service::{lookup, RecordCatalog};
