//! RPC Gateway
//!
//! HTTP front end that answers each movie lookup with one gRPC call to the
//! record service.

pub mod config;
pub mod http;
pub mod router;

pub use config::RpcGatewayConfig;
pub use http::{router as http_router, AppState, MovieEnvelope, SOURCE};
pub use router::{MovieSummary, RecordRouter};
