//! HTTP Gateway
//!
//! HTTP front end that answers each movie lookup with one REST call to the
//! record service, wrapping the downstream body with its provenance.

pub mod config;
pub mod http;
pub mod router;

pub use config::HttpGatewayConfig;
pub use http::{router as http_router, AppState, RestEnvelope, SOURCE};
pub use router::RecordHttpRouter;
