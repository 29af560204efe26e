//! Shared protobuf definitions for the movie services
//!
//! This crate provides the generated gRPC code for `record.RecordService`,
//! both the server trait used by the record service and the client used by
//! the RPC gateway.
//!
//! - `reflection`: Enable gRPC reflection support

/// Record lookup proto definitions
pub mod record {
    tonic::include_proto!("record");
}

// Re-export commonly used types for convenience
pub use record::*;

/// File descriptor set for gRPC reflection
#[cfg(feature = "reflection")]
pub const FILE_DESCRIPTOR_SET: &[u8] =
    include_bytes!(concat!(env!("OUT_DIR"), "/record_descriptor.bin"));
