//! Intelli-Gallery Infrastructure Library
//!
//! Shared infrastructure used by both services:
//! - Middleware (request ID)
//! - Telemetry initialization (tracing)
//! - Error rendering (`HttpAppError`, `ErrorResponse`)
//! - Graceful shutdown signal
//! - Google Cloud access tokens for the REST clients

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

pub mod error;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "gcp-auth")]
pub mod gcp_auth;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{request_id_middleware, RequestId};

#[cfg(feature = "observability-basic")]
pub use telemetry::init_telemetry;

pub use error::{configure_error_details, ErrorResponse, HttpAppError};

#[cfg(feature = "server")]
pub use server::shutdown_signal;

#[cfg(feature = "gcp-auth")]
pub use gcp_auth::{
    create_token_provider, AuthError, MetadataServerTokenProvider, StaticTokenProvider,
    TokenProvider,
};
