//! Shared HTTP middleware for the gallery services

pub mod request_id;

pub use request_id::{request_id_middleware, RequestId};
