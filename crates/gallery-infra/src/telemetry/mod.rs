//! Tracing initialization
//!
//! Both services log through `tracing`; the subscriber writes either human-readable
//! lines or one JSON object per event.

mod init_basic;

pub use init_basic::init_telemetry;
