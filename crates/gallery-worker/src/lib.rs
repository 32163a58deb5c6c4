//! Intelli-Gallery image-processing worker
//!
//! Receives upload notifications from a push subscription, runs label detection
//! on the uploaded image and records the result in the document store.

pub mod constants;
mod handlers;
pub mod setup;
pub mod state;

pub use state::WorkerState;
