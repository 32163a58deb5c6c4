//! Intelli-Gallery upload and query service
//!
//! Accepts image uploads into the blob store, announces each upload to the
//! processing worker, and serves the analysed gallery.

mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
pub mod state;

pub use api_doc::ApiDoc;
pub use state::AppState;
