//! Component F: per-client session lifecycle, configuration, and the
//! cooperative cancellation flag each migration's workers poll.

pub mod error;
pub mod models;
pub mod registry;

pub use error::SessionError;
pub use models::{IncrementalWindow, RelationFilter, Session, SessionState, SpecFlags, Specs, Steps};
pub use registry::Registry;

/// Mints a fresh client identifier, issued on the response when the
/// `client-id` cookie is absent from a request (spec.md §4.F).
pub fn new_client_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
