// Service exports
pub mod api;

pub use api::{ApiClient, ApiError, SessionStatus};
