//! Pawsearch - search client for the dog adoption API
//!
//! This library wraps the adoption backend (login, dog search, bulk lookup,
//! matching, location search) and keeps the per-session state a search
//! screen needs: pending filters, cursor pagination, favorites and the
//! match picked from them.

pub mod config;
pub mod core;
pub mod models;
pub mod services;
pub mod shell;

// Re-export commonly used types
pub use self::core::{DogSearch, FavoriteSet, FilterState, LocationSearch, SearchCriteria, SearchSession, PAGE_SIZE};
pub use models::{Dog, Location, SortSpec, SortField, SortDirection};
pub use services::{ApiClient, ApiError, SessionStatus};
