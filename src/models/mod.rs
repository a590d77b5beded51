// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Dog, Location, Coordinates, SortField, SortDirection, SortSpec, US_STATES, is_us_state};
pub use requests::{LoginRequest, DogSearchParams, LocationSearchParams, GeoBoundingBox};
pub use responses::{DogSearchResponse, LocationSearchResponse, MatchResponse};
