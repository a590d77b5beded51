// Core exports
pub mod distance;
pub mod favorites;
pub mod filters;
pub mod locations;
pub mod pagination;
pub mod search;
pub mod session;

pub use distance::{distance_km, bounding_box_around, is_within_bounding_box};
pub use favorites::FavoriteSet;
pub use filters::{FilterState, SearchCriteria};
pub use locations::{LocationCriteria, LocationSearch, LocationSelection};
pub use pagination::{PageState, PAGE_SIZE, extract_cursor, total_pages};
pub use search::{DogSearch, DogQuery, SearchOptions, SearchPage, SearchStatus, fetch_page};
pub use session::SearchSession;
