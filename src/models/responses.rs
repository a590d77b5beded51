use serde::{Deserialize, Serialize};
use crate::models::domain::Location;

/// Response for `GET /dogs/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DogSearchResponse {
    pub result_ids: Vec<String>,
    pub total: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// Response for `POST /locations/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSearchResponse {
    pub results: Vec<Location>,
    pub total: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// Response for `POST /dogs/match`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(rename = "match")]
    pub match_id: String,
}
