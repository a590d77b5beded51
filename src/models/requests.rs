use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login form submitted to `/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,
}

impl LoginRequest {
    /// Build a request from raw form input, trimming both fields
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
        }
    }
}

/// Query parameters for `GET /dogs/search`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DogSearchParams {
    pub size: Option<u32>,
    pub sort: Option<String>,
    /// Continuation token, forwarded exactly as it was received
    pub from: Option<String>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub breeds: Vec<String>,
    pub zip_codes: Vec<String>,
}

impl DogSearchParams {
    /// Render as a query string with repeated `breeds`/`zipCodes` keys.
    ///
    /// Every value is percent-encoded except `from`, which is appended
    /// verbatim so the backend sees the token it issued.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<String> = Vec::new();

        if let Some(size) = self.size {
            pairs.push(format!("size={}", size));
        }
        if let Some(sort) = &self.sort {
            pairs.push(format!("sort={}", urlencoding::encode(sort)));
        }
        if let Some(from) = &self.from {
            pairs.push(format!("from={}", from));
        }
        if let Some(age_min) = self.age_min {
            pairs.push(format!("ageMin={}", age_min));
        }
        if let Some(age_max) = self.age_max {
            pairs.push(format!("ageMax={}", age_max));
        }
        for breed in &self.breeds {
            pairs.push(format!("breeds={}", urlencoding::encode(breed)));
        }
        for zip in &self.zip_codes {
            pairs.push(format!("zipCodes={}", urlencoding::encode(zip)));
        }

        pairs.join("&")
    }
}

/// Rectangle for the location search, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBoundingBox {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// Body for `POST /locations/search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_bounding_box: Option<GeoBoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}
