use crate::models::{
    Dog, DogSearchParams, DogSearchResponse, Location, LocationSearchParams,
    LocationSearchResponse, LoginRequest, MatchResponse,
};
use reqwest::header::{HeaderMap, HeaderValue, REFERRER_POLICY};
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use validator::Validate;

/// Errors that can occur when talking to the adoption API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: session is missing or expired")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Authentication state of the cookie session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    SignedOut,
    Authenticated,
    /// A call was rejected with 401/403 while signed in
    Expired,
}

/// Adoption API client
///
/// Handles all communication with the backend including:
/// - Login/logout (cookie session)
/// - Dog search, bulk lookup and matching
/// - Location lookup and search
///
/// Cloning is cheap; clones share the cookie jar and the session status.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    status: Arc<watch::Sender<SessionStatus>>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        let (status, _) = watch::channel(SessionStatus::SignedOut);

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            status: Arc::new(status),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current session status
    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    /// Watch for session transitions (used to trigger the login redirect)
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a response status to an error.
    ///
    /// 401/403 while signed in flips the session to `Expired`.
    fn check(&self, response: Response, action: &str) -> Result<Response, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let expired = self.status.send_if_modified(|current| {
                if *current == SessionStatus::Authenticated {
                    *current = SessionStatus::Expired;
                    true
                } else {
                    false
                }
            });
            if expired {
                tracing::info!("Session expired while trying to {}", action);
            }
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            tracing::error!("Failed to {}: {}", action, status);
            return Err(ApiError::ApiError(format!("Failed to {}: {}", action, status)));
        }

        Ok(response)
    }

    /// Log in with name and email; the session lives in a cookie
    pub async fn login(&self, request: &LoginRequest) -> Result<(), ApiError> {
        request
            .validate()
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await?;

        // A rejected login is not an expiry; the session was never established
        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(ApiError::Unauthorized);
        }
        self.check(response, "log in")?;

        self.status.send_replace(SessionStatus::Authenticated);
        tracing::info!("Logged in as {}", request.name);

        Ok(())
    }

    /// End the session. The local status is signed out whatever the outcome.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = match self.client.post(self.url("/auth/logout")).send().await {
            Ok(response) => self.check(response, "log out").map(|_| ()),
            Err(e) => Err(e.into()),
        };

        self.status.send_replace(SessionStatus::SignedOut);
        tracing::info!("Logged out");

        result
    }

    /// Fetch all breed names
    pub async fn fetch_breeds(&self) -> Result<Vec<String>, ApiError> {
        let response = self.client.get(self.url("/dogs/breeds")).send().await?;
        let response = self.check(response, "fetch breeds")?;

        Ok(response.json().await?)
    }

    /// Search dog ids
    pub async fn search_dogs(&self, params: &DogSearchParams) -> Result<DogSearchResponse, ApiError> {
        let query = params.to_query_string();
        let url = if query.is_empty() {
            self.url("/dogs/search")
        } else {
            format!("{}?{}", self.url("/dogs/search"), query)
        };

        tracing::debug!("Search query: {}", query);

        let response = self.client.get(&url).send().await?;
        let response = self.check(response, "search dogs")?;

        Ok(response.json().await?)
    }

    /// Resolve dog ids into full records. Order is whatever the backend returns.
    pub async fn fetch_dogs(&self, ids: &[String]) -> Result<Vec<Dog>, ApiError> {
        let response = self
            .client
            .post(self.url("/dogs"))
            .json(ids)
            .send()
            .await?;
        let response = self.check(response, "fetch dogs")?;

        let dogs: Vec<Dog> = response.json().await?;
        tracing::debug!("Fetched {} of {} requested dogs", dogs.len(), ids.len());

        Ok(dogs)
    }

    /// Ask the backend to pick one dog out of the given ids
    pub async fn find_match(&self, ids: &[String]) -> Result<MatchResponse, ApiError> {
        if ids.is_empty() {
            return Err(ApiError::InvalidInput("match needs at least one dog id".into()));
        }

        let response = self
            .client
            .post(self.url("/dogs/match"))
            .json(ids)
            .send()
            .await?;
        let response = self.check(response, "generate match")?;

        Ok(response.json().await?)
    }

    /// Fetch location records for ZIP codes
    pub async fn fetch_locations(&self, zip_codes: &[String]) -> Result<Vec<Location>, ApiError> {
        let response = self
            .client
            .post(self.url("/locations"))
            .json(zip_codes)
            .send()
            .await?;
        let response = self.check(response, "fetch locations")?;

        // Unknown ZIP codes come back as null entries
        let locations: Vec<Option<Location>> = response.json().await?;
        Ok(locations.into_iter().flatten().collect())
    }

    /// Search locations by city, state and bounding box
    pub async fn search_locations(
        &self,
        params: &LocationSearchParams,
    ) -> Result<LocationSearchResponse, ApiError> {
        tracing::debug!("Location search: {:?}", params);

        let response = self
            .client
            .post(self.url("/locations/search"))
            .json(params)
            .send()
            .await?;
        let response = self.check(response, "search locations")?;

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_client_creation() {
        let client = ApiClient::new(
            "https://api.test/".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(client.base_url(), "https://api.test");
        assert_eq!(client.url("/dogs/breeds"), "https://api.test/dogs/breeds");
        assert_eq!(client.status(), SessionStatus::SignedOut);
    }

    #[tokio::test]
    async fn test_login_rejects_invalid_form_without_request() {
        // Nothing listens here; validation must fail before any I/O
        let client = ApiClient::new("http://127.0.0.1:9".to_string(), Duration::from_secs(1)).unwrap();

        let err = client
            .login(&LoginRequest::new("Ada", "nope"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert_eq!(client.status(), SessionStatus::SignedOut);
    }

    #[tokio::test]
    async fn test_find_match_requires_ids() {
        let client = ApiClient::new("http://127.0.0.1:9".to_string(), Duration::from_secs(1)).unwrap();
        let err = client.find_match(&[]).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }
}
