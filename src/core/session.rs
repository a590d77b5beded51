use crate::core::favorites::FavoriteSet;
use crate::core::filters::FilterState;
use crate::core::locations::LocationSearch;
use crate::core::search::{DogSearch, SearchOptions};
use crate::models::{Dog, LoginRequest, SortSpec};
use crate::services::{ApiClient, ApiError, SessionStatus};
use chrono::{DateTime, Utc};

pub const LOGIN_ERROR: &str = "Login failed. Please try again.";

/// Everything one signed-in user works with.
///
/// Owns the filter state, dog search, favorites and location search, and
/// drives them the way the search screen does. Consumers get shared
/// references; mutation goes through the methods below.
pub struct SearchSession {
    api: ApiClient,
    filters: FilterState,
    search: DogSearch,
    favorites: FavoriteSet,
    locations: LocationSearch,
    logged_in_at: Option<DateTime<Utc>>,
    login_error: Option<String>,
}

impl SearchSession {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            filters: FilterState::new(),
            search: DogSearch::new(),
            favorites: FavoriteSet::new(),
            locations: LocationSearch::new(),
            logged_in_at: None,
            login_error: None,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Filter edits; they take effect on `apply_filters`
    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    pub fn search(&self) -> &DogSearch {
        &self.search
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn favorites_mut(&mut self) -> &mut FavoriteSet {
        &mut self.favorites
    }

    pub fn locations(&self) -> &LocationSearch {
        &self.locations
    }

    pub fn locations_mut(&mut self) -> &mut LocationSearch {
        &mut self.locations
    }

    pub fn logged_in_at(&self) -> Option<DateTime<Utc>> {
        self.logged_in_at
    }

    pub fn login_error(&self) -> Option<&str> {
        self.login_error.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.api.status() == SessionStatus::Authenticated
    }

    /// Log in, then load breeds and the first page of results
    pub async fn login(&mut self, name: &str, email: &str) -> Result<(), ApiError> {
        self.login_error = None;
        let request = LoginRequest::new(name, email);

        if let Err(e) = self.api.login(&request).await {
            self.login_error = Some(match &e {
                ApiError::InvalidInput(message) => message.clone(),
                _ => LOGIN_ERROR.to_string(),
            });
            tracing::error!("Login error: {}", e);
            return Err(e);
        }

        self.reset();
        self.logged_in_at = Some(Utc::now());
        self.activate().await;
        Ok(())
    }

    pub async fn logout(&mut self) {
        if let Err(e) = self.api.logout().await {
            tracing::warn!("Logout request failed: {}", e);
        }
        self.reset();
    }

    /// Drop session state if the backend rejected our cookie.
    ///
    /// Returns true when the user has to log in again.
    pub fn check_expired(&mut self) -> bool {
        if self.api.status() != SessionStatus::Expired {
            return false;
        }
        tracing::info!("Session expired, returning to login");
        self.reset();
        true
    }

    fn reset(&mut self) {
        self.filters = FilterState::new();
        self.search = DogSearch::new();
        self.favorites = FavoriteSet::new();
        self.locations = LocationSearch::new();
        self.logged_in_at = None;
    }

    /// Initial breed load and search; only the first call does anything
    pub async fn activate(&mut self) {
        let criteria = self.filters.snapshot();
        self.search.activate(&self.api, &criteria).await;
    }

    /// Search with the pending filters from page 1
    pub async fn apply_filters(&mut self) {
        self.filters.mark_applied();
        let criteria = self.filters.snapshot();
        self.search
            .execute(&self.api, &criteria, 1, SearchOptions::reset())
            .await;
    }

    /// Drop all filters (sort stays) and search from page 1
    pub async fn clear_filters(&mut self) {
        self.filters.clear_all();
        let criteria = self.filters.snapshot();
        self.search
            .execute(&self.api, &criteria, 1, SearchOptions::clear_filters())
            .await;
    }

    /// Sorting applies immediately and goes back to page 1
    pub async fn change_sort(&mut self, sort: SortSpec) {
        self.filters.set_sort(sort);
        let criteria = self.filters.snapshot();
        self.search
            .execute(&self.api, &criteria, 1, SearchOptions::with_sort(sort))
            .await;
    }

    /// Move to an adjacent page of the current results
    pub async fn change_page(&mut self, page: u32) {
        if !self.search.pages().is_adjacent(page) {
            tracing::debug!(
                "Ignoring jump from page {} to page {}",
                self.search.current_page(),
                page
            );
            return;
        }
        let criteria = self.filters.snapshot();
        self.search
            .execute(&self.api, &criteria, page, SearchOptions::navigate())
            .await;
    }

    pub async fn next_page(&mut self) {
        if self.search.pages().has_next() {
            let page = self.search.current_page() + 1;
            self.change_page(page).await;
        }
    }

    pub async fn prev_page(&mut self) {
        if self.search.pages().has_prev() {
            let page = self.search.current_page() - 1;
            self.change_page(page).await;
        }
    }

    /// Favorite a dog from the current page
    pub fn favorite(&mut self, id: &str) -> Option<&Dog> {
        let dog = self.search.find(id)?.clone();
        self.favorites.add(dog);
        self.search.find(id)
    }

    pub async fn request_match(&mut self) -> Option<&Dog> {
        self.favorites.request_match(&self.api).await
    }

    /// Load the picker with the ZIP codes already filtered on
    pub async fn open_locations(&mut self) {
        let zip_codes = self.filters.criteria().zip_codes.clone();
        self.locations.restore_selection(&self.api, &zip_codes).await;
    }

    /// Move picked locations into the dog filters (pending until applied)
    pub fn apply_locations(&mut self) {
        self.locations.apply_selection(&mut self.filters);
    }
}
