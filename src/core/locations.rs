use crate::core::distance::{bounding_box_around, is_within_bounding_box};
use crate::core::filters::FilterState;
use crate::core::pagination::{PageState, PAGE_SIZE};
use crate::models::{GeoBoundingBox, Location, LocationSearchParams, LocationSearchResponse};
use crate::services::{ApiClient, ApiError};
use std::collections::BTreeSet;

pub const LOCATION_ERROR: &str = "Failed to load locations. Please try again.";

/// Location search filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationCriteria {
    pub city: Option<String>,
    pub states: BTreeSet<String>,
    pub bounds: Option<GeoBoundingBox>,
}

impl LocationCriteria {
    pub fn with_city(mut self, city: &str) -> Self {
        let city = city.trim();
        self.city = (!city.is_empty()).then(|| city.to_string());
        self
    }

    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = states.into_iter().map(Into::into).collect();
        self
    }

    /// The box is only used when every edge is given
    pub fn with_edges(
        mut self,
        top: Option<f64>,
        bottom: Option<f64>,
        left: Option<f64>,
        right: Option<f64>,
    ) -> Self {
        self.bounds = match (top, bottom, left, right) {
            (Some(top), Some(bottom), Some(left), Some(right)) => Some(GeoBoundingBox {
                top,
                bottom,
                left,
                right,
            }),
            _ => None,
        };
        self
    }

    pub fn to_params(&self, from: Option<String>) -> LocationSearchParams {
        LocationSearchParams {
            city: self.city.clone(),
            states: (!self.states.is_empty()).then(|| self.states.iter().cloned().collect()),
            geo_bounding_box: self.bounds,
            size: Some(PAGE_SIZE),
            from,
        }
    }
}

/// Locations picked by the user, unique by ZIP code
#[derive(Debug, Clone, Default)]
pub struct LocationSelection {
    locations: Vec<Location>,
}

impl LocationSelection {
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn contains(&self, zip_code: &str) -> bool {
        self.locations.iter().any(|l| l.zip_code == zip_code)
    }

    pub fn add(&mut self, location: Location) -> bool {
        if self.contains(&location.zip_code) {
            return false;
        }
        self.locations.push(location);
        true
    }

    pub fn remove(&mut self, zip_code: &str) {
        self.locations.retain(|l| l.zip_code != zip_code);
    }

    pub fn clear(&mut self) {
        self.locations.clear();
    }

    pub fn zip_codes(&self) -> Vec<String> {
        self.locations.iter().map(|l| l.zip_code.clone()).collect()
    }

    /// Hand the selected ZIP codes to the dog filters (pending until applied)
    pub fn apply(&self, filters: &mut FilterState) {
        filters.set_zip_codes(self.zip_codes());
    }
}

/// Paginated location search with the same cursor policy as dog search
#[derive(Debug, Default)]
pub struct LocationSearch {
    criteria: LocationCriteria,
    locations: Vec<Location>,
    total: u64,
    loading: bool,
    error: Option<String>,
    pages: PageState,
    selection: LocationSelection,
    /// ZIP filter the selection was last rebuilt from
    restored_from: Option<BTreeSet<String>>,
}

impl LocationSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &LocationCriteria {
        &self.criteria
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pages(&self) -> &PageState {
        &self.pages
    }

    pub fn selection(&self) -> &LocationSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut LocationSelection {
        &mut self.selection
    }

    pub fn find(&self, zip_code: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.zip_code == zip_code)
    }

    pub fn begin(&mut self, page: u32, reset: bool) -> LocationSearchParams {
        self.loading = true;
        self.error = None;

        let from = self.pages.navigate(page, reset);
        self.criteria.to_params(from)
    }

    pub fn complete(&mut self, outcome: Result<LocationSearchResponse, ApiError>) {
        self.loading = false;

        match outcome {
            Ok(response) => {
                self.pages
                    .record(response.total, response.next.as_deref(), response.prev.as_deref());
                self.total = response.total;
                self.locations = response.results;

                if let Some(bounds) = &self.criteria.bounds {
                    let before = self.locations.len();
                    self.locations
                        .retain(|l| is_within_bounding_box(l.coordinates(), bounds));
                    if self.locations.len() < before {
                        tracing::debug!(
                            "Dropped {} locations outside the search box",
                            before - self.locations.len()
                        );
                    }
                }
            }
            Err(ApiError::Unauthorized) => {}
            Err(e) => {
                tracing::error!("Error fetching locations: {}", e);
                self.error = Some(LOCATION_ERROR.to_string());
            }
        }
    }

    pub async fn execute(&mut self, api: &ApiClient, page: u32, reset: bool) {
        let params = self.begin(page, reset);
        let outcome = api.search_locations(&params).await;
        self.complete(outcome);
    }

    /// New criteria always start over at page 1
    pub async fn search(&mut self, api: &ApiClient, criteria: LocationCriteria) {
        self.criteria = criteria;
        self.execute(api, 1, true).await;
    }

    /// Move to an adjacent page of the current criteria
    pub async fn change_page(&mut self, api: &ApiClient, page: u32) {
        if !self.pages.is_adjacent(page) {
            return;
        }
        self.execute(api, page, false).await;
    }

    /// Search the box of `radius_km` around a location
    pub async fn nearby(&mut self, api: &ApiClient, center: &Location, radius_km: f64) {
        let criteria = LocationCriteria {
            bounds: Some(bounding_box_around(center.coordinates(), radius_km)),
            ..Default::default()
        };
        self.search(api, criteria).await;
    }

    /// Rebuild the selection from ZIP codes already in the dog filters.
    ///
    /// Only runs when the filter differs from the one last restored, so
    /// picks made since then survive further searches.
    pub async fn restore_selection(&mut self, api: &ApiClient, zip_codes: &BTreeSet<String>) {
        if zip_codes.is_empty() || self.restored_from.as_ref() == Some(zip_codes) {
            return;
        }

        let wanted: Vec<String> = zip_codes.iter().cloned().collect();
        match api.fetch_locations(&wanted).await {
            Ok(locations) => {
                self.selection.clear();
                for location in locations {
                    self.selection.add(location);
                }
                self.restored_from = Some(zip_codes.clone());
            }
            Err(e) => tracing::error!("Error loading saved locations: {}", e),
        }
    }

    /// Write the selection into the dog filters; the filter now mirrors it
    pub fn apply_selection(&mut self, filters: &mut FilterState) {
        self.selection.apply(filters);
        self.restored_from = Some(filters.criteria().zip_codes.clone());
    }
}
