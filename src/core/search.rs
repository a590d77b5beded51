use crate::core::filters::SearchCriteria;
use crate::core::pagination::{PageState, PAGE_SIZE};
use crate::models::{Dog, DogSearchParams, SortSpec};
use crate::services::{ApiClient, ApiError};

pub const SEARCH_ERROR: &str = "Failed to load dogs. Please try again.";
pub const BREEDS_ERROR: &str = "Failed to load breed filters. Please try again.";

/// How a search request treats the current page state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Start from the first page without a continuation token
    pub reset_pagination: bool,
    /// Sort to use instead of the one in the criteria
    pub sort_override: Option<SortSpec>,
    /// Search with no filters at all (implies `reset_pagination`)
    pub clear_filters: bool,
}

impl SearchOptions {
    pub fn reset() -> Self {
        Self {
            reset_pagination: true,
            ..Default::default()
        }
    }

    pub fn navigate() -> Self {
        Self::default()
    }

    pub fn with_sort(sort: SortSpec) -> Self {
        Self {
            reset_pagination: true,
            sort_override: Some(sort),
            clear_filters: false,
        }
    }

    pub fn clear_filters() -> Self {
        Self {
            reset_pagination: true,
            sort_override: None,
            clear_filters: true,
        }
    }
}

/// A fully planned search, detached from the engine that planned it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DogQuery {
    pub page: u32,
    pub params: DogSearchParams,
}

impl DogQuery {
    /// Translate criteria into wire parameters
    pub fn build(criteria: &SearchCriteria, page: u32, from: Option<String>) -> Self {
        Self {
            page,
            params: DogSearchParams {
                size: Some(PAGE_SIZE),
                sort: Some(criteria.sort.to_string()),
                from,
                age_min: criteria.age_min,
                age_max: criteria.age_max,
                breeds: criteria.breeds.iter().cloned().collect(),
                zip_codes: criteria.zip_codes.iter().cloned().collect(),
            },
        }
    }
}

/// One fetched page: resolved records plus the raw continuation links
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub dogs: Vec<Dog>,
    pub total: u64,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// Run a planned query: id search, then one bulk lookup for the ids
pub async fn fetch_page(api: &ApiClient, query: &DogQuery) -> Result<SearchPage, ApiError> {
    let response = api.search_dogs(&query.params).await?;

    if response.result_ids.is_empty() {
        return Ok(SearchPage {
            dogs: Vec::new(),
            total: 0,
            next: None,
            prev: None,
        });
    }

    let dogs = api.fetch_dogs(&response.result_ids).await?;

    Ok(SearchPage {
        dogs,
        total: response.total,
        next: response.next,
        prev: response.prev,
    })
}

/// What the result area should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Loading,
    Failed,
    Empty,
    Results,
}

/// Paginated dog search.
///
/// A search runs in three steps so that completions can be applied in
/// arrival order:
/// 1. `begin` - set loading, clear the error, resolve the cursor
/// 2. `fetch_page` - network only, borrows nothing from the engine
/// 3. `complete` - store the outcome and clear loading
///
/// The last completion to arrive overwrites the displayed page.
#[derive(Debug, Default)]
pub struct DogSearch {
    dogs: Vec<Dog>,
    loading: bool,
    error: Option<String>,
    pages: PageState,
    available_breeds: Vec<String>,
    breeds_error: Option<String>,
    activated: bool,
}

impl DogSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dogs(&self) -> &[Dog] {
        &self.dogs
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

    pub fn current_page(&self) -> u32 {
        self.pages.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.pages.total_pages
    }

    /// Sorted breed names, loaded once on activation
    pub fn available_breeds(&self) -> &[String] {
        &self.available_breeds
    }

    pub fn breeds_error(&self) -> Option<&str> {
        self.breeds_error.as_deref()
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn status(&self) -> SearchStatus {
        if self.loading {
            SearchStatus::Loading
        } else if self.error.is_some() {
            SearchStatus::Failed
        } else if self.dogs.is_empty() {
            SearchStatus::Empty
        } else {
            SearchStatus::Results
        }
    }

    /// Find a dog on the current page
    pub fn find(&self, id: &str) -> Option<&Dog> {
        self.dogs.iter().find(|dog| dog.id == id)
    }

    /// Plan a search against the given criteria snapshot
    pub fn begin(&mut self, criteria: &SearchCriteria, page: u32, options: SearchOptions) -> DogQuery {
        self.loading = true;
        self.error = None;

        let mut criteria = if options.clear_filters {
            criteria.cleared()
        } else {
            criteria.clone()
        };
        if let Some(sort) = options.sort_override {
            criteria.sort = sort;
        }

        let reset = options.reset_pagination || options.clear_filters;
        let from = self.pages.navigate(page, reset);

        DogQuery::build(&criteria, self.pages.current_page, from)
    }

    /// Apply the outcome of a fetch. Clears loading on every path.
    pub fn complete(&mut self, outcome: Result<SearchPage, ApiError>) {
        self.loading = false;

        match outcome {
            Ok(page) if page.dogs.is_empty() && page.total == 0 => {
                self.dogs.clear();
                self.pages.total_pages = 1;
                self.pages.clear_cursors();
            }
            Ok(page) => {
                self.pages
                    .record(page.total, page.next.as_deref(), page.prev.as_deref());
                self.dogs = page.dogs;
                tracing::debug!(
                    "Page {} of {} with {} dogs",
                    self.pages.current_page,
                    self.pages.total_pages,
                    self.dogs.len()
                );
            }
            Err(ApiError::Unauthorized) => {
                tracing::debug!("Search rejected, session needs a new login");
            }
            Err(e) => {
                tracing::error!("Error fetching dogs: {}", e);
                self.error = Some(SEARCH_ERROR.to_string());
            }
        }
    }

    /// Plan, fetch and apply in one go
    pub async fn execute(
        &mut self,
        api: &ApiClient,
        criteria: &SearchCriteria,
        page: u32,
        options: SearchOptions,
    ) {
        let query = self.begin(criteria, page, options);
        let outcome = fetch_page(api, &query).await;
        self.complete(outcome);
    }

    /// First activation: load breed options and run the initial search.
    /// Later calls do nothing.
    pub async fn activate(&mut self, api: &ApiClient, criteria: &SearchCriteria) {
        if self.activated {
            return;
        }
        self.activated = true;

        let query = self.begin(criteria, 1, SearchOptions::reset());
        let (breeds, outcome) = tokio::join!(api.fetch_breeds(), fetch_page(api, &query));

        self.complete(outcome);
        self.store_breeds(breeds);
    }

    fn store_breeds(&mut self, breeds: Result<Vec<String>, ApiError>) {
        match breeds {
            Ok(mut breeds) => {
                breeds.sort();
                tracing::debug!("Loaded {} breeds", breeds.len());
                self.available_breeds = breeds;
                self.breeds_error = None;
            }
            Err(ApiError::Unauthorized) => {}
            Err(e) => {
                tracing::error!("Error fetching breeds: {}", e);
                self.breeds_error = Some(BREEDS_ERROR.to_string());
            }
        }
    }
}
