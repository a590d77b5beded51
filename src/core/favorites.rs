use crate::models::Dog;
use crate::services::{ApiClient, ApiError};
use std::collections::HashSet;

pub const MATCH_ERROR: &str = "Failed to generate a match. Please try again.";

/// Favorited dogs plus the match computed from them.
///
/// Records are kept in insertion order for display; an id index makes
/// membership checks constant time. The match always refers to a dog that
/// is still favorited.
#[derive(Debug, Default)]
pub struct FavoriteSet {
    dogs: Vec<Dog>,
    ids: HashSet<String>,
    matched: Option<Dog>,
    match_loading: bool,
    match_error: Option<String>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dogs(&self) -> &[Dog] {
        &self.dogs
    }

    pub fn len(&self) -> usize {
        self.dogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dogs.is_empty()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns false if the dog was already a favorite
    pub fn add(&mut self, dog: Dog) -> bool {
        if !self.ids.insert(dog.id.clone()) {
            return false;
        }
        self.dogs.push(dog);
        true
    }

    /// Returns false if the id was not a favorite
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.ids.remove(id) {
            return false;
        }
        self.dogs.retain(|dog| dog.id != id);

        if self.matched.as_ref().is_some_and(|dog| dog.id == id) {
            self.matched = None;
        }
        true
    }

    pub fn clear(&mut self) {
        self.dogs.clear();
        self.ids.clear();
        self.matched = None;
    }

    pub fn matched(&self) -> Option<&Dog> {
        self.matched.as_ref()
    }

    pub fn is_match_loading(&self) -> bool {
        self.match_loading
    }

    pub fn match_error(&self) -> Option<&str> {
        self.match_error.as_deref()
    }

    /// Snapshot the ids to submit, or `None` when there is nothing to match
    pub fn begin_match(&mut self) -> Option<Vec<String>> {
        if self.dogs.is_empty() {
            return None;
        }

        self.match_loading = true;
        self.match_error = None;
        self.matched = None;

        Some(self.dogs.iter().map(|dog| dog.id.clone()).collect())
    }

    /// Resolve the backend's pick against the current favorites
    pub fn complete_match(&mut self, outcome: Result<String, ApiError>) -> Option<&Dog> {
        self.match_loading = false;

        match outcome {
            Ok(id) => {
                self.matched = self.dogs.iter().find(|dog| dog.id == id).cloned();
                if self.matched.is_none() {
                    tracing::warn!("Matched dog {} is not among current favorites", id);
                }
            }
            Err(ApiError::Unauthorized) => {}
            Err(e) => {
                tracing::error!("Error generating match: {}", e);
                self.match_error = Some(MATCH_ERROR.to_string());
            }
        }

        self.matched.as_ref()
    }

    /// Ask the backend for a match. Empty favorites is a no-op.
    pub async fn request_match(&mut self, api: &ApiClient) -> Option<&Dog> {
        let ids = self.begin_match()?;
        let outcome = api.find_match(&ids).await.map(|response| response.match_id);
        self.complete_match(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dog(id: &str) -> Dog {
        Dog {
            id: id.to_string(),
            img: String::new(),
            name: format!("Dog {}", id),
            age: 2,
            zip_code: "10001".to_string(),
            breed: "Pug".to_string(),
        }
    }

    fn with_match(matched: &str) -> FavoriteSet {
        let mut favorites = FavoriteSet::new();
        favorites.add(dog("x"));
        favorites.add(dog("y"));
        favorites.begin_match();
        favorites.complete_match(Ok(matched.to_string()));
        favorites
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut favorites = FavoriteSet::new();
        assert!(favorites.add(dog("a")));
        assert!(!favorites.add(dog("a")));

        assert_eq!(favorites.len(), 1);
        assert!(favorites.is_favorite("a"));
        assert!(!favorites.is_favorite("b"));
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut favorites = FavoriteSet::new();
        favorites.add(dog("b"));
        favorites.add(dog("a"));
        favorites.add(dog("c"));
        favorites.remove("a");

        let ids: Vec<_> = favorites.dogs().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_removing_matched_dog_clears_match() {
        let mut favorites = with_match("x");
        assert_eq!(favorites.matched().map(|d| d.id.as_str()), Some("x"));

        favorites.remove("x");
        assert!(favorites.matched().is_none());
    }

    #[test]
    fn test_removing_other_dog_keeps_match() {
        let mut favorites = with_match("x");
        favorites.remove("y");
        assert_eq!(favorites.matched().map(|d| d.id.as_str()), Some("x"));
    }

    #[test]
    fn test_clear_invalidates_match() {
        let mut favorites = with_match("y");
        favorites.clear();

        assert!(favorites.is_empty());
        assert!(favorites.matched().is_none());
        assert!(!favorites.is_favorite("y"));
    }

    #[test]
    fn test_empty_set_does_not_start_match() {
        let mut favorites = FavoriteSet::new();
        assert!(favorites.begin_match().is_none());
        assert!(!favorites.is_match_loading());
    }

    #[test]
    fn test_begin_match_snapshots_ids() {
        let mut favorites = with_match("x");
        let ids = favorites.begin_match().unwrap();

        assert_eq!(ids, vec!["x", "y"]);
        assert!(favorites.is_match_loading());
        assert!(favorites.matched().is_none());
    }

    #[test]
    fn test_unknown_match_id_is_ignored() {
        let mut favorites = FavoriteSet::new();
        favorites.add(dog("x"));
        favorites.begin_match();

        assert!(favorites.complete_match(Ok("gone".to_string())).is_none());
        assert!(!favorites.is_match_loading());
        assert_eq!(favorites.match_error(), None);
    }

    #[test]
    fn test_match_failure_sets_message() {
        let mut favorites = FavoriteSet::new();
        favorites.add(dog("x"));
        favorites.begin_match();
        favorites.complete_match(Err(ApiError::ApiError("500".into())));

        assert_eq!(favorites.match_error(), Some(MATCH_ERROR));
        assert!(!favorites.is_match_loading());
    }
}
