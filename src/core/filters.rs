use crate::models::SortSpec;
use std::collections::BTreeSet;

/// What the user is searching for
///
/// Age bounds are not cross-checked; `age_min > age_max` goes to the
/// backend as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub breeds: BTreeSet<String>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub zip_codes: BTreeSet<String>,
    pub sort: SortSpec,
}

impl SearchCriteria {
    /// Same sort, no filters
    pub fn cleared(&self) -> Self {
        Self {
            sort: self.sort,
            ..Default::default()
        }
    }

    pub fn has_filters(&self) -> bool {
        !self.breeds.is_empty()
            || self.age_min.is_some()
            || self.age_max.is_some()
            || !self.zip_codes.is_empty()
    }
}

/// Session-scoped filter/sort state.
///
/// Filter setters only record intent and raise `modified`; nothing is
/// searched until the caller applies. Sort changes are immediate and leave
/// `modified` alone.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    criteria: SearchCriteria,
    modified: bool,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    /// Owned copy handed to the query engine at call time
    pub fn snapshot(&self) -> SearchCriteria {
        self.criteria.clone()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_breeds<I, S>(&mut self, breeds: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.criteria.breeds = breeds.into_iter().map(Into::into).collect();
        self.modified = true;
    }

    pub fn remove_breed(&mut self, breed: &str) {
        self.criteria.breeds.remove(breed);
        self.modified = true;
    }

    pub fn set_age_min(&mut self, age: Option<u32>) {
        self.criteria.age_min = age;
        self.modified = true;
    }

    pub fn set_age_max(&mut self, age: Option<u32>) {
        self.criteria.age_max = age;
        self.modified = true;
    }

    pub fn set_zip_codes<I, S>(&mut self, zip_codes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.criteria.zip_codes = zip_codes.into_iter().map(Into::into).collect();
        self.modified = true;
    }

    pub fn remove_zip_code(&mut self, zip_code: &str) {
        self.criteria.zip_codes.remove(zip_code);
        self.modified = true;
    }

    pub fn clear_zip_codes(&mut self) {
        self.criteria.zip_codes.clear();
        self.modified = true;
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.criteria.sort = sort;
    }

    /// The pending edits are about to be searched
    pub fn mark_applied(&mut self) {
        self.modified = false;
    }

    /// Drop every filter but keep the sort
    pub fn clear_all(&mut self) {
        self.criteria = self.criteria.cleared();
        self.modified = false;
        tracing::debug!("All filters cleared, keeping sort {}", self.criteria.sort);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortDirection, SortField};

    #[test]
    fn test_setters_mark_modified() {
        let mut filters = FilterState::new();
        assert!(!filters.is_modified());

        filters.set_breeds(["Boxer"]);
        assert!(filters.is_modified());

        filters.mark_applied();
        filters.set_age_min(Some(2));
        assert!(filters.is_modified());

        filters.mark_applied();
        filters.set_zip_codes(["10001"]);
        assert!(filters.is_modified());

        filters.mark_applied();
        filters.remove_breed("Boxer");
        assert!(filters.is_modified());
    }

    #[test]
    fn test_sort_is_not_deferred() {
        let mut filters = FilterState::new();
        filters.set_sort(SortSpec::new(SortField::Age, SortDirection::Desc));

        assert!(!filters.is_modified());
        assert_eq!(filters.criteria().sort.to_string(), "age:desc");
    }

    #[test]
    fn test_clear_all_keeps_sort() {
        let mut filters = FilterState::new();
        let sort = SortSpec::new(SortField::Name, SortDirection::Desc);
        filters.set_breeds(["Boxer"]);
        filters.set_age_min(Some(2));
        filters.set_zip_codes(["10001"]);
        filters.set_sort(sort);

        filters.clear_all();

        let criteria = filters.criteria();
        assert!(criteria.breeds.is_empty());
        assert_eq!(criteria.age_min, None);
        assert_eq!(criteria.age_max, None);
        assert!(criteria.zip_codes.is_empty());
        assert_eq!(criteria.sort, sort);
        assert!(!filters.is_modified());
        assert!(!criteria.has_filters());
    }

    #[test]
    fn test_inverted_age_range_is_kept() {
        let mut filters = FilterState::new();
        filters.set_age_min(Some(9));
        filters.set_age_max(Some(3));

        assert_eq!(filters.criteria().age_min, Some(9));
        assert_eq!(filters.criteria().age_max, Some(3));
    }

    #[test]
    fn test_breeds_are_unique() {
        let mut filters = FilterState::new();
        filters.set_breeds(["Pug", "Boxer", "Pug"]);

        let breeds: Vec<_> = filters.criteria().breeds.iter().cloned().collect();
        assert_eq!(breeds, vec!["Boxer", "Pug"]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut filters = FilterState::new();
        filters.set_breeds(["Pug"]);
        let snapshot = filters.snapshot();

        filters.clear_all();

        assert!(snapshot.breeds.contains("Pug"));
    }
}
