/// Results per page for every paginated endpoint
pub const PAGE_SIZE: u32 = 20;

/// Extract the continuation token from a `next`/`prev` link.
///
/// The token is whatever follows the first `from=` up to the next `&`.
/// It is never decoded or otherwise interpreted.
pub fn extract_cursor(link: Option<&str>) -> Option<String> {
    let link = link?;
    let start = link.find("from=")? + "from=".len();
    let token = link[start..].split('&').next().unwrap_or_default();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// ceil(total / page_size)
#[inline]
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size)) as u32
}

/// Cursor bookkeeping for one paginated query.
///
/// Navigation is relative: the backend hands out tokens for the adjacent
/// pages only, so the requested page number just picks a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub current_page: u32,
    pub total_pages: u32,
    pub next_cursor: Option<String>,
    pub prev_cursor: Option<String>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            next_cursor: None,
            prev_cursor: None,
        }
    }
}

impl PageState {
    /// Pick the token for `page` and make it the current page.
    ///
    /// With `reset` the request starts from the beginning and the page
    /// becomes 1. Otherwise a page after the current one uses the forward
    /// cursor and a page before it the backward cursor; a missing cursor
    /// means no token (the backend's first page).
    pub fn navigate(&mut self, page: u32, reset: bool) -> Option<String> {
        if reset {
            self.current_page = 1;
            return None;
        }

        let cursor = if page > self.current_page {
            self.next_cursor.clone()
        } else if page < self.current_page {
            self.prev_cursor.clone()
        } else {
            None
        };

        self.current_page = page;
        cursor
    }

    /// Store the outcome of a successful page fetch
    pub fn record(&mut self, total: u64, next: Option<&str>, prev: Option<&str>) {
        self.total_pages = total_pages(total, PAGE_SIZE);
        self.next_cursor = extract_cursor(next);
        self.prev_cursor = extract_cursor(prev);
    }

    /// Drop both cursors; they belong to a query that no longer applies
    pub fn clear_cursors(&mut self) {
        self.next_cursor = None;
        self.prev_cursor = None;
    }

    /// Only the pages either side of the current one can be reached
    pub fn is_adjacent(&self, page: u32) -> bool {
        page != 0 && page.abs_diff(self.current_page) == 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_neighbouring_pages_are_adjacent() {
        let state = page_two();
        assert!(state.is_adjacent(1));
        assert!(state.is_adjacent(3));
        assert!(!state.is_adjacent(2));
        assert!(!state.is_adjacent(4));
        assert!(!state.is_adjacent(0));
    }

    fn page_two() -> PageState {
        PageState {
            current_page: 2,
            total_pages: 5,
            next_cursor: Some("C_f".to_string()),
            prev_cursor: Some("C_b".to_string()),
        }
    }

    #[test]
    fn test_extract_cursor_from_relative_link() {
        let token = extract_cursor(Some("/dogs/search?size=20&from=40&sort=breed:asc"));
        assert_eq!(token.as_deref(), Some("40"));
    }

    #[test]
    fn test_extract_cursor_at_end_of_link() {
        let token = extract_cursor(Some("https://api.test/dogs/search?sort=age%3Aasc&from=abc%3D"));
        assert_eq!(token.as_deref(), Some("abc%3D"));
    }

    #[test]
    fn test_extract_cursor_missing() {
        assert_eq!(extract_cursor(None), None);
        assert_eq!(extract_cursor(Some("/dogs/search?size=20")), None);
        assert_eq!(extract_cursor(Some("/dogs/search?from=&size=20")), None);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(45, 20), 3);
        assert_eq!(total_pages(40, 20), 2);
        assert_eq!(total_pages(2, 20), 1);
        assert_eq!(total_pages(0, 20), 0);
    }

    #[test]
    fn test_forward_uses_next_cursor() {
        let mut state = page_two();
        assert_eq!(state.navigate(3, false).as_deref(), Some("C_f"));
        assert_eq!(state.current_page, 3);
    }

    #[test]
    fn test_backward_uses_prev_cursor() {
        let mut state = page_two();
        assert_eq!(state.navigate(1, false).as_deref(), Some("C_b"));
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn test_reset_ignores_cursors() {
        let mut state = page_two();
        assert_eq!(state.navigate(3, true), None);
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn test_forward_without_cursor_starts_over() {
        let mut state = page_two();
        state.next_cursor = None;
        assert_eq!(state.navigate(3, false), None);
    }

    #[test]
    fn test_record_extracts_tokens() {
        let mut state = PageState::default();
        state.record(45, Some("/dogs/search?from=20"), None);

        assert_eq!(state.total_pages, 3);
        assert_eq!(state.next_cursor.as_deref(), Some("20"));
        assert_eq!(state.prev_cursor, None);
        assert!(state.has_next());
        assert!(!state.has_prev());
    }
}
