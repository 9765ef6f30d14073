use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const DEFAULT_PAGE: i64 = 1;

/// A single page of a product listing.
///
/// Out of range values are not rejected. A `per_page` of zero or less falls back
/// to [`DEFAULT_PER_PAGE`] and a `page` below one falls back to [`DEFAULT_PAGE`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PageRequest {
    pub per_page: i64,
    pub page: i64,
}

impl PageRequest {
    #[must_use]
    pub fn new(per_page: i64, page: i64) -> Self {
        Self {
            per_page: if per_page > 0 {
                per_page
            } else {
                DEFAULT_PER_PAGE
            },
            page: if page >= 1 { page } else { DEFAULT_PAGE },
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            page: DEFAULT_PAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_per_page() {
        assert_eq!(PageRequest::new(0, 3).per_page, 10);
        assert_eq!(PageRequest::new(-5, 3).per_page, 10);
        assert_eq!(PageRequest::new(25, 3).per_page, 25);
    }

    #[test]
    fn clamps_page() {
        assert_eq!(PageRequest::new(10, 0).page, 1);
        assert_eq!(PageRequest::new(10, -1).page, 1);
        assert_eq!(PageRequest::new(10, 4).page, 4);
    }

    #[test]
    fn default_matches_clamped() {
        assert_eq!(PageRequest::default(), PageRequest::new(0, 0));
    }

    #[test]
    fn serializes_as_query() {
        let json = serde_json::to_value(PageRequest::new(20, 2)).unwrap();
        assert_eq!(json, serde_json::json!({"per_page": 20, "page": 2}));
    }
}
