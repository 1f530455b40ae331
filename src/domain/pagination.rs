/// Validated paging window for list operations.
///
/// Both `page` and `page_size` given: skip `(page - 1) * page_size` rows and
/// take `page_size`. Only `page_size`: the first page. Otherwise unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    page: Option<u64>,
    page_size: Option<u64>,
}

impl Pagination {
    pub const MAX_PAGE_SIZE: u64 = 1000;

    pub fn new(page: Option<u64>, page_size: Option<u64>) -> Result<Self, String> {
        if page == Some(0) {
            return Err("page must be a positive integer".to_string());
        }

        if page_size.is_some_and(|size| size == 0 || size > Self::MAX_PAGE_SIZE) {
            return Err(format!(
                "pageSize must be between 1 and {}",
                Self::MAX_PAGE_SIZE
            ));
        }

        if let (Some(page), Some(size)) = (page, page_size) {
            let fits = (page - 1)
                .checked_mul(size)
                .is_some_and(|offset| i64::try_from(offset).is_ok());
            if !fits {
                return Err("page is out of range".to_string());
            }
        }

        Ok(Self { page, page_size })
    }

    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            page: None,
            page_size: None,
        }
    }

    #[must_use]
    pub const fn limit(&self) -> Option<u64> {
        self.page_size
    }

    #[must_use]
    pub fn offset(&self) -> Option<u64> {
        match (self.page, self.page_size) {
            (Some(page), Some(size)) => Some((page - 1).saturating_mul(size)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_bounds_skip_previous_pages() {
        let p = Pagination::new(Some(3), Some(20)).unwrap();
        assert_eq!(p.offset(), Some(40));
        assert_eq!(p.limit(), Some(20));
    }

    #[test]
    fn page_size_alone_is_first_page() {
        let p = Pagination::new(None, Some(5)).unwrap();
        assert_eq!(p.offset(), None);
        assert_eq!(p.limit(), Some(5));
    }

    #[test]
    fn page_alone_is_unbounded() {
        let p = Pagination::new(Some(4), None).unwrap();
        assert_eq!(p.offset(), None);
        assert_eq!(p.limit(), None);
        assert_eq!(Pagination::unbounded(), Pagination::default());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(Pagination::new(Some(0), Some(10)).is_err());
        assert!(Pagination::new(Some(1), Some(0)).is_err());
        assert!(Pagination::new(Some(1), Some(1001)).is_err());
        assert!(Pagination::new(Some(1), Some(1000)).is_ok());
    }

    #[test]
    fn rejects_pages_whose_offset_does_not_fit() {
        assert!(Pagination::new(Some(u64::MAX), Some(1000)).is_err());
        assert!(Pagination::new(Some(10_000_000_000_000_000), Some(1000)).is_err());

        // Without a page size the page is ignored, so any value is fine.
        assert!(Pagination::new(Some(u64::MAX), None).is_ok());

        let last = u64::try_from(i64::MAX).unwrap() / 1000;
        let p = Pagination::new(Some(last + 1), Some(1000)).unwrap();
        assert!(p.offset().is_some_and(|o| i64::try_from(o).is_ok()));
    }
}
