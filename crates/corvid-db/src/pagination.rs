/// Offset based page selector
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pagination {
    /// Zero-based page index
    pub page: usize,
    pub size: usize,
}

impl Pagination {
    #[must_use]
    pub fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Cut the page out of an already ordered list
    #[must_use]
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset())
            .take(self.size)
            .collect()
    }
}
