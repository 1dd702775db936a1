use crate::query::DEFAULT_PAGE_SIZE;

/// An article as held by the result state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_at: String,
    pub company: String,
    pub source: Option<String>,
}

/// One page of results as reported by the search backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPage {
    pub articles: Vec<Article>,
    pub sources: Vec<String>,
    pub total_pages: u32,
    pub total_results: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMetadata {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub page_size: u32,
}

impl PageMetadata {
    pub fn empty(page_size: u32) -> Self {
        Self {
            current_page: 0,
            total_pages: 0,
            total_results: 0,
            page_size,
        }
    }

    /// One-based inclusive range of result positions on the current page.
    pub fn visible_range(&self) -> Option<(u32, u32)> {
        if self.total_results == 0 || self.current_page == 0 {
            return None;
        }
        let from = (self.current_page - 1)
            .saturating_mul(self.page_size)
            .saturating_add(1);
        let to = self
            .current_page
            .saturating_mul(self.page_size)
            .min(self.total_results);
        (from <= to).then_some((from, to))
    }
}

impl Default for PageMetadata {
    fn default() -> Self {
        Self::empty(DEFAULT_PAGE_SIZE)
    }
}

/// The outcome of the most recent successful paginated fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultState {
    articles: Vec<Article>,
    available_sources: Vec<String>,
    metadata: PageMetadata,
}

impl ResultState {
    pub fn new(page_size: u32) -> Self {
        Self {
            articles: Vec::new(),
            available_sources: Vec::new(),
            metadata: PageMetadata::empty(page_size),
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn available_sources(&self) -> &[String] {
        &self.available_sources
    }

    pub fn metadata(&self) -> PageMetadata {
        self.metadata
    }

    /// Replaces everything wholesale with the page fetched for `page`.
    ///
    /// The result set can shrink between requests, so the recorded page is
    /// clamped to the new page count.
    pub(crate) fn replace(&mut self, page: u32, fetched: SearchPage) {
        let current_page = match fetched.total_pages {
            0 => page,
            total => page.min(total),
        };
        self.articles = fetched.articles;
        self.available_sources = fetched.sources;
        self.metadata = PageMetadata {
            current_page,
            total_pages: fetched.total_pages,
            total_results: fetched.total_results,
            page_size: self.metadata.page_size,
        };
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::new(self.metadata.page_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_range_on_last_partial_page() {
        let meta = PageMetadata {
            current_page: 3,
            total_pages: 3,
            total_results: 55,
            page_size: 20,
        };
        assert_eq!(meta.visible_range(), Some((41, 55)));
        assert_eq!(PageMetadata::default().visible_range(), None);
    }

    #[test]
    fn replace_clamps_page_to_shrunken_total() {
        let mut results = ResultState::new(20);
        results.replace(
            5,
            SearchPage {
                articles: Vec::new(),
                sources: Vec::new(),
                total_pages: 2,
                total_results: 30,
            },
        );
        assert_eq!(results.metadata().current_page, 2);
        assert_eq!(results.metadata().visible_range(), Some((21, 30)));
    }
}
