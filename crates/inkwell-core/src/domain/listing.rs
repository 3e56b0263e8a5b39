//! Listing queries: filters, sort orders and page arithmetic.

use uuid::Uuid;

/// Which non-draft posts a listing covers. Drafts are never listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlogFilter {
    All,
    Tag {
        tag: String,
        /// Slug to leave out, used for "more like this" lists.
        exclude: Option<String>,
    },
    /// Case-insensitive title substring.
    Title(String),
    Author(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogSort {
    /// Newest first.
    Latest,
    /// Most read, then most liked, then newest.
    Trending,
}

const MAX_OFFSET: u64 = i64::MAX as u64;

/// A one-based page of fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

impl Page {
    /// Pages below 1 are clamped to the first page.
    pub fn new(number: i64, size: u64) -> Self {
        Self {
            number: number.max(1) as u64,
            size,
        }
    }

    /// Row offset of the page. Saturates at the largest offset a SQL
    /// `OFFSET` accepts, so absurd page numbers yield an empty page.
    pub fn skip(&self) -> u64 {
        (self.number - 1)
            .saturating_mul(self.size)
            .min(MAX_OFFSET)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogQuery {
    pub filter: BlogFilter,
    pub sort: BlogSort,
    pub skip: u64,
    pub limit: u64,
}

impl BlogQuery {
    pub fn paged(filter: BlogFilter, sort: BlogSort, page: Page) -> Self {
        Self {
            filter,
            sort,
            skip: page.skip(),
            limit: page.size,
        }
    }
}
