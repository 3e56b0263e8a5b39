//! Posts: create-or-update, read, listings.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::DomainResult;
use crate::domain::{
    AuthorSummary, Blog, BlogFilter, BlogInput, BlogQuery, BlogSort, BlogSubmission, BlogUpdate,
    Page,
};
use crate::error::DomainError;
use crate::ports::{BlogRepository, UserRepository};

/// Page sizes for the listing endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ListingLimits {
    pub latest_page_size: u64,
    pub search_page_size: u64,
    pub trending_limit: u64,
    /// Upper bound for a client-supplied search `limit`.
    pub max_page_size: u64,
}

impl Default for ListingLimits {
    fn default() -> Self {
        Self {
            latest_page_size: 5,
            search_page_size: 2,
            trending_limit: 5,
            max_page_size: 50,
        }
    }
}

/// A post together with its author's public summary.
#[derive(Debug, Clone)]
pub struct BlogView {
    pub blog: Blog,
    pub author: AuthorSummary,
}

/// How a post is being opened.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// The caller explicitly asks for a draft.
    pub draft: bool,
    /// Opened in the editor; reads are not counted.
    pub edit_mode: bool,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Search body fields. The first present of tag, query, author wins.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    pub tag: Option<String>,
    pub query: Option<String>,
    pub author: Option<Uuid>,
    pub exclude: Option<String>,
}

impl SearchCriteria {
    pub fn filter(&self) -> BlogFilter {
        if let Some(tag) = present(&self.tag) {
            BlogFilter::Tag {
                tag: tag.to_lowercase(),
                exclude: self.exclude.clone().filter(|e| !e.is_empty()),
            }
        } else if let Some(query) = present(&self.query) {
            BlogFilter::Title(query.to_string())
        } else if let Some(author) = self.author {
            BlogFilter::Author(author)
        } else {
            BlogFilter::All
        }
    }
}

pub struct BlogService {
    blogs: Arc<dyn BlogRepository>,
    users: Arc<dyn UserRepository>,
    limits: ListingLimits,
}

impl BlogService {
    pub fn new(
        blogs: Arc<dyn BlogRepository>,
        users: Arc<dyn UserRepository>,
        limits: ListingLimits,
    ) -> Self {
        Self {
            blogs,
            users,
            limits,
        }
    }

    /// Create a post, or update the caller's post when `input.id` names one.
    /// Returns the slug.
    pub async fn create_or_update(&self, author_id: Uuid, input: BlogInput) -> DomainResult<String> {
        let slug = input.id.clone().filter(|id| !id.is_empty());
        let submission = BlogSubmission::try_from(input)?;

        match slug {
            Some(slug) => self.update(author_id, &slug, submission).await,
            None => self.create(author_id, submission).await,
        }
    }

    async fn create(&self, author_id: Uuid, submission: BlogSubmission) -> DomainResult<String> {
        let blog = Blog::new(author_id, submission);
        let publishing = blog.is_published();

        let stored = self.blogs.insert(blog).await?;
        tracing::info!(slug = %stored.slug, draft = stored.draft, "Blog created");

        if publishing {
            self.users
                .increment_counters(author_id, 1, 0)
                .await
                .map_err(|source| DomainError::CounterUpdate {
                    slug: stored.slug.clone(),
                    source,
                })?;
        }

        Ok(stored.slug)
    }

    async fn update(
        &self,
        author_id: Uuid,
        slug: &str,
        submission: BlogSubmission,
    ) -> DomainResult<String> {
        let existing = self
            .blogs
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("blog", slug))?;

        if existing.author_id != author_id {
            return Err(DomainError::forbidden("you can only edit your own blogs"));
        }

        let posts_delta = match (existing.draft, submission.is_draft()) {
            (true, false) => 1,
            (false, true) => -1,
            _ => 0,
        };

        let updated = self
            .blogs
            .update_body(existing.id, BlogUpdate::from(submission), posts_delta > 0)
            .await?;
        tracing::info!(slug = %updated.slug, draft = updated.draft, "Blog updated");

        if posts_delta != 0 {
            self.users
                .increment_counters(author_id, posts_delta, 0)
                .await
                .map_err(|source| DomainError::CounterUpdate {
                    slug: updated.slug.clone(),
                    source,
                })?;
        }

        Ok(updated.slug)
    }

    /// Fetch a post by slug, counting the read unless it is a draft or opened
    /// for editing. Drafts are only served to their author on request.
    pub async fn read(
        &self,
        slug: &str,
        viewer: Option<Uuid>,
        options: ReadOptions,
    ) -> DomainResult<BlogView> {
        let mut blog = self
            .blogs
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("blog", slug))?;

        if blog.draft && !(options.draft && viewer == Some(blog.author_id)) {
            return Err(DomainError::forbidden("you can not access draft blogs"));
        }

        let author = self
            .users
            .find_by_id(blog.author_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", blog.author_id.to_string()))?;

        if !blog.draft && !options.edit_mode {
            self.blogs.increment_reads(blog.id).await?;
            self.users.increment_counters(author.id, 0, 1).await?;
            blog.total_reads += 1;
        }

        Ok(BlogView {
            blog,
            author: author.summary(),
        })
    }

    pub async fn latest(&self, page: i64) -> DomainResult<Vec<BlogView>> {
        let query = BlogQuery::paged(
            BlogFilter::All,
            BlogSort::Latest,
            Page::new(page, self.limits.latest_page_size),
        );
        self.list(&query).await
    }

    pub async fn count_latest(&self) -> DomainResult<u64> {
        Ok(self.blogs.count(&BlogFilter::All).await?)
    }

    pub async fn trending(&self) -> DomainResult<Vec<BlogView>> {
        let query = BlogQuery {
            filter: BlogFilter::All,
            sort: BlogSort::Trending,
            skip: 0,
            limit: self.limits.trending_limit,
        };
        self.list(&query).await
    }

    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        page: i64,
        limit: Option<u64>,
    ) -> DomainResult<Vec<BlogView>> {
        let size = limit
            .filter(|l| *l > 0)
            .unwrap_or(self.limits.search_page_size)
            .min(self.limits.max_page_size);
        let query = BlogQuery::paged(criteria.filter(), BlogSort::Latest, Page::new(page, size));
        self.list(&query).await
    }

    pub async fn count_search(&self, criteria: &SearchCriteria) -> DomainResult<u64> {
        Ok(self.blogs.count(&criteria.filter()).await?)
    }

    async fn list(&self, query: &BlogQuery) -> DomainResult<Vec<BlogView>> {
        let blogs = self.blogs.list(query).await?;

        let mut author_ids: Vec<Uuid> = blogs.iter().map(|b| b.author_id).collect();
        author_ids.sort();
        author_ids.dedup();

        let authors: HashMap<Uuid, AuthorSummary> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.summary()))
            .collect();

        Ok(blogs
            .into_iter()
            .filter_map(|blog| match authors.get(&blog.author_id) {
                Some(author) => Some(BlogView {
                    author: author.clone(),
                    blog,
                }),
                None => {
                    tracing::warn!(slug = %blog.slug, "Skipping blog with missing author");
                    None
                }
            })
            .collect())
    }
}
