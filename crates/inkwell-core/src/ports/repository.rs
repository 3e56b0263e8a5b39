use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Blog, BlogFilter, BlogQuery, BlogUpdate, Notification, User};
use crate::error::RepoError;

/// Generic repository trait defining standard operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique violations surface as `RepoError::Constraint`.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;

    async fn username_exists(&self, username: &str) -> Result<bool, RepoError>;

    /// Case-insensitive username substring search.
    async fn search_by_username(&self, query: &str, limit: u64) -> Result<Vec<User>, RepoError>;

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), RepoError>;

    /// Atomically add to the aggregate counters. `RepoError::NotFound` when
    /// the user does not exist.
    async fn increment_counters(
        &self,
        id: Uuid,
        posts_delta: i64,
        reads_delta: i64,
    ) -> Result<(), RepoError>;
}

/// Blog repository.
#[async_trait]
pub trait BlogRepository: BaseRepository<Blog, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Blog>, RepoError>;

    /// Replace the editable body of a post, keeping slug and counters.
    /// Returns the stored post.
    async fn update_body(
        &self,
        id: Uuid,
        update: BlogUpdate,
        published_now: bool,
    ) -> Result<Blog, RepoError>;

    /// Atomically add one read.
    async fn increment_reads(&self, id: Uuid) -> Result<(), RepoError>;

    /// Atomically add `delta` likes and return the new total.
    async fn increment_likes(&self, id: Uuid, delta: i64) -> Result<i64, RepoError>;

    /// Non-draft posts matching the query.
    async fn list(&self, query: &BlogQuery) -> Result<Vec<Blog>, RepoError>;

    /// Number of non-draft posts matching the filter.
    async fn count(&self, filter: &BlogFilter) -> Result<u64, RepoError>;

    /// Ids of every post written by the author, drafts included.
    async fn ids_by_author(&self, author_id: Uuid) -> Result<Vec<Uuid>, RepoError>;
}

/// Notification repository.
#[async_trait]
pub trait NotificationRepository: BaseRepository<Notification, Uuid> {
    /// The like notification a user left on a post, if any.
    async fn find_like(&self, blog_id: Uuid, user_id: Uuid)
    -> Result<Option<Notification>, RepoError>;
}
