use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::{
    Blog, BlogFilter, BlogQuery, BlogSort, BlogUpdate, Notification, NotificationKind, User,
};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{BaseRepository, BlogRepository, NotificationRepository, UserRepository};

/// In-memory user store keyed by id. Email and username are unique.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;
        if store
            .values()
            .any(|u| u.email == user.email || u.username == user.username || u.id == user.id)
        {
            return Err(RepoError::Constraint("users_email_or_username_key".into()));
        }
        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let store = self.store.read().await;
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().any(|u| u.username == username))
    }

    async fn search_by_username(&self, query: &str, limit: u64) -> Result<Vec<User>, RepoError> {
        let needle = query.to_lowercase();
        let store = self.store.read().await;

        let mut users: Vec<User> = store
            .values()
            .filter(|u| u.username.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users.truncate(limit as usize);
        Ok(users)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let user = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        user.password_hash = Some(password_hash.to_string());
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn increment_counters(
        &self,
        id: Uuid,
        posts_delta: i64,
        reads_delta: i64,
    ) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let user = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        user.total_posts += posts_delta;
        user.total_reads += reads_delta;
        Ok(())
    }
}

/// In-memory blog store keyed by id. Slugs are unique.
#[derive(Default)]
pub struct InMemoryBlogRepository {
    store: RwLock<HashMap<Uuid, Blog>>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_filter(blog: &Blog, filter: &BlogFilter) -> bool {
    if blog.draft {
        return false;
    }
    match filter {
        BlogFilter::All => true,
        BlogFilter::Tag { tag, exclude } => {
            blog.tags.iter().any(|t| t == tag) && exclude.as_deref() != Some(blog.slug.as_str())
        }
        BlogFilter::Title(query) => blog.title.to_lowercase().contains(&query.to_lowercase()),
        BlogFilter::Author(author_id) => blog.author_id == *author_id,
    }
}

fn sort_blogs(blogs: &mut [Blog], sort: BlogSort) {
    match sort {
        BlogSort::Latest => blogs.sort_by(|a, b| {
            b.published_at.cmp(&a.published_at).then(a.id.cmp(&b.id))
        }),
        BlogSort::Trending => blogs.sort_by(|a, b| {
            b.total_reads
                .cmp(&a.total_reads)
                .then(b.total_likes.cmp(&a.total_likes))
                .then(b.published_at.cmp(&a.published_at))
                .then(a.id.cmp(&b.id))
        }),
    }
}

#[async_trait]
impl BaseRepository<Blog, Uuid> for InMemoryBlogRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, blog: Blog) -> Result<Blog, RepoError> {
        let mut store = self.store.write().await;
        if store.values().any(|b| b.slug == blog.slug || b.id == blog.id) {
            return Err(RepoError::Constraint("blogs_slug_key".into()));
        }
        store.insert(blog.id, blog.clone());
        Ok(blog)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Blog>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|b| b.slug == slug).cloned())
    }

    async fn update_body(
        &self,
        id: Uuid,
        update: BlogUpdate,
        published_now: bool,
    ) -> Result<Blog, RepoError> {
        let mut store = self.store.write().await;
        let blog = store.get_mut(&id).ok_or(RepoError::NotFound)?;

        let now = Utc::now();
        blog.title = update.title;
        blog.des = update.des;
        blog.banner = update.banner;
        blog.content = update.content;
        blog.tags = update.tags;
        blog.draft = update.draft;
        blog.updated_at = now;
        if published_now {
            blog.published_at = now;
        }
        Ok(blog.clone())
    }

    async fn increment_reads(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let blog = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        blog.total_reads += 1;
        Ok(())
    }

    async fn increment_likes(&self, id: Uuid, delta: i64) -> Result<i64, RepoError> {
        let mut store = self.store.write().await;
        let blog = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        blog.total_likes += delta;
        Ok(blog.total_likes)
    }

    async fn list(&self, query: &BlogQuery) -> Result<Vec<Blog>, RepoError> {
        let store = self.store.read().await;
        let mut blogs: Vec<Blog> = store
            .values()
            .filter(|b| matches_filter(b, &query.filter))
            .cloned()
            .collect();
        sort_blogs(&mut blogs, query.sort);

        Ok(blogs
            .into_iter()
            .skip(query.skip as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn count(&self, filter: &BlogFilter) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().filter(|b| matches_filter(b, filter)).count() as u64)
    }

    async fn ids_by_author(&self, author_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let store = self.store.read().await;
        let mut blogs: Vec<&Blog> = store.values().filter(|b| b.author_id == author_id).collect();
        blogs.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(blogs.into_iter().map(|b| b.id).collect())
    }
}

/// In-memory notification store. `(kind, blog_id, user_id)` is unique.
#[derive(Default)]
pub struct InMemoryNotificationRepository {
    store: RwLock<HashMap<Uuid, Notification>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored notifications.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BaseRepository<Notification, Uuid> for InMemoryNotificationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, notification: Notification) -> Result<Notification, RepoError> {
        let mut store = self.store.write().await;
        let duplicate = store.values().any(|n| {
            n.kind == notification.kind
                && n.blog_id == notification.blog_id
                && n.user_id == notification.user_id
        });
        if duplicate {
            return Err(RepoError::Constraint("notifications_kind_blog_user_key".into()));
        }
        store.insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn find_like(
        &self,
        blog_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Notification>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .find(|n| {
                n.kind == NotificationKind::Like
                    && n.blog_id == blog_id
                    && n.user_id == user_id
            })
            .cloned())
    }
}
