//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use inkwell_core::domain::{
    Blog, BlogFilter, BlogQuery, BlogSort, BlogUpdate, Notification, NotificationKind, User,
};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{BlogRepository, NotificationRepository, UserRepository};

use super::entity::blog::{self, Entity as BlogEntity, content_to_json};
use super::entity::notification::{self, Entity as NotificationEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL blog repository.
pub type PostgresBlogRepository = PostgresBaseRepository<BlogEntity>;

/// PostgreSQL notification repository.
pub type PostgresNotificationRepository = PostgresBaseRepository<NotificationEntity>;

/// `%query%` with LIKE wildcards in the query escaped, lowercased for
/// matching against `lower(column)`.
fn contains_pattern(query: &str) -> String {
    let escaped = query
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.len() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, RepoError> {
        let count = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }

    async fn search_by_username(&self, query: &str, limit: u64) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(user::Column::Username)))
                    .like(contains_pattern(query)),
            )
            .order_by_asc(user::Column::Username)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), RepoError> {
        let result = UserEntity::update_many()
            .col_expr(
                user::Column::PasswordHash,
                Expr::value(Some(password_hash.to_string())),
            )
            .col_expr(
                user::Column::UpdatedAt,
                Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(Utc::now())),
            )
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn increment_counters(
        &self,
        id: Uuid,
        posts_delta: i64,
        reads_delta: i64,
    ) -> Result<(), RepoError> {
        let result = UserEntity::update_many()
            .col_expr(
                user::Column::TotalPosts,
                Expr::col(user::Column::TotalPosts).add(posts_delta),
            )
            .col_expr(
                user::Column::TotalReads,
                Expr::col(user::Column::TotalReads).add(reads_delta),
            )
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// Restrict a select to the non-draft posts a filter covers.
fn apply_filter(select: Select<BlogEntity>, filter: &BlogFilter) -> Select<BlogEntity> {
    let mut condition = Condition::all().add(blog::Column::Draft.eq(false));

    condition = match filter {
        BlogFilter::All => condition,
        BlogFilter::Tag { tag, exclude } => {
            let condition = condition.add(Expr::cust_with_values("$1 = ANY(tags)", [tag.clone()]));
            match exclude {
                Some(slug) => condition.add(blog::Column::Slug.ne(slug.clone())),
                None => condition,
            }
        }
        BlogFilter::Title(query) => condition.add(
            Expr::expr(Func::lower(Expr::col(blog::Column::Title))).like(contains_pattern(query)),
        ),
        BlogFilter::Author(author_id) => condition.add(blog::Column::AuthorId.eq(*author_id)),
    };

    select.filter(condition)
}

fn apply_sort(select: Select<BlogEntity>, sort: BlogSort) -> Select<BlogEntity> {
    match sort {
        BlogSort::Latest => select.order_by_desc(blog::Column::PublishedAt),
        BlogSort::Trending => select
            .order_by_desc(blog::Column::TotalReads)
            .order_by_desc(blog::Column::TotalLikes)
            .order_by_desc(blog::Column::PublishedAt),
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Blog>, RepoError> {
        let result = BlogEntity::find()
            .filter(blog::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn update_body(
        &self,
        id: Uuid,
        update: BlogUpdate,
        published_now: bool,
    ) -> Result<Blog, RepoError> {
        let model = BlogEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let now = Utc::now();
        // Counters stay unchanged so concurrent increments are kept.
        let mut active: blog::ActiveModel = model.into();
        active.title = Set(update.title);
        active.des = Set(update.des);
        active.banner = Set(update.banner);
        active.content = Set(content_to_json(&update.content));
        active.tags = Set(update.tags);
        active.draft = Set(update.draft);
        active.updated_at = Set(now.into());
        if published_now {
            active.published_at = Set(now.into());
        }

        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn increment_reads(&self, id: Uuid) -> Result<(), RepoError> {
        let result = BlogEntity::update_many()
            .col_expr(
                blog::Column::TotalReads,
                Expr::col(blog::Column::TotalReads).add(1),
            )
            .filter(blog::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn increment_likes(&self, id: Uuid, delta: i64) -> Result<i64, RepoError> {
        let updated = BlogEntity::update_many()
            .col_expr(
                blog::Column::TotalLikes,
                Expr::col(blog::Column::TotalLikes).add(delta),
            )
            .filter(blog::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        updated
            .first()
            .map(|model| model.total_likes)
            .ok_or(RepoError::NotFound)
    }

    async fn list(&self, query: &BlogQuery) -> Result<Vec<Blog>, RepoError> {
        let select = apply_sort(apply_filter(BlogEntity::find(), &query.filter), query.sort);

        let result = select
            .offset(query.skip)
            .limit(query.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &BlogFilter) -> Result<u64, RepoError> {
        apply_filter(BlogEntity::find(), filter)
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn ids_by_author(&self, author_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        BlogEntity::find()
            .select_only()
            .column(blog::Column::Id)
            .filter(blog::Column::AuthorId.eq(author_id))
            .order_by_desc(blog::Column::PublishedAt)
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn find_like(
        &self,
        blog_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Notification>, RepoError> {
        let result = NotificationEntity::find()
            .filter(notification::Column::Kind.eq(NotificationKind::Like.as_str()))
            .filter(notification::Column::BlogId.eq(blog_id))
            .filter(notification::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}
