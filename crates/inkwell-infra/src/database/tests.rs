use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use inkwell_core::domain::{Blog, BlogFilter, BlogQuery, BlogSort, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{BaseRepository, BlogRepository, UserRepository};

use crate::database::entity::{blog, user};
use crate::database::postgres_repo::{PostgresBlogRepository, PostgresUserRepository};

fn user_model(id: Uuid, username: &str) -> user::Model {
    let now = Utc::now();
    user::Model {
        id,
        fullname: "Ada Lovelace".to_owned(),
        email: format!("{username}@example.com"),
        password_hash: Some("hash".to_owned()),
        username: username.to_owned(),
        profile_img: "https://img".to_owned(),
        bio: String::new(),
        social_links: serde_json::json!({"github": "https://github.com/ada"}),
        google_auth: false,
        total_posts: 2,
        total_reads: 10,
        joined_at: now.into(),
        updated_at: now.into(),
    }
}

fn blog_model(id: Uuid, author_id: Uuid, total_likes: i64) -> blog::Model {
    let now = Utc::now();
    blog::Model {
        id,
        slug: "hello-world-abc123def456".to_owned(),
        author_id,
        title: "Hello World".to_owned(),
        des: "A first post".to_owned(),
        banner: "https://banner".to_owned(),
        content: serde_json::json!({
            "blocks": [{"type": "paragraph", "data": {"text": "Hi"}}]
        }),
        tags: vec!["rust".to_owned()],
        draft: false,
        total_reads: 3,
        total_likes,
        published_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_user_by_id_maps_social_links() {
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(user_id, "ada")]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let user: User = repo.find_by_id(user_id).await.unwrap().unwrap();

    assert_eq!(user.username, "ada");
    assert_eq!(user.social_links.github, "https://github.com/ada");
    assert_eq!(user.total_posts, 2);
}

#[tokio::test]
async fn test_find_blog_by_slug_maps_content() {
    let blog_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![blog_model(blog_id, Uuid::new_v4(), 0)]])
        .into_connection();

    let repo = PostgresBlogRepository::new(db);
    let blog: Blog = repo
        .find_by_slug("hello-world-abc123def456")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(blog.id, blog_id);
    assert_eq!(blog.content.blocks.len(), 1);
    assert_eq!(blog.tags, vec!["rust"]);
}

#[tokio::test]
async fn test_increment_likes_returns_new_total() {
    let blog_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![blog_model(blog_id, Uuid::new_v4(), 8)]])
        .into_connection();

    let repo = PostgresBlogRepository::new(db);

    assert_eq!(repo.increment_likes(blog_id, 1).await.unwrap(), 8);
}

#[tokio::test]
async fn test_increment_counters_missing_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let result = repo.increment_counters(Uuid::new_v4(), 1, 0).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_list_sends_paging_to_database() {
    let author_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            blog_model(Uuid::new_v4(), author_id, 1),
            blog_model(Uuid::new_v4(), author_id, 0),
        ]])
        .into_connection();

    let repo = PostgresBlogRepository::new(db);
    let query = BlogQuery {
        filter: BlogFilter::Tag {
            tag: "rust".into(),
            exclude: None,
        },
        sort: BlogSort::Trending,
        skip: 3,
        limit: 3,
    };
    let blogs = repo.list(&query).await.unwrap();
    assert_eq!(blogs.len(), 2);

    let log = repo.db.into_transaction_log();
    let sql = format!("{:?}", log[0]);
    assert!(sql.contains("ANY(tags)"));
    assert!(sql.contains("LIMIT"));
    assert!(sql.contains("OFFSET"));
}
