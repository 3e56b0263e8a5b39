//! Service flows against the in-memory repositories.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use inkwell_core::domain::{BlogContent, BlogInput, Notification};
use inkwell_core::error::{DomainError, RepoError};
use inkwell_core::ports::{
    AuthError, BaseRepository, BlogRepository, ExternalProfile, IdentityVerifier,
    NotificationRepository, PasswordService, TokenClaims, TokenService,
};
use inkwell_core::service::{
    AccountService, BlogService, EngagementService, ListingLimits, ReadOptions, SearchCriteria,
    SignupInput,
};

use super::{InMemoryBlogRepository, InMemoryNotificationRepository, InMemoryUserRepository};

struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("hashed:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("hashed:{password}"))
    }
}

struct FakeTokens;

impl TokenService for FakeTokens {
    fn generate_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        Ok(format!("token-{user_id}"))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let id = token
            .strip_prefix("token-")
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| AuthError::InvalidToken(token.to_string()))?;
        Ok(TokenClaims {
            user_id: id,
            exp: 0,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        3600
    }
}

struct FakeGoogle(ExternalProfile);

#[async_trait]
impl IdentityVerifier for FakeGoogle {
    async fn verify(&self, _token: &str) -> Result<ExternalProfile, AuthError> {
        Ok(self.0.clone())
    }
}

struct Fixture {
    users: Arc<InMemoryUserRepository>,
    blogs: Arc<InMemoryBlogRepository>,
    notifications: Arc<InMemoryNotificationRepository>,
    accounts: AccountService,
    posts: BlogService,
    engagement: EngagementService,
}

fn fixture_with(limits: ListingLimits, google: Option<ExternalProfile>) -> Fixture {
    let users = Arc::new(InMemoryUserRepository::new());
    let blogs = Arc::new(InMemoryBlogRepository::new());
    let notifications = Arc::new(InMemoryNotificationRepository::new());

    let identity = google.map(|p| Arc::new(FakeGoogle(p)) as Arc<dyn IdentityVerifier>);

    Fixture {
        accounts: AccountService::new(
            users.clone(),
            blogs.clone(),
            Arc::new(PlainPasswords),
            Arc::new(FakeTokens),
            identity,
        ),
        posts: BlogService::new(blogs.clone(), users.clone(), limits),
        engagement: EngagementService::new(blogs.clone(), notifications.clone()),
        users,
        blogs,
        notifications,
    }
}

fn fixture() -> Fixture {
    fixture_with(ListingLimits::default(), None)
}

fn signup_input(email: &str) -> SignupInput {
    SignupInput {
        fullname: "Ada Lovelace".into(),
        email: email.into(),
        password: "Secret123".into(),
    }
}

fn content() -> BlogContent {
    serde_json::from_value(serde_json::json!({
        "blocks": [{"type": "paragraph", "data": {"text": "Hello there"}}]
    }))
    .unwrap()
}

fn published(title: &str, tags: &[&str]) -> BlogInput {
    BlogInput {
        title: title.into(),
        des: Some("A short description".into()),
        banner: Some("https://cdn.example.com/banner.jpeg".into()),
        content: Some(content()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..BlogInput::default()
    }
}

fn draft(title: &str) -> BlogInput {
    BlogInput {
        title: title.into(),
        draft: true,
        ..BlogInput::default()
    }
}

async fn author(fx: &Fixture, email: &str) -> Uuid {
    fx.accounts.signup(signup_input(email)).await.unwrap().user.id
}

async fn total_posts(fx: &Fixture, id: Uuid) -> i64 {
    fx.users.find_by_id(id).await.unwrap().unwrap().total_posts
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_signup_issues_token_and_rejects_duplicate_email() {
    let fx = fixture();

    let session = fx.accounts.signup(signup_input("ada@example.com")).await.unwrap();
    assert_eq!(session.user.username, "ada");
    assert_eq!(session.access_token, format!("token-{}", session.user.id));
    assert_eq!(session.expires_in, 3600);

    let err = fx
        .accounts
        .signup(signup_input("ada@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Duplicate(_)));
}

#[tokio::test]
async fn test_signup_suffixes_taken_username() {
    let fx = fixture();
    fx.accounts.signup(signup_input("ada@example.com")).await.unwrap();

    let second = fx.accounts.signup(signup_input("ada@other.org")).await.unwrap();

    assert_ne!(second.user.username, "ada");
    assert!(second.user.username.starts_with("ada"));
    assert_eq!(second.user.username.len(), "ada".len() + 5);
}

#[tokio::test]
async fn test_signup_validates_fields() {
    let fx = fixture();

    let mut weak = signup_input("ada@example.com");
    weak.password = "weak".into();
    assert!(matches!(
        fx.accounts.signup(weak).await.unwrap_err(),
        DomainError::Validation(_)
    ));

    let mut short = signup_input("ada@example.com");
    short.fullname = "Al".into();
    assert!(matches!(
        fx.accounts.signup(short).await.unwrap_err(),
        DomainError::Validation(_)
    ));
}

#[tokio::test]
async fn test_signin_rejections() {
    let fx = fixture();
    fx.accounts.signup(signup_input("ada@example.com")).await.unwrap();

    let err = fx.accounts.signin("nobody@example.com", "Secret123").await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ref m) if m == "email not found"));

    let err = fx.accounts.signin("ada@example.com", "Wrong1234").await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ref m) if m == "Incorrect password"));

    assert!(fx.accounts.signin("ada@example.com", "Secret123").await.is_ok());
}

#[tokio::test]
async fn test_change_password_then_sign_in_with_new_one() {
    let fx = fixture();
    let id = author(&fx, "ada@example.com").await;

    let err = fx
        .accounts
        .change_password(id, "Wrong1234", "Newpass99")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    fx.accounts
        .change_password(id, "Secret123", "Newpass99")
        .await
        .unwrap();

    assert!(fx.accounts.signin("ada@example.com", "Secret123").await.is_err());
    assert!(fx.accounts.signin("ada@example.com", "Newpass99").await.is_ok());
}

#[tokio::test]
async fn test_google_signin_creates_account_and_blocks_password_login() {
    let fx = fixture_with(
        ListingLimits::default(),
        Some(ExternalProfile {
            email: "grace@example.com".into(),
            name: "Grace Hopper".into(),
            picture: Some("https://lh3.googleusercontent.com/a/photo=s96-c".into()),
        }),
    );

    let session = fx.accounts.google_signin("id-token").await.unwrap();
    assert!(session.user.google_auth);
    assert!(session.user.profile_img.ends_with("s384-c"));

    // Second sign-in reuses the account.
    let again = fx.accounts.google_signin("id-token").await.unwrap();
    assert_eq!(again.user.id, session.user.id);

    let err = fx.accounts.signin("grace@example.com", "Secret123").await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ref m) if m.contains("google")));
}

#[tokio::test]
async fn test_google_signin_refuses_password_account() {
    let fx = fixture_with(
        ListingLimits::default(),
        Some(ExternalProfile {
            email: "ada@example.com".into(),
            name: "Ada".into(),
            picture: None,
        }),
    );
    author(&fx, "ada@example.com").await;

    let err = fx.accounts.google_signin("id-token").await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test]
async fn test_profile_and_user_search() {
    let fx = fixture();
    let id = author(&fx, "ada@example.com").await;
    author(&fx, "bob@example.com").await;
    fx.posts.create_or_update(id, published("One", &["rust"])).await.unwrap();
    fx.posts.create_or_update(id, draft("Two")).await.unwrap();

    let profile = fx.accounts.profile("ada").await.unwrap();
    assert_eq!(profile.blogs.len(), 2);
    assert_eq!(profile.user.total_posts, 1);

    let found = fx.accounts.search_users("AD").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].username, "ada");

    assert!(matches!(
        fx.accounts.profile("nobody").await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_published_post_counts_and_draft_does_not() {
    let fx = fixture();
    let id = author(&fx, "ada@example.com").await;

    fx.posts.create_or_update(id, draft("Draft")).await.unwrap();
    assert_eq!(total_posts(&fx, id).await, 0);

    let slug = fx
        .posts
        .create_or_update(id, published("Hello World", &["Rust"]))
        .await
        .unwrap();
    assert!(slug.starts_with("Hello-World-"));
    assert_eq!(total_posts(&fx, id).await, 1);
}

#[tokio::test]
async fn test_publishing_rejects_incomplete_post() {
    let fx = fixture();
    let id = author(&fx, "ada@example.com").await;

    let mut input = published("Hello", &[]);
    input.tags.clear();
    let err = fx.posts.create_or_update(id, input).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_update_keeps_slug_and_moves_post_counter() {
    let fx = fixture();
    let id = author(&fx, "ada@example.com").await;

    let slug = fx.posts.create_or_update(id, draft("Work in progress")).await.unwrap();

    let mut publish = published("Finished post", &["rust"]);
    publish.id = Some(slug.clone());
    let same = fx.posts.create_or_update(id, publish).await.unwrap();
    assert_eq!(same, slug);
    assert_eq!(total_posts(&fx, id).await, 1);

    let mut unpublish = draft("Back to draft");
    unpublish.id = Some(slug.clone());
    fx.posts.create_or_update(id, unpublish).await.unwrap();
    assert_eq!(total_posts(&fx, id).await, 0);

    let stored = fx.blogs.find_by_slug(&slug).await.unwrap().unwrap();
    assert_eq!(stored.title, "Back to draft");
    assert!(stored.draft);
}

#[tokio::test]
async fn test_update_of_someone_elses_post_is_forbidden() {
    let fx = fixture();
    let ada = author(&fx, "ada@example.com").await;
    let bob = author(&fx, "bob@example.com").await;

    let slug = fx.posts.create_or_update(ada, published("Mine", &["rust"])).await.unwrap();

    let mut hijack = published("Yours now", &["rust"]);
    hijack.id = Some(slug);
    let err = fx.posts.create_or_update(bob, hijack).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test]
async fn test_counter_failure_is_reported_after_post_is_stored() {
    let fx = fixture();
    // The author is never inserted, so the counter update finds nobody.
    let ghost = Uuid::new_v4();

    let err = fx
        .posts
        .create_or_update(ghost, published("Orphan", &["rust"]))
        .await
        .unwrap_err();

    let DomainError::CounterUpdate { slug, .. } = err else {
        panic!("expected CounterUpdate, got {err:?}");
    };
    assert!(fx.blogs.find_by_slug(&slug).await.unwrap().is_some());
}

#[tokio::test]
async fn test_read_counts_unless_editing() {
    let fx = fixture();
    let id = author(&fx, "ada@example.com").await;
    let slug = fx.posts.create_or_update(id, published("Read me", &["rust"])).await.unwrap();

    let view = fx.posts.read(&slug, None, ReadOptions::default()).await.unwrap();
    assert_eq!(view.blog.total_reads, 1);
    assert_eq!(view.author.username, "ada");

    let edit = ReadOptions {
        draft: false,
        edit_mode: true,
    };
    let view = fx.posts.read(&slug, Some(id), edit).await.unwrap();
    assert_eq!(view.blog.total_reads, 1);

    let user = fx.users.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(user.total_reads, 1);
}

#[tokio::test]
async fn test_drafts_are_only_served_to_their_author() {
    let fx = fixture();
    let ada = author(&fx, "ada@example.com").await;
    let bob = author(&fx, "bob@example.com").await;
    let slug = fx.posts.create_or_update(ada, draft("Secret")).await.unwrap();

    let asked = ReadOptions {
        draft: true,
        edit_mode: false,
    };

    let view = fx.posts.read(&slug, Some(ada), asked).await.unwrap();
    assert_eq!(view.blog.total_reads, 0);

    for (viewer, options) in [
        (Some(ada), ReadOptions::default()),
        (Some(bob), asked),
        (None, asked),
    ] {
        let err = fx.posts.read(&slug, viewer, options).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }
}

#[tokio::test]
async fn test_latest_pages_skip_previous_pages() {
    let limits = ListingLimits {
        latest_page_size: 3,
        ..ListingLimits::default()
    };
    let fx = fixture_with(limits, None);
    let id = author(&fx, "ada@example.com").await;

    for i in 0..7 {
        fx.posts
            .create_or_update(id, published(&format!("Post {i}"), &["rust"]))
            .await
            .unwrap();
    }
    fx.posts.create_or_update(id, draft("Hidden")).await.unwrap();

    let first = fx.posts.latest(1).await.unwrap();
    let second = fx.posts.latest(2).await.unwrap();
    let third = fx.posts.latest(3).await.unwrap();

    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 3);
    assert_eq!(third.len(), 1);
    assert!(fx.posts.latest(i64::MAX).await.unwrap().is_empty());
    assert!(second.iter().all(|v| first.iter().all(|f| f.blog.id != v.blog.id)));
    assert_eq!(fx.posts.count_latest().await.unwrap(), 7);
}

#[tokio::test]
async fn test_search_by_tag_excludes_current_post() {
    let fx = fixture();
    let id = author(&fx, "ada@example.com").await;
    let current = fx.posts.create_or_update(id, published("Current", &["rust"])).await.unwrap();
    fx.posts.create_or_update(id, published("Other", &["rust"])).await.unwrap();
    fx.posts.create_or_update(id, published("Elsewhere", &["go"])).await.unwrap();

    let criteria = SearchCriteria {
        tag: Some("Rust".into()),
        exclude: Some(current),
        ..SearchCriteria::default()
    };
    let results = fx.posts.search(&criteria, 1, Some(10)).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].blog.title, "Other");
    assert_eq!(fx.posts.count_search(&criteria).await.unwrap(), 1);
}

#[tokio::test]
async fn test_search_by_title_and_author() {
    let fx = fixture();
    let ada = author(&fx, "ada@example.com").await;
    let bob = author(&fx, "bob@example.com").await;
    fx.posts.create_or_update(ada, published("Learning Rust", &["rust"])).await.unwrap();
    fx.posts.create_or_update(bob, published("Gardening", &["life"])).await.unwrap();

    let by_title = SearchCriteria {
        query: Some("rust".into()),
        ..SearchCriteria::default()
    };
    let results = fx.posts.search(&by_title, 1, None).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].author.username, "ada");

    let by_author = SearchCriteria {
        author: Some(bob),
        ..SearchCriteria::default()
    };
    assert_eq!(fx.posts.count_search(&by_author).await.unwrap(), 1);
}

#[tokio::test]
async fn test_trending_orders_by_reads() {
    let fx = fixture();
    let id = author(&fx, "ada@example.com").await;
    let quiet = fx.posts.create_or_update(id, published("Quiet", &["a"])).await.unwrap();
    let popular = fx.posts.create_or_update(id, published("Popular", &["a"])).await.unwrap();

    for _ in 0..3 {
        fx.posts.read(&popular, None, ReadOptions::default()).await.unwrap();
    }
    fx.posts.read(&quiet, None, ReadOptions::default()).await.unwrap();

    let trending = fx.posts.trending().await.unwrap();
    assert_eq!(trending[0].blog.slug, popular);
    assert_eq!(trending[1].blog.slug, quiet);
}

// ---------------------------------------------------------------------------
// Likes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_like_toggles() {
    let fx = fixture();
    let ada = author(&fx, "ada@example.com").await;
    let bob = author(&fx, "bob@example.com").await;
    let slug = fx.posts.create_or_update(ada, published("Likeable", &["a"])).await.unwrap();
    let blog_id = fx.blogs.find_by_slug(&slug).await.unwrap().unwrap().id;

    let liked = fx.engagement.toggle_like(bob, blog_id).await.unwrap();
    assert!(liked.liked_by_user);
    assert_eq!(liked.total_likes, 1);
    assert!(fx.engagement.is_liked(bob, blog_id).await.unwrap());
    assert!(!fx.engagement.is_liked(ada, blog_id).await.unwrap());

    assert_eq!(fx.notifications.len().await, 1);

    let unliked = fx.engagement.toggle_like(bob, blog_id).await.unwrap();
    assert!(!unliked.liked_by_user);
    assert_eq!(unliked.total_likes, 0);
    assert!(!fx.engagement.is_liked(bob, blog_id).await.unwrap());
    assert!(fx.notifications.is_empty().await);
}

#[tokio::test]
async fn test_like_notifications_are_per_user() {
    let fx = fixture();
    let ada = author(&fx, "ada@example.com").await;
    let bob = author(&fx, "bob@example.com").await;
    let cy = author(&fx, "cy@example.com").await;
    let slug = fx.posts.create_or_update(ada, published("Likeable", &["a"])).await.unwrap();
    let blog_id = fx.blogs.find_by_slug(&slug).await.unwrap().unwrap().id;

    fx.engagement.toggle_like(bob, blog_id).await.unwrap();
    let both = fx.engagement.toggle_like(cy, blog_id).await.unwrap();
    assert_eq!(both.total_likes, 2);
    assert_eq!(fx.notifications.len().await, 2);

    let after = fx.engagement.toggle_like(bob, blog_id).await.unwrap();
    assert_eq!(after.total_likes, 1);
    assert_eq!(fx.notifications.len().await, 1);
    assert!(fx.engagement.is_liked(cy, blog_id).await.unwrap());
}

/// Misses every like lookup, as a toggle that lost a race would.
struct StaleLikeLookup(Arc<InMemoryNotificationRepository>);

#[async_trait]
impl BaseRepository<Notification, Uuid> for StaleLikeLookup {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, RepoError> {
        self.0.find_by_id(id).await
    }

    async fn insert(&self, notification: Notification) -> Result<Notification, RepoError> {
        self.0.insert(notification).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.0.delete(id).await
    }
}

#[async_trait]
impl NotificationRepository for StaleLikeLookup {
    async fn find_like(
        &self,
        _blog_id: Uuid,
        _user_id: Uuid,
    ) -> Result<Option<Notification>, RepoError> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_duplicate_like_insert_leaves_counter_alone() {
    let fx = fixture();
    let ada = author(&fx, "ada@example.com").await;
    let bob = author(&fx, "bob@example.com").await;
    let slug = fx.posts.create_or_update(ada, published("Likeable", &["a"])).await.unwrap();
    let blog_id = fx.blogs.find_by_slug(&slug).await.unwrap().unwrap().id;

    let first = fx.engagement.toggle_like(bob, blog_id).await.unwrap();
    assert_eq!(first.total_likes, 1);

    let stale = EngagementService::new(
        fx.blogs.clone(),
        Arc::new(StaleLikeLookup(fx.notifications.clone())),
    );
    let again = stale.toggle_like(bob, blog_id).await.unwrap();
    assert!(again.liked_by_user);
    assert_eq!(again.total_likes, 1);

    let stored = fx.blogs.find_by_id(blog_id).await.unwrap().unwrap();
    assert_eq!(stored.total_likes, 1);
    assert_eq!(fx.notifications.len().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_likes_keep_counter_and_records_in_step() {
    let fx = fixture();
    let ada = author(&fx, "ada@example.com").await;
    let bob = author(&fx, "bob@example.com").await;
    let slug = fx.posts.create_or_update(ada, published("Likeable", &["a"])).await.unwrap();
    let blog_id = fx.blogs.find_by_slug(&slug).await.unwrap().unwrap().id;

    // Both toggles may see no like and race on the insert.
    let stale = EngagementService::new(
        fx.blogs.clone(),
        Arc::new(StaleLikeLookup(fx.notifications.clone())),
    );
    let (a, b) = tokio::join!(
        stale.toggle_like(bob, blog_id),
        stale.toggle_like(bob, blog_id)
    );
    assert!(a.unwrap().liked_by_user);
    assert!(b.unwrap().liked_by_user);

    let stored = fx.blogs.find_by_id(blog_id).await.unwrap().unwrap();
    assert_eq!(fx.notifications.len().await, 1);
    assert_eq!(stored.total_likes, 1);
}

#[tokio::test]
async fn test_drafts_cannot_be_liked() {
    let fx = fixture();
    let ada = author(&fx, "ada@example.com").await;
    let slug = fx.posts.create_or_update(ada, draft("Unfinished")).await.unwrap();
    let blog_id = fx.blogs.find_by_slug(&slug).await.unwrap().unwrap().id;

    let err = fx.engagement.toggle_like(ada, blog_id).await.unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));

    let err = fx.engagement.toggle_like(ada, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
