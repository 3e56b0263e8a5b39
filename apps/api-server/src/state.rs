//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::ports::{
    BlogRepository, CompletionService, IdentityVerifier, NotificationRepository, PasswordService,
    TokenService, UploadUrlSigner, UserRepository,
};
use inkwell_core::service::{
    AccountService, AssistService, BlogService, EngagementService, ListingLimits,
};
use inkwell_infra::auth::{Argon2PasswordService, GoogleIdentityVerifier, JwtTokenService};
use inkwell_infra::memory::{
    InMemoryBlogRepository, InMemoryNotificationRepository, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
use inkwell_infra::database::{
    DatabaseConnections, PostgresBlogRepository, PostgresNotificationRepository,
    PostgresUserRepository,
};

use crate::config::AppConfig;

/// Repository set backing the services.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub blogs: Arc<dyn BlogRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            blogs: Arc::new(InMemoryBlogRepository::new()),
            notifications: Arc::new(InMemoryNotificationRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(db: &DatabaseConnections) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(db.main.clone())),
            blogs: Arc::new(PostgresBlogRepository::new(db.main.clone())),
            notifications: Arc::new(PostgresNotificationRepository::new(db.main.clone())),
        }
    }
}

/// External services the application talks to. Optional ones are `None`
/// when not configured and their routes answer with an error.
pub struct Adapters {
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub identity: Option<Arc<dyn IdentityVerifier>>,
    pub completion: Option<Arc<dyn CompletionService>>,
    pub uploads: Option<Arc<dyn UploadUrlSigner>>,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub blogs: Arc<BlogService>,
    pub engagement: Arc<EngagementService>,
    pub assist: Option<Arc<AssistService>>,
    pub uploads: Option<Arc<dyn UploadUrlSigner>>,
    pub tokens: Arc<dyn TokenService>,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let (db, repos) = match &config.database {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let repos = Repositories::postgres(&connections);
                    (Some(Arc::new(connections)), repos)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    (None, Repositories::in_memory())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (None, Repositories::in_memory())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            Repositories::in_memory()
        };

        let identity: Option<Arc<dyn IdentityVerifier>> =
            match GoogleIdentityVerifier::new(config.google.clone()) {
                Ok(verifier) => Some(Arc::new(verifier)),
                Err(e) => {
                    tracing::error!("Google sign-in unavailable: {}", e);
                    None
                }
            };

        let adapters = Adapters {
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
            identity,
            completion: Self::completion(config),
            uploads: Self::uploads(config),
        };

        tracing::info!("Application state initialized");

        #[cfg_attr(not(feature = "postgres"), allow(unused_mut))]
        let mut state = Self::build(repos, adapters, ListingLimits::default());
        #[cfg(feature = "postgres")]
        {
            state.db = db;
        }
        state
    }

    /// Wire services over the given repositories and adapters.
    pub fn build(repos: Repositories, adapters: Adapters, limits: ListingLimits) -> Self {
        let accounts = AccountService::new(
            repos.users.clone(),
            repos.blogs.clone(),
            adapters.passwords,
            adapters.tokens.clone(),
            adapters.identity,
        );
        let blogs = BlogService::new(repos.blogs.clone(), repos.users.clone(), limits);
        let engagement = EngagementService::new(repos.blogs, repos.notifications);

        Self {
            accounts: Arc::new(accounts),
            blogs: Arc::new(blogs),
            engagement: Arc::new(engagement),
            assist: adapters
                .completion
                .map(|completion| Arc::new(AssistService::new(completion))),
            uploads: adapters.uploads,
            tokens: adapters.tokens,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    #[cfg(feature = "assist")]
    fn completion(config: &AppConfig) -> Option<Arc<dyn CompletionService>> {
        use inkwell_infra::assist::OpenAiCompletionService;

        let Some(assist_config) = config.assist.clone() else {
            tracing::warn!("OPENAI_API_KEY not set. Tag and summary generation disabled.");
            return None;
        };
        match OpenAiCompletionService::new(assist_config) {
            Ok(service) => Some(Arc::new(service)),
            Err(e) => {
                tracing::error!("Completion client unavailable: {}", e);
                None
            }
        }
    }

    #[cfg(not(feature = "assist"))]
    fn completion(_config: &AppConfig) -> Option<Arc<dyn CompletionService>> {
        None
    }

    #[cfg(feature = "storage")]
    fn uploads(config: &AppConfig) -> Option<Arc<dyn UploadUrlSigner>> {
        use inkwell_infra::storage::S3UploadSigner;

        let Some(storage_config) = config.storage.clone() else {
            tracing::warn!("AWS bucket or credentials not set. Image uploads disabled.");
            return None;
        };
        match S3UploadSigner::new(storage_config) {
            Ok(signer) => Some(Arc::new(signer)),
            Err(e) => {
                tracing::error!("Upload signer unavailable: {}", e);
                None
            }
        }
    }

    #[cfg(not(feature = "storage"))]
    fn uploads(_config: &AppConfig) -> Option<Arc<dyn UploadUrlSigner>> {
        None
    }
}
