//! # Inkwell Infrastructure
//!
//! Concrete implementations of the ports defined in `inkwell-core`.
//! This crate contains the database, identity, object storage and
//! language-model integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication and Google sign-in
//! - `storage` - Presigned S3 upload URLs
//! - `assist` - OpenAI-compatible chat completions

pub mod database;
pub mod memory;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "storage")]
pub mod storage;

#[cfg(feature = "assist")]
pub mod assist;

// Re-exports - In-Memory
pub use memory::{InMemoryBlogRepository, InMemoryNotificationRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, GoogleIdentityVerifier, JwtConfig, JwtTokenService};

#[cfg(feature = "storage")]
pub use storage::{S3Config, S3UploadSigner};

#[cfg(feature = "assist")]
pub use assist::{OpenAiCompletionService, OpenAiConfig};
