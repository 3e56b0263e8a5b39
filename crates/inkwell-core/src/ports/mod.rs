//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod completion;
mod repository;
mod storage;

pub use auth::{AuthError, ExternalProfile, IdentityVerifier, PasswordService, TokenClaims, TokenService};
pub use completion::{CompletionError, CompletionService};
pub use repository::{BaseRepository, BlogRepository, NotificationRepository, UserRepository};
pub use storage::{StorageError, UploadUrlSigner};
