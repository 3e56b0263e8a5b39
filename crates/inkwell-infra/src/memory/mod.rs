//! In-memory repositories - used when no database is configured and in tests.
//!
//! Data is lost on process restart.

mod repository;

pub use repository::{InMemoryBlogRepository, InMemoryNotificationRepository, InMemoryUserRepository};

#[cfg(test)]
mod tests;
