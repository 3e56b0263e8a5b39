//! # Inkwell Client
//!
//! Client-side pieces of the Inkwell blogging platform: the block editor's
//! state machine and a typed HTTP client for the API. State is owned by the
//! caller and passed explicitly.

pub mod api;
pub mod editor;
pub mod error;

pub use api::{ApiClient, Session};
pub use editor::{EditorError, EditorMode, EditorStore};
pub use error::ClientError;
