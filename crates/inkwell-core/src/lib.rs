//! # Inkwell Core
//!
//! The domain layer of the Inkwell blogging platform.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, validation rules, ports and the services that sequence port calls.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod validation;

pub use error::{DomainError, RepoError};

/// Result alias used by the service layer.
pub type DomainResult<T> = Result<T, DomainError>;
