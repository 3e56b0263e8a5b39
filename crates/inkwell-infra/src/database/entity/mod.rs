//! SeaORM entities.

pub mod blog;
pub mod notification;
pub mod user;
