//! Core domain library for RecipeBox (config, storage, uploads, models).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// SQLite access layer and create/delete coordination.
pub mod db;
/// Process-global environment mutation helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Data models for API requests and persistence.
pub mod models;
/// Upload directory management.
pub mod uploads;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::{DEFAULT_PORT, IMAGE_FIELD, UPLOADS_ROUTE};
pub use db::Database;
pub use error::AppError;
pub use uploads::UploadStore;
