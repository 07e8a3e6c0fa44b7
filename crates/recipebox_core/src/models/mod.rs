//! Data models for recipes and API payloads.

/// Recipe row, create input, and flag update payloads.
pub mod recipe;
