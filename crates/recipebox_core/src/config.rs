//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_DB_PATH, DEFAULT_PORT, DEFAULT_UPLOAD_DIR};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Runtime configuration for RecipeBox.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub upload_dir: String,
    pub port: u16,
    /// Prefix used when rewriting stored image paths into public URLs.
    pub public_base_url: String,
    /// Request body cap in bytes. `None` accepts uploads of any size.
    pub max_upload_size: Option<usize>,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows USERPROFILE
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    None
}

/// Build the default public base URL for a listening port.
///
/// # Returns
/// `http://localhost:<port>`.
pub fn default_public_base_url(port: u16) -> String {
    format!("http://localhost:{}", port)
}

fn normalize_base_url(value: &str) -> Option<String> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or unparsable.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Self {
            db_path: env::var("DB_PATH")
                .map(expand_tilde)
                .unwrap_or_else(|_| DEFAULT_DB_PATH.to_string()),
            upload_dir: env::var("UPLOAD_DIR")
                .map(expand_tilde)
                .unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string()),
            port,
            public_base_url: env::var("PUBLIC_BASE_URL")
                .ok()
                .and_then(|url| normalize_base_url(&url))
                .unwrap_or_else(|| default_public_base_url(port)),
            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|s| s.trim().parse().ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_base_url, Config};
    use crate::env::{env_lock, EnvGuard};

    #[test]
    fn from_env_applies_defaults_when_unset() {
        let _lock = env_lock().lock().expect("env lock");
        let _guards = [
            EnvGuard::remove("PORT"),
            EnvGuard::remove("DB_PATH"),
            EnvGuard::remove("UPLOAD_DIR"),
            EnvGuard::remove("PUBLIC_BASE_URL"),
            EnvGuard::remove("MAX_UPLOAD_SIZE"),
        ];

        let config = Config::from_env();
        assert_eq!(config.port, 5000);
        assert_eq!(config.db_path, "./recipes.db");
        assert_eq!(config.upload_dir, "./uploads");
        assert_eq!(config.public_base_url, "http://localhost:5000");
        assert_eq!(config.max_upload_size, None);
    }

    #[test]
    fn max_upload_size_is_only_set_explicitly() {
        let _lock = env_lock().lock().expect("env lock");
        let _size = EnvGuard::set("MAX_UPLOAD_SIZE", " 2048 ");

        let config = Config::from_env();
        assert_eq!(config.max_upload_size, Some(2048));
    }

    #[test]
    fn public_base_url_follows_port_override() {
        let _lock = env_lock().lock().expect("env lock");
        let _port = EnvGuard::set("PORT", "8080");
        let _base = EnvGuard::remove("PUBLIC_BASE_URL");

        let config = Config::from_env();
        assert_eq!(config.port, 8080);
        assert_eq!(config.public_base_url, "http://localhost:8080");
    }

    #[test]
    fn unparsable_numbers_fall_back_to_defaults() {
        let _lock = env_lock().lock().expect("env lock");
        let _port = EnvGuard::set("PORT", "not-a-port");
        let _size = EnvGuard::set("MAX_UPLOAD_SIZE", "-1");

        let config = Config::from_env();
        assert_eq!(config.port, 5000);
        assert_eq!(config.max_upload_size, None);
    }

    #[test]
    fn explicit_paths_and_base_url_are_used() {
        let _lock = env_lock().lock().expect("env lock");
        let _db = EnvGuard::set("DB_PATH", "/var/lib/recipebox/recipes.db");
        let _uploads = EnvGuard::set("UPLOAD_DIR", "/var/lib/recipebox/uploads");
        let _base = EnvGuard::set("PUBLIC_BASE_URL", "https://recipes.example.com/");

        let config = Config::from_env();
        assert_eq!(config.db_path, "/var/lib/recipebox/recipes.db");
        assert_eq!(config.upload_dir, "/var/lib/recipebox/uploads");
        assert_eq!(config.public_base_url, "https://recipes.example.com");
    }

    #[test]
    fn normalize_base_url_rejects_blank_values() {
        assert_eq!(normalize_base_url("   "), None);
        assert_eq!(normalize_base_url("/"), None);
        assert_eq!(
            normalize_base_url(" http://host:1/ "),
            Some("http://host:1".to_string())
        );
    }
}
