//! Shared constants used across RecipeBox crates.

/// Default API port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default SQLite database file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "./recipes.db";

/// Default upload directory, relative to the working directory.
pub const DEFAULT_UPLOAD_DIR: &str = "./uploads";

/// Public path prefix under which uploaded images are served.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Multipart field carrying the recipe image.
pub const IMAGE_FIELD: &str = "image";
