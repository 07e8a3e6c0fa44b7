//! Shared test-only helpers for recipebox_core.

use crate::models::recipe::NewRecipe;
use crate::{Database, UploadStore};
use tempfile::TempDir;

/// Creates an isolated database file and upload directory.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
///
/// # Panics
/// Panics if temp-dir creation or database initialization fails.
pub(crate) fn setup_temp_store() -> (Database, UploadStore, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("recipes.db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    let uploads = UploadStore::new(temp_dir.path().join("uploads"));
    (db, uploads, temp_dir)
}

pub(crate) fn new_recipe(name: &str) -> NewRecipe {
    NewRecipe {
        name: name.to_string(),
        poster: "Alice".to_string(),
        ingredients: "water,salt".to_string(),
        instructions: "boil".to_string(),
    }
}

/// Number of files currently in the upload directory (0 if it is missing).
pub(crate) fn upload_file_count(uploads: &UploadStore) -> usize {
    std::fs::read_dir(uploads.dir())
        .map(|entries| entries.count())
        .unwrap_or(0)
}
