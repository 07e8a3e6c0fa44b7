//! Database layer and create/delete coordination for RecipeBox.

/// Recipe table operations.
pub mod recipe;
mod schema;

use crate::error::AppError;
use crate::models::recipe::{NewRecipe, Recipe};
use crate::uploads::UploadStore;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Database handle owning the single SQLite connection.
///
/// SQLite serializes writers itself; the mutex only makes the connection
/// shareable across request handlers.
pub struct Database {
    pub recipes: recipe::RecipeDb,
}


impl Database {
    /// Open the database file and ensure the `recipes` table exists.
    ///
    /// # Returns
    /// A fully initialized [`Database`].
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or the schema cannot be
    /// created.
    pub fn new(path: &str) -> Result<Self, AppError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(|err| {
            tracing::error!("Error opening database {}: {}", path, err);
            AppError::from(err)
        })?;
        Self::from_connection(conn)
    }

    #[cfg(test)]
    pub(crate) fn in_memory() -> Result<Self, AppError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, AppError> {
        if let Err(err) = schema::initialize(&conn) {
            tracing::error!("Error creating table: {}", err);
            return Err(err.into());
        }
        tracing::info!("Connected to the SQLite database");
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self {
            recipes: recipe::RecipeDb::new(conn),
        })
    }
}

/// Operations spanning both the `recipes` table and the upload directory.
///
/// SQLite cannot enlist the filesystem in a transaction, so these order the
/// two steps and undo the file step when the row step fails.
pub struct TransactionOps;

impl TransactionOps {
    /// Write the image, then insert the row referencing it.
    ///
    /// If the insert fails the freshly written file is removed again, so no
    /// unreferenced image is left behind.
    ///
    /// # Returns
    /// The stored recipe with `liked` and `favorited` at `0`.
    ///
    /// # Errors
    /// Propagates upload write errors and insert errors.
    pub fn create_recipe_with_image(
        db: &Database,
        uploads: &UploadStore,
        recipe: NewRecipe,
        image_bytes: &[u8],
        original_name: &str,
    ) -> Result<Recipe, AppError> {
        let pending = uploads.write(image_bytes, original_name)?;

        match db.recipes.insert(&recipe, &pending.stored_path()) {
            Ok(id) => {
                let image = pending.keep();
                tracing::info!("Recipe inserted successfully with ID: {}", id);
                Ok(Recipe {
                    id,
                    name: recipe.name,
                    poster: recipe.poster,
                    ingredients: recipe.ingredients,
                    instructions: recipe.instructions,
                    image,
                    liked: 0,
                    favorited: 0,
                })
            }
            Err(err) => {
                tracing::error!("Error inserting recipe: {}", err);
                pending.discard();
                Err(err)
            }
        }
    }

    /// Delete the row, then best-effort delete its image.
    ///
    /// # Returns
    /// `Ok(Some(id))` if a recipe was deleted, `Ok(None)` if not found.
    ///
    /// # Errors
    /// Propagates storage errors from the delete. Image removal failures are
    /// only logged.
    pub fn delete_recipe_with_image(
        db: &Database,
        uploads: &UploadStore,
        id: i64,
    ) -> Result<Option<i64>, AppError> {
        let Some(image) = db.recipes.delete_returning_image(id)? else {
            return Ok(None);
        };
        uploads.remove(&image);
        tracing::info!("Recipe {} deleted", id);
        Ok(Some(id))
    }
}
