//! Recipe storage operations backed by SQLite.

use crate::db::schema::RECIPE_COLUMNS;
use crate::{error::AppError, models::recipe::*};
#[cfg(test)]
use rusqlite::OptionalExtension;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

/// Accessor for the `recipes` table.
pub struct RecipeDb {
    conn: Arc<Mutex<Connection>>,
}

fn recipe_from_row(row: &Row<'_>) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: row.get(0)?,
        name: row.get(1)?,
        poster: row.get(2)?,
        ingredients: row.get(3)?,
        instructions: row.get(4)?,
        image: row.get(5)?,
        // Rows written without a flag value read back as unset.
        liked: row.get::<_, Option<i64>>(6)?.unwrap_or(0),
        favorited: row.get::<_, Option<i64>>(7)?.unwrap_or(0),
    })
}

impl RecipeDb {
    pub(crate) fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, AppError> {
        let conn = self.conn.lock().map_err(|_| {
            AppError::StorageMessage("Database connection lock poisoned".to_string())
        })?;
        Ok(f(&conn)?)
    }

    /// List every recipe in storage order.
    ///
    /// # Errors
    /// Returns an error when the query fails.
    pub fn list(&self) -> Result<Vec<Recipe>, AppError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {} FROM recipes ORDER BY id", RECIPE_COLUMNS))?;
            let recipes = stmt
                .query_map([], recipe_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(recipes)
        })
    }

    /// Fetch a recipe by id.
    ///
    /// # Returns
    /// `Ok(Some(recipe))` when found, `Ok(None)` when missing.
    #[cfg(test)]
    pub(crate) fn get(&self, id: i64) -> Result<Option<Recipe>, AppError> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM recipes WHERE id = ?1", RECIPE_COLUMNS),
                [id],
                recipe_from_row,
            )
            .optional()
        })
    }

    /// Insert a recipe row referencing an already written image.
    ///
    /// # Returns
    /// The newly assigned id.
    ///
    /// # Errors
    /// Returns an error when the insert fails.
    pub fn insert(&self, recipe: &NewRecipe, image_path: &str) -> Result<i64, AppError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO recipes (name, poster, ingredients, instructions, image) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    recipe.name,
                    recipe.poster,
                    recipe.ingredients,
                    recipe.instructions,
                    image_path
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Delete a recipe and return the image path it referenced.
    ///
    /// Lookup and deletion happen in one `DELETE ... RETURNING` statement,
    /// so two concurrent deletes of the same id cannot both observe the row.
    ///
    /// # Returns
    /// `Ok(Some(image_path))` when a row was deleted, `Ok(None)` when missing.
    pub fn delete_returning_image(&self, id: i64) -> Result<Option<String>, AppError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("DELETE FROM recipes WHERE id = ?1 RETURNING image")?;
            // Drain the statement so it runs to completion before returning.
            let images = stmt
                .query_map([id], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(images.into_iter().next())
        })
    }

    /// Set `flag` to `value` for `id`.
    ///
    /// The update is unconditional: an unknown id is not an error and leaves
    /// the table untouched.
    pub fn set_flag(&self, id: i64, flag: RecipeFlag, value: i64) -> Result<(), AppError> {
        let changed = self.with_conn(|conn| {
            conn.execute(
                &format!("UPDATE recipes SET {} = ?1 WHERE id = ?2", flag.column()),
                params![value, id],
            )
        })?;
        if changed == 0 {
            tracing::debug!(id, flag = flag.column(), "Flag update matched no recipe");
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn count(&self) -> Result<usize, AppError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| {
                row.get::<_, i64>(0)
            })
        })
        .map(|count| usize::try_from(count).unwrap_or(0))
    }
}
