//! `recipes` table definition.

use rusqlite::Connection;

/// Idempotent schema for the single `recipes` table. No migrations are run.
pub(crate) const CREATE_RECIPES_TABLE: &str = "CREATE TABLE IF NOT EXISTS recipes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    poster TEXT NOT NULL,
    ingredients TEXT NOT NULL,
    instructions TEXT NOT NULL,
    image TEXT NOT NULL,
    liked INTEGER DEFAULT 0,
    favorited INTEGER DEFAULT 0
)";

/// Column list shared by every row-returning query.
pub(crate) const RECIPE_COLUMNS: &str =
    "id, name, poster, ingredients, instructions, image, liked, favorited";

pub(crate) fn initialize(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_RECIPES_TABLE)
}
