use crate::uploads::public_url;
use serde::{Deserialize, Serialize};

/// A persisted row of the `recipes` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub poster: String,
    pub ingredients: String,
    pub instructions: String,
    /// Server-local path of the uploaded image.
    pub image: String,
    pub liked: i64,
    pub favorited: i64,
}

/// Text fields supplied when creating a recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRecipe {
    pub name: String,
    pub poster: String,
    pub ingredients: String,
    pub instructions: String,
}

/// A recipe as returned to clients, with `image` rewritten to a public URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeView {
    pub id: i64,
    pub name: String,
    pub poster: String,
    pub ingredients: String,
    pub instructions: String,
    pub image: String,
    pub liked: i64,
    pub favorited: i64,
}

impl RecipeView {
    /// Build the client view of `recipe` under `base_url`.
    pub fn from_recipe(recipe: Recipe, base_url: &str) -> Self {
        Self {
            image: public_url(base_url, &recipe.image),
            id: recipe.id,
            name: recipe.name,
            poster: recipe.poster,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            liked: recipe.liked,
            favorited: recipe.favorited,
        }
    }
}

/// The two client-settable flag columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeFlag {
    Liked,
    Favorited,
}

impl RecipeFlag {
    /// Column name in the `recipes` table, also used as the JSON field name.
    pub fn column(self) -> &'static str {
        match self {
            RecipeFlag::Liked => "liked",
            RecipeFlag::Favorited => "favorited",
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlagValue {
    Int(i64),
    Bool(bool),
}

/// Flag value as sent by clients: an integer stored verbatim, or a boolean
/// mapped to `1`/`0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFlagValue")]
pub struct FlagValue(i64);

impl FlagValue {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<RawFlagValue> for FlagValue {
    fn from(raw: RawFlagValue) -> Self {
        match raw {
            RawFlagValue::Int(value) => Self(value),
            RawFlagValue::Bool(value) => Self(i64::from(value)),
        }
    }
}

/// Body of `PUT /api/recipes/:id/like`.
#[derive(Debug, Deserialize)]
pub struct LikedUpdate {
    pub liked: FlagValue,
}

/// Body of `PUT /api/recipes/:id/favorite`.
#[derive(Debug, Deserialize)]
pub struct FavoritedUpdate {
    pub favorited: FlagValue,
}
