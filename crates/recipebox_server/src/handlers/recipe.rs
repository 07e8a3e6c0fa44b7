//! Recipe HTTP handlers.

use super::envelope::Envelope;
use super::run_blocking;
use crate::{error::HttpError, AppError, AppState};
use axum::{
    body::Bytes,
    http::StatusCode,
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Path, State,
    },
    Json,
};
use recipebox_core::db::TransactionOps;
use recipebox_core::models::recipe::*;
use recipebox_core::IMAGE_FIELD;
use serde::Serialize;

/// `data` of a delete response.
#[derive(Debug, Serialize)]
pub struct DeletedRecipe {
    pub id: i64,
}

/// Recipe id taken from the request path.
///
/// Ids that are not a valid `i64` cannot match any row; they are echoed back
/// as the string the client sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathId {
    Row(i64),
    Unmatched(String),
}

/// `data` of a like update response.
#[derive(Debug, Serialize)]
pub struct LikedStatus {
    pub id: PathId,
    pub liked: i64,
}

/// `data` of a favorite update response.
#[derive(Debug, Serialize)]
pub struct FavoritedStatus {
    pub id: PathId,
    pub favorited: i64,
}

struct ImageUpload {
    original_name: String,
    bytes: Bytes,
}

fn parse_recipe_id(raw: &str) -> PathId {
    match raw.trim().parse() {
        Ok(id) => PathId::Row(id),
        Err(_) => PathId::Unmatched(raw.to_string()),
    }
}

fn multipart_error(err: MultipartError) -> HttpError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text()).into()
    } else {
        AppError::BadRequest(err.body_text()).into()
    }
}

fn require_field(value: Option<String>, field: &str) -> Result<String, HttpError> {
    value.ok_or_else(|| AppError::BadRequest(format!("Missing field: {}", field)).into())
}

/// List all recipes.
///
/// # Returns
/// `{ data: [recipe...] }` with every `image` rewritten to its public URL.
///
/// # Errors
/// Returns 400 when the query fails.
pub async fn list_recipes(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<RecipeView>>>, HttpError> {
    let recipes = run_blocking(&state, |db, _| db.recipes.list()).await?;
    let base_url = state.config.public_base_url.as_str();
    let views = recipes
        .into_iter()
        .map(|recipe| RecipeView::from_recipe(recipe, base_url))
        .collect();
    Ok(Json(Envelope::data(views)))
}

/// Create a recipe from a multipart form.
///
/// Expects text fields `name`, `poster`, `ingredients`, `instructions` and one
/// file field `image`. Unknown fields are ignored.
///
/// # Returns
/// `{ message, data: recipe }` with `liked` and `favorited` at `0`.
///
/// # Errors
/// Returns 400 when a field or the file is missing, or when storage fails,
/// and 413 when a configured body limit is exceeded.
pub async fn create_recipe(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Envelope<RecipeView>>, HttpError> {
    let mut multipart = multipart.map_err(|err| AppError::BadRequest(err.body_text()))?;

    let mut name = None;
    let mut poster = None;
    let mut ingredients = None;
    let mut instructions = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => name = Some(field.text().await.map_err(multipart_error)?),
            "poster" => poster = Some(field.text().await.map_err(multipart_error)?),
            "ingredients" => ingredients = Some(field.text().await.map_err(multipart_error)?),
            "instructions" => instructions = Some(field.text().await.map_err(multipart_error)?),
            IMAGE_FIELD => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                image = Some(ImageUpload {
                    original_name,
                    bytes,
                });
            }
            other => tracing::debug!(field = other, "Ignoring unexpected multipart field"),
        }
    }

    let recipe = NewRecipe {
        name: require_field(name, "name")?,
        poster: require_field(poster, "poster")?,
        ingredients: require_field(ingredients, "ingredients")?,
        instructions: require_field(instructions, "instructions")?,
    };
    let image = image
        .ok_or_else(|| AppError::BadRequest("No image file provided".to_string()))?;

    let created = run_blocking(&state, move |db, uploads| {
        TransactionOps::create_recipe_with_image(
            db,
            uploads,
            recipe,
            &image.bytes,
            &image.original_name,
        )
    })
    .await?;

    Ok(Json(Envelope::with_message(
        "Recipe added successfully",
        RecipeView::from_recipe(created, &state.config.public_base_url),
    )))
}

/// Delete a recipe and its image.
///
/// # Returns
/// `{ message, data: { id } }`.
///
/// # Errors
/// Returns 404 when no recipe has `id` (including ids that are not integers),
/// 400 when storage fails.
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Envelope<DeletedRecipe>>, HttpError> {
    let PathId::Row(id) = parse_recipe_id(&raw_id) else {
        return Err(AppError::NotFound.into());
    };
    let deleted = run_blocking(&state, move |db, uploads| {
        TransactionOps::delete_recipe_with_image(db, uploads, id)
    })
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(Json(Envelope::with_message(
        "Recipe deleted successfully",
        DeletedRecipe { id: deleted },
    )))
}

async fn set_flag(
    state: &AppState,
    id: &PathId,
    flag: RecipeFlag,
    value: i64,
) -> Result<(), HttpError> {
    match *id {
        PathId::Row(id) => {
            run_blocking(state, move |db, _| db.recipes.set_flag(id, flag, value)).await?;
        }
        PathId::Unmatched(ref raw) => {
            tracing::debug!(id = %raw, flag = flag.column(), "Flag update matched no recipe");
        }
    }
    Ok(())
}

/// Set the `liked` flag of a recipe.
///
/// The update succeeds even if `id` does not exist or is not an integer.
///
/// # Errors
/// Returns 400 for a malformed body or when storage fails.
pub async fn update_liked(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<LikedUpdate>, JsonRejection>,
) -> Result<Json<Envelope<LikedStatus>>, HttpError> {
    let id = parse_recipe_id(&raw_id);
    let Json(update) = payload.map_err(|err| AppError::BadRequest(err.body_text()))?;
    let liked = update.liked.get();
    set_flag(&state, &id, RecipeFlag::Liked, liked).await?;

    Ok(Json(Envelope::with_message(
        "Recipe liked status updated successfully",
        LikedStatus { id, liked },
    )))
}

/// Set the `favorited` flag of a recipe.
///
/// The update succeeds even if `id` does not exist or is not an integer.
///
/// # Errors
/// Returns 400 for a malformed body or when storage fails.
pub async fn update_favorited(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<FavoritedUpdate>, JsonRejection>,
) -> Result<Json<Envelope<FavoritedStatus>>, HttpError> {
    let id = parse_recipe_id(&raw_id);
    let Json(update) = payload.map_err(|err| AppError::BadRequest(err.body_text()))?;
    let favorited = update.favorited.get();
    set_flag(&state, &id, RecipeFlag::Favorited, favorited).await?;

    Ok(Json(Envelope::with_message(
        "Recipe favorited status updated successfully",
        FavoritedStatus { id, favorited },
    )))
}

#[cfg(test)]
mod tests {
    use super::{parse_recipe_id, PathId};
    use serde_json::json;

    #[test]
    fn parse_recipe_id_keeps_non_integers_verbatim() {
        assert_eq!(parse_recipe_id("42"), PathId::Row(42));
        assert_eq!(parse_recipe_id(" 7 "), PathId::Row(7));
        assert_eq!(parse_recipe_id("abc"), PathId::Unmatched("abc".to_string()));
        assert_eq!(parse_recipe_id("1.5"), PathId::Unmatched("1.5".to_string()));
        assert_eq!(
            parse_recipe_id("99999999999999999999"),
            PathId::Unmatched("99999999999999999999".to_string())
        );
    }

    #[test]
    fn path_ids_serialize_as_given() {
        assert_eq!(serde_json::to_value(PathId::Row(3)).expect("json"), json!(3));
        assert_eq!(
            serde_json::to_value(PathId::Unmatched("abc".to_string())).expect("json"),
            json!("abc")
        );
    }
}
