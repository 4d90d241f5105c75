use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use grocery_common::item::{GroceryItem, ItemId, ItemPatch, NewItem};
use grocery_common::store::ItemStore;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ApiError;
use crate::file_store::{write_pretty_json, FileStore};
use crate::suggest::{SuggestError, SuggestionClient};

const ITEM_FAILED: &str = "Failed to fetch recommended item. Please try again.";
const DISH_FAILED: &str = "Failed to fetch recommended dish. Please try again.";
const INGREDIENTS_FAILED: &str = "Failed to fetch dish ingredients. Please try again.";
const IMAGE_FAILED: &str = "Failed to fetch item image. Please try again.";

pub struct AppState {
    pub items: FileStore,
    pub save_path: PathBuf,
    /// `None` when no API key is configured.
    pub suggester: Option<SuggestionClient>,
}

impl AppState {
    fn suggester(&self, message: &'static str) -> Result<&SuggestionClient, ApiError> {
        self.suggester
            .as_ref()
            .ok_or_else(|| ApiError::suggestion(message)(SuggestError::MissingKey))
    }
}

// ─── API types ───────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RemovedResponse {
    pub removed: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub suggestions_enabled: bool,
}

/// Names currently on the list, oldest first.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ListContext {
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SuggestionResponse {
    pub suggestion: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct IngredientsRequest {
    pub dish: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct IngredientsResponse {
    pub ingredients: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ImageRequest {
    pub item: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ImageResponse {
    pub url: String,
}

// ─── Persistence ─────────────────────────────────────────────────────────────

async fn save_list_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<MessageResponse>, ApiError> {
    write_pretty_json(&state.save_path, &body)
        .await
        .map_err(ApiError::SaveFailed)?;
    info!("Grocery list saved to {}", state.save_path.display());
    Ok(Json(MessageResponse {
        message: "Grocery list saved successfully".to_string(),
    }))
}

// ─── Item collection ─────────────────────────────────────────────────────────

async fn list_items_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GroceryItem>>, ApiError> {
    Ok(Json(state.items.list().await?))
}

async fn add_item_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewItem>,
) -> Result<(StatusCode, Json<GroceryItem>), ApiError> {
    let created = state.items.add(req).await?;
    info!("Added item {} ({})", created.id, created.name);
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ItemPatch>,
) -> Result<Json<GroceryItem>, ApiError> {
    state
        .items
        .update(&ItemId(id), patch)
        .await?
        .map(Json)
        .ok_or(ApiError::ItemNotFound)
}

async fn toggle_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GroceryItem>, ApiError> {
    state
        .items
        .toggle(&ItemId(id))
        .await?
        .map(Json)
        .ok_or(ApiError::ItemNotFound)
}

async fn remove_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RemovedResponse>, ApiError> {
    let id = ItemId(id);
    if !state.items.remove(&id).await? {
        return Err(ApiError::ItemNotFound);
    }
    info!("Removed item {id}");
    Ok(Json(RemovedResponse { removed: true }))
}

// ─── Suggestions ─────────────────────────────────────────────────────────────

async fn suggest_item_handler(
    State(state): State<Arc<AppState>>,
    Json(ctx): Json<ListContext>,
) -> Result<Json<SuggestionResponse>, ApiError> {
    let suggestion = state
        .suggester(ITEM_FAILED)?
        .suggest_item(&ctx.items)
        .await
        .map_err(ApiError::suggestion(ITEM_FAILED))?;
    Ok(Json(SuggestionResponse { suggestion }))
}

async fn suggest_dish_handler(
    State(state): State<Arc<AppState>>,
    Json(ctx): Json<ListContext>,
) -> Result<Json<SuggestionResponse>, ApiError> {
    let suggestion = state
        .suggester(DISH_FAILED)?
        .suggest_dish(&ctx.items)
        .await
        .map_err(ApiError::suggestion(DISH_FAILED))?;
    Ok(Json(SuggestionResponse { suggestion }))
}

async fn ingredients_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IngredientsRequest>,
) -> Result<Json<IngredientsResponse>, ApiError> {
    let ingredients = state
        .suggester(INGREDIENTS_FAILED)?
        .dish_ingredients(req.dish.trim(), &req.items)
        .await
        .map_err(ApiError::suggestion(INGREDIENTS_FAILED))?;
    Ok(Json(IngredientsResponse { ingredients }))
}

async fn image_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ImageRequest>,
) -> Result<Json<ImageResponse>, ApiError> {
    let url = state
        .suggester(IMAGE_FAILED)?
        .item_image(req.item.trim())
        .await
        .map_err(ApiError::suggestion(IMAGE_FAILED))?;
    Ok(Json(ImageResponse { url }))
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        suggestions_enabled: state.suggester.is_some(),
    })
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// API routes plus the built UI from `dist_dir`. Unknown paths get `index.html`
/// so client-side routes survive a reload.
pub fn router(state: Arc<AppState>, dist_dir: &FsPath) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    let spa = ServeDir::new(dist_dir).fallback(ServeFile::new(dist_dir.join("index.html")));

    Router::new()
        .route("/api/saveGroceryList", post(save_list_handler))
        .route("/api/items", get(list_items_handler).post(add_item_handler))
        .route(
            "/api/items/{id}",
            patch(update_item_handler).delete(remove_item_handler),
        )
        .route("/api/items/{id}/toggle", post(toggle_item_handler))
        .route("/api/suggestions/item", post(suggest_item_handler))
        .route("/api/suggestions/dish", post(suggest_dish_handler))
        .route("/api/suggestions/ingredients", post(ingredients_handler))
        .route("/api/suggestions/image", post(image_handler))
        .route("/health", get(health_handler))
        .fallback_service(spa)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
