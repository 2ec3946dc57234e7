//! Quote collection routes.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use quotebook_engine::{Quote, EXPORT_FILE_NAME};

use crate::error::Result;
use crate::handlers::{
    handle_add, handle_categories, handle_delete, handle_export, handle_get_filter,
    handle_import, handle_list, handle_random, handle_set_filter, handle_update, CategoryQuery,
    FilterBody, ImportResponse, QuoteInput,
};
use crate::AppState;

/// Create quote routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quotes", get(list_handler).post(add_handler))
        .route("/quotes/random", get(random_handler))
        .route("/quotes/{id}", put(update_handler).delete(delete_handler))
        .route("/categories", get(categories_handler))
        .route("/filter", get(get_filter_handler).put(set_filter_handler))
        .route("/export", get(export_handler))
        .route("/import", post(import_handler))
}

/// GET /quotes - List quotes, optionally by category.
async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<Quote>>> {
    Ok(Json(handle_list(&state, query).await?))
}

/// POST /quotes - Add a quote.
async fn add_handler(
    State(state): State<AppState>,
    Json(input): Json<QuoteInput>,
) -> Result<(StatusCode, Json<Quote>)> {
    let quote = handle_add(&state, input).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

/// GET /quotes/random - Pick a random quote.
async fn random_handler(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Quote>> {
    Ok(Json(handle_random(&state, query).await?))
}

/// PUT /quotes/{id} - Edit a quote.
async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<QuoteInput>,
) -> Result<Json<Quote>> {
    Ok(Json(handle_update(&state, &id, input).await?))
}

/// DELETE /quotes/{id} - Delete a quote.
async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Quote>> {
    Ok(Json(handle_delete(&state, &id).await?))
}

/// GET /categories - Distinct categories.
async fn categories_handler(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(handle_categories(&state).await)
}

/// GET /filter - Saved category filter.
async fn get_filter_handler(State(state): State<AppState>) -> Result<Json<FilterBody>> {
    Ok(Json(handle_get_filter(&state).await?))
}

/// PUT /filter - Save the category filter.
async fn set_filter_handler(
    State(state): State<AppState>,
    Json(body): Json<FilterBody>,
) -> Result<Json<FilterBody>> {
    Ok(Json(handle_set_filter(&state, body).await?))
}

/// GET /export - Download every quote as a JSON file.
async fn export_handler(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = handle_export(&state).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        body,
    ))
}

/// POST /import - Append quotes from an uploaded JSON file.
async fn import_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportResponse>> {
    Ok(Json(handle_import(&state, &body).await?))
}
