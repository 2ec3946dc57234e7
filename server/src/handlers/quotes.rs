//! Quote handlers - the operations behind the quote API.
//!
//! Local state is always updated first. Remote writes happen afterwards,
//! outside the store lock, and only flip the quote's `synced` flag.

use quotebook_engine::{export_json, parse_import, Error as EngineError, Quote, QuoteStore};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::remote::RemoteError;
use crate::{now_millis, AppState};

/// Optional category narrowing for list and random.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    /// Category to filter by; empty means all, absent means the saved filter
    pub category: Option<String>,
}

/// Body for adding or editing a quote.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteInput {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub category: String,
}

/// The saved category filter.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FilterBody {
    #[serde(default)]
    pub category: Option<String>,
}

/// Response for an import.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    /// Quotes appended by this import
    pub imported: usize,
    /// Store size afterwards
    pub total: usize,
}

fn effective_category(store: &QuoteStore, requested: Option<String>) -> Result<Option<String>> {
    match requested {
        Some(category) if category.trim().is_empty() => Ok(None),
        Some(category) => Ok(Some(category)),
        None => Ok(store.selected_category()?),
    }
}

/// List quotes, narrowed by category.
pub async fn handle_list(state: &AppState, query: CategoryQuery) -> Result<Vec<Quote>> {
    let store = state.store.lock().await;
    let category = effective_category(&store, query.category)?;
    Ok(store
        .filter(category.as_deref())
        .into_iter()
        .cloned()
        .collect())
}

/// Pick a random quote.
pub async fn handle_random(state: &AppState, query: CategoryQuery) -> Result<Quote> {
    let store = state.store.lock().await;
    let category = effective_category(&store, query.category)?;

    let mut rng = rand::rng();
    store
        .random(category.as_deref(), &mut rng)
        .cloned()
        .ok_or_else(|| AppError::NotFound("No quotes available.".to_string()))
}

/// Add a user-submitted quote and echo it to the remote.
pub async fn handle_add(state: &AppState, input: QuoteInput) -> Result<Quote> {
    let quote = {
        let mut store = state.store.lock().await;
        match store.add(&input.text, &input.category, now_millis()) {
            Ok(quote) => quote.clone(),
            Err(e) => {
                if matches!(e, EngineError::EmptyText | EngineError::EmptyCategory) {
                    state
                        .conn_manager
                        .error("Please enter both a quote and a category.");
                }
                return Err(e.into());
            }
        }
    };

    tracing::info!(id = %quote.id, category = %quote.category, "Quote added");
    state.conn_manager.success("Quote added successfully!");

    let pushed = state.remote.create(&quote).await;
    Ok(record_push(state, quote, pushed, "save quote to").await)
}

/// Edit an existing quote.
pub async fn handle_update(state: &AppState, id: &str, input: QuoteInput) -> Result<Quote> {
    let quote = {
        let mut store = state.store.lock().await;
        store
            .update(id, &input.text, &input.category, now_millis())?
            .clone()
    };

    state.conn_manager.success("Quote updated");

    match quote.remote_id() {
        Some(remote_id) => {
            let pushed = state.remote.update(remote_id, &quote).await;
            Ok(record_push(state, quote, pushed, "update quote on").await)
        }
        None => Ok(quote),
    }
}

/// Delete a quote remotely (when it has a remote counterpart) and locally.
///
/// A failed remote delete keeps the local copy so the user can retry.
pub async fn handle_delete(state: &AppState, id: &str) -> Result<Quote> {
    let quote = state
        .store
        .lock()
        .await
        .get(id)
        .cloned()
        .ok_or_else(|| EngineError::QuoteNotFound(id.to_string()))?;

    if let Some(remote_id) = quote.remote_id() {
        if let Err(e) = state.remote.delete(remote_id).await {
            tracing::warn!(id, "Remote delete failed: {}", e);
            state.conn_manager.error("Failed to delete quote on server");
            return Err(e.into());
        }
    }

    // A concurrent delete of the same quote may have finished first
    let removed = match state.store.lock().await.remove(id) {
        Ok(removed) => removed,
        Err(EngineError::QuoteNotFound(_)) => {
            tracing::debug!(id, "Quote already deleted");
            return Ok(quote);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(id, "Quote deleted");
    state.conn_manager.success("Quote deleted");

    Ok(removed)
}

/// Distinct categories in first-appearance order.
pub async fn handle_categories(state: &AppState) -> Vec<String> {
    let store = state.store.lock().await;
    store.categories().into_iter().map(str::to_string).collect()
}

/// Read the saved category filter.
pub async fn handle_get_filter(state: &AppState) -> Result<FilterBody> {
    let store = state.store.lock().await;
    Ok(FilterBody {
        category: store.selected_category()?,
    })
}

/// Save the category filter; an empty or absent category clears it.
pub async fn handle_set_filter(state: &AppState, body: FilterBody) -> Result<FilterBody> {
    let mut store = state.store.lock().await;
    store.set_selected_category(body.category.as_deref())?;
    Ok(FilterBody {
        category: store.selected_category()?,
    })
}

/// Serialize every quote for download.
pub async fn handle_export(state: &AppState) -> Result<String> {
    let store = state.store.lock().await;
    Ok(export_json(store.all())?)
}

/// Append the quotes found in an import file.
pub async fn handle_import(state: &AppState, body: &str) -> Result<ImportResponse> {
    let quotes = match parse_import(body) {
        Ok(quotes) => quotes,
        Err(e) => {
            tracing::warn!("Import rejected: {}", e);
            state
                .conn_manager
                .error("Error importing quotes. Please check the file format.");
            return Err(e.into());
        }
    };

    let (imported, total) = {
        let mut store = state.store.lock().await;
        let imported = store.import(quotes, now_millis())?;
        (imported, store.len())
    };

    tracing::info!(imported, total, "Quotes imported");
    state.conn_manager.success("Quotes imported successfully!");

    Ok(ImportResponse { imported, total })
}

/// Flip `synced` on the stored copy according to a remote write result.
async fn record_push(
    state: &AppState,
    quote: Quote,
    pushed: std::result::Result<(), RemoteError>,
    action: &str,
) -> Quote {
    let synced = match pushed {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(id = %quote.id, "Failed to {} server: {}", action, e);
            state
                .conn_manager
                .error(format!("Failed to {} server", action));
            false
        }
    };

    let mut store = state.store.lock().await;

    // The quote may have been merged over or deleted while the request ran
    let Some(mut current) = store.get(&quote.id).cloned() else {
        return Quote {
            synced: Some(synced),
            ..quote
        };
    };
    current.synced = Some(synced);
    if let Err(e) = store.replace(current.clone()) {
        tracing::warn!(id = %current.id, "Failed to persist sync flag: {}", e);
    }
    current
}
