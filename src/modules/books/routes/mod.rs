//! HTTP routes for the books module.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;
use uuid::Uuid;

use libris_http::error::AppError;

use super::models::{AdjustCopies, Book, BookFilter, ChangeCategory};
use super::service::{DeleteOutcome, InventoryError, InventoryService};

/// Build the module router. Mounted under `/api/books` by the HTTP facade.
pub fn router(service: InventoryService) -> Router {
    Router::new()
        .route("/", get(list_books))
        .route("/health", get(health_check))
        .route("/{id}", get(get_book).delete(delete_if_empty))
        .route("/{id}/copies", post(adjust_copies))
        .route("/{id}/category", put(change_category))
        .with_state(service)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(
    State(service): State<InventoryService>,
    Query(filter): Query<BookFilter>,
) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(service.list(&filter).await?))
}

async fn get_book(
    State(service): State<InventoryService>,
    Path(id): Path<Uuid>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(service.find(id).await?))
}

async fn adjust_copies(
    State(service): State<InventoryService>,
    Path(id): Path<Uuid>,
    Json(request): Json<AdjustCopies>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(service.adjust_copies(id, request.delta).await?))
}

async fn change_category(
    State(service): State<InventoryService>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangeCategory>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(service.change_category(id, &request.category).await?))
}

/// Delete-if-empty; both outcomes are 200s, only an unknown id is an error.
async fn delete_if_empty(
    State(service): State<InventoryService>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = service.delete_if_empty(id).await?;
    Ok(Json(
        json!({ "deleted": outcome == DeleteOutcome::Deleted }),
    ))
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound => AppError::not_found("book not found"),
            InventoryError::InvalidOperation(reason) => {
                AppError::conflict(vec![json!({ "reason": reason })], reason)
            }
            InventoryError::Store(err) => AppError::Internal(err.into()),
        }
    }
}
