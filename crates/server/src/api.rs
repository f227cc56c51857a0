//! Catalog and wishlist endpoints.

use crate::{ServerContext, ServerError};
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use shelfsync_models::{Book, BookDraft, BookPatch, CollectionNeed, NeedDraft, NeedPatch};
use std::sync::Arc;
use tracing::info;

/// Handler for GET /api/books
pub async fn list_books(
    Extension(context): Extension<Arc<ServerContext>>,
) -> Result<Json<Vec<Book>>, ServerError> {
    Ok(Json(context.books.list().await?))
}

/// Handler for POST /api/books
///
/// Assigns the id and creation time server-side and returns the stored
/// record with 201.
pub async fn create_book(
    Extension(context): Extension<Arc<ServerContext>>,
    Json(draft): Json<BookDraft>,
) -> Result<(StatusCode, Json<Book>), ServerError> {
    let book = Book::from_draft(draft);
    context.books.append(book.clone()).await?;
    info!(id = %book.id, title = %book.title, "book added");
    Ok((StatusCode::CREATED, Json(book)))
}

/// Handler for PUT /api/books/:id
///
/// Merges the patch into the stored record; fields absent from the
/// request body are left unchanged. Unknown ids get 404 and the
/// collection stays untouched.
pub async fn update_book(
    Extension(context): Extension<Arc<ServerContext>>,
    Path(id): Path<String>,
    Json(patch): Json<BookPatch>,
) -> Result<Json<Book>, ServerError> {
    let updated = context
        .books
        .update(|book| book.id == id, |book| book.apply(patch))
        .await?;
    updated.map(Json).ok_or(ServerError::NotFound)
}

/// Handler for DELETE /api/books/:id
pub async fn delete_book(
    Extension(context): Extension<Arc<ServerContext>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    context.books.remove(|book| book.id == id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /api/needs
pub async fn list_needs(
    Extension(context): Extension<Arc<ServerContext>>,
) -> Result<Json<Vec<CollectionNeed>>, ServerError> {
    Ok(Json(context.needs.list().await?))
}

/// Handler for POST /api/needs
pub async fn create_need(
    Extension(context): Extension<Arc<ServerContext>>,
    Json(draft): Json<NeedDraft>,
) -> Result<(StatusCode, Json<CollectionNeed>), ServerError> {
    let need = CollectionNeed::from_draft(draft);
    context.needs.append(need.clone()).await?;
    info!(id = %need.id, title = %need.title, "collection need added");
    Ok((StatusCode::CREATED, Json(need)))
}

/// Handler for PUT /api/needs/:id
pub async fn update_need(
    Extension(context): Extension<Arc<ServerContext>>,
    Path(id): Path<String>,
    Json(patch): Json<NeedPatch>,
) -> Result<Json<CollectionNeed>, ServerError> {
    let updated = context
        .needs
        .update(|need| need.id == id, |need| need.apply(patch))
        .await?;
    updated.map(Json).ok_or(ServerError::NotFound)
}

/// Handler for DELETE /api/needs/:id
pub async fn delete_need(
    Extension(context): Extension<Arc<ServerContext>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    context.needs.remove(|need| need.id == id).await?;
    Ok(StatusCode::NO_CONTENT)
}
