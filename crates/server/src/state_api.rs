//! Page state endpoints.

use crate::{ServerContext, ServerError};
use axum::extract::{Extension, Path};
use axum::Json;
use serde_json::{json, Value};
use shelfsync_models::{SaveStateRequest, SaveStateResponse};
use std::sync::Arc;
use tracing::info;

/// Handler for GET /api/state/:page
///
/// Returns the bare stored state; a page nobody has saved yet reads as
/// an empty object.
pub async fn load_state(
    Extension(context): Extension<Arc<ServerContext>>,
    Path(page): Path<String>,
) -> Result<Json<Value>, ServerError> {
    let state = context
        .pages
        .load(&page)
        .await?
        .map(|document| document.state)
        .unwrap_or_else(|| json!({}));
    Ok(Json(state))
}

/// Handler for POST /api/state/:page
///
/// Overwrites the page's state and records the change as a git commit
/// attributed to the acting user.
pub async fn save_state(
    Extension(context): Extension<Arc<ServerContext>>,
    Path(page): Path<String>,
    Json(request): Json<SaveStateRequest>,
) -> Result<Json<SaveStateResponse>, ServerError> {
    context
        .pages
        .save(&page, request.state, &request.user)
        .await?;
    info!(page, user = %request.user.name, "page state saved");
    Ok(Json(SaveStateResponse::ok()))
}
