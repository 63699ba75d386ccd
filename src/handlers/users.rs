// handlers/users.rs - /users handlers

use axum::{extract::State, Json};

use crate::database::{Collection, Document, Filter, InsertOneResult};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /users
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    let users = state.store.find(Collection::Users, &Filter::all()).await?;
    Ok(Json(users))
}

/// POST /users
pub async fn create(
    State(state): State<AppState>,
    Json(user): Json<Document>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let ack = state.store.insert_one(Collection::Users, user).await?;
    tracing::debug!("user stored as {}", ack.inserted_id);
    Ok(Json(ack))
}
