// handlers/comments.rs - /comments and /comment handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::database::{Collection, Document, Filter, InsertOneResult};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CommentQuery {
    /// Matches the comment's own `id` field (the blog it belongs to), not `_id`
    pub id: Option<String>,
}

/// POST /comments
pub async fn create(
    State(state): State<AppState>,
    Json(comment): Json<Document>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let ack = state.store.insert_one(Collection::Comments, comment).await?;
    Ok(Json(ack))
}

/// GET /comments
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    let comments = state.store.find(Collection::Comments, &Filter::all()).await?;
    Ok(Json(comments))
}

/// GET /comment?id=
pub async fn list_for(
    State(state): State<AppState>,
    Query(query): Query<CommentQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let filter = Filter::eq_if_present("id", query.id.as_deref());
    let comments = state.store.find(Collection::Comments, &filter).await?;
    Ok(Json(comments))
}
