// handlers/wishlist.rs - /wishlist and /myWishlist handlers

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::{Collection, DeleteResult, Document, Filter, InsertOneResult, RecordId};
use crate::error::ApiError;
use crate::middleware::SessionUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WishlistQuery {
    /// Owner email. Absent or empty selects every entry.
    pub email: Option<String>,
}

/// GET /wishlist - every wishlist entry
///
/// Runs behind the session gate by default, in which case the caller's
/// claims are available; the listing itself does not depend on them.
pub async fn list(
    State(state): State<AppState>,
    session: Option<Extension<SessionUser>>,
) -> Result<Json<Vec<Document>>, ApiError> {
    if let Some(Extension(SessionUser(claims))) = &session {
        tracing::debug!("wishlist listed by {:?}", claims.get("email"));
    }
    let entries = state.store.find(Collection::Wishlist, &Filter::all()).await?;
    Ok(Json(entries))
}

/// POST /wishlist
pub async fn create(
    State(state): State<AppState>,
    Json(entry): Json<Document>,
) -> Result<Json<InsertOneResult>, ApiError> {
    let ack = state.store.insert_one(Collection::Wishlist, entry).await?;
    Ok(Json(ack))
}

/// GET /myWishlist?email= - entries for one owner
pub async fn list_mine(
    State(state): State<AppState>,
    Query(query): Query<WishlistQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let filter = Filter::eq_if_present("email", query.email.as_deref());
    let entries = state.store.find(Collection::Wishlist, &filter).await?;
    Ok(Json(entries))
}

/// GET /myWishlist/:id - one entry, or `null`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, ApiError> {
    let id: RecordId = id.parse()?;
    let entry = state.store.find_one(Collection::Wishlist, id).await?;
    Ok(Json(entry))
}

/// DELETE /myWishlist/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let id: RecordId = id.parse()?;
    let ack = state.store.delete_one(Collection::Wishlist, id).await?;
    Ok(Json(ack))
}
