// handlers/blogs.rs - /blogs handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::database::{Collection, Document, Filter, InsertOneResult, RecordId, UpdateResult};
use crate::error::ApiError;
use crate::state::AppState;

/// The fields a blog update replaces. Missing fields are written as `null`;
/// anything else in the body is ignored.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogFields {
    #[serde(default)]
    pub title: Value,
    #[serde(default, rename = "imageURL")]
    pub image_url: Value,
    #[serde(default)]
    pub category: Value,
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub email: Value,
    #[serde(default)]
    pub short_description: Value,
    #[serde(default)]
    pub long_description: Value,
    #[serde(default)]
    pub current_time: Value,
}

impl BlogFields {
    pub fn into_document(self) -> Document {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Document::new(),
        }
    }
}

/// GET /blogs - every blog
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    let blogs = state.store.find(Collection::Blogs, &Filter::all()).await?;
    Ok(Json(blogs))
}

/// GET /blogs/:id - one blog, or `null`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, ApiError> {
    let id: RecordId = id.parse()?;
    let blog = state.store.find_one(Collection::Blogs, id).await?;
    Ok(Json(blog))
}

/// POST /blogs
pub async fn create(
    State(state): State<AppState>,
    Json(blog): Json<Document>,
) -> Result<Json<InsertOneResult>, ApiError> {
    tracing::debug!("new blog: {:?}", blog.get("title"));
    let ack = state.store.insert_one(Collection::Blogs, blog).await?;
    Ok(Json(ack))
}

/// PUT /blogs/:id - replace the blog fields, creating the blog if the id is unknown
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<BlogFields>,
) -> Result<Json<UpdateResult>, ApiError> {
    let id: RecordId = id.parse()?;
    let ack = state
        .store
        .upsert_one(Collection::Blogs, id, fields.into_document())
        .await?;
    Ok(Json(ack))
}
