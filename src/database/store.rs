use async_trait::async_trait;
use thiserror::Error;

use super::record::{Collection, DeleteResult, Document, Filter, InsertOneResult, RecordId, UpdateResult};

/// Errors from a record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid record id: {0}")]
    InvalidId(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// The document store behind every handler.
///
/// Each method is one store primitive; handlers never combine them.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store `doc` under a fresh id. Any `_id` in `doc` is discarded.
    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<InsertOneResult, StoreError>;

    /// Every document matching `filter`, in insertion order.
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    async fn find_one(&self, collection: Collection, id: RecordId) -> Result<Option<Document>, StoreError>;

    /// Merge `fields` into the document with `id`, creating it when absent.
    async fn upsert_one(
        &self,
        collection: Collection,
        id: RecordId,
        fields: Document,
    ) -> Result<UpdateResult, StoreError>;

    async fn delete_one(&self, collection: Collection, id: RecordId) -> Result<DeleteResult, StoreError>;

    /// Cheap connectivity probe for the health endpoint
    async fn ping(&self) -> Result<(), StoreError>;
}
