use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;

use super::record::{
    with_id, Collection, DeleteResult, Document, Filter, InsertOneResult, RecordId, UpdateResult, ID_FIELD,
};
use super::store::{RecordStore, StoreError};

/// PostgreSQL-backed document store: one JSONB table per collection.
///
/// Owns the connection pool for the lifetime of the server. `close` must be
/// awaited once serving has stopped.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        if config.url.is_empty() {
            return Err(StoreError::ConnectionError("DATABASE_URL is empty".to_string()));
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connection_timeout())
            .connect(&config.url)
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(Self { pool })
    }

    /// Create the collection tables when they do not exist yet
    pub async fn ensure_collections(&self) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id uuid PRIMARY KEY,
                    seq bigserial NOT NULL,
                    doc jsonb NOT NULL DEFAULT '{{}}'::jsonb,
                    created_at timestamptz NOT NULL DEFAULT now()
                )",
                table(collection)
            );
            sqlx::query(&sql).execute(&self.pool).await?;
            info!("Collection ready: {}", collection);
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert_one(&self, collection: Collection, mut doc: Document) -> Result<InsertOneResult, StoreError> {
        doc.remove(ID_FIELD);
        let id = RecordId::new();

        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", table(collection));
        sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(Value::Object(doc))
            .execute(&self.pool)
            .await?;

        Ok(InsertOneResult::new(id))
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let rows: Vec<(Uuid, Value)> = match filter.field_eq() {
            Some((field, value)) => {
                let sql = format!("SELECT id, doc FROM {} WHERE doc @> $1 ORDER BY seq", table(collection));
                let mut probe = Document::new();
                probe.insert(field.to_string(), Value::String(value.to_string()));
                sqlx::query_as(&sql)
                    .bind(Value::Object(probe))
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("SELECT id, doc FROM {} ORDER BY seq", table(collection));
                sqlx::query_as(&sql).fetch_all(&self.pool).await?
            }
        };

        rows.into_iter().map(|(id, doc)| into_document(id, doc)).collect()
    }

    async fn find_one(&self, collection: Collection, id: RecordId) -> Result<Option<Document>, StoreError> {
        let sql = format!("SELECT id, doc FROM {} WHERE id = $1", table(collection));
        let row: Option<(Uuid, Value)> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(id, doc)| into_document(id, doc)).transpose()
    }

    async fn upsert_one(
        &self,
        collection: Collection,
        id: RecordId,
        mut fields: Document,
    ) -> Result<UpdateResult, StoreError> {
        fields.remove(ID_FIELD);
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT doc FROM {} WHERE id = $1 FOR UPDATE", table(collection));
        let existing: Option<(Value,)> = sqlx::query_as(&select)
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await?;

        let result = match existing {
            None => {
                // A concurrent upsert may have created the row since the select
                let sql = format!(
                    "INSERT INTO {t} (id, doc) VALUES ($1, $2)
                     ON CONFLICT (id) DO UPDATE SET doc = {t}.doc || EXCLUDED.doc",
                    t = table(collection)
                );
                sqlx::query(&sql)
                    .bind(id.as_uuid())
                    .bind(Value::Object(fields))
                    .execute(&mut *tx)
                    .await?;
                UpdateResult::upserted(id)
            }
            Some((Value::Object(mut current),)) => {
                let before = current.clone();
                current.extend(fields);
                if current == before {
                    UpdateResult::matched(false)
                } else {
                    let sql = format!("UPDATE {} SET doc = $2 WHERE id = $1", table(collection));
                    sqlx::query(&sql)
                        .bind(id.as_uuid())
                        .bind(Value::Object(current))
                        .execute(&mut *tx)
                        .await?;
                    UpdateResult::matched(true)
                }
            }
            Some((other,)) => {
                return Err(StoreError::QueryError(format!(
                    "document {} in {} is not an object: {}",
                    id, collection, other
                )))
            }
        };

        tx.commit().await?;
        Ok(result)
    }

    async fn delete_one(&self, collection: Collection, id: RecordId) -> Result<DeleteResult, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table(collection));
        let done = sqlx::query(&sql).bind(id.as_uuid()).execute(&self.pool).await?;
        Ok(DeleteResult::new(done.rows_affected()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Quoted table name for a collection
fn table(collection: Collection) -> String {
    quote_identifier(collection.name())
}

/// Quote SQL identifier to prevent injection
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn into_document(id: Uuid, doc: Value) -> Result<Document, StoreError> {
    match doc {
        Value::Object(body) => Ok(with_id(RecordId::from(id), body)),
        other => Err(StoreError::QueryError(format!(
            "document {} is not an object: {}",
            id, other
        ))),
    }
}
