use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::record::{
    with_id, Collection, DeleteResult, Document, Filter, InsertOneResult, RecordId, UpdateResult, ID_FIELD,
};
use super::store::{RecordStore, StoreError};

/// In-process document store with the same semantics as the Postgres store.
///
/// Nothing survives a restart. Used by the test suite and `STORE_BACKEND=memory`.
#[derive(Default)]
pub struct MemoryRecordStore {
    collections: RwLock<HashMap<Collection, Vec<(RecordId, Document)>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`
    pub async fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert_one(&self, collection: Collection, mut doc: Document) -> Result<InsertOneResult, StoreError> {
        doc.remove(ID_FIELD);
        let id = RecordId::new();

        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().push((id, doc));

        Ok(InsertOneResult::new(id))
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let docs = collections
            .get(&collection)
            .into_iter()
            .flatten()
            .filter(|(_, doc)| filter.matches(doc))
            .map(|(id, doc)| with_id(*id, doc.clone()))
            .collect();
        Ok(docs)
    }

    async fn find_one(&self, collection: Collection, id: RecordId) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        let doc = collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|(doc_id, _)| *doc_id == id))
            .map(|(id, doc)| with_id(*id, doc.clone()));
        Ok(doc)
    }

    async fn upsert_one(
        &self,
        collection: Collection,
        id: RecordId,
        mut fields: Document,
    ) -> Result<UpdateResult, StoreError> {
        fields.remove(ID_FIELD);

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        match docs.iter_mut().find(|(doc_id, _)| *doc_id == id) {
            Some((_, current)) => {
                let before = current.clone();
                current.extend(fields);
                Ok(UpdateResult::matched(*current != before))
            }
            None => {
                docs.push((id, fields));
                Ok(UpdateResult::upserted(id))
            }
        }
    }

    async fn delete_one(&self, collection: Collection, id: RecordId) -> Result<DeleteResult, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(DeleteResult::new(0));
        };

        match docs.iter().position(|(doc_id, _)| *doc_id == id) {
            Some(index) => {
                docs.remove(index);
                Ok(DeleteResult::new(1))
            }
            None => Ok(DeleteResult::new(0)),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
