// Database Interface - generic document operations behind a store trait
// Handlers only see `Database`; the concrete store is injected at startup.

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, to_document, DateTime, Document};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, AppResult};

pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";

/// Read query against a single collection
#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    pub filter: Document,
    pub sort: Option<Document>,
    pub limit: Option<i64>,
}

/// Document store primitives consumed by the API
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short name of the backing store, used in logs
    fn backend(&self) -> &'static str;

    /// Insert a document and return the id the store assigned to it
    async fn insert_document(&self, collection: &str, document: Document) -> AppResult<ObjectId>;

    async fn find_documents(&self, collection: &str, query: DocumentQuery)
        -> AppResult<Vec<Document>>;

    async fn find_document(&self, collection: &str, filter: Document)
        -> AppResult<Option<Document>>;

    /// Atomically add `amount` to an integer field and stamp `updated_at`.
    /// Returns the document after the update, or `None` if no document has `id`.
    async fn increment_field(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
        amount: i64,
    ) -> AppResult<Option<Document>>;

    async fn list_collection_names(&self) -> AppResult<Vec<String>>;
}

/// Process-wide persistence accessor shared by every request
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn DocumentStore>,
}

impl Database {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Serialize `record`, stamp it with creation time and insert it.
    /// Returns the new document id in string form.
    pub async fn create_document<T: Serialize>(
        &self,
        collection: &str,
        record: &T,
    ) -> AppResult<String> {
        let mut document =
            to_document(record).map_err(|e| AppError::SerializationError(e.to_string()))?;
        let now = DateTime::now();
        document.insert(CREATED_AT, now);
        document.insert(UPDATED_AT, now);

        let id = self.store.insert_document(collection, document).await?;
        tracing::debug!("Inserted document {} into {}", id, collection);
        Ok(id.to_hex())
    }

    pub async fn get_documents(
        &self,
        collection: &str,
        filter: Document,
        sort: Option<Document>,
        limit: Option<i64>,
    ) -> AppResult<Vec<Document>> {
        let query = DocumentQuery {
            filter,
            sort,
            limit,
        };
        self.store.find_documents(collection, query).await
    }

    /// Newest documents first
    pub async fn get_recent_documents(
        &self,
        collection: &str,
        limit: i64,
    ) -> AppResult<Vec<Document>> {
        self.get_documents(
            collection,
            Document::new(),
            Some(doc! { "created_at": -1, "_id": -1 }),
            Some(limit),
        )
        .await
    }

    pub async fn get_document_by_id(
        &self,
        collection: &str,
        id: ObjectId,
    ) -> AppResult<Option<Document>> {
        self.store.find_document(collection, doc! { "_id": id }).await
    }

    pub async fn increment_counter(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
    ) -> AppResult<Option<Document>> {
        self.store.increment_field(collection, id, field, 1).await
    }

    pub async fn list_collection_names(&self) -> AppResult<Vec<String>> {
        self.store.list_collection_names().await
    }
}

/// Parse the string form of a document id
pub fn parse_object_id(raw: &str) -> Option<ObjectId> {
    ObjectId::parse_str(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory_store::MemoryStore;
    use serde_json::json;

    fn database() -> Database {
        Database::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_document_stamps_timestamps() {
        let db = database();
        let id = db
            .create_document("post", &json!({ "content": "hi" }))
            .await
            .unwrap();

        let oid = parse_object_id(&id).unwrap();
        let stored = db.get_document_by_id("post", oid).await.unwrap().unwrap();
        assert_eq!(stored.get_str("content").unwrap(), "hi");
        assert!(stored.get_datetime(CREATED_AT).is_ok());
        assert!(stored.get_datetime(UPDATED_AT).is_ok());
    }

    #[tokio::test]
    async fn test_get_documents_empty_collection() {
        let db = database();
        let docs = db
            .get_documents("post", Document::new(), None, Some(10))
            .await
            .unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_recent_documents_newest_first() {
        let db = database();
        for i in 0..4 {
            db.create_document("post", &json!({ "content": format!("post {}", i) }))
                .await
                .unwrap();
        }

        let docs = db.get_recent_documents("post", 3).await.unwrap();
        let order: Vec<&str> = docs.iter().map(|d| d.get_str("content").unwrap()).collect();
        assert_eq!(order, vec!["post 3", "post 2", "post 1"]);
    }

    #[test]
    fn test_parse_object_id() {
        assert!(parse_object_id("507f1f77bcf86cd799439011").is_some());
        assert!(parse_object_id("not-an-id").is_none());
        assert!(parse_object_id("").is_none());
    }
}
