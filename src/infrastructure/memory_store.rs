use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, DateTime, Document};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::infrastructure::database::{DocumentQuery, DocumentStore, UPDATED_AT};

/// In-process document store used by tests.
/// Supports equality filters, multi-key sort and limit.
pub struct MemoryStore {
    collections: Mutex<BTreeMap<String, Vec<Document>>>,
    sequence: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(BTreeMap::new()),
            sequence: AtomicU64::new(0),
        }
    }

    /// Ids are strictly increasing for the life of the store
    fn next_id(&self) -> ObjectId {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or_default();
        let sequence = self.sequence.fetch_add(1, AtomicOrdering::SeqCst);

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..].copy_from_slice(&sequence.to_be_bytes());
        ObjectId::from_bytes(bytes)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert_document(
        &self,
        collection: &str,
        mut document: Document,
    ) -> AppResult<ObjectId> {
        let id = match document.get("_id") {
            Some(Bson::ObjectId(id)) => *id,
            Some(other) => {
                return Err(AppError::DatabaseError(format!(
                    "Unsupported _id value: {}",
                    other
                )))
            }
            None => {
                let id = self.next_id();
                document.insert("_id", id);
                id
            }
        };

        let mut collections = self.collections.lock().await;
        let documents = collections.entry(collection.to_string()).or_default();
        if documents.iter().any(|d| d.get_object_id("_id").ok() == Some(id)) {
            return Err(AppError::DatabaseError(format!(
                "Duplicate key {} in {}",
                id, collection
            )));
        }
        documents.push(document);
        Ok(id)
    }

    async fn find_documents(
        &self,
        collection: &str,
        query: DocumentQuery,
    ) -> AppResult<Vec<Document>> {
        let collections = self.collections.lock().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<Document> = documents
            .iter()
            .filter(|d| matches_filter(d, &query.filter))
            .cloned()
            .collect();

        if let Some(sort) = &query.sort {
            matched.sort_by(|a, b| compare_by_sort(a, b, sort));
        }

        // A limit of zero means no limit, as in MongoDB
        if let Some(limit) = query.limit {
            if limit != 0 {
                matched.truncate(limit.unsigned_abs() as usize);
            }
        }

        Ok(matched)
    }

    async fn find_document(
        &self,
        collection: &str,
        filter: Document,
    ) -> AppResult<Option<Document>> {
        let collections = self.collections.lock().await;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|d| matches_filter(d, &filter)))
            .cloned())
    }

    async fn increment_field(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
        amount: i64,
    ) -> AppResult<Option<Document>> {
        let mut collections = self.collections.lock().await;
        let Some(document) = collections.get_mut(collection).and_then(|documents| {
            documents
                .iter_mut()
                .find(|d| d.get_object_id("_id").ok() == Some(id))
        }) else {
            return Ok(None);
        };

        let current = match document.get(field) {
            None => 0,
            Some(value) => integer_value(value).ok_or_else(|| {
                AppError::DatabaseError(format!("Cannot increment non-integer field {}", field))
            })?,
        };
        document.insert(field, current + amount);
        document.insert(UPDATED_AT, DateTime::now());

        Ok(Some(document.clone()))
    }

    async fn list_collection_names(&self) -> AppResult<Vec<String>> {
        let collections = self.collections.lock().await;
        Ok(collections.keys().cloned().collect())
    }
}

fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

fn compare_by_sort(a: &Document, b: &Document, sort: &Document) -> Ordering {
    for (key, direction) in sort {
        let ordering = compare_values(a.get(key), b.get(key));
        let descending = integer_value(direction).map(|d| d < 0).unwrap_or(false);
        let ordering = if descending { ordering.reverse() } else { ordering };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Bson::DateTime(a)), Some(Bson::DateTime(b))) => a.cmp(b),
        (Some(Bson::ObjectId(a)), Some(Bson::ObjectId(b))) => a.cmp(b),
        (Some(Bson::String(a)), Some(Bson::String(b))) => a.cmp(b),
        (Some(a), Some(b)) => match (number_value(a), number_value(b)) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
    }
}

fn integer_value(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        _ => None,
    }
}

fn number_value(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(v) => Some(*v),
        other => integer_value(other).map(|v| v as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_backend_name() {
        assert_eq!(MemoryStore::new().backend(), "memory");
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let first = store.insert_document("user", doc! { "name": "a" }).await.unwrap();
        let second = store.insert_document("user", doc! { "name": "b" }).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_find_with_filter_sort_and_limit() {
        let store = MemoryStore::new();
        for (name, rank) in [("a", 2), ("b", 3), ("c", 1)] {
            store
                .insert_document("user", doc! { "name": name, "rank": rank, "kind": "demo" })
                .await
                .unwrap();
        }
        store
            .insert_document("user", doc! { "name": "d", "rank": 9, "kind": "other" })
            .await
            .unwrap();

        let query = DocumentQuery {
            filter: doc! { "kind": "demo" },
            sort: Some(doc! { "rank": -1 }),
            limit: Some(2),
        };
        let found = store.find_documents("user", query).await.unwrap();
        let names: Vec<&str> = found.iter().map(|d| d.get_str("name").unwrap()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_increment_missing_document() {
        let store = MemoryStore::new();
        let result = store
            .increment_field("post", ObjectId::new(), "like_count", 1)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_increment_updates_counter() {
        let store = MemoryStore::new();
        let id = store
            .insert_document("post", doc! { "like_count": 0_i64 })
            .await
            .unwrap();

        store.increment_field("post", id, "like_count", 1).await.unwrap();
        let updated = store
            .increment_field("post", id, "like_count", 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.get_i64("like_count").unwrap(), 2);
        assert!(updated.get_datetime(UPDATED_AT).is_ok());
    }

    #[tokio::test]
    async fn test_list_collection_names() {
        let store = MemoryStore::new();
        assert!(store.list_collection_names().await.unwrap().is_empty());

        store.insert_document("post", doc! {}).await.unwrap();
        store.insert_document("user", doc! {}).await.unwrap();
        assert_eq!(
            store.list_collection_names().await.unwrap(),
            vec!["post".to_string(), "user".to_string()]
        );
    }
}
