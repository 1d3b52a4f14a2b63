// MongoDB implementation of the document store

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::ReturnDocument,
    Client, Collection,
};

use crate::error::{AppError, AppResult};
use crate::infrastructure::database::{DocumentQuery, DocumentStore, UPDATED_AT};

pub struct MongoStore {
    db: mongodb::Database,
}

impl MongoStore {
    /// Build the client once; the driver pools connections internally.
    pub async fn connect(url: &str, database_name: &str) -> AppResult<Self> {
        let client = Client::with_uri_str(url).await?;
        tracing::info!("MongoDB client created for database '{}'", database_name);
        Ok(Self {
            db: client.database(database_name),
        })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn insert_document(&self, collection: &str, document: Document) -> AppResult<ObjectId> {
        let result = self.collection(collection).insert_one(document).await?;
        result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::DatabaseError(format!(
                "Insert into {} returned a non-ObjectId id: {}",
                collection, result.inserted_id
            ))
        })
    }

    async fn find_documents(
        &self,
        collection: &str,
        query: DocumentQuery,
    ) -> AppResult<Vec<Document>> {
        let collection = self.collection(collection);
        let mut find = collection.find(query.filter);
        if let Some(sort) = query.sort {
            find = find.sort(sort);
        }
        if let Some(limit) = query.limit {
            find = find.limit(limit);
        }

        let cursor = find.await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn find_document(
        &self,
        collection: &str,
        filter: Document,
    ) -> AppResult<Option<Document>> {
        Ok(self.collection(collection).find_one(filter).await?)
    }

    async fn increment_field(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
        amount: i64,
    ) -> AppResult<Option<Document>> {
        let mut increment = Document::new();
        increment.insert(field, amount);
        let mut current_date = Document::new();
        current_date.insert(UPDATED_AT, true);
        let update = doc! { "$inc": increment, "$currentDate": current_date };

        let updated = self
            .collection(collection)
            .find_one_and_update(doc! { "_id": id }, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    async fn list_collection_names(&self) -> AppResult<Vec<String>> {
        Ok(self.db.list_collection_names().await?)
    }
}
