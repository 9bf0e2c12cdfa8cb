//! MongoDB implementation of DocumentRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Database,
    bson::{Document, doc},
    results::{DeleteResult, InsertOneResult, UpdateResult},
};
use tracing::instrument;

use crate::error::RentalResult;
use crate::models::{Collection, DeleteAck, InsertAck, UpdateAck, bson_to_json};
use crate::repository::DocumentRepository;

/// MongoDB implementation of the DocumentRepository
#[derive(Clone)]
pub struct MongoDocumentRepository {
    db: Database,
}

impl MongoDocumentRepository {
    /// Create a repository over `db`
    ///
    /// # Example
    /// ```ignore
    /// let client = database::mongodb::connect_from_config(&config).await?;
    /// let repo = MongoDocumentRepository::new(client.database(config.database()));
    /// ```
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.db.collection::<Document>(collection.name())
    }
}

impl From<InsertOneResult> for InsertAck {
    fn from(result: InsertOneResult) -> Self {
        Self {
            acknowledged: true,
            inserted_id: bson_to_json(result.inserted_id),
        }
    }
}

impl From<UpdateResult> for UpdateAck {
    fn from(result: UpdateResult) -> Self {
        Self {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(result.upserted_id.is_some()),
            upserted_id: result.upserted_id.map(bson_to_json),
        }
    }
}

impl From<DeleteResult> for DeleteAck {
    fn from(result: DeleteResult) -> Self {
        Self {
            acknowledged: true,
            deleted_count: result.deleted_count,
        }
    }
}

#[async_trait]
impl DocumentRepository for MongoDocumentRepository {
    #[instrument(skip(self), fields(collection = %collection))]
    async fn find_all(&self, collection: Collection) -> RentalResult<Vec<Document>> {
        let cursor = self.collection(collection).find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn find_many(
        &self,
        collection: Collection,
        filter: Document,
    ) -> RentalResult<Vec<Document>> {
        let cursor = self.collection(collection).find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn find_page(
        &self,
        collection: Collection,
        skip: u64,
        limit: i64,
    ) -> RentalResult<Vec<Document>> {
        let cursor = self
            .collection(collection)
            .find(doc! {})
            .skip(skip)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> RentalResult<Option<Document>> {
        Ok(self.collection(collection).find_one(filter).await?)
    }

    #[instrument(skip(self, document), fields(collection = %collection))]
    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> RentalResult<InsertAck> {
        let result = self.collection(collection).insert_one(document).await?;
        tracing::debug!(inserted_id = %result.inserted_id, "Document inserted");
        Ok(result.into())
    }

    #[instrument(skip(self, set), fields(collection = %collection))]
    async fn update_one(
        &self,
        collection: Collection,
        filter: Document,
        set: Document,
        upsert: bool,
    ) -> RentalResult<UpdateAck> {
        let result = self
            .collection(collection)
            .update_one(filter, doc! { "$set": set })
            .upsert(upsert)
            .await?;
        Ok(result.into())
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn delete_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> RentalResult<DeleteAck> {
        let result = self.collection(collection).delete_one(filter).await?;
        Ok(result.into())
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn estimated_count(&self, collection: Collection) -> RentalResult<u64> {
        Ok(self
            .collection(collection)
            .estimated_document_count()
            .await?)
    }
}

