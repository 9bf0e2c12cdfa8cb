use async_trait::async_trait;
use mongodb::bson::Document;

use crate::error::RentalResult;
use crate::models::{Collection, DeleteAck, InsertAck, UpdateAck};

/// Schemaless document access over the RentEase collections
///
/// Every operation targets exactly one collection and maps to one driver call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Every document in the collection
    async fn find_all(&self, collection: Collection) -> RentalResult<Vec<Document>>;

    /// Documents matching `filter`
    async fn find_many(&self, collection: Collection, filter: Document)
    -> RentalResult<Vec<Document>>;

    /// At most `limit` documents starting at offset `skip`, in natural order
    async fn find_page(
        &self,
        collection: Collection,
        skip: u64,
        limit: i64,
    ) -> RentalResult<Vec<Document>>;

    /// First document matching `filter`
    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> RentalResult<Option<Document>>;

    async fn insert_one(&self, collection: Collection, document: Document)
    -> RentalResult<InsertAck>;

    /// `$set` the fields of `set` on the first match, inserting when `upsert` is true
    async fn update_one(
        &self,
        collection: Collection,
        filter: Document,
        set: Document,
        upsert: bool,
    ) -> RentalResult<UpdateAck>;

    async fn delete_one(&self, collection: Collection, filter: Document)
    -> RentalResult<DeleteAck>;

    /// Count from collection metadata
    async fn estimated_count(&self, collection: Collection) -> RentalResult<u64>;
}
