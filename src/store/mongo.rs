//! MongoDB-backed implementation of `DocumentStore`.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Database};
use tracing::{debug, info};

use super::document::bson_to_json;
use super::{Collection, DeleteAck, DocumentStore, InsertAck};
use crate::error::StoreError;

/// Default database name.
pub const DEFAULT_DATABASE: &str = "jobPortal";

/// MongoDB-backed store.
///
/// Holds one driver client for the whole process. The driver keeps its own
/// connection pool, so clones share connections.
///
/// # Example
///
/// ```ignore
/// use job_portal::store::MongoStore;
///
/// let store = MongoStore::connect("mongodb://localhost:27017", "jobPortal").await?;
/// store.ping().await?;
/// // ... serve requests ...
/// store.shutdown().await;
/// ```
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Create a client for the given connection string and select a database.
    ///
    /// Requests Stable API v1 with strict mode and deprecation errors. The
    /// driver connects lazily, so this does not fail on an unreachable server;
    /// call [`DocumentStore::ping`] to check connectivity.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client = Client::with_options(options)?;
        let database = client.database(database);
        debug!(database = database.name(), "MongoDB client created");

        Ok(Self { client, database })
    }

    /// Name of the selected database.
    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Count the documents in a collection.
    pub async fn count(&self, collection: Collection) -> Result<u64, StoreError> {
        Ok(self
            .collection(collection)
            .count_documents(doc! {})
            .await?)
    }

    /// Close pooled connections and stop the driver's background tasks.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("MongoDB client shut down");
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.database.collection::<Document>(collection.name())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertAck, StoreError> {
        let result = self.collection(collection).insert_one(document).await?;
        debug!(%collection, "Inserted document");

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: bson_to_json(result.inserted_id),
        })
    }

    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        let cursor = self.collection(collection).find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let mut filter = Document::new();
        filter.insert(field, value);

        let cursor = self.collection(collection).find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self
            .collection(collection)
            .find_one(doc! { "_id": *id })
            .await?)
    }

    async fn delete_by_id(
        &self,
        collection: Collection,
        id: &ObjectId,
    ) -> Result<DeleteAck, StoreError> {
        let result = self
            .collection(collection)
            .delete_one(doc! { "_id": *id })
            .await?;
        debug!(%collection, %id, deleted = result.deleted_count, "Deleted document");

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
