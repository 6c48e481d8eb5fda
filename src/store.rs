use std::future::Future;

use anyhow::{Context, Result};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Client, Collection};
use tracing::info;

use crate::config::Config;
use crate::contact::{ContactDocument, DeleteOutcome, InsertOutcome, UpdateOutcome};

/// Storage operations the request handlers depend on.
///
/// The handlers are generic over this trait so they can be exercised
/// against a substitute store. Methods carry explicit `Send` bounds on
/// their futures since handlers run on a multithreaded runtime.
pub trait ContactStore: Clone + Send + Sync + 'static {
    /// Insert a new contact; the store assigns the identifier.
    fn insert(&self, contact: ContactDocument) -> impl Future<Output = Result<InsertOutcome>> + Send;

    /// Fetch every contact, unfiltered and unordered.
    fn all(&self) -> impl Future<Output = Result<Vec<ContactDocument>>> + Send;

    /// Fetch the contact with the given identifier, if any.
    fn get(&self, id: ObjectId)
        -> impl Future<Output = Result<Option<ContactDocument>>> + Send;

    /// Set the phone field of the matching contact. Only `phone` is ever
    /// written; other fields are immutable after creation.
    fn set_phone(
        &self,
        id: ObjectId,
        phone: &str,
    ) -> impl Future<Output = Result<UpdateOutcome>> + Send;

    /// Delete the matching contact.
    fn remove(&self, id: ObjectId) -> impl Future<Output = Result<DeleteOutcome>> + Send;
}

/// MongoDB-backed [ContactStore] over a single collection.
///
/// The collection handle is created once at startup and cloned into each
/// request; the driver manages connection pooling internally, so no
/// additional locking happens here.
#[derive(Clone)]
pub struct MongoStore {
    contacts: Collection<ContactDocument>,
}

impl MongoStore {
    /// Connect to the configured deployment and resolve the contacts
    /// collection. Errors here are fatal to the caller; there is no retry.
    pub async fn connect(config: &Config) -> Result<Self> {
        info!("Connecting to {}", config.mongodb_uri);
        let client = Client::with_uri_str(&config.mongodb_uri)
            .await
            .context("failed to connect to MongoDB")?;
        info!("Connected to MongoDB");

        let contacts = client
            .database(&config.database)
            .collection(&config.collection);
        Ok(Self { contacts })
    }
}

impl ContactStore for MongoStore {
    async fn insert(&self, contact: ContactDocument) -> Result<InsertOutcome> {
        let result = self.contacts.insert_one(contact).await?;
        let inserted_id = result
            .inserted_id
            .as_object_id()
            .map(|id| id.to_hex())
            .unwrap_or_default();
        Ok(InsertOutcome { inserted_id })
    }

    async fn all(&self) -> Result<Vec<ContactDocument>> {
        let cursor = self.contacts.find(doc! {}).await?;
        let contacts = cursor.try_collect().await?;
        Ok(contacts)
    }

    async fn get(&self, id: ObjectId) -> Result<Option<ContactDocument>> {
        let contact = self.contacts.find_one(doc! { "_id": id }).await?;
        Ok(contact)
    }

    async fn set_phone(&self, id: ObjectId, phone: &str) -> Result<UpdateOutcome> {
        let update = doc! { "$set": { "phone": phone } };
        let result = self.contacts.update_one(doc! { "_id": id }, update).await?;
        Ok(UpdateOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn remove(&self, id: ObjectId) -> Result<DeleteOutcome> {
        let result = self.contacts.delete_one(doc! { "_id": id }).await?;
        Ok(DeleteOutcome {
            deleted_count: result.deleted_count,
        })
    }
}
