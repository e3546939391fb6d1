//! Configuration Repository
//!
//! Reads the operator-maintained email settings record.

use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::Collection;

use fms_models::EmailConfiguration;
use fms_utils::{FmsError, FmsResult};

use crate::MongoDatabase;

pub const CONFIGURATION_COLLECTION: &str = "configurations";
pub const DEFAULT_CONFIGURATION_ID: &str = "default-configurations";

/// Source of the email settings record.
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// Returns `FmsError::ConfigurationMissing` when no usable record exists.
    async fn fetch_default_configuration(&self) -> FmsResult<EmailConfiguration>;

    /// Round trip to the store without reading the record.
    async fn ping(&self) -> FmsResult<()>;
}

pub struct ConfigurationRepository {
    database: MongoDatabase,
    collection: Collection<Document>,
}

impl ConfigurationRepository {
    pub fn new(database: &MongoDatabase) -> Self {
        Self {
            database: database.clone(),
            collection: database.collection(CONFIGURATION_COLLECTION),
        }
    }
}

#[async_trait]
impl ConfigurationStore for ConfigurationRepository {
    async fn fetch_default_configuration(&self) -> FmsResult<EmailConfiguration> {
        let document = self
            .collection
            .find_one(doc! { "_id": DEFAULT_CONFIGURATION_ID }, None)
            .await?;

        configuration_from_document(document)
    }

    async fn ping(&self) -> FmsResult<()> {
        crate::ping(&self.database).await
    }
}

/// A record holding nothing but its `_id` is treated the same as no record.
pub fn configuration_from_document(document: Option<Document>) -> FmsResult<EmailConfiguration> {
    let document = match document {
        Some(document) if document.keys().any(|key| key.as_str() != "_id") => document,
        _ => {
            return Err(FmsError::configuration_missing(format!(
                "{}/{}",
                CONFIGURATION_COLLECTION, DEFAULT_CONFIGURATION_ID
            )))
        }
    };

    Ok(mongodb::bson::from_document(document)?)
}
