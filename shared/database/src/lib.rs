//! Document-store access for the notification relay.

pub mod repositories;

pub use mongodb::Database as MongoDatabase;
pub use repositories::*;

use anyhow::Result;
use mongodb::{bson::doc, Client};
use tracing::info;

use fms_utils::{DatabaseConfig, FmsResult};

/// Opens the configured database. Fails if the server does not answer a ping.
pub async fn initialize_database(config: &DatabaseConfig) -> Result<MongoDatabase> {
    let client = Client::with_uri_str(&config.mongodb_url).await?;
    let database = client.database(&config.database_name);

    ping(&database).await?;
    info!(database = %config.database_name, "Document store reachable");

    Ok(database)
}

pub async fn ping(database: &MongoDatabase) -> FmsResult<()> {
    database.run_command(doc! { "ping": 1 }, None).await?;
    Ok(())
}
