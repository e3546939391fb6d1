//! FMS Notification Relay
//!
//! Accepts maintenance request submissions over HTTP and emails them to the
//! recipient named in the stored email configuration.

use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use fms_database::{initialize_database, ConfigurationRepository};
use fms_utils::{init_logging, AppConfig, MailBackend};

mod response;
mod routes;
mod service;
mod smtp_client;
mod template_engine;
mod transport;

#[cfg(test)]
mod test_utils;

use routes::AppState;
use service::NotificationDispatcher;
use smtp_client::SmtpClient;
use template_engine::TemplateEngine;
use transport::{MailTransport, StubTransport};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    init_logging(&config.logging)?;
    info!("Starting FMS Notification Relay");

    let database = initialize_database(&config.database).await?;
    let configurations = Arc::new(ConfigurationRepository::new(&database));

    let transport: Arc<dyn MailTransport> = match config.mail.backend {
        MailBackend::Smtp => Arc::new(SmtpClient::new()),
        MailBackend::Stub => {
            warn!("Mail backend is 'stub': emails will be logged, not delivered");
            Arc::new(StubTransport)
        }
    };

    let dispatcher = NotificationDispatcher::new(
        configurations,
        transport,
        Arc::new(TemplateEngine::new()?),
    );

    let app = routes::create_app(
        AppState {
            dispatcher: Arc::new(dispatcher),
        },
        &config.server,
    );

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!(address = %address, "Notification relay listening");

    axum::serve(listener, app).await?;

    Ok(())
}
