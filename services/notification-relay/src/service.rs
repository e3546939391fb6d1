//! Notification Dispatcher
//!
//! Validates a submission, loads the email settings and sends one email.
//! Each stage short-circuits: nothing is fetched for an invalid request and no
//! session is opened without a configuration record.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use fms_database::ConfigurationStore;
use fms_models::{
    DispatchReceipt, EmailConfiguration, MaintenanceRequest, MaintenanceRequestPayload,
    RequestValidation,
};
use fms_utils::{FmsError, FmsResult};

use crate::template_engine::TemplateEngine;
use crate::transport::{MailTransport, OutgoingEmail, SENDER_DISPLAY_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    Validating,
    ConfiguringTransport,
    Sending,
}

/// Notification dispatcher
#[derive(Clone)]
pub struct NotificationDispatcher {
    configurations: Arc<dyn ConfigurationStore>,
    transport: Arc<dyn MailTransport>,
    template_engine: Arc<TemplateEngine>,
}

impl NotificationDispatcher {
    pub fn new(
        configurations: Arc<dyn ConfigurationStore>,
        transport: Arc<dyn MailTransport>,
        template_engine: Arc<TemplateEngine>,
    ) -> Self {
        Self {
            configurations,
            transport,
            template_engine,
        }
    }

    pub async fn check_store(&self) -> FmsResult<()> {
        self.configurations.ping().await
    }

    /// Run the whole pipeline for one inbound submission.
    #[instrument(skip_all, fields(reference_number = payload.reference_number.as_deref().unwrap_or("")))]
    pub async fn submit(&self, payload: MaintenanceRequestPayload) -> FmsResult<DispatchReceipt> {
        let request = self.validate(payload)?;
        let config = self.load_configuration().await?;
        self.dispatch(&config, &request).await
    }

    pub fn validate(&self, payload: MaintenanceRequestPayload) -> FmsResult<MaintenanceRequest> {
        debug!(stage = ?DispatchStage::Validating, "Validating maintenance request");

        match payload.into_request() {
            RequestValidation::Valid(request) => Ok(request),
            RequestValidation::Invalid(missing_fields) => {
                warn!(missing_fields = ?missing_fields, "Rejected maintenance request");
                Err(FmsError::validation(missing_fields))
            }
        }
    }

    pub async fn load_configuration(&self) -> FmsResult<EmailConfiguration> {
        self.configurations
            .fetch_default_configuration()
            .await
            .map_err(|error| {
                if let FmsError::ConfigurationMissing { key } = &error {
                    warn!(key = %key, "Email configuration record is missing");
                }
                error
            })
    }

    /// Single attempt; transport failures are returned, never retried.
    pub async fn dispatch(
        &self,
        config: &EmailConfiguration,
        request: &MaintenanceRequest,
    ) -> FmsResult<DispatchReceipt> {
        debug!(
            stage = ?DispatchStage::ConfiguringTransport,
            host = %config.email_host,
            port = config.email_port,
            reject_unauthorized = config.reject_unauthorized,
            "Opening mail session"
        );
        let session = self.transport.open_session(config)?;

        let html_body = self.template_engine.render_maintenance_request(request)?;
        let email = OutgoingEmail::new(
            SENDER_DISPLAY_NAME,
            config.sender_email_user.as_str(),
            config.recipients().into_iter().map(String::from).collect(),
            config.email_subject.as_str(),
            html_body,
        );

        debug!(stage = ?DispatchStage::Sending, recipients = ?email.to, "Sending email");
        let receipt = session.send(email).await?;

        info!(message_id = %receipt.message_id, "Message sent");
        if let Some(preview_url) = &receipt.preview_url {
            info!(preview_url = %preview_url, "Preview URL");
        }

        Ok(receipt)
    }
}
