//! In-memory doubles for the configuration store and the mail transport.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use fms_database::ConfigurationStore;
use fms_models::{DispatchReceipt, EmailConfiguration, MaintenanceRequest, MaintenanceRequestPayload};
use fms_utils::{FmsError, FmsResult};

use crate::transport::{MailSession, MailTransport, OutgoingEmail};

pub fn sample_configuration() -> EmailConfiguration {
    EmailConfiguration {
        email_host: "smtp.ethereal.email".to_string(),
        email_port: 587,
        sender_email_user: "relay@fms.test".to_string(),
        sender_email_pass: "secret".to_string(),
        reject_unauthorized: false,
        email_subject: "New Maintenance Request".to_string(),
        recipient_email: "ops@fms.test".to_string(),
    }
}

pub fn sample_request() -> MaintenanceRequest {
    MaintenanceRequest {
        reference_number: "R-001".to_string(),
        name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        phone: "555-1234".to_string(),
        site_id: "S9".to_string(),
        location: "Bldg A".to_string(),
        date: "2024-01-01".to_string(),
        issue: "Leak".to_string(),
        other_issues: None,
        image_url: None,
    }
}

pub fn sample_payload() -> MaintenanceRequestPayload {
    sample_request().into()
}

pub struct InMemoryConfigurationStore {
    outcome: FmsResult<EmailConfiguration>,
    reachable: bool,
    reads: AtomicUsize,
}

impl InMemoryConfigurationStore {
    pub fn with(configuration: EmailConfiguration) -> Self {
        Self {
            outcome: Ok(configuration),
            reachable: true,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::failing(FmsError::configuration_missing(
            "configurations/default-configurations",
        ))
    }

    pub fn failing(error: FmsError) -> Self {
        Self {
            outcome: Err(error),
            reachable: true,
            reads: AtomicUsize::new(0),
        }
    }

    /// Fails reads and pings alike.
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::failing(FmsError::database("connection refused"))
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigurationStore for InMemoryConfigurationStore {
    async fn fetch_default_configuration(&self) -> FmsResult<EmailConfiguration> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }

    async fn ping(&self) -> FmsResult<()> {
        if self.reachable {
            Ok(())
        } else {
            Err(FmsError::database("connection refused"))
        }
    }
}

/// Records every send attempt; optionally fails them with a transport error.
#[derive(Default)]
pub struct RecordingTransport {
    failure: Option<String>,
    preview_url: Option<String>,
    sessions_opened: AtomicUsize,
    attempts: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_preview_url(preview_url: impl Into<String>) -> Self {
        Self {
            preview_url: Some(preview_url.into()),
            ..Self::default()
        }
    }

    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened.load(Ordering::SeqCst)
    }

    pub fn attempts(&self) -> Vec<OutgoingEmail> {
        self.attempts.lock().unwrap().clone()
    }
}

impl MailTransport for RecordingTransport {
    fn open_session(&self, _config: &EmailConfiguration) -> FmsResult<Box<dyn MailSession>> {
        self.sessions_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordingSession {
            failure: self.failure.clone(),
            preview_url: self.preview_url.clone(),
            attempts: Arc::clone(&self.attempts),
        }))
    }
}

struct RecordingSession {
    failure: Option<String>,
    preview_url: Option<String>,
    attempts: Arc<Mutex<Vec<OutgoingEmail>>>,
}

#[async_trait]
impl MailSession for RecordingSession {
    async fn send(self: Box<Self>, email: OutgoingEmail) -> FmsResult<DispatchReceipt> {
        let RecordingSession {
            failure,
            preview_url,
            attempts,
        } = *self;
        let message_id = email.message_id.clone();
        attempts.lock().unwrap().push(email);

        match failure {
            Some(message) => Err(FmsError::transport(message)),
            None => Ok(DispatchReceipt::new(message_id).with_preview_url(preview_url)),
        }
    }
}
