//! Mail Transport
//!
//! A `MailTransport` opens one `MailSession` per email. The session is consumed
//! by `send`, so a connection can never be reused across requests.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::stub::AsyncStubTransport;
use lettre::{Address, AsyncTransport, Message};
use tracing::info;
use uuid::Uuid;

use fms_models::{DispatchReceipt, EmailConfiguration};
use fms_utils::{FmsError, FmsResult};

/// Display name paired with the configured sender address.
pub const SENDER_DISPLAY_NAME: &str = "FMS";

/// A rendered email ready to hand to a session.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub message_id: String,
    pub from_name: String,
    pub from_address: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

impl OutgoingEmail {
    pub fn new(
        from_name: impl Into<String>,
        from_address: impl Into<String>,
        to: Vec<String>,
        subject: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        let from_address = from_address.into();
        let domain = from_address
            .rsplit_once('@')
            .map(|(_, domain)| domain.to_string())
            .unwrap_or_else(|| "localhost".to_string());

        Self {
            message_id: format!("<{}@{}>", Uuid::new_v4(), domain),
            from_name: from_name.into(),
            from_address,
            to,
            subject: subject.into(),
            html_body: html_body.into(),
        }
    }
}

/// Single-use connection to a mail server.
#[async_trait]
pub trait MailSession: Send {
    async fn send(self: Box<Self>, email: OutgoingEmail) -> FmsResult<DispatchReceipt>;
}

/// Builds sessions from the stored email settings.
pub trait MailTransport: Send + Sync {
    fn open_session(&self, config: &EmailConfiguration) -> FmsResult<Box<dyn MailSession>>;
}

pub fn build_message(email: &OutgoingEmail) -> FmsResult<Message> {
    let sender: Address = email.from_address.parse().map_err(|e| {
        FmsError::transport(format!("Invalid sender address '{}': {}", email.from_address, e))
    })?;

    let mut builder = Message::builder()
        .from(Mailbox::new(Some(email.from_name.clone()), sender))
        .subject(email.subject.clone())
        .message_id(Some(email.message_id.clone()));

    for recipient in &email.to {
        let mailbox: Mailbox = recipient.parse().map_err(|e| {
            FmsError::transport(format!("Invalid recipient address '{}': {}", recipient, e))
        })?;
        builder = builder.to(mailbox);
    }

    builder
        .header(ContentType::TEXT_HTML)
        .body(email.html_body.clone())
        .map_err(|e| FmsError::transport(format!("Failed to build email: {}", e)))
}

/// Accepts every message without connecting anywhere. For local development.
#[derive(Debug, Clone, Default)]
pub struct StubTransport;

impl MailTransport for StubTransport {
    fn open_session(&self, _config: &EmailConfiguration) -> FmsResult<Box<dyn MailSession>> {
        Ok(Box::new(StubSession {
            transport: AsyncStubTransport::new_ok(),
        }))
    }
}

struct StubSession {
    transport: AsyncStubTransport,
}

#[async_trait]
impl MailSession for StubSession {
    async fn send(self: Box<Self>, email: OutgoingEmail) -> FmsResult<DispatchReceipt> {
        let message = build_message(&email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| FmsError::transport(e.to_string()))?;

        info!(
            to = ?email.to,
            subject = %email.subject,
            "Stub transport: email not delivered"
        );
        Ok(DispatchReceipt::new(email.message_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_configuration;

    fn outgoing(to: Vec<&str>) -> OutgoingEmail {
        OutgoingEmail::new(
            SENDER_DISPLAY_NAME,
            "relay@fms.test",
            to.into_iter().map(String::from).collect(),
            "New Maintenance Request",
            "<table></table>",
        )
    }

    #[test]
    fn test_message_id_uses_sender_domain() {
        let email = outgoing(vec!["ops@fms.test"]);
        assert!(email.message_id.starts_with('<'));
        assert!(email.message_id.ends_with("@fms.test>"));
    }

    #[test]
    fn test_message_carries_display_name_and_all_recipients() {
        let message = build_message(&outgoing(vec!["ops@fms.test", "facilities@fms.test"])).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("From: FMS"));
        assert!(raw.contains("<relay@fms.test>"));
        assert!(raw.contains("ops@fms.test"));
        assert!(raw.contains("facilities@fms.test"));
        assert!(raw.contains("Subject: New Maintenance Request"));
        assert!(raw.contains("Content-Type: text/html"));
    }

    #[test]
    fn test_invalid_sender_is_a_transport_error() {
        let mut email = outgoing(vec!["ops@fms.test"]);
        email.from_address = "not an address".to_string();

        let error = build_message(&email).unwrap_err();
        assert_eq!(error.error_code(), "TRANSPORT_ERROR");
    }

    #[test]
    fn test_no_recipients_is_a_transport_error() {
        let error = build_message(&outgoing(vec![])).unwrap_err();
        assert_eq!(error.error_code(), "TRANSPORT_ERROR");
    }

    #[tokio::test]
    async fn test_stub_session_accepts_mail() {
        let session = StubTransport.open_session(&sample_configuration()).unwrap();
        let email = outgoing(vec!["ops@fms.test"]);
        let message_id = email.message_id.clone();

        let receipt = session.send(email).await.unwrap();
        assert_eq!(receipt.message_id, message_id);
        assert_eq!(receipt.preview_url, None);
    }
}
