//! SMTP Client
//!
//! Sends email via SMTP using lettre, one transport per message.

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use fms_models::{DispatchReceipt, EmailConfiguration};
use fms_utils::{FmsError, FmsResult};

use crate::transport::{build_message, MailSession, MailTransport, OutgoingEmail};

/// Port on which the server expects TLS from the first byte.
const IMPLICIT_TLS_PORT: u16 = 465;

const ETHEREAL_WEB: &str = "https://ethereal.email";

/// SMTP transport configured from the stored email settings.
#[derive(Debug, Clone, Default)]
pub struct SmtpClient;

impl SmtpClient {
    pub fn new() -> Self {
        Self
    }
}

impl MailTransport for SmtpClient {
    fn open_session(&self, config: &EmailConfiguration) -> FmsResult<Box<dyn MailSession>> {
        let tls_parameters = TlsParameters::builder(config.email_host.clone())
            .dangerous_accept_invalid_certs(!config.reject_unauthorized)
            .build_rustls()
            .map_err(|e| FmsError::transport(format!("Invalid TLS parameters: {}", e)))?;

        let tls = if config.email_port == IMPLICIT_TLS_PORT {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let creds = Credentials::new(
            config.sender_email_user.clone(),
            config.sender_email_pass.clone(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.email_host)
            .port(config.email_port)
            .tls(tls)
            .credentials(creds)
            .build();

        Ok(Box::new(SmtpSession { mailer }))
    }
}

struct SmtpSession {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

#[async_trait]
impl MailSession for SmtpSession {
    async fn send(self: Box<Self>, email: OutgoingEmail) -> FmsResult<DispatchReceipt> {
        let message = build_message(&email)?;

        let response = self
            .mailer
            .send(message)
            .await
            .map_err(|e| FmsError::transport(format!("Failed to send email: {}", e)))?;

        let response_text = response.message().collect::<Vec<_>>().join(" ");

        Ok(DispatchReceipt::new(email.message_id).with_preview_url(preview_url(&response_text)))
    }
}

/// Web preview link for mail accepted by an Ethereal test account.
///
/// Ethereal ends its final SMTP reply with `[STATUS=new MSGID=<id>]`; any other
/// server yields `None`.
pub fn preview_url(response: &str) -> Option<String> {
    let trailer = response.trim_end().strip_suffix(']')?;
    let (_, properties) = trailer.rsplit_once('[')?;

    let mut has_status = false;
    let mut message_id = None;
    for property in properties.split_whitespace() {
        match property.split_once('=') {
            Some(("STATUS", _)) => has_status = true,
            Some(("MSGID", value)) if !value.is_empty() => message_id = Some(value),
            _ => {}
        }
    }

    if !has_status {
        return None;
    }
    message_id.map(|id| format!("{}/message/{}", ETHEREAL_WEB, id))
}
