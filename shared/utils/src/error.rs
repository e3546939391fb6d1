use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FmsError {
    #[error("Missing required fields: {}", .missing_fields.join(", "))]
    Validation { missing_fields: Vec<String> },

    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    #[error("Request body too large: {message}")]
    PayloadTooLarge { message: String },

    #[error("Email configuration not found: {key}")]
    ConfigurationMissing { key: String },

    #[error("Mail transport error: {message}")]
    Transport { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Template error: {message}")]
    Template { message: String },
}

impl FmsError {
    pub fn validation<I, S>(missing_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Validation {
            missing_fields: missing_fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn malformed_payload(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::PayloadTooLarge {
            message: message.into(),
        }
    }

    pub fn configuration_missing(key: impl Into<String>) -> Self {
        Self::ConfigurationMissing { key: key.into() }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::MalformedPayload { .. } => "MALFORMED_PAYLOAD",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::ConfigurationMissing { .. } => "CONFIGURATION_MISSING",
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::Database { .. } => "DATABASE_ERROR",
            Self::Template { .. } => "TEMPLATE_ERROR",
        }
    }

    /// A missing configuration record keeps the 400 that existing clients
    /// already handle, even though it is an operator fault.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::MalformedPayload { .. } => 400,
            Self::PayloadTooLarge { .. } => 413,
            Self::ConfigurationMissing { .. } => 400,
            Self::Transport { .. } => 500,
            Self::Database { .. } => 500,
            Self::Template { .. } => 500,
        }
    }

    /// Message safe to return to callers. Never includes transport or store detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Validation { .. } | Self::MalformedPayload { .. } => "Bad Request",
            Self::PayloadTooLarge { .. } => "Payload Too Large",
            Self::ConfigurationMissing { .. } => "Server Error",
            Self::Transport { .. } => "Email could not be sent",
            Self::Database { .. } | Self::Template { .. } => "Internal Server Error",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.http_status_code() >= 500
    }
}

pub type FmsResult<T> = Result<T, FmsError>;

impl From<mongodb::error::Error> for FmsError {
    fn from(error: mongodb::error::Error) -> Self {
        Self::database(error.to_string())
    }
}

impl From<mongodb::bson::de::Error> for FmsError {
    fn from(error: mongodb::bson::de::Error) -> Self {
        Self::database(format!("Malformed configuration record: {}", error))
    }
}

impl From<serde_json::Error> for FmsError {
    fn from(error: serde_json::Error) -> Self {
        Self::malformed_payload(error.to_string())
    }
}
