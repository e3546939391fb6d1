use serde::{Deserialize, Serialize};

/// Outcome of a delivered notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReceipt {
    pub message_id: String,
    /// Only set by test transports that expose a web view of sent mail.
    pub preview_url: Option<String>,
}

impl DispatchReceipt {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            preview_url: None,
        }
    }

    pub fn with_preview_url(mut self, preview_url: Option<String>) -> Self {
        self.preview_url = preview_url;
        self
    }
}
