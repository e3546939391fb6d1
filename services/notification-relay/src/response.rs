//! JSON envelopes, error responses and the submission extractor.

use axum::{
    async_trait,
    extract::{
        rejection::{FormRejection, JsonRejection},
        FromRequest, Request,
    },
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use fms_models::MaintenanceRequestPayload;
use fms_utils::FmsError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            code: None,
        }
    }

    pub fn failed(message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            status: "failed".to_string(),
            message: message.into(),
            code,
        }
    }
}

/// Error returned from handlers. Only the public message reaches the caller.
#[derive(Debug)]
pub struct ApiError(pub FmsError);

impl From<FmsError> for ApiError {
    fn from(error: FmsError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0;
        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let code = if error.is_server_error() {
            error!(error = %error, code = error.error_code(), "Request failed");
            Some(error.error_code().to_string())
        } else {
            warn!(error = %error, code = error.error_code(), "Request rejected");
            None
        };

        (status, Json(ApiResponse::failed(error.public_message(), code))).into_response()
    }
}

/// A maintenance submission sent as JSON or as a URL-encoded form.
#[derive(Debug)]
pub struct MaintenanceSubmission(pub MaintenanceRequestPayload);

#[async_trait]
impl<S> FromRequest<S> for MaintenanceSubmission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .is_some_and(|media_type| {
                media_type
                    .trim()
                    .eq_ignore_ascii_case("application/x-www-form-urlencoded")
            });

        let payload = if is_form {
            let Form(payload) = Form::<MaintenanceRequestPayload>::from_request(req, state)
                .await
                .map_err(form_rejection)?;
            payload
        } else {
            let Json(payload) = Json::<MaintenanceRequestPayload>::from_request(req, state)
                .await
                .map_err(json_rejection)?;
            payload
        };

        Ok(Self(payload))
    }
}

fn json_rejection(rejection: JsonRejection) -> FmsError {
    body_rejection(rejection.status(), rejection.body_text())
}

fn form_rejection(rejection: FormRejection) -> FmsError {
    body_rejection(rejection.status(), rejection.body_text())
}

/// The body limit itself is enforced by `DefaultBodyLimit`; only its status is kept here.
fn body_rejection(status: StatusCode, detail: String) -> FmsError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        FmsError::payload_too_large(detail)
    } else {
        FmsError::malformed_payload(detail)
    }
}
