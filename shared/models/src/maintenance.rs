//! Maintenance request models.
//!
//! A submission arrives as a [`MaintenanceRequestPayload`] where every field may
//! be absent. [`MaintenanceRequestPayload::into_request`] turns it into either a
//! fully populated [`MaintenanceRequest`] or the list of missing fields.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Required fields as (wire name, struct field name), in declaration order.
pub const REQUIRED_FIELDS: [(&str, &str); 8] = [
    ("referenceNumber", "reference_number"),
    ("name", "name"),
    ("email", "email"),
    ("phone", "phone"),
    ("siteId", "site_id"),
    ("location", "location"),
    ("date", "date"),
    ("issue", "issue"),
];

/// Inbound maintenance submission, exactly as the caller sent it.
///
/// A JSON `null` deserializes to `None` and is treated as absent. Empty strings
/// are present values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequestPayload {
    #[validate(required)]
    pub reference_number: Option<String>,
    #[validate(required)]
    pub name: Option<String>,
    #[validate(required)]
    pub email: Option<String>,
    #[validate(required)]
    pub phone: Option<String>,
    #[validate(required)]
    pub site_id: Option<String>,
    #[validate(required)]
    pub location: Option<String>,
    #[validate(required)]
    pub date: Option<String>,
    #[validate(required)]
    pub issue: Option<String>,
    pub other_issues: Option<String>,
    pub image_url: Option<String>,
}

/// A maintenance request with every required field present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequest {
    pub reference_number: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub site_id: String,
    pub location: String,
    pub date: String,
    pub issue: String,
    pub other_issues: Option<String>,
    pub image_url: Option<String>,
}

/// Result of checking a payload for required fields.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestValidation {
    Valid(MaintenanceRequest),
    /// Wire names of the absent required fields.
    Invalid(Vec<String>),
}

impl MaintenanceRequestPayload {
    /// Wire names of required fields that are absent, in declaration order.
    pub fn missing_fields(&self) -> Vec<String> {
        let errors = match self.validate() {
            Ok(()) => return Vec::new(),
            Err(errors) => errors,
        };
        let field_errors = errors.field_errors();

        REQUIRED_FIELDS
            .iter()
            .filter(|(wire, field)| field_errors.contains_key(wire) || field_errors.contains_key(field))
            .map(|(wire, _)| wire.to_string())
            .collect()
    }

    pub fn into_request(self) -> RequestValidation {
        let missing = self.missing_fields();

        match self {
            Self {
                reference_number: Some(reference_number),
                name: Some(name),
                email: Some(email),
                phone: Some(phone),
                site_id: Some(site_id),
                location: Some(location),
                date: Some(date),
                issue: Some(issue),
                other_issues,
                image_url,
            } => RequestValidation::Valid(MaintenanceRequest {
                reference_number,
                name,
                email,
                phone,
                site_id,
                location,
                date,
                issue,
                other_issues,
                image_url,
            }),
            _ => RequestValidation::Invalid(missing),
        }
    }
}

impl From<MaintenanceRequest> for MaintenanceRequestPayload {
    fn from(request: MaintenanceRequest) -> Self {
        Self {
            reference_number: Some(request.reference_number),
            name: Some(request.name),
            email: Some(request.email),
            phone: Some(request.phone),
            site_id: Some(request.site_id),
            location: Some(request.location),
            date: Some(request.date),
            issue: Some(request.issue),
            other_issues: request.other_issues,
            image_url: request.image_url,
        }
    }
}
