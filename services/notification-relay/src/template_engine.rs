//! Email Template Engine
//!
//! Handlebars rendering of the maintenance request email. Every value goes
//! through handlebars' HTML escaping.

use handlebars::Handlebars;

use fms_models::MaintenanceRequest;
use fms_utils::{FmsError, FmsResult};

const MAINTENANCE_REQUEST_TEMPLATE: &str = "maintenance_request";

const MAINTENANCE_REQUEST_HTML: &str = r#"<table>
  <tr>
    <th style="width: 150px; text-align: end; padding-right: 10px">Reference Number :</th>
    <td>{{referenceNumber}}</td>
  </tr>
  <tr>
    <th style="width: 150px; text-align: end; padding-right: 10px">Name :</th>
    <td>{{name}}</td>
  </tr>
  <tr>
    <th style="width: 150px; text-align: end; padding-right: 10px">Email :</th>
    <td>{{email}}</td>
  </tr>
  <tr>
    <th style="width: 150px; text-align: end; padding-right: 10px">Phone :</th>
    <td>{{phone}}</td>
  </tr>
  <tr>
    <th style="width: 150px; text-align: end; padding-right: 10px">Site Id :</th>
    <td>{{siteId}}</td>
  </tr>
  <tr>
    <th style="width: 150px; text-align: end; padding-right: 10px">Location :</th>
    <td>{{location}}</td>
  </tr>
  <tr>
    <th style="width: 150px; text-align: end; padding-right: 10px">Issue :</th>
    <td>{{issue}}</td>
  </tr>
  <tr>
    <th style="width: 150px; text-align: end; padding-right: 10px">Other Issues :</th>
    <td>{{otherIssues}}</td>
  </tr>
  <tr>
    <th style="width: 150px; text-align: end; padding-right: 10px">Date :</th>
    <td>{{date}}</td>
  </tr>
  <tr>
    <th style="width: 150px; text-align: end; padding-right: 10px">Image Url :</th>
    <td>{{imageUrl}}</td>
  </tr>
</table>"#;

/// Template engine
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new() -> FmsResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_string(MAINTENANCE_REQUEST_TEMPLATE, MAINTENANCE_REQUEST_HTML)
            .map_err(|e| FmsError::template(format!("Failed to register template: {}", e)))?;

        Ok(Self { handlebars })
    }

    /// Render the HTML body. Absent optional fields become empty cells.
    pub fn render_maintenance_request(&self, request: &MaintenanceRequest) -> FmsResult<String> {
        self.handlebars
            .render(MAINTENANCE_REQUEST_TEMPLATE, request)
            .map_err(|e| FmsError::template(format!("Failed to render HTML body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_request;
    use proptest::prelude::*;

    #[test]
    fn test_renders_every_field() {
        let engine = TemplateEngine::new().unwrap();
        let mut request = sample_request();
        request.other_issues = Some("Mould on ceiling".to_string());
        request.image_url = Some("https://img.fms.test/leak.png".to_string());

        let body = engine.render_maintenance_request(&request).unwrap();

        for value in [
            "R-001",
            "Jane Doe",
            "jane@x.com",
            "555-1234",
            "S9",
            "Bldg A",
            "2024-01-01",
            "Leak",
            "Mould on ceiling",
            "https://img.fms.test/leak.png",
        ] {
            assert!(body.contains(value), "body is missing {}", value);
        }
    }

    #[test]
    fn test_absent_optional_fields_render_empty_cells() {
        let engine = TemplateEngine::new().unwrap();
        let body = engine.render_maintenance_request(&sample_request()).unwrap();

        assert!(body.contains("Other Issues :</th>\n    <td></td>"));
        assert!(body.contains("Image Url :</th>\n    <td></td>"));
        assert!(!body.contains("null"));
        assert!(!body.contains("undefined"));
    }

    #[test]
    fn test_user_values_are_escaped() {
        let engine = TemplateEngine::new().unwrap();
        let mut request = sample_request();
        request.issue = "<script>alert(\"x\")</script>".to_string();

        let body = engine.render_maintenance_request(&request).unwrap();
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_rendering_is_deterministic(
            name in "[A-Za-z ]{1,30}",
            issue in "[A-Za-z0-9 ]{1,60}",
            other_issues in proptest::option::of("[A-Za-z ]{1,30}"),
        ) {
            let engine = TemplateEngine::new().unwrap();
            let mut request = sample_request();
            request.name = name;
            request.issue = issue;
            request.other_issues = other_issues;

            let first = engine.render_maintenance_request(&request).unwrap();
            let second = engine.render_maintenance_request(&request).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
