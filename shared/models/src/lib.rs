//! # FMS Domain Models
//!
//! Data shapes shared by the notification relay and its document-store layer.
//!
//! ## Key Models
//!
//! - **MaintenanceRequestPayload**: the inbound submission as received over HTTP
//! - **MaintenanceRequest**: a submission whose required fields are all present
//! - **EmailConfiguration**: the operator-owned SMTP settings record
//! - **DispatchReceipt**: what a successful send hands back to the caller

pub mod configuration;
pub mod dispatch;
pub mod maintenance;

pub use configuration::*;
pub use dispatch::*;
pub use maintenance::*;
