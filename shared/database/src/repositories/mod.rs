//! Repository module for document-store reads

pub mod configuration;

pub use configuration::{
    configuration_from_document, ConfigurationRepository, ConfigurationStore,
    CONFIGURATION_COLLECTION, DEFAULT_CONFIGURATION_ID,
};
