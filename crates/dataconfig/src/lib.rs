//! Data-configuration wire/boundary support.
//!
//! A data configuration is a YAML sequence of entries, one per participant session, pointing a
//! processing pipeline at anatomical and functional scans on local disk or in object storage.
//!
//! This crate focuses on:
//! - a strict wire model for the on-disk YAML
//! - serialisation/deserialisation with field-path error reporting
//! - the bundled, human-editable template
//!
//! Interpreting scan parameters and resolving credentials are left to the consuming pipeline.

pub mod entry;
pub mod scan_parameters;
pub mod template;

pub use entry::{DataConfig, DataConfigEntry, EntryKey, FuncScan};
/// Whether a document has no entries at all, only comments and markers.
pub use entry::is_blank_document;
pub use scan_parameters::ScanParameters;

pub use dataconfig_types::{Locator, LocatorError, NonEmptyText};

/// Errors returned by the `dataconfig` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum DataConfigError {
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("schema mismatch: {0}")]
    Schema(String),

    #[error("serialisation error: {0}")]
    Serialisation(String),
}

/// Type alias for Results that can fail with a [`DataConfigError`].
pub type DataConfigResult<T> = Result<T, DataConfigError>;
