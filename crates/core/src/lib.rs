//! # Data-configuration core
//!
//! Operations over neuroimaging data configurations:
//! - Loading documents from disk under a startup-resolved [`CoreConfig`]
//! - Structural checks against the template layout and semantic checks over entries
//! - Summaries for reporting
//! - Group-analysis participant lists
//!
//! **No pipeline concerns**: reading credentials, fetching from object storage and
//! interpreting scan parameters belong to the consuming pipeline.

pub mod checks;
pub mod config;
pub mod constants;
pub mod error;
pub mod group_analysis;
pub mod loader;
pub mod report;
pub mod structure;
pub mod summary;

pub use checks::{check_entries, check_text};
pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
pub use group_analysis::{
    participant_list, repeated_measures_list, GroupSubject, GroupSubjectList, RepeatedMeasures,
    RetainedSubjects,
};
pub use loader::{load_data_config, LoadedConfig};
pub use report::{Finding, Report, Severity};
pub use structure::check_structure;
pub use summary::{summarise, SiteSummary, Summary};

pub use dataconfig::{DataConfig, DataConfigEntry};
