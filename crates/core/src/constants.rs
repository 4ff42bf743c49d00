//! Constants used throughout the core crate.

/// Environment variable naming the default data-configuration file.
pub const DATA_CONFIG_PATH_ENV: &str = "DATACONFIG_PATH";

/// Environment variable enabling existence checks of local scan files.
pub const CHECK_FILES_ENV: &str = "DATACONFIG_CHECK_FILES";

/// Environment variable overriding the maximum document size in bytes.
pub const MAX_DOCUMENT_BYTES_ENV: &str = "DATACONFIG_MAX_BYTES";

/// Default upper bound on the size of a data-configuration document.
pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 16 * 1024 * 1024; // 16 MiB

/// Separator between subject and session in participant labels.
pub const LABEL_SEPARATOR: char = '_';

/// Separator between id components in repeated-measures group lists.
pub const REPEATED_MEASURES_SEPARATOR: char = ',';

/// Marker a template author leaves between alternative values.
pub const PLACEHOLDER_ALTERNATIVE: &str = " (or) ";

/// Prefix of template example paths.
pub const PLACEHOLDER_PATH_PREFIX: &str = "/path/to/";
