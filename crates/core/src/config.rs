//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core operations.
//! Nothing in this crate reads process-wide environment variables while working.

use crate::constants::DEFAULT_MAX_DOCUMENT_BYTES;
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_config_path: Option<PathBuf>,
    check_local_files: bool,
    max_document_bytes: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_config_path: None,
            check_local_files: false,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        data_config_path: Option<PathBuf>,
        check_local_files: bool,
        max_document_bytes: u64,
    ) -> CoreResult<Self> {
        if max_document_bytes == 0 {
            return Err(CoreError::InvalidInput(
                "max_document_bytes must be greater than zero".into(),
            ));
        }

        Ok(Self {
            data_config_path,
            check_local_files,
            max_document_bytes,
        })
    }

    /// Build a configuration from raw environment values.
    ///
    /// Empty or whitespace-only values count as unset.
    pub fn from_env_values(
        data_config_path: Option<String>,
        check_local_files: Option<String>,
        max_document_bytes: Option<String>,
    ) -> CoreResult<Self> {
        let data_config_path = non_blank(data_config_path).map(PathBuf::from);
        let check_local_files = non_blank(check_local_files)
            .map(|v| parse_flag(&v))
            .transpose()?
            .unwrap_or(false);
        let max_document_bytes = non_blank(max_document_bytes)
            .map(|v| {
                v.parse::<u64>().map_err(|e| {
                    CoreError::InvalidInput(format!("invalid max document size '{v}': {e}"))
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_MAX_DOCUMENT_BYTES);

        Self::new(data_config_path, check_local_files, max_document_bytes)
    }

    pub fn data_config_path(&self) -> Option<&Path> {
        self.data_config_path.as_deref()
    }

    pub fn check_local_files(&self) -> bool {
        self.check_local_files
    }

    pub fn max_document_bytes(&self) -> u64 {
        self.max_document_bytes
    }

    /// The explicit path if given, else the configured default.
    pub fn resolve_document_path(&self, explicit: Option<PathBuf>) -> CoreResult<PathBuf> {
        explicit
            .or_else(|| self.data_config_path.clone())
            .ok_or_else(|| {
                CoreError::InvalidInput(
                    "no data configuration given and DATACONFIG_PATH is not set".into(),
                )
            })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> CoreResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CoreError::InvalidInput(format!(
            "invalid boolean flag '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_values_unset() {
        let config = CoreConfig::from_env_values(None, None, Some("  ".into())).expect("config");
        assert!(config.data_config_path().is_none());
        assert!(!config.check_local_files());
        assert_eq!(config.max_document_bytes(), DEFAULT_MAX_DOCUMENT_BYTES);
    }

    #[test]
    fn parses_flags_and_limits() {
        let config = CoreConfig::from_env_values(
            Some("/data/config.yml".into()),
            Some("Yes".into()),
            Some("1024".into()),
        )
        .expect("config");
        assert_eq!(config.data_config_path(), Some(Path::new("/data/config.yml")));
        assert!(config.check_local_files());
        assert_eq!(config.max_document_bytes(), 1024);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(CoreConfig::from_env_values(None, Some("maybe".into()), None).is_err());
        assert!(CoreConfig::from_env_values(None, None, Some("lots".into())).is_err());
        assert!(CoreConfig::from_env_values(None, None, Some("0".into())).is_err());
    }

    #[test]
    fn explicit_path_wins_over_default() {
        let config = CoreConfig::new(Some("/default.yml".into()), false, 10).expect("config");
        assert_eq!(
            config
                .resolve_document_path(Some("/explicit.yml".into()))
                .expect("path"),
            PathBuf::from("/explicit.yml")
        );
        assert_eq!(
            config.resolve_document_path(None).expect("path"),
            PathBuf::from("/default.yml")
        );
        assert!(CoreConfig::default().resolve_document_path(None).is_err());
    }
}
