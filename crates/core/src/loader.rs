//! Reading data-configuration documents from disk.

use crate::config::CoreConfig;
use crate::{CoreError, CoreResult};
use dataconfig::DataConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// A parsed document together with the text it came from.
///
/// The raw text is kept so structural checks can look at key layout the typed model hides.
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub text: String,
    pub config: DataConfig,
}

/// Read and parse a data configuration.
///
/// # Errors
///
/// Returns [`CoreError`] if:
/// - the file cannot be read,
/// - the file is larger than [`CoreConfig::max_document_bytes`],
/// - the YAML does not match the data-configuration schema.
pub fn load_data_config(path: &Path, core: &CoreConfig) -> CoreResult<LoadedConfig> {
    let text = read_document(path, core)?;
    let config = DataConfig::parse(&text)?;

    tracing::info!(
        path = %path.display(),
        entries = config.len(),
        "loaded data configuration"
    );

    Ok(LoadedConfig {
        path: path.to_path_buf(),
        text,
        config,
    })
}

/// Read a document as text, enforcing the configured size limit.
pub fn read_document(path: &Path, core: &CoreConfig) -> CoreResult<String> {
    let file_read = |source: std::io::Error| CoreError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(file_read)?;
    let limit = core.max_document_bytes();
    if metadata.len() > limit {
        return Err(CoreError::DocumentTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit,
        });
    }

    tracing::debug!(path = %path.display(), bytes = metadata.len(), "reading document");
    fs::read_to_string(path).map_err(file_read)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ONE_ENTRY: &str = r#"
- anat: /data/anat.nii.gz
  creds_path: null
  func:
    rest_1: /data/rest_1.nii.gz
  site: site01
  subject_id: sub01
  unique_id: ses01
"#;

    #[test]
    fn loads_document_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(ONE_ENTRY.as_bytes()).expect("write");

        let loaded = load_data_config(file.path(), &CoreConfig::default()).expect("load");
        assert_eq!(loaded.config.len(), 1);
        assert_eq!(loaded.text, ONE_ENTRY);
        assert_eq!(loaded.path, file.path());
    }

    #[test]
    fn rejects_oversized_document() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(ONE_ENTRY.as_bytes()).expect("write");

        let core = CoreConfig::new(None, false, 8).expect("config");
        let err = load_data_config(file.path(), &core).expect_err("too large");
        assert!(matches!(err, CoreError::DocumentTooLarge { limit: 8, .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.yml");
        let err = load_data_config(&path, &CoreConfig::default()).expect_err("missing");
        assert!(err.to_string().contains("absent.yml"));
    }

    #[test]
    fn schema_errors_propagate() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"- anat: /data/anat.nii.gz\n").expect("write");

        let err = load_data_config(file.path(), &CoreConfig::default()).expect_err("invalid");
        assert!(matches!(err, CoreError::DataConfig(_)));
    }
}
