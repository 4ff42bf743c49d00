use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read {path}: {source}", path = path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "{path} is {size} bytes, above the {limit} byte limit",
        path = path.display()
    )]
    DocumentTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("failed to parse YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),

    #[error(transparent)]
    DataConfig(#[from] dataconfig::DataConfigError),

    #[error("group subject list line {line}: {message}")]
    GroupListFormat { line: usize, message: String },

    #[error("none of the listed participants have outputs among the derivative paths")]
    NoDerivativesFound,
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
