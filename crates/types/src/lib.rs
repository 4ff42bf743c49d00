//! Validated primitives shared by the data-configuration crates.
//!
//! - [`NonEmptyText`] for identifiers and paths that must carry content
//! - [`Locator`] for scan locations, either a local path or a `scheme://bucket/key` URI

use std::fmt;
use std::path::{Path, PathBuf};

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Errors returned by [`Locator::parse`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LocatorError {
    #[error("locator cannot be empty")]
    Empty,

    #[error("remote locator '{0}' has no bucket")]
    MissingBucket(String),

    #[error("remote locator '{0}' has an empty scheme")]
    EmptyScheme(String),
}

/// Scheme used for object-storage locators in data configurations.
pub const S3_SCHEME: &str = "s3";

/// Scheme of `file://` URIs, which name local paths.
pub const FILE_SCHEME: &str = "file";

/// Location of a scan or support file.
///
/// Anything of the form `scheme://bucket[/key]` is remote, where `scheme` is a letter followed
/// by letters, digits, `+`, `.` or `-`. `file://` URIs and everything else are treated as local
/// filesystem paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Local(PathBuf),
    Remote {
        scheme: String,
        bucket: String,
        /// Object key without the leading slash. May be empty for a bare bucket.
        key: String,
    },
}

impl Locator {
    /// Parse a locator from its textual form.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorError`] if the text is empty, or a remote locator lacks a scheme or bucket.
    pub fn parse(text: &str) -> Result<Self, LocatorError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(LocatorError::Empty);
        }

        let Some((scheme, rest)) = text.split_once("://") else {
            return Ok(Locator::Local(PathBuf::from(text)));
        };

        if scheme.is_empty() {
            return Err(LocatorError::EmptyScheme(text.to_owned()));
        }
        if !is_uri_scheme(scheme) {
            return Ok(Locator::Local(PathBuf::from(text)));
        }
        if scheme.eq_ignore_ascii_case(FILE_SCHEME) {
            let path = rest.strip_prefix("localhost").unwrap_or(rest);
            if path.is_empty() {
                return Err(LocatorError::Empty);
            }
            return Ok(Locator::Local(PathBuf::from(path)));
        }

        let (bucket, key) = match rest.split_once('/') {
            Some((bucket, key)) => (bucket, key),
            None => (rest, ""),
        };
        if bucket.is_empty() {
            return Err(LocatorError::MissingBucket(text.to_owned()));
        }

        Ok(Locator::Remote {
            scheme: scheme.to_ascii_lowercase(),
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Locator::Remote { .. })
    }

    /// True for `s3://` locators.
    pub fn is_s3(&self) -> bool {
        matches!(self, Locator::Remote { scheme, .. } if scheme == S3_SCHEME)
    }

    /// The local path, if this locator points at the filesystem.
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Locator::Local(path) => Some(path),
            Locator::Remote { .. } => None,
        }
    }
}

fn is_uri_scheme(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Local(path) => write!(f, "{}", path.display()),
            Locator::Remote {
                scheme,
                bucket,
                key,
            } if key.is_empty() => write!(f, "{scheme}://{bucket}"),
            Locator::Remote {
                scheme,
                bucket,
                key,
            } => write!(f, "{scheme}://{bucket}/{key}"),
        }
    }
}

impl std::str::FromStr for Locator {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
