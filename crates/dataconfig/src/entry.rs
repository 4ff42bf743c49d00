//! Data-configuration entries and the document that holds them.
//!
//! Responsibilities:
//! - Define public domain-level types for consumers of a data configuration
//! - Define a strict wire model for serialisation/deserialisation
//! - Provide translation helpers between the two
//!
//! Notes:
//! - Entry order is preserved but carries no meaning
//! - Identifiers may be written as YAML numbers; they are kept as text

use crate::scan_parameters::{ScanParameters, ScanParametersWire};
use crate::{DataConfigError, DataConfigResult};
use dataconfig_types::{Locator, LocatorError, NonEmptyText};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Public domain-level types
// ============================================================================

/// One functional scan of an entry.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncScan {
    /// Location of the functional image.
    pub scan: NonEmptyText,

    /// Acquisition metadata for this scan.
    pub scan_parameters: ScanParameters,
}

impl FuncScan {
    /// A functional scan given by location only.
    pub fn at(scan: NonEmptyText) -> Self {
        Self {
            scan,
            scan_parameters: ScanParameters::Absent,
        }
    }
}

/// `(site, subject_id, unique_id)` triple identifying a participant session.
pub type EntryKey<'a> = (&'a str, &'a str, &'a str);

/// A single participant session in a data configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct DataConfigEntry {
    /// Anatomical scan location (local path or object-storage URI).
    pub anat: NonEmptyText,

    /// Path to remote-storage credentials. `None` for local or public data.
    pub creds_path: Option<NonEmptyText>,

    /// Functional scans keyed by scan label.
    pub func: BTreeMap<String, FuncScan>,

    /// Entry-level scan parameters applying to every functional scan.
    pub scan_parameters: ScanParameters,

    pub site: NonEmptyText,
    pub subject_id: NonEmptyText,
    pub unique_id: NonEmptyText,
}

impl DataConfigEntry {
    /// `{subject_id}_{unique_id}`, the participant label used in output and group lists.
    pub fn label(&self) -> String {
        format!("{}_{}", self.subject_id, self.unique_id)
    }

    pub fn key(&self) -> EntryKey<'_> {
        (
            self.site.as_str(),
            self.subject_id.as_str(),
            self.unique_id.as_str(),
        )
    }

    /// Every scan location in the entry: the anatomical scan first, then functional scans in
    /// label order.
    pub fn scan_locations(&self) -> impl Iterator<Item = &NonEmptyText> {
        std::iter::once(&self.anat).chain(self.func.values().map(|f| &f.scan))
    }

    /// Parsed locators for [`Self::scan_locations`].
    pub fn locators(&self) -> Vec<Result<Locator, LocatorError>> {
        self.scan_locations()
            .map(|text| Locator::parse(text.as_str()))
            .collect()
    }

    /// Scan parameters effective for a functional scan: the scan's own, else the entry's.
    pub fn effective_scan_parameters(&self, scan_label: &str) -> Option<&ScanParameters> {
        let scan = self.func.get(scan_label)?;
        if scan.scan_parameters.is_absent() {
            Some(&self.scan_parameters)
        } else {
            Some(&scan.scan_parameters)
        }
    }
}

/// An ordered sequence of data-configuration entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataConfig {
    pub entries: Vec<DataConfigEntry>,
}

impl DataConfig {
    pub fn new(entries: Vec<DataConfigEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataConfigEntry> {
        self.entries.iter()
    }

    /// Parse a data configuration from YAML text.
    ///
    /// This uses `serde_path_to_error` to surface the path (e.g. `[2].func.rest_1`) of the
    /// failing field when the YAML does not match the wire schema. A document holding only
    /// comments or whitespace is an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DataConfigError::Schema`] if:
    /// - the top level is not a sequence of entries,
    /// - a required key is missing or has the wrong type,
    /// - an unknown key is present (due to `#[serde(deny_unknown_fields)]`),
    /// - a location or identifier is empty.
    pub fn parse(yaml_text: &str) -> DataConfigResult<DataConfig> {
        if is_blank_document(yaml_text) {
            return Ok(DataConfig::default());
        }

        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let wire = match serde_path_to_error::deserialize::<_, Option<Vec<EntryWire>>>(deserializer)
        {
            Ok(parsed) => parsed.unwrap_or_default(),
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(DataConfigError::Schema(format!(
                    "data configuration mismatch at {path}: {source}"
                )));
            }
        };

        Ok(DataConfig {
            entries: wire.into_iter().map(wire_to_domain).collect(),
        })
    }

    /// Render a data configuration as YAML text, keys in template order.
    ///
    /// # Errors
    ///
    /// Returns [`DataConfigError::Serialisation`] if serialisation fails.
    pub fn render(&self) -> DataConfigResult<String> {
        let wire: Vec<EntryWire> = self.entries.iter().map(domain_to_wire).collect();
        serde_yaml::to_string(&wire).map_err(|e| {
            DataConfigError::Serialisation(format!("failed to serialise data configuration: {e}"))
        })
    }
}

impl<'a> IntoIterator for &'a DataConfig {
    type Item = &'a DataConfigEntry;
    type IntoIter = std::slice::Iter<'a, DataConfigEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// True when a document holds nothing but comments, whitespace and document markers.
pub fn is_blank_document(text: &str) -> bool {
    text.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// Wire representation of one entry. Field order is the on-disk key order.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct EntryWire {
    anat: NonEmptyText,

    #[serde(default)]
    creds_path: Option<NonEmptyText>,

    #[serde(default)]
    func: Option<BTreeMap<String, FuncScanWire>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    scan_parameters: Option<ScanParametersWire>,

    #[serde(deserialize_with = "deserialize_identifier")]
    site: NonEmptyText,

    #[serde(deserialize_with = "deserialize_identifier")]
    subject_id: NonEmptyText,

    #[serde(deserialize_with = "deserialize_identifier")]
    unique_id: NonEmptyText,
}

/// A functional scan is either a bare location or a mapping with parameters.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
enum FuncScanWire {
    Location(NonEmptyText),
    Detailed(FuncScanDetailWire),
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct FuncScanDetailWire {
    scan: NonEmptyText,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    scan_parameters: Option<ScanParametersWire>,
}

/// Accept identifiers written as YAML strings or numbers.
fn deserialize_identifier<'de, D>(deserializer: D) -> Result<NonEmptyText, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let text = match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => return Err(D::Error::custom("identifier cannot be null")),
        serde_yaml::Value::Bool(_) => {
            return Err(D::Error::custom("expected a string or number, got a boolean"))
        }
        _ => {
            return Err(D::Error::custom(
                "expected a string or number, got a collection",
            ))
        }
    };
    NonEmptyText::new(text).map_err(D::Error::custom)
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn wire_to_domain(wire: EntryWire) -> DataConfigEntry {
    let func = wire
        .func
        .unwrap_or_default()
        .into_iter()
        .map(|(label, scan)| {
            let scan = match scan {
                FuncScanWire::Location(location) => FuncScan::at(location),
                FuncScanWire::Detailed(detail) => FuncScan {
                    scan: detail.scan,
                    scan_parameters: ScanParameters::from_wire(detail.scan_parameters),
                },
            };
            (label, scan)
        })
        .collect();

    DataConfigEntry {
        anat: wire.anat,
        creds_path: wire.creds_path,
        func,
        scan_parameters: ScanParameters::from_wire(wire.scan_parameters),
        site: wire.site,
        subject_id: wire.subject_id,
        unique_id: wire.unique_id,
    }
}

fn domain_to_wire(entry: &DataConfigEntry) -> EntryWire {
    let func = entry
        .func
        .iter()
        .map(|(label, scan)| {
            let wire = match scan.scan_parameters.to_wire() {
                None => FuncScanWire::Location(scan.scan.clone()),
                Some(params) => FuncScanWire::Detailed(FuncScanDetailWire {
                    scan: scan.scan.clone(),
                    scan_parameters: Some(params),
                }),
            };
            (label.clone(), wire)
        })
        .collect();

    EntryWire {
        anat: entry.anat.clone(),
        creds_path: entry.creds_path.clone(),
        func: Some(func),
        scan_parameters: entry.scan_parameters.to_wire(),
        site: entry.site.clone(),
        subject_id: entry.subject_id.clone(),
        unique_id: entry.unique_id.clone(),
    }
}
