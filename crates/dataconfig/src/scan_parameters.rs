//! Scan-parameter values attached to an entry or a functional scan.
//!
//! On the wire `scan_parameters` is polymorphic: a mapping of free-form acquisition metadata,
//! a string pointing at an external metadata file, or null/absent. Values are carried as-is.

use dataconfig_types::{Locator, LocatorError, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Acquisition metadata for a scan.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ScanParameters {
    /// No scan parameters given (`null` or key missing).
    #[default]
    Absent,
    /// Path or URI of an external metadata file.
    External(NonEmptyText),
    /// Inline acquisition metadata. Keys are not enumerated.
    Inline(BTreeMap<String, serde_yaml::Value>),
}

impl ScanParameters {
    pub fn is_absent(&self) -> bool {
        matches!(self, ScanParameters::Absent)
    }

    /// Locator of the external metadata file, if this is an external reference.
    pub fn external_locator(&self) -> Option<Result<Locator, LocatorError>> {
        match self {
            ScanParameters::External(text) => Some(Locator::parse(text.as_str())),
            _ => None,
        }
    }

    pub(crate) fn from_wire(wire: Option<ScanParametersWire>) -> Self {
        match wire {
            None => ScanParameters::Absent,
            Some(ScanParametersWire::External(text)) => ScanParameters::External(text),
            Some(ScanParametersWire::Inline(map)) => ScanParameters::Inline(map),
        }
    }

    pub(crate) fn to_wire(&self) -> Option<ScanParametersWire> {
        match self {
            ScanParameters::Absent => None,
            ScanParameters::External(text) => Some(ScanParametersWire::External(text.clone())),
            ScanParameters::Inline(map) => Some(ScanParametersWire::Inline(map.clone())),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub(crate) enum ScanParametersWire {
    External(NonEmptyText),
    Inline(BTreeMap<String, serde_yaml::Value>),
}
