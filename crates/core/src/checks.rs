//! Checks over a data-configuration document and its typed entries.

use crate::config::CoreConfig;
use crate::constants::{PLACEHOLDER_ALTERNATIVE, PLACEHOLDER_PATH_PREFIX};
use crate::report::{Finding, Report, Severity};
use crate::structure::check_structure;
use crate::{CoreError, CoreResult};
use dataconfig::{DataConfig, DataConfigEntry, EntryKey, Locator, ScanParameters};
use std::collections::HashMap;
use std::path::Path;

/// Run structural and semantic checks over raw document text.
///
/// Structural findings are always reported. When the typed parse fails, its error becomes a
/// document-level finding and entry checks are skipped.
pub fn check_text(path: &Path, text: &str, core: &CoreConfig) -> CoreResult<Report> {
    let mut report = match check_structure(text) {
        Ok(findings) => Report::new(findings),
        Err(CoreError::YamlDeserialization(e)) => {
            Report::new(vec![Finding::error(None, format!("invalid YAML: {e}"))])
        }
        Err(e) => return Err(e),
    };

    // A document that is not a sequence of entries already carries its error.
    let layout_broken = report
        .findings()
        .iter()
        .any(|f| f.entry.is_none() && f.severity == Severity::Error);
    if !layout_broken {
        match DataConfig::parse(text) {
            Ok(config) => report.extend(check_entries(&config, core)),
            Err(e) => report.extend([Finding::error(None, e.to_string())]),
        }
    }

    tracing::debug!(
        path = %path.display(),
        findings = report.findings().len(),
        "checked data configuration"
    );
    Ok(report)
}

/// Check every entry of a data configuration.
pub fn check_entries(config: &DataConfig, core: &CoreConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut seen: HashMap<EntryKey<'_>, usize> = HashMap::new();

    for (index, entry) in config.iter().enumerate() {
        if let Some(first) = seen.get(&entry.key()) {
            findings.push(Finding::warning(
                Some(index),
                format!(
                    "site '{}', subject '{}', session '{}' already listed by entry {first}",
                    entry.site, entry.subject_id, entry.unique_id
                ),
            ));
        } else {
            seen.insert(entry.key(), index);
        }

        check_entry(index, entry, core, &mut findings);
    }

    findings
}

fn check_entry(index: usize, entry: &DataConfigEntry, core: &CoreConfig, out: &mut Vec<Finding>) {
    let at = Some(index);

    let mut locators = Vec::new();
    for text in entry.scan_locations() {
        match Locator::parse(text.as_str()) {
            Ok(locator) => locators.push(locator),
            Err(e) => out.push(Finding::error(at, format!("bad scan location: {e}"))),
        }
    }

    let remote = locators.iter().filter(|l| l.is_remote()).count();
    let local = locators.len() - remote;
    if remote > 0 && local > 0 {
        out.push(Finding::warning(
            at,
            "mixes local paths and remote locators in one entry",
        ));
    }

    match &entry.creds_path {
        Some(creds) if looks_like_placeholder(creds.as_str()) => out.push(Finding::warning(
            at,
            format!("creds_path looks like template placeholder text: '{creds}'"),
        )),
        Some(_) if remote == 0 && local > 0 => out.push(Finding::info(
            at,
            "creds_path is set but every scan is local",
        )),
        None if remote > 0 => out.push(Finding::info(
            at,
            "remote scans without creds_path will be read anonymously",
        )),
        _ => {}
    }

    check_scan_parameters(at, "scan_parameters", &entry.scan_parameters, out);
    for (label, scan) in &entry.func {
        check_scan_parameters(
            at,
            &format!("func.{label}.scan_parameters"),
            &scan.scan_parameters,
            out,
        );
    }

    if entry.func.is_empty() {
        out.push(Finding::info(at, "no functional scans"));
    }

    if core.check_local_files() {
        for path in locators.iter().filter_map(Locator::local_path) {
            if !path.is_file() {
                out.push(Finding::error(
                    at,
                    format!("local scan file not found: {}", path.display()),
                ));
            }
        }
    }
}

fn check_scan_parameters(
    at: Option<usize>,
    field: &str,
    params: &ScanParameters,
    out: &mut Vec<Finding>,
) {
    match params {
        ScanParameters::External(text) if looks_like_placeholder(text.as_str()) => {
            out.push(Finding::warning(
                at,
                format!("{field} looks like template placeholder text: '{text}'"),
            ));
        }
        ScanParameters::External(text) => {
            if let Some(Err(e)) = params.external_locator() {
                out.push(Finding::error(
                    at,
                    format!("{field} has a bad location '{text}': {e}"),
                ));
            }
        }
        ScanParameters::Inline(map) if map.is_empty() => {
            out.push(Finding::info(at, format!("{field} is an empty mapping")));
        }
        _ => {}
    }
}

/// True for values a template author left for a human to fill in.
pub fn looks_like_placeholder(value: &str) -> bool {
    value.contains(PLACEHOLDER_ALTERNATIVE) || value.starts_with(PLACEHOLDER_PATH_PREFIX)
}
