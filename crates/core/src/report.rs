//! Findings produced by checking a data configuration.

use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// A single observation about a document or one of its entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    /// Zero-based entry index, `None` for document-level findings.
    pub entry: Option<usize>,
    pub message: String,
}

impl Finding {
    pub fn info(entry: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            entry,
            message: message.into(),
        }
    }

    pub fn warning(entry: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            entry,
            message: message.into(),
        }
    }

    pub fn error(entry: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            entry,
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry {
            Some(index) => write!(f, "{}: entry {}: {}", self.severity, index, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Ordered collection of findings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    findings: Vec<Finding>,
}

impl Report {
    pub fn new(findings: Vec<Finding>) -> Self {
        Self { findings }
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for finding in &self.findings {
            writeln!(f, "{finding}")?;
        }
        write!(
            f,
            "{} error(s), {} warning(s), {} info",
            self.count(Severity::Error),
            self.count(Severity::Warning),
            self.count(Severity::Info)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_severity() {
        let report = Report::new(vec![
            Finding::error(Some(0), "missing anat"),
            Finding::warning(None, "duplicate"),
            Finding::info(Some(1), "no functional scans"),
            Finding::info(Some(2), "no functional scans"),
        ]);
        assert!(report.has_errors());
        assert_eq!(report.count(Severity::Info), 2);

        let text = report.to_string();
        assert!(text.contains("error: entry 0: missing anat"));
        assert!(text.ends_with("1 error(s), 1 warning(s), 2 info"));
    }

    #[test]
    fn serialises_findings_for_json_output() {
        let report = Report::new(vec![
            Finding::error(Some(0), "missing key 'unique_id'"),
            Finding::warning(None, "document has no entries"),
        ]);

        let json = serde_json::to_value(&report).expect("report serialises");
        assert_eq!(
            json,
            serde_json::json!({
                "findings": [
                    { "severity": "error", "entry": 0, "message": "missing key 'unique_id'" },
                    { "severity": "warning", "entry": null, "message": "document has no entries" },
                ]
            })
        );
    }

    #[test]
    fn empty_report_is_clean() {
        let report = Report::default();
        assert!(report.is_clean());
        assert!(!report.has_errors());
    }
}
