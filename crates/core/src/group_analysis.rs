//! Group-analysis participant lists.
//!
//! A group-analysis list is a text file naming one participant per line. Without repeated
//! measures a line is a participant label (`sub01_ses01`). With repeated measures a line joins
//! id components with commas: `subject,session` or `subject,scan` (two parts), or
//! `subject,scan,session` (three parts).
//!
//! Lists are generated from a data configuration and later filtered down to the participants
//! that individual-level analysis actually produced outputs for.

use crate::constants::REPEATED_MEASURES_SEPARATOR;
use crate::{CoreError, CoreResult};
use dataconfig::DataConfig;
use std::collections::BTreeSet;
use std::fmt;

/// Which id components a repeated-measures list pairs with the subject.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepeatedMeasures {
    /// `subject,session`
    Sessions,
    /// `subject,scan`
    Scans,
    /// `subject,scan,session`
    SessionsAndScans,
}

/// One participant label per entry, `{subject_id}_{unique_id}`, first occurrence order.
pub fn participant_list(config: &DataConfig) -> Vec<String> {
    dedup_in_order(config.iter().map(|entry| entry.label()))
}

/// Repeated-measures lines for every entry (and scan, where the mode includes scans).
pub fn repeated_measures_list(config: &DataConfig, mode: RepeatedMeasures) -> Vec<String> {
    let sep = REPEATED_MEASURES_SEPARATOR;
    let lines = config.iter().flat_map(|entry| {
        let subject = entry.subject_id.as_str();
        let session = entry.unique_id.as_str();
        match mode {
            RepeatedMeasures::Sessions => vec![format!("{subject}{sep}{session}")],
            RepeatedMeasures::Scans => entry
                .func
                .keys()
                .map(|scan| format!("{subject}{sep}{scan}"))
                .collect(),
            RepeatedMeasures::SessionsAndScans => entry
                .func
                .keys()
                .map(|scan| format!("{subject}{sep}{scan}{sep}{session}"))
                .collect(),
        }
    });
    dedup_in_order(lines)
}

fn dedup_in_order(lines: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    lines.filter(|line| seen.insert(line.clone())).collect()
}

/// A parsed line of a group-analysis list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupSubject {
    Participant(String),
    /// Subject with either a session or a scan id.
    Pair { subject: String, other: String },
    Triple {
        subject: String,
        scan: String,
        session: String,
    },
}

impl GroupSubject {
    /// Id components a derivative path must mention for this line to count as present.
    pub fn components(&self) -> Vec<&str> {
        match self {
            GroupSubject::Participant(id) => vec![id.as_str()],
            GroupSubject::Pair { subject, other } => vec![subject.as_str(), other.as_str()],
            GroupSubject::Triple {
                subject,
                scan,
                session,
            } => vec![subject.as_str(), scan.as_str(), session.as_str()],
        }
    }

    fn matches(&self, path: &str) -> bool {
        self.components().iter().all(|c| path.contains(c))
    }
}

impl fmt::Display for GroupSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = REPEATED_MEASURES_SEPARATOR;
        match self {
            GroupSubject::Participant(id) => f.write_str(id),
            GroupSubject::Pair { subject, other } => write!(f, "{subject}{sep}{other}"),
            GroupSubject::Triple {
                subject,
                scan,
                session,
            } => write!(f, "{subject}{sep}{scan}{sep}{session}"),
        }
    }
}

/// A group-analysis list read from text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupSubjectList {
    repeated_measures: bool,
    subjects: Vec<GroupSubject>,
}

/// Result of [`GroupSubjectList::retain_present`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetainedSubjects {
    pub list: GroupSubjectList,
    /// Derivative paths that matched a retained participant.
    pub derivative_paths: Vec<String>,
    /// Lines with no matching derivative path.
    pub missing: Vec<GroupSubject>,
}

impl GroupSubjectList {
    /// Parse a list, skipping blank lines and `#` comments.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::GroupListFormat`] (with a 1-based line number) if:
    /// - a line is formatted for repeated measures while `repeated_measures` is off,
    /// - a line is a plain id while `repeated_measures` is on,
    /// - a line has more than three components or an empty component.
    pub fn parse(text: &str, repeated_measures: bool) -> CoreResult<Self> {
        let mut subjects = Vec::new();

        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let format_error = |message: String| CoreError::GroupListFormat {
                line: number + 1,
                message,
            };

            let parts: Vec<&str> = line
                .split(REPEATED_MEASURES_SEPARATOR)
                .map(str::trim)
                .collect();
            if parts.iter().any(|p| p.is_empty()) {
                return Err(format_error(format!("'{line}' has an empty id")));
            }

            let subject = match (repeated_measures, parts.as_slice()) {
                (false, [id]) => GroupSubject::Participant((*id).to_string()),
                (false, _) => {
                    return Err(format_error(format!(
                        "'{line}' is formatted for repeated measures, but repeated measures is not enabled"
                    )))
                }
                (true, [_]) => {
                    return Err(format_error(format!(
                        "'{line}' is not in the repeated-measures format (subject,session or subject,scan,session)"
                    )))
                }
                (true, [subject, other]) => GroupSubject::Pair {
                    subject: (*subject).to_string(),
                    other: (*other).to_string(),
                },
                (true, [subject, scan, session]) => GroupSubject::Triple {
                    subject: (*subject).to_string(),
                    scan: (*scan).to_string(),
                    session: (*session).to_string(),
                },
                (true, _) => {
                    return Err(format_error(format!(
                        "'{line}' has more than three components"
                    )))
                }
            };
            subjects.push(subject);
        }

        Ok(Self {
            repeated_measures,
            subjects,
        })
    }

    /// Build a list from generated lines (see [`participant_list`], [`repeated_measures_list`]).
    pub fn from_lines(lines: &[String], repeated_measures: bool) -> CoreResult<Self> {
        Self::parse(&lines.join("\n"), repeated_measures)
    }

    pub fn repeated_measures(&self) -> bool {
        self.repeated_measures
    }

    pub fn subjects(&self) -> &[GroupSubject] {
        &self.subjects
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Keep the participants that have at least one derivative path mentioning every id
    /// component of their line.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoDerivativesFound`] if no participant matches any path.
    pub fn retain_present<S: AsRef<str>>(
        &self,
        derivative_paths: &[S],
    ) -> CoreResult<RetainedSubjects> {
        let mut kept = Vec::new();
        let mut matched_paths = Vec::new();
        let mut missing = Vec::new();

        for subject in &self.subjects {
            let before = matched_paths.len();
            matched_paths.extend(derivative_paths.iter().filter_map(|path| {
                let path: &str = path.as_ref();
                subject.matches(path).then(|| path.to_string())
            }));

            if matched_paths.len() > before {
                kept.push(subject.clone());
            } else {
                missing.push(subject.clone());
            }
        }

        if matched_paths.is_empty() {
            return Err(CoreError::NoDerivativesFound);
        }

        if !missing.is_empty() {
            tracing::warn!(
                missing = missing.len(),
                participants = ?missing.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "outputs missing for participants"
            );
        }

        Ok(RetainedSubjects {
            list: GroupSubjectList {
                repeated_measures: self.repeated_measures,
                subjects: kept,
            },
            derivative_paths: matched_paths,
            missing,
        })
    }

    /// One line per participant, newline terminated.
    pub fn render(&self) -> String {
        self.subjects
            .iter()
            .map(|subject| format!("{subject}\n"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataconfig::template::TEMPLATE;

    fn template() -> DataConfig {
        DataConfig::parse(TEMPLATE).expect("template parses")
    }

    #[test]
    fn participant_list_uses_subject_and_session() {
        assert_eq!(
            participant_list(&template()),
            vec!["sub01_ses01", "sub02_ses01"]
        );
    }

    #[test]
    fn repeated_measures_lists() {
        let config = template();
        assert_eq!(
            repeated_measures_list(&config, RepeatedMeasures::Sessions),
            vec!["sub01,ses01", "sub02,ses01"]
        );
        assert_eq!(
            repeated_measures_list(&config, RepeatedMeasures::Scans),
            vec!["sub01,scan_1", "sub01,scan_2", "sub02,rest_1", "sub01,rest_1"]
        );
        assert_eq!(
            repeated_measures_list(&config, RepeatedMeasures::SessionsAndScans)[0],
            "sub01,scan_1,ses01"
        );
    }

    #[test]
    fn parses_plain_list_skipping_comments() {
        let list = GroupSubjectList::parse("# participants\n\nsub01_ses01\nsub02_ses01\n", false)
            .expect("parse");
        assert_eq!(list.len(), 2);
        assert_eq!(
            list.subjects()[0],
            GroupSubject::Participant("sub01_ses01".into())
        );
        assert_eq!(list.render(), "sub01_ses01\nsub02_ses01\n");
    }

    #[test]
    fn parses_repeated_measures_lines() {
        let list =
            GroupSubjectList::parse("sub01,ses01\nsub01,rest_1,ses02\n", true).expect("parse");
        assert_eq!(
            list.subjects()[1],
            GroupSubject::Triple {
                subject: "sub01".into(),
                scan: "rest_1".into(),
                session: "ses02".into(),
            }
        );
        assert!(list.repeated_measures());
    }

    #[test]
    fn rejects_format_mismatch_with_line_number() {
        let err = GroupSubjectList::parse("# header\nsub01,ses01\n", false).expect_err("mismatch");
        match err {
            CoreError::GroupListFormat { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("not enabled"));
            }
            other => panic!("expected GroupListFormat, got {other:?}"),
        }

        let err = GroupSubjectList::parse("sub01_ses01\n", true).expect_err("mismatch");
        assert!(matches!(err, CoreError::GroupListFormat { line: 1, .. }));

        let err = GroupSubjectList::parse("a,b,c,d\n", true).expect_err("too many");
        assert!(err.to_string().contains("more than three"));

        let err = GroupSubjectList::parse("a,,c\n", true).expect_err("empty id");
        assert!(err.to_string().contains("empty id"));
    }

    #[test]
    fn retains_participants_with_outputs() {
        let list = GroupSubjectList::parse("sub01,ses01\nsub02,ses01\nsub03,ses02\n", true)
            .expect("parse");
        let paths = [
            "/out/pipeline/sub01_ses01/alff/alff.nii.gz",
            "/out/pipeline/sub03_ses01/alff/alff.nii.gz",
        ];

        let retained = list.retain_present(&paths).expect("some present");
        assert_eq!(retained.list.render(), "sub01,ses01\n");
        assert_eq!(retained.derivative_paths, vec![paths[0].to_string()]);
        assert_eq!(retained.missing.len(), 2);
    }

    #[test]
    fn no_outputs_at_all_is_an_error() {
        let list = GroupSubjectList::parse("sub09_ses01\n", false).expect("parse");
        let err = list
            .retain_present(&["/out/sub01_ses01/alff.nii.gz"])
            .expect_err("nothing present");
        assert!(matches!(err, CoreError::NoDerivativesFound));
    }

    #[test]
    fn generated_lists_parse_back() {
        let lines = repeated_measures_list(&template(), RepeatedMeasures::SessionsAndScans);
        let list = GroupSubjectList::from_lines(&lines, true).expect("parse");
        assert_eq!(list.len(), lines.len());
    }
}
