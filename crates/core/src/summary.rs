//! Aggregate counts over a data configuration.

use dataconfig::{DataConfig, Locator};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SiteSummary {
    pub entries: usize,
    pub subjects: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub entries: usize,
    /// Distinct `(site, subject_id)` pairs.
    pub subjects: usize,
    /// Distinct `(site, subject_id, unique_id)` triples.
    pub sessions: usize,
    pub functional_scans: usize,
    /// Entries whose anatomical scan is on the local filesystem.
    pub local_entries: usize,
    /// Entries whose anatomical scan is in object storage.
    pub remote_entries: usize,
    pub with_credentials: usize,
    pub sites: BTreeMap<String, SiteSummary>,
}

pub fn summarise(config: &DataConfig) -> Summary {
    let mut summary = Summary {
        entries: config.len(),
        ..Summary::default()
    };

    let mut subjects = BTreeSet::new();
    let mut sessions = BTreeSet::new();
    let mut site_subjects: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for entry in config {
        let (site, subject, session) = entry.key();
        subjects.insert((site, subject));
        sessions.insert((site, subject, session));
        site_subjects.entry(site).or_default().insert(subject);

        summary.functional_scans += entry.func.len();
        if entry.creds_path.is_some() {
            summary.with_credentials += 1;
        }
        match Locator::parse(entry.anat.as_str()) {
            Ok(locator) if locator.is_remote() => summary.remote_entries += 1,
            Ok(_) => summary.local_entries += 1,
            Err(_) => {}
        }

        summary.sites.entry(site.to_string()).or_default().entries += 1;
    }

    for (site, members) in site_subjects {
        if let Some(site_summary) = summary.sites.get_mut(site) {
            site_summary.subjects = members.len();
        }
    }

    summary.subjects = subjects.len();
    summary.sessions = sessions.len();
    summary
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "entries:          {}", self.entries)?;
        writeln!(f, "subjects:         {}", self.subjects)?;
        writeln!(f, "sessions:         {}", self.sessions)?;
        writeln!(f, "functional scans: {}", self.functional_scans)?;
        writeln!(
            f,
            "storage:          {} local, {} remote",
            self.local_entries, self.remote_entries
        )?;
        writeln!(f, "with credentials: {}", self.with_credentials)?;
        for (site, counts) in &self.sites {
            writeln!(
                f,
                "  {site}: {} entries, {} subjects",
                counts.entries, counts.subjects
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataconfig::template::TEMPLATE;

    #[test]
    fn summarises_template() {
        let config = DataConfig::parse(TEMPLATE).expect("parse");
        let summary = summarise(&config);

        assert_eq!(summary.entries, 3);
        assert_eq!(summary.subjects, 3);
        assert_eq!(summary.sessions, 3);
        assert_eq!(summary.functional_scans, 4);
        assert_eq!(summary.local_entries, 2);
        assert_eq!(summary.remote_entries, 1);
        assert_eq!(summary.with_credentials, 1);
        assert_eq!(
            summary.sites["site01"],
            SiteSummary {
                entries: 2,
                subjects: 2
            }
        );
        assert_eq!(summary.sites["site02"].entries, 1);
    }

    #[test]
    fn repeated_sessions_count_one_subject() {
        let config = DataConfig::parse(
            r#"
- anat: /data/sub01/ses01/anat.nii.gz
  func: {}
  site: site01
  subject_id: sub01
  unique_id: ses01
- anat: /data/sub01/ses02/anat.nii.gz
  func: {}
  site: site01
  subject_id: sub01
  unique_id: ses02
"#,
        )
        .expect("parse");

        let summary = summarise(&config);
        assert_eq!(summary.subjects, 1);
        assert_eq!(summary.sessions, 2);
        assert_eq!(summary.sites["site01"].subjects, 1);
    }

    #[test]
    fn serialises_to_json() {
        let summary = summarise(&DataConfig::default());
        let json = serde_json::to_value(&summary).expect("json");
        assert_eq!(json["entries"], 0);
        assert!(json["sites"].as_object().expect("object").is_empty());
    }
}
