//! The bundled data-configuration template.
//!
//! The template is documentation by example: it shows local and S3-hosted entries, bare and
//! detailed functional scans, and the three forms `scan_parameters` can take. Some values are
//! deliberately prose placeholders (e.g. `null (or) /path/to/AWS_credentials.csv`) for a human
//! to replace, so the file parses but does not describe real data.

/// File name the template is conventionally written to.
pub const TEMPLATE_FILE_NAME: &str = "data_config_template.yml";

/// Template text, exactly as shipped.
pub const TEMPLATE: &str = include_str!("../templates/data_config_template.yml");

/// Keys every template entry carries.
pub const ENTRY_KEYS: [&str; 6] = [
    "anat",
    "creds_path",
    "func",
    "site",
    "subject_id",
    "unique_id",
];

pub fn template_text() -> &'static str {
    TEMPLATE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataConfig, Locator};
    use serde_yaml::Value;

    fn raw_entries() -> Vec<Value> {
        let doc: Value = serde_yaml::from_str(TEMPLATE).expect("template is valid YAML");
        match doc {
            Value::Sequence(items) => items,
            other => panic!("expected a sequence, got {other:?}"),
        }
    }

    #[test]
    fn template_is_a_sequence_of_mappings() {
        let entries = raw_entries();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(Value::is_mapping));
    }

    #[test]
    fn every_entry_has_exactly_the_entry_keys() {
        for entry in raw_entries() {
            let mapping = entry.as_mapping().expect("mapping");
            let mut keys: Vec<&str> = mapping.keys().filter_map(Value::as_str).collect();
            keys.sort_unstable();
            assert_eq!(keys, ENTRY_KEYS);
        }
    }

    #[test]
    fn func_values_are_non_empty_strings_or_scan_mappings() {
        fn assert_strings(value: &Value) {
            match value {
                Value::String(s) => assert!(!s.trim().is_empty()),
                Value::Mapping(map) => {
                    for (key, inner) in map {
                        if key.as_str() == Some("scan_parameters") && inner.is_mapping() {
                            continue;
                        }
                        assert_strings(inner);
                    }
                }
                other => panic!("unexpected func value {other:?}"),
            }
        }

        for entry in raw_entries() {
            let func = entry.get("func").expect("func key");
            let func = func.as_mapping().expect("func is a mapping");
            assert!(!func.is_empty());
            for value in func.values() {
                assert_strings(value);
            }
        }
    }

    #[test]
    fn first_entry_is_a_local_session() {
        let config = DataConfig::parse(TEMPLATE).expect("template parses");
        let first = &config.entries[0];
        assert_eq!(first.site.as_str(), "site01");
        assert_eq!(first.subject_id.as_str(), "sub01");
        assert_eq!(first.unique_id.as_str(), "ses01");
        assert_eq!(
            first.func["scan_1"].scan.as_str(),
            "/path/to/site01/sub01/ses01/scan_1_func.nii.gz"
        );
    }

    #[test]
    fn third_entry_is_remote_with_placeholder_credentials() {
        let config = DataConfig::parse(TEMPLATE).expect("template parses");
        let third = &config.entries[2];
        assert!(third.anat.as_str().starts_with("s3://"));
        assert!(Locator::parse(third.anat.as_str())
            .expect("locator")
            .is_s3());
        assert_eq!(
            third.creds_path.as_ref().map(|c| c.as_str()),
            Some("null (or) /path/to/AWS_credentials.csv")
        );
    }

    #[test]
    fn template_text_matches_constant() {
        assert_eq!(template_text(), TEMPLATE);
        assert!(TEMPLATE.starts_with('#'));
    }
}
