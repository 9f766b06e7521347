//! Field-level diffing for audit log presentation.
//!
//! Writes go through [`crate::db::audit_logs`]; this module only turns the
//! stored before/after snapshots into display rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDiff {
    pub field: String,
    pub old_value: String,
    pub new_value: String,
}

fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Compare two optional JSON object snapshots field by field.
///
/// Keys are the symmetric union of both sides; a key appearing on only one
/// side diffs against the empty string. Values compare by their stringified
/// form, so `1` and `"1"` are equal. Non-object snapshots diff as a single
/// pseudo-field.
pub fn compute_diff(old_values: Option<&Value>, new_values: Option<&Value>) -> Vec<FieldDiff> {
    let old_obj = old_values.and_then(Value::as_object);
    let new_obj = new_values.and_then(Value::as_object);

    if old_obj.is_none() && new_obj.is_none() {
        // Tolerate scalar payloads rather than erroring on them.
        let old = render(old_values);
        let new = render(new_values);
        if old == new {
            return Vec::new();
        }
        return vec![FieldDiff {
            field: "value".into(),
            old_value: old,
            new_value: new,
        }];
    }

    let keys: BTreeSet<&String> = old_obj
        .iter()
        .flat_map(|m| m.keys())
        .chain(new_obj.iter().flat_map(|m| m.keys()))
        .collect();

    keys.into_iter()
        .filter_map(|key| {
            let old_value = render(old_obj.and_then(|m| m.get(key)));
            let new_value = render(new_obj.and_then(|m| m.get(key)));
            (old_value != new_value).then(|| FieldDiff {
                field: key.clone(),
                old_value,
                new_value,
            })
        })
        .collect()
}

/// One-line human summary of a snapshot pair.
pub fn summarize_diff(old_values: Option<&Value>, new_values: Option<&Value>) -> String {
    match compute_diff(old_values, new_values).len() {
        0 => "No field changes".to_string(),
        1 => "1 field changed".to_string(),
        n => format!("{n} fields changed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reports_changed_fields_only() {
        let old = json!({"role": "viewer", "name": "Dana"});
        let new = json!({"role": "finance", "name": "Dana"});

        let diffs = compute_diff(Some(&old), Some(&new));

        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].field, "role");
        assert_eq!(diffs[0].old_value, "viewer");
        assert_eq!(diffs[0].new_value, "finance");
    }

    #[test]
    fn key_discovery_is_symmetric() {
        let old = json!({"removed": "x"});
        let new = json!({"added": "y"});

        let diffs = compute_diff(Some(&old), Some(&new));

        let fields: Vec<&str> = diffs.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["added", "removed"]);
        assert_eq!(diffs[0].old_value, "");
        assert_eq!(diffs[1].new_value, "");
    }

    #[test]
    fn stringified_comparison_treats_number_and_string_alike() {
        let old = json!({"count": 3});
        let new = json!({"count": "3"});

        assert!(compute_diff(Some(&old), Some(&new)).is_empty());
    }

    #[test]
    fn null_values_compare_as_empty() {
        let old = json!({"note": null});
        let new = json!({"note": ""});

        assert!(compute_diff(Some(&old), Some(&new)).is_empty());

        let diffs = compute_diff(Some(&json!({"note": null})), Some(&json!({"note": "hi"})));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].old_value, "");
    }

    #[test]
    fn missing_sides_are_tolerated() {
        assert!(compute_diff(None, None).is_empty());

        let new = json!({"role": "admin"});
        let diffs = compute_diff(None, Some(&new));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].new_value, "admin");
    }

    #[test]
    fn nested_values_diff_by_serialized_form() {
        let old = json!({"access": ["Finance"]});
        let new = json!({"access": ["Finance", "Recruiter"]});

        let diffs = compute_diff(Some(&old), Some(&new));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].old_value, "[\"Finance\"]");
    }

    #[test]
    fn summary_counts_read_naturally() {
        let old = json!({"a": 1, "b": 2});
        let new = json!({"a": 2, "b": 3});

        assert_eq!(summarize_diff(Some(&old), Some(&new)), "2 fields changed");
        assert_eq!(summarize_diff(Some(&old), Some(&old)), "No field changes");
        assert_eq!(
            summarize_diff(Some(&json!({"a": 1})), Some(&json!({"a": 2}))),
            "1 field changed"
        );
    }
}
