use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::custom_fields::{CustomKpiField, CustomKpiValueUpsert};
use crate::fields::validate::{
    parse_standard_numeric, validate_value, IssueSeverity, ValidationIssue,
};

/// A decoded spreadsheet: one header row plus data rows. Column 0 is the
/// employee id, column 1 the employee name; remaining columns are standard
/// KPI names or custom field names. The file-format decode happens upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One imported employee row: the lenient standard-KPI numbers plus the
/// validated custom-field values keyed by field id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedRow {
    pub employee_id: Uuid,
    pub employee_name: String,
    pub standard_values: HashMap<String, f64>,
    pub custom_values: HashMap<Uuid, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub rows: Vec<ImportedRow>,
    pub issues: Vec<ValidationIssue>,
}

impl ImportOutcome {
    /// Issues that rejected a value (warnings kept their value).
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Error)
            .count()
    }

    /// The custom-field upserts that survived validation, for the given
    /// period. This is the "import valid rows only" set: failed cells are
    /// absent, sibling cells of the same row are unaffected.
    pub fn valid_upserts(&self, period: &str) -> Vec<CustomKpiValueUpsert> {
        self.rows
            .iter()
            .flat_map(|row| {
                row.custom_values.iter().map(|(field_id, value)| CustomKpiValueUpsert {
                    custom_field_id: *field_id,
                    employee_id: row.employee_id,
                    period: period.to_string(),
                    value: Some(value.clone()),
                })
            })
            .collect()
    }
}

/// Validate a whole grid against the department's custom field definitions.
///
/// Failures never abort the batch: each bad cell is nulled and reported, rows
/// without a parseable employee id are skipped with an error, and everything
/// else is returned for saving.
pub fn parse_import_grid(grid: &ImportGrid, custom_fields: &[CustomKpiField]) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();

    if grid.headers.len() < 2 || grid.rows.is_empty() {
        outcome.issues.push(ValidationIssue {
            row: 0,
            column: String::new(),
            message: "File is empty or has no data rows".into(),
            severity: IssueSeverity::Error,
        });
        return outcome;
    }

    let fields_by_name: HashMap<&str, &CustomKpiField> = custom_fields
        .iter()
        .map(|field| (field.field_name.as_str(), field))
        .collect();

    for (idx, cells) in grid.rows.iter().enumerate() {
        // Spreadsheet-style row number: header is row 1.
        let row_no = idx + 2;

        if cells.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let raw_id = cells.first().map(String::as_str).unwrap_or("").trim();
        let employee_id = match raw_id.parse::<Uuid>() {
            Ok(id) => id,
            Err(_) => {
                outcome.issues.push(ValidationIssue {
                    row: row_no,
                    column: "Employee ID".into(),
                    message: if raw_id.is_empty() {
                        "Employee ID is required".into()
                    } else {
                        format!("Invalid employee id: \"{raw_id}\"")
                    },
                    severity: IssueSeverity::Error,
                });
                continue;
            }
        };

        let mut row = ImportedRow {
            employee_id,
            employee_name: cells.get(1).cloned().unwrap_or_default(),
            standard_values: HashMap::new(),
            custom_values: HashMap::new(),
        };

        for (col, header) in grid.headers.iter().enumerate().skip(2) {
            let raw = cells.get(col).map(String::as_str).unwrap_or("");

            match fields_by_name.get(header.as_str()) {
                Some(field) => {
                    let validated = validate_value(raw, field.field_type, row_no, header);
                    if let Some(issue) = validated.issue {
                        outcome.issues.push(issue);
                    }
                    if let Some(value) = validated.value {
                        row.custom_values.insert(field.id, value);
                    }
                }
                None => {
                    // Standard KPI column; lenient numeric parse, no errors.
                    if let Some(num) = parse_standard_numeric(raw) {
                        row.standard_values.insert(header.clone(), num);
                    }
                }
            }
        }

        outcome.rows.push(row);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Department;
    use crate::api::custom_fields::CustomFieldType;
    use chrono::{DateTime, Utc};

    fn field(name: &str, field_type: CustomFieldType) -> CustomKpiField {
        CustomKpiField {
            id: Uuid::new_v4(),
            department: Department::Recruiter,
            field_name: name.into(),
            field_type,
            field_order: 0,
            is_active: true,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn grid(headers: &[&str], rows: &[&[&str]]) -> ImportGrid {
        ImportGrid {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|cells| cells.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn bad_percentage_excludes_that_cell_but_keeps_siblings() {
        let coverage = field("Coverage", CustomFieldType::Percentage);
        let notes = field("Notes", CustomFieldType::Text);
        let employee = Uuid::new_v4();
        let id = employee.to_string();

        let grid = grid(
            &["Employee ID", "Employee Name", "Coverage", "Notes"],
            &[&[id.as_str(), "Priya", "150%", "strong week"]],
        );

        let outcome = parse_import_grid(&grid, &[coverage.clone(), notes.clone()]);

        assert_eq!(outcome.error_count(), 1);
        assert!(outcome.issues[0].message.starts_with("Invalid percentage (0-100)"));

        let row = &outcome.rows[0];
        assert!(!row.custom_values.contains_key(&coverage.id));
        assert_eq!(row.custom_values.get(&notes.id).map(String::as_str), Some("strong week"));

        let upserts = outcome.valid_upserts("2026-07");
        assert_eq!(upserts.len(), 1);
        assert_eq!(upserts[0].custom_field_id, notes.id);
        assert_eq!(upserts[0].employee_id, employee);
    }

    #[test]
    fn rows_without_an_employee_id_are_skipped_with_an_error() {
        let notes = field("Notes", CustomFieldType::Text);
        let grid = grid(
            &["Employee ID", "Employee Name", "Notes"],
            &[&["", "Ghost", "hello"], &["not-a-uuid", "Typo", "hi"]],
        );

        let outcome = parse_import_grid(&grid, &[notes]);

        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.error_count(), 2);
        assert_eq!(outcome.issues[0].message, "Employee ID is required");
        assert!(outcome.issues[1].message.contains("not-a-uuid"));
    }

    #[test]
    fn standard_columns_parse_leniently_without_errors() {
        let employee = Uuid::new_v4();
        let id = employee.to_string();
        let grid = grid(
            &["Employee ID", "Employee Name", "AM Submissions", "Revenue Generated"],
            &[&[id.as_str(), "Priya", "7", "$2,500"]],
        );

        let outcome = parse_import_grid(&grid, &[]);

        assert!(outcome.issues.is_empty());
        let row = &outcome.rows[0];
        assert_eq!(row.standard_values.get("AM Submissions"), Some(&7.0));
        assert_eq!(row.standard_values.get("Revenue Generated"), Some(&2500.0));
    }

    #[test]
    fn empty_grid_reports_a_single_error() {
        let outcome = parse_import_grid(&grid(&["Employee ID", "Employee Name"], &[]), &[]);
        assert_eq!(outcome.error_count(), 1);
        assert!(outcome.issues[0].message.contains("empty"));
    }

    #[test]
    fn blank_rows_are_silently_skipped() {
        let employee = Uuid::new_v4();
        let id = employee.to_string();
        let grid = grid(
            &["Employee ID", "Employee Name", "Notes"],
            &[&["", "", ""], &[id.as_str(), "Priya", "ok"]],
        );

        let outcome = parse_import_grid(&grid, &[field("Notes", CustomFieldType::Text)]);

        assert_eq!(outcome.rows.len(), 1);
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn warnings_keep_their_value_in_the_save_set() {
        let notes = field("Notes", CustomFieldType::Text);
        let employee = Uuid::new_v4();
        let id = employee.to_string();
        let long = "y".repeat(600);

        let grid = grid(
            &["Employee ID", "Employee Name", "Notes"],
            &[&[id.as_str(), "Priya", long.as_str()]],
        );

        let outcome = parse_import_grid(&grid, &[notes.clone()]);

        assert_eq!(outcome.error_count(), 0);
        assert_eq!(outcome.issues.len(), 1);
        let upserts = outcome.valid_upserts("2026-07");
        assert_eq!(upserts.len(), 1);
        assert_eq!(upserts[0].value.as_ref().unwrap().chars().count(), 500);
    }
}
