use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::custom_fields::CustomFieldType;

/// Text values longer than this are truncated with a warning.
const MAX_TEXT_LEN: usize = 500;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// The value was rejected and nulled.
    Error,
    /// The value was kept (possibly adjusted) but deserves attention.
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub row: usize,
    pub column: String,
    pub message: String,
    pub severity: IssueSeverity,
}

/// Outcome of validating a single cell: the value to store (None when the
/// cell was blank or rejected) plus an optional issue.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedValue {
    pub value: Option<String>,
    pub issue: Option<ValidationIssue>,
}

impl ValidatedValue {
    fn ok(value: Option<String>) -> Self {
        Self { value, issue: None }
    }

    fn error(row: usize, column: &str, message: String) -> Self {
        Self {
            value: None,
            issue: Some(ValidationIssue {
                row,
                column: column.to_string(),
                message,
                severity: IssueSeverity::Error,
            }),
        }
    }
}

fn parse_numeric(raw: &str) -> Option<f64> {
    raw.replace(['$', ','], "").trim().parse::<f64>().ok()
}

/// Validate one cell against the field's declared type.
///
/// Blank cells are accepted as empty without comment. Numeric types strip
/// currency symbols and thousands separators; percentages must land in
/// [0, 100]; dates normalize to `YYYY-MM-DD`; over-long text is truncated and
/// reported as a warning rather than rejected.
pub fn validate_value(
    raw: &str,
    field_type: CustomFieldType,
    row: usize,
    column: &str,
) -> ValidatedValue {
    let raw = raw.trim();
    if raw.is_empty() {
        return ValidatedValue::ok(None);
    }

    match field_type {
        CustomFieldType::Number => match parse_numeric(raw) {
            Some(num) => ValidatedValue::ok(Some(format_number(num))),
            None => ValidatedValue::error(row, column, format!("Invalid number: \"{raw}\"")),
        },
        CustomFieldType::Currency => match parse_numeric(raw) {
            Some(num) => ValidatedValue::ok(Some(format_number(num))),
            None => ValidatedValue::error(row, column, format!("Invalid currency: \"{raw}\"")),
        },
        CustomFieldType::Percentage => {
            let stripped = raw.replace('%', "");
            match stripped.trim().parse::<f64>() {
                Ok(num) if (0.0..=100.0).contains(&num) => {
                    ValidatedValue::ok(Some(format_number(num)))
                }
                _ => ValidatedValue::error(
                    row,
                    column,
                    format!("Invalid percentage (0-100): \"{raw}\""),
                ),
            }
        }
        CustomFieldType::Date => match parse_date(raw) {
            Some(date) => ValidatedValue::ok(Some(date.format("%Y-%m-%d").to_string())),
            None => ValidatedValue::error(row, column, format!("Invalid date: \"{raw}\"")),
        },
        CustomFieldType::Text => {
            if raw.chars().count() > MAX_TEXT_LEN {
                let truncated: String = raw.chars().take(MAX_TEXT_LEN).collect();
                ValidatedValue {
                    value: Some(truncated),
                    issue: Some(ValidationIssue {
                        row,
                        column: column.to_string(),
                        message: format!("Text truncated to {MAX_TEXT_LEN} characters"),
                        severity: IssueSeverity::Warning,
                    }),
                }
            } else {
                ValidatedValue::ok(Some(raw.to_string()))
            }
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Render a parsed number the way the store keeps values: integral numbers
/// without a trailing `.0`.
fn format_number(num: f64) -> String {
    if num.fract() == 0.0 && num.abs() < 1e15 {
        format!("{}", num as i64)
    } else {
        format!("{num}")
    }
}

/// Lenient numeric parse used for standard (untyped) KPI columns.
pub fn parse_standard_numeric(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(['$', ',', '%'], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_cells_pass_through_empty() {
        let v = validate_value("   ", CustomFieldType::Number, 2, "Hours");
        assert_eq!(v.value, None);
        assert!(v.issue.is_none());
    }

    #[test]
    fn numbers_strip_separators_and_symbols() {
        let v = validate_value("$1,250", CustomFieldType::Number, 2, "Hours");
        assert_eq!(v.value.as_deref(), Some("1250"));

        let v = validate_value("12.5", CustomFieldType::Number, 2, "Hours");
        assert_eq!(v.value.as_deref(), Some("12.5"));
    }

    #[test]
    fn invalid_numbers_are_nulled_with_an_error() {
        let v = validate_value("twelve", CustomFieldType::Number, 4, "Hours");
        assert_eq!(v.value, None);
        let issue = v.issue.unwrap();
        assert_eq!(issue.severity, IssueSeverity::Error);
        assert_eq!(issue.row, 4);
        assert!(issue.message.contains("twelve"));
    }

    #[test]
    fn currency_parses_like_number() {
        let v = validate_value("$3,000.50", CustomFieldType::Currency, 2, "Revenue");
        assert_eq!(v.value.as_deref(), Some("3000.5"));

        let v = validate_value("n/a", CustomFieldType::Currency, 2, "Revenue");
        assert!(v.issue.unwrap().message.starts_with("Invalid currency"));
    }

    #[test]
    fn percentage_enforces_the_inclusive_range() {
        let v = validate_value("85%", CustomFieldType::Percentage, 2, "Coverage");
        assert_eq!(v.value.as_deref(), Some("85"));

        for raw in ["150%", "-3", "soon"] {
            let v = validate_value(raw, CustomFieldType::Percentage, 2, "Coverage");
            assert_eq!(v.value, None, "{raw}");
            assert!(v
                .issue
                .unwrap()
                .message
                .starts_with("Invalid percentage (0-100)"));
        }

        // Boundaries are inclusive.
        assert_eq!(
            validate_value("0", CustomFieldType::Percentage, 2, "Coverage").value.as_deref(),
            Some("0")
        );
        assert_eq!(
            validate_value("100", CustomFieldType::Percentage, 2, "Coverage").value.as_deref(),
            Some("100")
        );
    }

    #[test]
    fn dates_normalize_to_iso() {
        for raw in ["2026-07-31", "07/31/2026", "2026/07/31"] {
            let v = validate_value(raw, CustomFieldType::Date, 2, "Review Date");
            assert_eq!(v.value.as_deref(), Some("2026-07-31"), "{raw}");
        }

        let v = validate_value("soon", CustomFieldType::Date, 2, "Review Date");
        assert_eq!(v.value, None);
        assert!(v.issue.unwrap().message.starts_with("Invalid date"));
    }

    #[test]
    fn long_text_truncates_with_a_warning() {
        let raw = "x".repeat(620);
        let v = validate_value(&raw, CustomFieldType::Text, 3, "Notes");

        assert_eq!(v.value.as_ref().unwrap().chars().count(), 500);
        let issue = v.issue.unwrap();
        assert_eq!(issue.severity, IssueSeverity::Warning);
    }

    #[test]
    fn short_text_is_kept_verbatim() {
        let v = validate_value("met hiring target", CustomFieldType::Text, 3, "Notes");
        assert_eq!(v.value.as_deref(), Some("met hiring target"));
        assert!(v.issue.is_none());
    }

    #[test]
    fn standard_numeric_parse_is_lenient() {
        assert_eq!(parse_standard_numeric("$1,000"), Some(1000.0));
        assert_eq!(parse_standard_numeric("85%"), Some(85.0));
        assert_eq!(parse_standard_numeric(""), None);
        assert_eq!(parse_standard_numeric("n/a"), None);
    }
}
