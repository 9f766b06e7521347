use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::access::Department;

/// Declared value type of a custom KPI field; drives import validation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CustomFieldType {
    Text,
    Number,
    Currency,
    Percentage,
    Date,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomKpiField {
    pub id: Uuid,
    pub department: Department,
    pub field_name: String,
    pub field_type: CustomFieldType,
    pub field_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomKpiFieldInsert {
    pub department: Department,
    pub field_name: String,
    pub field_type: CustomFieldType,
    /// Defaults to max(existing order in department) + 1 when omitted.
    pub field_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomKpiFieldUpdate {
    pub field_name: Option<String>,
    pub field_type: Option<CustomFieldType>,
    pub field_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomKpiValue {
    pub id: Uuid,
    pub custom_field_id: Uuid,
    pub employee_id: Uuid,
    pub period: String,
    pub value: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload; (custom_field_id, employee_id, period) is the unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomKpiValueUpsert {
    pub custom_field_id: Uuid,
    pub employee_id: Uuid,
    pub period: String,
    pub value: Option<String>,
}
