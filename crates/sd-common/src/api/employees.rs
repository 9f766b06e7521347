use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Internal staff classification. This is the staffing-side role, not the
/// dashboard login role ([`crate::access::AppRole`]).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
pub enum EmployeeRole {
    #[serde(rename = "Account Manager")]
    #[strum(serialize = "Account Manager")]
    AccountManager,
    #[serde(rename = "Recruiter")]
    #[strum(serialize = "Recruiter")]
    Recruiter,
    #[serde(rename = "Business Development")]
    #[strum(serialize = "Business Development")]
    BusinessDevelopment,
    #[serde(rename = "Operations Manager")]
    #[strum(serialize = "Operations Manager")]
    OperationsManager,
    #[serde(rename = "Owner")]
    #[strum(serialize = "Owner")]
    Owner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub role: EmployeeRole,
    pub department: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeInsert {
    pub name: String,
    pub email: Option<String>,
    pub role: EmployeeRole,
    pub department: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Minimal identity pair used by aggregations and template generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRef {
    pub id: Uuid,
    pub name: String,
}
