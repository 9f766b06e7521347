use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::AppRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRole {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: AppRole,
    pub department_access: Vec<String>,
    pub department_edit_access: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin listing row: every known user with their role assignment, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: Uuid,
    pub role: Option<AppRole>,
    pub department_access: Vec<String>,
    pub department_edit_access: Vec<String>,
}
