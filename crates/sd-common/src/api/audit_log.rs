use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub table_name: Option<String>,
    pub record_id: Option<Uuid>,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// What a sensitive mutation hands to the recorder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditEvent {
    pub user_id: Option<Uuid>,
    pub action: String,
    pub table_name: Option<String>,
    pub record_id: Option<Uuid>,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
}

impl AuditEvent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn by(mut self, user_id: Option<Uuid>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn on(mut self, table_name: impl Into<String>, record_id: Uuid) -> Self {
        self.table_name = Some(table_name.into());
        self.record_id = Some(record_id);
        self
    }

    pub fn old(mut self, values: Value) -> Self {
        self.old_values = Some(values);
        self
    }

    pub fn new_values(mut self, values: Value) -> Self {
        self.new_values = Some(values);
        self
    }
}
