use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Daily recruiter activity counters; append-only from the dashboard's side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecruiterActivity {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub job_id: Uuid,
    pub activity_date: NaiveDate,
    pub resumes_sourced: i32,
    pub submitted: i32,
    pub am_submissions: i32,
    pub end_client_submissions: i32,
    pub feedback_received: i32,
    pub interviews_scheduled: i32,
    pub hired: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecruiterActivityInsert {
    pub employee_id: Uuid,
    pub job_id: Uuid,
    pub activity_date: Option<NaiveDate>,
    #[serde(default)]
    pub resumes_sourced: i32,
    #[serde(default)]
    pub submitted: i32,
    #[serde(default)]
    pub am_submissions: i32,
    #[serde(default)]
    pub end_client_submissions: i32,
    #[serde(default)]
    pub feedback_received: i32,
    #[serde(default)]
    pub interviews_scheduled: i32,
    #[serde(default)]
    pub hired: i32,
}

/// Account-manager follow-up log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmActivity {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub client_id: Uuid,
    pub activity_date: NaiveDate,
    pub action_taken: String,
    pub outcome: Option<String>,
    pub next_step: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmActivityInsert {
    pub employee_id: Uuid,
    pub client_id: Uuid,
    pub activity_date: Option<NaiveDate>,
    pub action_taken: String,
    pub outcome: Option<String>,
    pub next_step: Option<String>,
}
