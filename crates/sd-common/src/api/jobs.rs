use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
pub enum JobStatus {
    #[serde(rename = "Open")]
    #[strum(serialize = "Open")]
    Open,
    #[serde(rename = "On Hold")]
    #[strum(serialize = "On Hold")]
    OnHold,
    #[serde(rename = "Interviewing")]
    #[strum(serialize = "Interviewing")]
    Interviewing,
    #[serde(rename = "Offer Made")]
    #[strum(serialize = "Offer Made")]
    OfferMade,
    #[serde(rename = "Filled")]
    #[strum(serialize = "Filled")]
    Filled,
    #[serde(rename = "Closed - No Hire")]
    #[strum(serialize = "Closed - No Hire")]
    ClosedNoHire,
}

impl JobStatus {
    /// Filled and closed-without-hire jobs no longer count as active work.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Filled | JobStatus::ClosedNoHire)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
pub enum PriorityLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: Option<String>,
    pub title: String,
    pub priority: PriorityLevel,
    pub open_date: NaiveDate,
    pub status: JobStatus,
    pub submissions: i32,
    pub interviews: i32,
    pub offers: i32,
    pub starts: i32,
    pub recruiters_assigned: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInsert {
    pub client_id: Uuid,
    pub title: String,
    #[serde(default = "default_priority")]
    pub priority: PriorityLevel,
    pub open_date: Option<NaiveDate>,
    #[serde(default = "default_status")]
    pub status: JobStatus,
    #[serde(default)]
    pub submissions: i32,
    #[serde(default)]
    pub interviews: i32,
    #[serde(default)]
    pub offers: i32,
    #[serde(default)]
    pub starts: i32,
}

fn default_priority() -> PriorityLevel {
    PriorityLevel::Medium
}

fn default_status() -> JobStatus {
    JobStatus::Open
}

/// One recruiter-to-job assignment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAssignment {
    pub job_id: Uuid,
    pub employee_id: Uuid,
}

/// The per-job fields the owner dashboard aggregates over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCounters {
    pub id: Uuid,
    pub status: JobStatus,
    pub submissions: i32,
    pub interviews: i32,
    pub offers: i32,
    pub starts: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(JobStatus::Filled.is_terminal());
        assert!(JobStatus::ClosedNoHire.is_terminal());
        assert!(!JobStatus::Open.is_terminal());
        assert!(!JobStatus::Interviewing.is_terminal());
    }

    #[test]
    fn job_status_wire_form_uses_display_names() {
        assert_eq!(JobStatus::ClosedNoHire.as_ref(), "Closed - No Hire");
        assert_eq!(
            "On Hold".parse::<JobStatus>().unwrap(),
            JobStatus::OnHold
        );
        let json = serde_json::to_string(&JobStatus::OfferMade).unwrap();
        assert_eq!(json, "\"Offer Made\"");
    }
}
