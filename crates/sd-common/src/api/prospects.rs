use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
pub enum BdStage {
    #[serde(rename = "Lead")]
    #[strum(serialize = "Lead")]
    Lead,
    #[serde(rename = "Contacted")]
    #[strum(serialize = "Contacted")]
    Contacted,
    #[serde(rename = "Meeting Scheduled")]
    #[strum(serialize = "Meeting Scheduled")]
    MeetingScheduled,
    #[serde(rename = "Proposal Sent")]
    #[strum(serialize = "Proposal Sent")]
    ProposalSent,
    #[serde(rename = "Negotiation")]
    #[strum(serialize = "Negotiation")]
    Negotiation,
    #[serde(rename = "Closed Won")]
    #[strum(serialize = "Closed Won")]
    ClosedWon,
    #[serde(rename = "Closed Lost")]
    #[strum(serialize = "Closed Lost")]
    ClosedLost,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BdProspect {
    pub id: Uuid,
    pub prospect_name: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub industry: Option<String>,
    pub stage: BdStage,
    /// Win probability, 0–100.
    pub probability: i32,
    pub bd_owner_id: Option<Uuid>,
    pub last_follow_up: Option<NaiveDate>,
    pub next_action: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BdProspectInsert {
    pub prospect_name: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub industry: Option<String>,
    #[serde(default = "default_stage")]
    pub stage: BdStage,
    #[serde(default)]
    pub probability: i32,
    pub bd_owner_id: Option<Uuid>,
    pub last_follow_up: Option<NaiveDate>,
    pub next_action: Option<String>,
}

fn default_stage() -> BdStage {
    BdStage::Lead
}
