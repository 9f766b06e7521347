use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
pub enum ClientStatus {
    Active,
    Hold,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    /// Owning account manager; clients without one render as "Unassigned".
    pub account_manager_id: Option<Uuid>,
    pub account_manager_name: Option<String>,
    pub billing_type: String,
    pub payment_terms: String,
    pub status: ClientStatus,
    pub last_payment_date: Option<NaiveDate>,
    pub outstanding: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInsert {
    pub name: String,
    pub account_manager_id: Option<Uuid>,
    #[serde(default)]
    pub billing_type: String,
    #[serde(default)]
    pub payment_terms: String,
    #[serde(default = "default_status")]
    pub status: ClientStatus,
    pub last_payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub outstanding: f64,
}

fn default_status() -> ClientStatus {
    ClientStatus::Active
}

/// Identity plus receivable balance, the inputs the aging table needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRef {
    pub id: Uuid,
    pub name: String,
    pub outstanding: f64,
}
