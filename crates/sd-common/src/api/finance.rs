use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_no: String,
    pub client_id: Uuid,
    pub client_name: Option<String>,
    pub billing_month: String,
    pub amount: f64,
    pub sent_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceInsert {
    pub invoice_no: String,
    pub client_id: Uuid,
    pub billing_month: String,
    pub amount: f64,
    pub sent_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    #[serde(default = "default_invoice_status")]
    pub status: InvoiceStatus,
}

fn default_invoice_status() -> InvoiceStatus {
    InvoiceStatus::Draft
}

/// The invoice fields aging and overdue math consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRef {
    pub client_id: Uuid,
    pub amount: f64,
    pub due_date: Option<NaiveDate>,
    pub status: InvoiceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: Option<String>,
    pub invoice_id: Option<Uuid>,
    pub invoice_no: Option<String>,
    pub amount: f64,
    pub date_received: NaiveDate,
    pub payment_mode: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInsert {
    pub client_id: Uuid,
    pub invoice_id: Option<Uuid>,
    pub amount: f64,
    pub date_received: Option<NaiveDate>,
    #[serde(default)]
    pub payment_mode: String,
    pub notes: Option<String>,
}
