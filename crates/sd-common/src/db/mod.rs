pub mod activities;
pub mod audit_logs;
pub mod clients;
pub mod custom_fields;
pub mod custom_values;
pub mod employees;
pub mod invoices;
pub mod jobs;
pub mod kpi_targets;
pub mod migrations;
pub mod payments;
pub mod pool;
pub mod prospects;
pub mod scores;
pub mod user_roles;
pub mod util;

/// Storage error enum with the shared `Pool`/`Postgres` variants prepended.
/// Module-specific variants (with their `#[error]` attributes) pass through.
macro_rules! db_error {
    ($name:ident { $($body:tt)* }) => {
        #[derive(Debug, thiserror::Error)]
        pub enum $name {
            #[error("failed to get postgres connection: {0}")]
            Pool(#[from] deadpool_postgres::PoolError),
            #[error("postgres error: {0}")]
            Postgres(#[from] tokio_postgres::Error),
            $($body)*
        }
    };
}

pub(crate) use db_error;

// Keep re-exports unique so downstream crates see a single symbol per helper.
pub use activities::{
    insert_am_activity, insert_recruiter_activity, list_am_activities, list_recruiter_activities,
    list_recruiter_activities_in_window, ActivityStorageError,
};
pub use audit_logs::{list_recent_audit_logs, record_event, record_event_best_effort, AuditStorageError};
pub use clients::{
    delete_client, insert_client, list_client_refs, list_client_statuses, list_clients,
    update_client, ClientStorageError,
};
pub use custom_fields::{
    create_custom_field, delete_custom_field, list_custom_fields, update_custom_field,
    CustomFieldStorageError,
};
pub use custom_values::{
    bulk_upsert_custom_values, list_custom_values, upsert_custom_value, CustomValueStorageError,
};
pub use employees::{
    insert_employee, list_active_recruiters, list_employees, EmployeeStorageError,
};
pub use invoices::{insert_invoice, list_invoice_refs, list_invoices, update_invoice, InvoiceStorageError};
pub use jobs::{
    assign_recruiter, delete_job, insert_job, list_job_assignments, list_job_counters, list_jobs,
    unassign_recruiter, update_job, JobStorageError,
};
pub use kpi_targets::{list_kpi_targets, update_kpi_target, KpiTargetStorageError};
pub use migrations::{run_migrations, MigrationError};
pub use payments::{insert_payment, list_payment_amounts, list_payments, PaymentStorageError};
pub use pool::{create_pool_from_url, create_pool_from_url_checked, DbPoolError, PgPool};
pub use prospects::{
    delete_prospect, insert_prospect, list_prospects, update_prospect, ProspectStorageError,
};
pub use scores::{insert_score, list_scores, update_score, ScoreStorageError};
pub use user_roles::{get_user_role, list_user_roles, upsert_user_role, UserRoleStorageError};
