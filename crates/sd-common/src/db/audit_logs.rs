use tracing::{instrument, warn};

use crate::api::audit_log::{AuditEvent, AuditLogEntry};
use crate::db::util::{normalize_json, TimedClientExt};
use crate::db::{db_error, PgPool};

/// Hard cap on one audit listing page.
const MAX_PAGE_SIZE: i64 = 500;

db_error!(AuditStorageError {});

fn map_entry(row: &tokio_postgres::Row) -> AuditLogEntry {
    AuditLogEntry {
        id: row.get("id"),
        user_id: row.get("user_id"),
        action: row.get("action"),
        table_name: row.get("table_name"),
        record_id: row.get("record_id"),
        old_values: row.get("old_values"),
        new_values: row.get("new_values"),
        created_at: row.get("created_at"),
    }
}

/// Append one audit row. The table is append-only; nothing in this module
/// updates or deletes.
#[instrument(skip(pool, event))]
pub async fn record_event(pool: &PgPool, event: &AuditEvent) -> Result<(), AuditStorageError> {
    let client = pool.get().await?;
    client
        .timed_execute_cached(
            "INSERT INTO ops.audit_logs (
                user_id, action, table_name, record_id, old_values, new_values
             ) VALUES ($1, $2, $3, $4, $5, $6)",
            &[
                &event.user_id,
                &event.action,
                &event.table_name,
                &event.record_id,
                &normalize_json(&event.old_values),
                &normalize_json(&event.new_values),
            ],
            "record_audit_event",
        )
        .await?;

    Ok(())
}

/// Fire-and-forget variant: a failed audit write is logged and swallowed so
/// the primary mutation it documents is never blocked or rolled back.
pub async fn record_event_best_effort(pool: &PgPool, event: &AuditEvent) {
    if let Err(err) = record_event(pool, event).await {
        warn!(
            action = %event.action,
            table = event.table_name.as_deref().unwrap_or(""),
            error = %err,
            "audit write failed; continuing"
        );
    }
}

/// Newest-first listing, capped at 500 rows, optionally filtered to one
/// action tag. Finer text filtering stays client-side.
#[instrument(skip(pool))]
pub async fn list_recent_audit_logs(
    pool: &PgPool,
    limit: usize,
    action: Option<&str>,
) -> Result<Vec<AuditLogEntry>, AuditStorageError> {
    let client = pool.get().await?;
    let limit = i64::try_from(limit).unwrap_or(MAX_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let rows = match action {
        Some(action) => {
            client
                .timed_query_cached(
                    "SELECT id, user_id, action, table_name, record_id,
                            old_values, new_values, created_at
                     FROM ops.audit_logs
                     WHERE action = $1
                     ORDER BY created_at DESC
                     LIMIT $2",
                    &[&action, &limit],
                    "list_recent_audit_logs",
                )
                .await?
        }
        None => {
            client
                .timed_query_cached(
                    "SELECT id, user_id, action, table_name, record_id,
                            old_values, new_values, created_at
                     FROM ops.audit_logs
                     ORDER BY created_at DESC
                     LIMIT $1",
                    &[&limit],
                    "list_recent_audit_logs",
                )
                .await?
        }
    };

    Ok(rows.iter().map(map_entry).collect())
}
