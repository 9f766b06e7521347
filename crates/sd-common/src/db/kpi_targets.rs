use tracing::instrument;
use uuid::Uuid;

use crate::api::scores::KpiTarget;
use crate::db::util::TimedClientExt;
use crate::db::{db_error, PgPool};

db_error!(KpiTargetStorageError {
    #[error("kpi target not found: {0}")]
    NotFound(Uuid),
});

fn map_target(row: &tokio_postgres::Row) -> KpiTarget {
    KpiTarget {
        id: row.get("id"),
        department: row.get("department"),
        kpi_name: row.get("kpi_name"),
        target_value: row.get("target_value"),
        period: row.get("period"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[instrument(skip(pool))]
pub async fn list_kpi_targets(
    pool: &PgPool,
    department: Option<&str>,
) -> Result<Vec<KpiTarget>, KpiTargetStorageError> {
    let client = pool.get().await?;

    let rows = match department {
        Some(department) => {
            client
                .timed_query_cached(
                    "SELECT id, department, kpi_name, target_value, period, created_at, updated_at
                     FROM ops.kpi_targets
                     WHERE department = $1
                     ORDER BY kpi_name",
                    &[&department],
                    "list_kpi_targets",
                )
                .await?
        }
        None => {
            client
                .timed_query_cached(
                    "SELECT id, department, kpi_name, target_value, period, created_at, updated_at
                     FROM ops.kpi_targets
                     ORDER BY kpi_name",
                    &[],
                    "list_kpi_targets",
                )
                .await?
        }
    };

    Ok(rows.iter().map(map_target).collect())
}

#[instrument(skip(pool))]
pub async fn update_kpi_target(
    pool: &PgPool,
    id: Uuid,
    target_value: f64,
) -> Result<KpiTarget, KpiTargetStorageError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_opt_cached(
            "UPDATE ops.kpi_targets
             SET target_value = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING id, department, kpi_name, target_value, period, created_at, updated_at",
            &[&id, &target_value],
            "update_kpi_target",
        )
        .await?
        .ok_or(KpiTargetStorageError::NotFound(id))?;

    Ok(map_target(&row))
}
