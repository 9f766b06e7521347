use tracing::instrument;
use uuid::Uuid;

use crate::api::custom_fields::{CustomKpiValue, CustomKpiValueUpsert};
use crate::db::util::TimedClientExt;
use crate::db::{db_error, PgPool};

db_error!(CustomValueStorageError {});

fn map_value(row: &tokio_postgres::Row) -> CustomKpiValue {
    CustomKpiValue {
        id: row.get("id"),
        custom_field_id: row.get("custom_field_id"),
        employee_id: row.get("employee_id"),
        period: row.get("period"),
        value: row.get("value"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const VALUE_COLUMNS: &str =
    "id, custom_field_id, employee_id, period, value, created_at, updated_at";

const UPSERT_SQL: &str = "INSERT INTO ops.custom_kpi_values (custom_field_id, employee_id, period, value)
     VALUES ($1, $2, $3, $4)
     ON CONFLICT (custom_field_id, employee_id, period) DO UPDATE
     SET value = EXCLUDED.value,
         updated_at = NOW()
     RETURNING id, custom_field_id, employee_id, period, value, created_at, updated_at";

#[instrument(skip(pool))]
pub async fn list_custom_values(
    pool: &PgPool,
    period: Option<&str>,
    employee_id: Option<Uuid>,
) -> Result<Vec<CustomKpiValue>, CustomValueStorageError> {
    let client = pool.get().await?;

    let mut conditions = Vec::new();
    let mut params: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> = Vec::new();

    if let Some(period) = &period {
        params.push(period);
        conditions.push(format!("period = ${}", params.len()));
    }
    if let Some(employee_id) = &employee_id {
        params.push(employee_id);
        conditions.push(format!("employee_id = ${}", params.len()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    let query = format!("SELECT {VALUE_COLUMNS} FROM ops.custom_kpi_values{where_clause}");

    let rows = client
        .timed_query_cached(&query, &params, "list_custom_values")
        .await?;

    Ok(rows.iter().map(map_value).collect())
}

/// Write one value; the (field, employee, period) key overwrites on re-import
/// rather than duplicating.
#[instrument(skip(pool, upsert))]
pub async fn upsert_custom_value(
    pool: &PgPool,
    upsert: &CustomKpiValueUpsert,
) -> Result<CustomKpiValue, CustomValueStorageError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_one_cached(
            UPSERT_SQL,
            &[
                &upsert.custom_field_id,
                &upsert.employee_id,
                &upsert.period,
                &upsert.value,
            ],
            "upsert_custom_value",
        )
        .await?;

    Ok(map_value(&row))
}

/// Save a validated import batch in one transaction. All-or-nothing applies
/// only to this already-validated set; validation failures were filtered out
/// upstream.
#[instrument(skip(pool, upserts))]
pub async fn bulk_upsert_custom_values(
    pool: &PgPool,
    upserts: &[CustomKpiValueUpsert],
) -> Result<usize, CustomValueStorageError> {
    let mut client = pool.get().await?;
    let tx = client.transaction().await?;
    let stmt = tx.prepare_cached(UPSERT_SQL).await?;

    let mut saved = 0usize;
    for upsert in upserts {
        tx.query_one(
            &stmt,
            &[
                &upsert.custom_field_id,
                &upsert.employee_id,
                &upsert.period,
                &upsert.value,
            ],
        )
        .await?;
        saved += 1;
    }

    tx.commit().await?;
    Ok(saved)
}
