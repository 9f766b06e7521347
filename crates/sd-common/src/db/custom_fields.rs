use std::str::FromStr;

use tracing::instrument;
use uuid::Uuid;

use crate::access::Department;
use crate::api::custom_fields::{
    CustomFieldType, CustomKpiField, CustomKpiFieldInsert, CustomKpiFieldUpdate,
};
use crate::db::util::TimedClientExt;
use crate::db::{db_error, PgPool};
use crate::fields::{department_has_capacity, next_field_order, MAX_ACTIVE_FIELDS_PER_DEPARTMENT};

db_error!(CustomFieldStorageError {
    #[error("custom field not found: {0}")]
    NotFound(Uuid),
    #[error("department {0} already has {MAX_ACTIVE_FIELDS_PER_DEPARTMENT} active custom fields")]
    FieldCapReached(Department),
    #[error("failed to map custom field row: {0}")]
    Mapping(String),
});

fn map_field(row: &tokio_postgres::Row) -> Result<CustomKpiField, CustomFieldStorageError> {
    let department: String = row.get("department");
    let field_type: String = row.get("field_type");
    Ok(CustomKpiField {
        id: row.get("id"),
        department: Department::from_str(&department).map_err(|_| {
            CustomFieldStorageError::Mapping(format!("unknown department: {department}"))
        })?,
        field_name: row.get("field_name"),
        field_type: CustomFieldType::from_str(&field_type).map_err(|_| {
            CustomFieldStorageError::Mapping(format!("unknown field type: {field_type}"))
        })?,
        field_order: row.get("field_order"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

const FIELD_COLUMNS: &str =
    "id, department, field_name, field_type, field_order, is_active, created_at, updated_at";

/// Active fields, in display order, optionally for one department.
#[instrument(skip(pool))]
pub async fn list_custom_fields(
    pool: &PgPool,
    department: Option<Department>,
) -> Result<Vec<CustomKpiField>, CustomFieldStorageError> {
    let client = pool.get().await?;

    let rows = match department {
        Some(department) => {
            let query = format!(
                "SELECT {FIELD_COLUMNS} FROM ops.custom_kpi_fields
                 WHERE is_active = TRUE AND department = $1
                 ORDER BY field_order"
            );
            client
                .timed_query_cached(&query, &[&department.as_ref()], "list_custom_fields")
                .await?
        }
        None => {
            let query = format!(
                "SELECT {FIELD_COLUMNS} FROM ops.custom_kpi_fields
                 WHERE is_active = TRUE
                 ORDER BY department, field_order"
            );
            client.timed_query_cached(&query, &[], "list_custom_fields").await?
        }
    };

    rows.iter().map(map_field).collect()
}

/// Create a field definition, enforcing the per-department cap and the
/// append-to-end default order inside one transaction.
#[instrument(skip(pool, insert))]
pub async fn create_custom_field(
    pool: &PgPool,
    insert: &CustomKpiFieldInsert,
) -> Result<CustomKpiField, CustomFieldStorageError> {
    let mut client = pool.get().await?;
    let tx = client.transaction().await?;

    let row = tx
        .query_one(
            "SELECT COUNT(*) FILTER (WHERE is_active) AS active_count,
                    MAX(field_order) AS max_order
             FROM ops.custom_kpi_fields
             WHERE department = $1",
            &[&insert.department.as_ref()],
        )
        .await?;
    let active_count: i64 = row.get("active_count");
    let max_order: Option<i32> = row.get("max_order");

    if !department_has_capacity(active_count) {
        return Err(CustomFieldStorageError::FieldCapReached(insert.department));
    }

    let field_order = insert.field_order.unwrap_or_else(|| next_field_order(max_order));

    let query = format!(
        "INSERT INTO ops.custom_kpi_fields (department, field_name, field_type, field_order)
         VALUES ($1, $2, $3, $4)
         RETURNING {FIELD_COLUMNS}"
    );
    let stmt = tx.prepare_cached(&query).await?;
    let row = tx
        .query_one(
            &stmt,
            &[
                &insert.department.as_ref(),
                &insert.field_name,
                &insert.field_type.as_ref(),
                &field_order,
            ],
        )
        .await?;

    let field = map_field(&row)?;
    tx.commit().await?;

    Ok(field)
}

#[instrument(skip(pool, update))]
pub async fn update_custom_field(
    pool: &PgPool,
    id: Uuid,
    update: &CustomKpiFieldUpdate,
) -> Result<CustomKpiField, CustomFieldStorageError> {
    let client = pool.get().await?;
    let query = format!(
        "UPDATE ops.custom_kpi_fields SET
            field_name = COALESCE($2, field_name),
            field_type = COALESCE($3, field_type),
            field_order = COALESCE($4, field_order),
            is_active = COALESCE($5, is_active),
            updated_at = NOW()
         WHERE id = $1
         RETURNING {FIELD_COLUMNS}"
    );
    let row = client
        .timed_query_opt_cached(
            &query,
            &[
                &id,
                &update.field_name,
                &update.field_type.as_ref().map(|t| t.as_ref()),
                &update.field_order,
                &update.is_active,
            ],
            "update_custom_field",
        )
        .await?
        .ok_or(CustomFieldStorageError::NotFound(id))?;

    map_field(&row)
}

#[instrument(skip(pool))]
pub async fn delete_custom_field(pool: &PgPool, id: Uuid) -> Result<(), CustomFieldStorageError> {
    let client = pool.get().await?;
    let deleted = client
        .timed_execute_cached(
            "DELETE FROM ops.custom_kpi_fields WHERE id = $1",
            &[&id],
            "delete_custom_field",
        )
        .await?;

    if deleted == 0 {
        return Err(CustomFieldStorageError::NotFound(id));
    }
    Ok(())
}
