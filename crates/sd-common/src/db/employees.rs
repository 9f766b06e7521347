use std::str::FromStr;

use tracing::instrument;

use crate::api::employees::{Employee, EmployeeInsert, EmployeeRef, EmployeeRole};
use crate::db::util::TimedClientExt;
use crate::db::{db_error, PgPool};

db_error!(EmployeeStorageError {
    #[error("failed to map employee row: {0}")]
    Mapping(String),
});

fn map_employee(row: &tokio_postgres::Row) -> Result<Employee, EmployeeStorageError> {
    let role: String = row.get("role");
    Ok(Employee {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        role: EmployeeRole::from_str(&role)
            .map_err(|_| EmployeeStorageError::Mapping(format!("unknown employee role: {role}")))?,
        department: row.get("department"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[instrument(skip(pool))]
pub async fn list_employees(pool: &PgPool) -> Result<Vec<Employee>, EmployeeStorageError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query_cached(
            "SELECT id, name, email, role, department, is_active, created_at, updated_at
             FROM ops.employees
             ORDER BY name",
            &[],
            "list_employees",
        )
        .await?;

    rows.iter().map(map_employee).collect()
}

/// Active recruiters, the population the weekly KPI rollup runs over.
#[instrument(skip(pool))]
pub async fn list_active_recruiters(
    pool: &PgPool,
) -> Result<Vec<EmployeeRef>, EmployeeStorageError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query_cached(
            "SELECT id, name FROM ops.employees
             WHERE role = 'Recruiter' AND is_active = TRUE
             ORDER BY name",
            &[],
            "list_active_recruiters",
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| EmployeeRef {
            id: row.get("id"),
            name: row.get("name"),
        })
        .collect())
}

#[instrument(skip(pool, insert))]
pub async fn insert_employee(
    pool: &PgPool,
    insert: &EmployeeInsert,
) -> Result<Employee, EmployeeStorageError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_one_cached(
            "INSERT INTO ops.employees (name, email, role, department, is_active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, name, email, role, department, is_active, created_at, updated_at",
            &[
                &insert.name,
                &insert.email,
                &insert.role.as_ref(),
                &insert.department,
                &insert.is_active,
            ],
            "insert_employee",
        )
        .await?;

    map_employee(&row)
}
