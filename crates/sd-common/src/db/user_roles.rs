use std::str::FromStr;

use tracing::instrument;
use uuid::Uuid;

use crate::access::{AppRole, DepartmentAccess};
use crate::api::user_roles::UserRole;
use crate::db::util::TimedClientExt;
use crate::db::{db_error, PgPool};

db_error!(UserRoleStorageError {
    #[error("failed to map user role row: {0}")]
    Mapping(String),
});

fn map_user_role(row: &tokio_postgres::Row) -> Result<UserRole, UserRoleStorageError> {
    let role: String = row.get("role");
    Ok(UserRole {
        id: row.get("id"),
        user_id: row.get("user_id"),
        role: AppRole::from_str(&role)
            .map_err(|_| UserRoleStorageError::Mapping(format!("unknown app role: {role}")))?,
        department_access: row.get("department_access"),
        department_edit_access: row.get("department_edit_access"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

const ROLE_COLUMNS: &str =
    "id, user_id, role, department_access, department_edit_access, created_at, updated_at";

/// The role row for one user, if any. Absence is a normal state (the user
/// sees only the dashboard shell).
#[instrument(skip(pool))]
pub async fn get_user_role(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<UserRole>, UserRoleStorageError> {
    let client = pool.get().await?;
    let query = format!("SELECT {ROLE_COLUMNS} FROM ops.user_roles WHERE user_id = $1");
    let row = client
        .timed_query_opt_cached(&query, &[&user_id], "get_user_role")
        .await?;

    row.as_ref().map(map_user_role).transpose()
}

#[instrument(skip(pool))]
pub async fn list_user_roles(pool: &PgPool) -> Result<Vec<UserRole>, UserRoleStorageError> {
    let client = pool.get().await?;
    let query = format!("SELECT {ROLE_COLUMNS} FROM ops.user_roles ORDER BY created_at");
    let rows = client.timed_query_cached(&query, &[], "list_user_roles").await?;

    rows.iter().map(map_user_role).collect()
}

/// Create or replace a user's role assignment.
///
/// The department lists are normalized through [`DepartmentAccess`] first, so
/// unknown names are dropped and edit access can never exceed view access
/// regardless of what the caller sends.
#[instrument(skip(pool, access))]
pub async fn upsert_user_role(
    pool: &PgPool,
    user_id: Uuid,
    role: AppRole,
    access: &DepartmentAccess,
) -> Result<UserRole, UserRoleStorageError> {
    let view = access.view_names();
    let edit = access.edit_names();

    let client = pool.get().await?;
    let query = format!(
        "INSERT INTO ops.user_roles (user_id, role, department_access, department_edit_access)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (user_id) DO UPDATE
         SET role = EXCLUDED.role,
             department_access = EXCLUDED.department_access,
             department_edit_access = EXCLUDED.department_edit_access,
             updated_at = NOW()
         RETURNING {ROLE_COLUMNS}"
    );
    let row = client
        .timed_query_one_cached(
            &query,
            &[&user_id, &role.as_ref(), &view, &edit],
            "upsert_user_role",
        )
        .await?;

    map_user_role(&row)
}
