use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sd_common::access::{AppRole, Department, DepartmentAccess, EditTable, ViewId};
use sd_common::api::audit_log::{AuditEvent, AuditLogEntry};
use sd_common::api::custom_fields::{
    CustomKpiField, CustomKpiFieldInsert, CustomKpiFieldUpdate, CustomKpiValue,
    CustomKpiValueUpsert,
};
use sd_common::api::employees::{Employee, EmployeeInsert, EmployeeRef};
use sd_common::api::user_roles::UserRole;
use sd_common::audit::{compute_diff, summarize_diff, FieldDiff};
use sd_common::db::{
    bulk_upsert_custom_values, create_custom_field, delete_custom_field, insert_employee,
    list_custom_fields, list_custom_values, list_employees, list_recent_audit_logs,
    list_user_roles, record_event_best_effort, update_custom_field, upsert_custom_value,
    upsert_user_role,
};
use sd_common::fields::import::{parse_import_grid, ImportGrid};
use sd_common::fields::template::generate_template;
use sd_common::fields::validate::ValidationIssue;

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::session::Session;

// ---- employees -------------------------------------------------------------

pub async fn employees(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Admin)?;

    Ok(Json(list_employees(&state.pool).await?))
}

pub async fn create_employee(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(insert): Json<EmployeeInsert>,
) -> Result<Json<Employee>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::Employees)?;

    if insert.name.trim().is_empty() {
        return Err(ApiError::BadRequest("employee name is required".into()));
    }

    Ok(Json(insert_employee(&state.pool, &insert).await?))
}

// ---- user roles ------------------------------------------------------------

pub async fn users(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<Vec<UserRole>>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Admin)?;

    Ok(Json(list_user_roles(&state.pool).await?))
}

#[derive(Debug, Deserialize)]
pub struct AdminToggle {
    pub make_admin: bool,
}

/// Promote or demote a user. Promotion grants full department access;
/// demotion drops the user to viewer and keeps their access lists.
pub async fn toggle_admin(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(toggle): Json<AdminToggle>,
) -> Result<Json<UserRole>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::UserRoles)?;

    let existing = sd_common::db::get_user_role(&state.pool, user_id).await?;
    let old_values = existing
        .as_ref()
        .and_then(|row| serde_json::to_value(row).ok());

    let (role, access) = if toggle.make_admin {
        (AppRole::Admin, DepartmentAccess::full())
    } else {
        let access = existing
            .as_ref()
            .map(|row| {
                DepartmentAccess::from_raw(&row.department_access, &row.department_edit_access)
            })
            .unwrap_or_default();
        (AppRole::Viewer, access)
    };

    let updated = upsert_user_role(&state.pool, user_id, role, &access).await?;

    let mut event = AuditEvent::new(if toggle.make_admin {
        "made_admin"
    } else {
        "removed_admin"
    })
    .by(session.user_id)
    .on("user_roles", user_id);
    if let Some(old_values) = old_values {
        event = event.old(old_values);
    }
    if let Ok(new_values) = serde_json::to_value(&updated) {
        event = event.new_values(new_values);
    }
    record_event_best_effort(&state.pool, &event).await;

    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct AccessUpdate {
    pub role: Option<AppRole>,
    pub department_access: Vec<String>,
    pub department_edit_access: Vec<String>,
}

/// Replace a user's department access lists. The paired view/edit rule is
/// re-applied server-side, so a client cannot persist edit without view.
pub async fn update_access(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(update): Json<AccessUpdate>,
) -> Result<Json<UserRole>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::UserRoles)?;

    let existing = sd_common::db::get_user_role(&state.pool, user_id).await?;
    let old_values = existing
        .as_ref()
        .and_then(|row| serde_json::to_value(row).ok());

    let role = update
        .role
        .or(existing.as_ref().map(|row| row.role))
        .unwrap_or(AppRole::Viewer);
    let access =
        DepartmentAccess::from_raw(&update.department_access, &update.department_edit_access);

    let updated = upsert_user_role(&state.pool, user_id, role, &access).await?;

    let mut event = AuditEvent::new("access_updated")
        .by(session.user_id)
        .on("user_roles", user_id);
    if let Some(old_values) = old_values {
        event = event.old(old_values);
    }
    if let Ok(new_values) = serde_json::to_value(&updated) {
        event = event.new_values(new_values);
    }
    record_event_best_effort(&state.pool, &event).await;

    Ok(Json(updated))
}

// ---- audit logs ------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct AuditParams {
    pub limit: Option<usize>,
    pub action: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuditLogView {
    #[serde(flatten)]
    pub entry: AuditLogEntry,
    pub diffs: Vec<FieldDiff>,
    pub summary: String,
}

pub async fn audit_logs(
    State(state): State<SharedState>,
    Query(params): Query<AuditParams>,
    auth: AuthUser,
) -> Result<Json<Vec<AuditLogView>>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Admin)?;

    let entries = list_recent_audit_logs(
        &state.pool,
        params.limit.unwrap_or(500),
        params.action.as_deref(),
    )
    .await?;

    let views = entries
        .into_iter()
        .map(|entry| {
            let diffs = compute_diff(entry.old_values.as_ref(), entry.new_values.as_ref());
            let summary = summarize_diff(entry.old_values.as_ref(), entry.new_values.as_ref());
            AuditLogView {
                entry,
                diffs,
                summary,
            }
        })
        .collect();

    Ok(Json(views))
}

// ---- custom fields ---------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct FieldParams {
    pub department: Option<Department>,
}

pub async fn custom_fields(
    State(state): State<SharedState>,
    Query(params): Query<FieldParams>,
    auth: AuthUser,
) -> Result<Json<Vec<CustomKpiField>>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Admin)?;

    Ok(Json(list_custom_fields(&state.pool, params.department).await?))
}

pub async fn create_field(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(insert): Json<CustomKpiFieldInsert>,
) -> Result<Json<CustomKpiField>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::CustomKpiFields)?;

    if insert.field_name.trim().is_empty() {
        return Err(ApiError::BadRequest("field name is required".into()));
    }

    let field = create_custom_field(&state.pool, &insert).await?;

    let mut event = AuditEvent::new("custom_field_created")
        .by(session.user_id)
        .on("custom_kpi_fields", field.id);
    if let Ok(new_values) = serde_json::to_value(&field) {
        event = event.new_values(new_values);
    }
    record_event_best_effort(&state.pool, &event).await;

    Ok(Json(field))
}

pub async fn update_field(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(update): Json<CustomKpiFieldUpdate>,
) -> Result<Json<CustomKpiField>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::CustomKpiFields)?;

    Ok(Json(update_custom_field(&state.pool, id, &update).await?))
}

pub async fn delete_field(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_delete()?;

    delete_custom_field(&state.pool, id).await?;

    let event = AuditEvent::new("custom_field_deleted")
        .by(session.user_id)
        .on("custom_kpi_fields", id);
    record_event_best_effort(&state.pool, &event).await;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

// ---- custom values ---------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ValueParams {
    pub period: Option<String>,
    pub employee_id: Option<Uuid>,
}

pub async fn custom_values(
    State(state): State<SharedState>,
    Query(params): Query<ValueParams>,
    auth: AuthUser,
) -> Result<Json<Vec<CustomKpiValue>>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Admin)?;

    Ok(Json(
        list_custom_values(&state.pool, params.period.as_deref(), params.employee_id).await?,
    ))
}

/// Write a single custom KPI value; re-sends for the same
/// (field, employee, period) key overwrite.
pub async fn upsert_value(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(upsert): Json<CustomKpiValueUpsert>,
) -> Result<Json<CustomKpiValue>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::CustomKpiValues)?;

    if upsert.period.trim().is_empty() {
        return Err(ApiError::BadRequest("period is required".into()));
    }

    Ok(Json(upsert_custom_value(&state.pool, &upsert).await?))
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub department: Department,
    pub period: String,
    pub grid: ImportGrid,
    /// Validate only; nothing is saved. Lets the caller review the issue
    /// list before committing the valid rows.
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub row_count: usize,
    pub saved_count: usize,
    pub issues: Vec<ValidationIssue>,
}

/// Bulk import custom KPI values from a decoded spreadsheet grid.
///
/// Saving is never all-or-nothing across the file: cells that fail
/// validation are reported and skipped while the rest are upserted.
pub async fn import_values(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(request): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::CustomKpiValues)?;

    if request.period.trim().is_empty() {
        return Err(ApiError::BadRequest("period is required".into()));
    }

    let fields = list_custom_fields(&state.pool, Some(request.department)).await?;
    let outcome = parse_import_grid(&request.grid, &fields);

    let saved_count = if request.dry_run {
        0
    } else {
        let upserts = outcome.valid_upserts(&request.period);
        bulk_upsert_custom_values(&state.pool, &upserts).await?
    };

    if !request.dry_run && saved_count > 0 {
        let event = AuditEvent::new("custom_values_imported")
            .by(session.user_id)
            .new_values(serde_json::json!({
                "department": request.department,
                "period": request.period,
                "saved": saved_count,
            }));
        record_event_best_effort(&state.pool, &event).await;
    }

    Ok(Json(ImportResponse {
        row_count: outcome.rows.len(),
        saved_count,
        issues: outcome.issues,
    }))
}

#[derive(Debug, Deserialize)]
pub struct TemplateParams {
    pub department: Department,
}

/// Export template: header row plus a blank row per employee of the
/// department.
pub async fn value_template(
    State(state): State<SharedState>,
    Query(params): Query<TemplateParams>,
    auth: AuthUser,
) -> Result<Json<ImportGrid>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Admin)?;

    let employees: Vec<EmployeeRef> = list_employees(&state.pool)
        .await?
        .into_iter()
        .filter(|emp| {
            emp.is_active
                && emp
                    .department
                    .as_deref()
                    .is_some_and(|dept| dept == params.department.as_ref())
        })
        .map(|emp| EmployeeRef {
            id: emp.id,
            name: emp.name,
        })
        .collect();

    let fields = list_custom_fields(&state.pool, Some(params.department)).await?;

    Ok(Json(generate_template(
        params.department,
        &employees,
        &fields,
    )))
}
