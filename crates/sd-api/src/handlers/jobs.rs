use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use sd_common::access::{EditTable, ViewId};
use sd_common::api::jobs::{Job, JobInsert};
use sd_common::db::{
    assign_recruiter, delete_job, insert_job, list_jobs, unassign_recruiter, update_job,
};

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::session::Session;

pub async fn list(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<Vec<Job>>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Jobs)?;

    Ok(Json(list_jobs(&state.pool).await?))
}

fn validate(insert: &JobInsert) -> Result<(), ApiError> {
    if insert.title.trim().is_empty() {
        return Err(ApiError::BadRequest("job title is required".into()));
    }

    let counters = [
        insert.submissions,
        insert.interviews,
        insert.offers,
        insert.starts,
    ];
    if counters.iter().any(|count| *count < 0) {
        return Err(ApiError::BadRequest("counters must be non-negative".into()));
    }

    Ok(())
}

pub async fn create(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(insert): Json<JobInsert>,
) -> Result<Json<Job>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::Jobs)?;
    validate(&insert)?;

    Ok(Json(insert_job(&state.pool, &insert).await?))
}

pub async fn update(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(update): Json<JobInsert>,
) -> Result<Json<Job>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::Jobs)?;
    validate(&update)?;

    Ok(Json(update_job(&state.pool, id, &update).await?))
}

pub async fn remove(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_delete()?;

    delete_job(&state.pool, id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub async fn assign(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path((job_id, employee_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::JobRecruiters)?;

    assign_recruiter(&state.pool, job_id, employee_id).await?;
    Ok(Json(serde_json::json!({ "assigned": true })))
}

pub async fn unassign(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path((job_id, employee_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::JobRecruiters)?;

    unassign_recruiter(&state.pool, job_id, employee_id).await?;
    Ok(Json(serde_json::json!({ "assigned": false })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_blank_titles_and_negative_counters() {
        let mut insert = JobInsert {
            client_id: Uuid::new_v4(),
            title: "  ".into(),
            priority: sd_common::api::jobs::PriorityLevel::Medium,
            open_date: None,
            status: sd_common::api::jobs::JobStatus::Open,
            submissions: 0,
            interviews: 0,
            offers: 0,
            starts: 0,
        };
        assert!(matches!(validate(&insert), Err(ApiError::BadRequest(_))));

        insert.title = "Platform Engineer".into();
        assert!(validate(&insert).is_ok());

        insert.submissions = -1;
        assert!(matches!(validate(&insert), Err(ApiError::BadRequest(_))));
    }
}
