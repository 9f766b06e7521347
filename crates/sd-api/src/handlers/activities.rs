use axum::{Json, extract::State};

use sd_common::access::{EditTable, ViewId};
use sd_common::api::activities::{
    AmActivity, AmActivityInsert, RecruiterActivity, RecruiterActivityInsert,
};
use sd_common::db::{
    insert_am_activity, insert_recruiter_activity, list_am_activities, list_recruiter_activities,
};

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::session::Session;

pub async fn list_recruiter(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<Vec<RecruiterActivity>>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Recruiters)?;

    Ok(Json(list_recruiter_activities(&state.pool).await?))
}

pub async fn create_recruiter(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(insert): Json<RecruiterActivityInsert>,
) -> Result<Json<RecruiterActivity>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::RecruiterActivities)?;

    let counters = [
        insert.resumes_sourced,
        insert.submitted,
        insert.am_submissions,
        insert.end_client_submissions,
        insert.feedback_received,
        insert.interviews_scheduled,
        insert.hired,
    ];
    if counters.iter().any(|count| *count < 0) {
        return Err(ApiError::BadRequest("counters must be non-negative".into()));
    }

    Ok(Json(insert_recruiter_activity(&state.pool, &insert).await?))
}

pub async fn list_am(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<Vec<AmActivity>>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::AccountManagers)?;

    Ok(Json(list_am_activities(&state.pool).await?))
}

pub async fn create_am(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(insert): Json<AmActivityInsert>,
) -> Result<Json<AmActivity>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::AmActivities)?;

    if insert.action_taken.trim().is_empty() {
        return Err(ApiError::BadRequest("action taken is required".into()));
    }

    Ok(Json(insert_am_activity(&state.pool, &insert).await?))
}
