use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

use sd_common::access::{EditTable, ViewId};
use sd_common::api::scores::{EmployeeScore, EmployeeScoreInsert, KpiTarget};
use sd_common::db::{insert_score, list_kpi_targets, list_scores, update_kpi_target, update_score};

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::session::Session;

#[derive(Debug, Default, Deserialize)]
pub struct ScoreParams {
    pub month: Option<String>,
}

pub async fn list(
    State(state): State<SharedState>,
    Query(params): Query<ScoreParams>,
    auth: AuthUser,
) -> Result<Json<Vec<EmployeeScore>>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Performance)?;

    Ok(Json(list_scores(&state.pool, params.month.as_deref()).await?))
}

pub async fn create(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(insert): Json<EmployeeScoreInsert>,
) -> Result<Json<EmployeeScore>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::EmployeeScores)?;

    Ok(Json(insert_score(&state.pool, &insert).await?))
}

pub async fn update(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(update): Json<EmployeeScoreInsert>,
) -> Result<Json<EmployeeScore>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::EmployeeScores)?;

    Ok(Json(update_score(&state.pool, id, &update).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct TargetParams {
    pub department: Option<String>,
}

pub async fn list_targets(
    State(state): State<SharedState>,
    Query(params): Query<TargetParams>,
    auth: AuthUser,
) -> Result<Json<Vec<KpiTarget>>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Dashboard)?;

    Ok(Json(
        list_kpi_targets(&state.pool, params.department.as_deref()).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct TargetUpdate {
    pub target_value: f64,
}

pub async fn update_target(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(update): Json<TargetUpdate>,
) -> Result<Json<KpiTarget>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::KpiTargets)?;

    Ok(Json(
        update_kpi_target(&state.pool, id, update.target_value).await?,
    ))
}
