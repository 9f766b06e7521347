use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use sd_common::access::{EditTable, ViewId};
use sd_common::api::prospects::{BdProspect, BdProspectInsert};
use sd_common::db::{delete_prospect, insert_prospect, list_prospects, update_prospect};

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::session::Session;

pub async fn list(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<Vec<BdProspect>>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::BusinessDev)?;

    Ok(Json(list_prospects(&state.pool).await?))
}

pub async fn create(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(insert): Json<BdProspectInsert>,
) -> Result<Json<BdProspect>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::BdProspects)?;

    if insert.prospect_name.trim().is_empty() {
        return Err(ApiError::BadRequest("prospect name is required".into()));
    }

    Ok(Json(insert_prospect(&state.pool, &insert).await?))
}

pub async fn update(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(update): Json<BdProspectInsert>,
) -> Result<Json<BdProspect>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::BdProspects)?;

    Ok(Json(update_prospect(&state.pool, id, &update).await?))
}

pub async fn remove(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_delete()?;

    delete_prospect(&state.pool, id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
