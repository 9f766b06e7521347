use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use sd_common::access::{EditTable, ViewId};
use sd_common::api::clients::{Client, ClientInsert};
use sd_common::db::{delete_client, insert_client, list_clients, update_client};

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::session::Session;

pub async fn list(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<Vec<Client>>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Clients)?;

    Ok(Json(list_clients(&state.pool).await?))
}

pub async fn create(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(insert): Json<ClientInsert>,
) -> Result<Json<Client>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::Clients)?;

    if insert.name.trim().is_empty() {
        return Err(ApiError::BadRequest("client name is required".into()));
    }

    Ok(Json(insert_client(&state.pool, &insert).await?))
}

pub async fn update(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(update): Json<ClientInsert>,
) -> Result<Json<Client>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::Clients)?;

    if update.name.trim().is_empty() {
        return Err(ApiError::BadRequest("client name is required".into()));
    }

    Ok(Json(update_client(&state.pool, id, &update).await?))
}

pub async fn remove(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_delete()?;

    delete_client(&state.pool, id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
