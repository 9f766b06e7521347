use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use uuid::Uuid;

use sd_common::access::{EditTable, ViewId};
use sd_common::analytics::aging::{receivables_aging, ClientAging};
use sd_common::api::finance::{Invoice, InvoiceInsert, Payment, PaymentInsert};
use sd_common::db::{
    insert_invoice, insert_payment, list_client_refs, list_invoice_refs, list_invoices,
    list_payments, update_invoice,
};

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::session::Session;

pub async fn list_all_invoices(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Finance)?;

    Ok(Json(list_invoices(&state.pool).await?))
}

pub async fn create_invoice(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(insert): Json<InvoiceInsert>,
) -> Result<Json<Invoice>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::Invoices)?;

    if insert.invoice_no.trim().is_empty() {
        return Err(ApiError::BadRequest("invoice number is required".into()));
    }

    Ok(Json(insert_invoice(&state.pool, &insert).await?))
}

pub async fn update_invoice_by_id(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(update): Json<InvoiceInsert>,
) -> Result<Json<Invoice>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::Invoices)?;

    Ok(Json(update_invoice(&state.pool, id, &update).await?))
}

pub async fn list_all_payments(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<Vec<Payment>>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Finance)?;

    Ok(Json(list_payments(&state.pool).await?))
}

pub async fn create_payment(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(insert): Json<PaymentInsert>,
) -> Result<Json<Payment>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_edit(EditTable::Payments)?;

    if insert.amount <= 0.0 {
        return Err(ApiError::BadRequest("payment amount must be positive".into()));
    }

    Ok(Json(insert_payment(&state.pool, &insert).await?))
}

/// The receivables aging table, bucketed by days overdue per client.
pub async fn aging(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<Vec<ClientAging>>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Finance)?;

    let clients = list_client_refs(&state.pool).await?;
    let invoices = list_invoice_refs(&state.pool).await?;
    let today = Utc::now().date_naive();

    Ok(Json(receivables_aging(&clients, &invoices, today)))
}
