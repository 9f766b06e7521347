use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use sd_common::access::ViewId;
use sd_common::analytics::owner::{owner_kpis, quick_stats, KpiMetric, OwnerSnapshot, QuickStats};
use sd_common::analytics::recruiter::{weekly_recruiter_kpis, RecruiterKpiReport, WeekWindow};
use sd_common::db::{
    list_active_recruiters, list_client_refs, list_client_statuses, list_invoice_refs,
    list_job_assignments, list_job_counters, list_payment_amounts,
    list_recruiter_activities_in_window,
};

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::session::Session;

async fn owner_snapshot(state: &SharedState) -> Result<OwnerSnapshot, ApiError> {
    // Independent fetches; slight point-in-time skew between them is fine.
    Ok(OwnerSnapshot {
        clients: list_client_refs(&state.pool).await?,
        client_statuses: list_client_statuses(&state.pool).await?,
        jobs: list_job_counters(&state.pool).await?,
        invoices: list_invoice_refs(&state.pool).await?,
        payment_amounts: list_payment_amounts(&state.pool).await?,
    })
}

pub async fn kpis(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<Vec<KpiMetric>>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Dashboard)?;

    let snapshot = owner_snapshot(&state).await?;
    // No historical baseline exists yet; the prior period reports zeros.
    Ok(Json(owner_kpis(&snapshot, None)))
}

pub async fn stats(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<QuickStats>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Dashboard)?;

    let client_statuses = list_client_statuses(&state.pool).await?;
    let jobs = list_job_counters(&state.pool).await?;
    let invoices = list_invoice_refs(&state.pool).await?;
    let today = Utc::now().date_naive();

    Ok(Json(quick_stats(&client_statuses, &jobs, &invoices, today)))
}

#[derive(Debug, Default, Deserialize)]
pub struct WeekParams {
    /// Any date inside the wanted week; defaults to today.
    pub week: Option<NaiveDate>,
}

pub async fn recruiter_kpis(
    State(state): State<SharedState>,
    Query(params): Query<WeekParams>,
    auth: AuthUser,
) -> Result<Json<RecruiterKpiReport>, ApiError> {
    let session = Session::load(&state.pool, &auth).await?;
    session.require_view(ViewId::Recruiters)?;

    let week = WeekWindow::containing(params.week.unwrap_or_else(|| Utc::now().date_naive()));
    let recruiters = list_active_recruiters(&state.pool).await?;
    let assignments = list_job_assignments(&state.pool).await?;
    let activities =
        list_recruiter_activities_in_window(&state.pool, week.start, week.end).await?;

    Ok(Json(weekly_recruiter_kpis(
        &recruiters,
        &assignments,
        &activities,
        week,
    )))
}
