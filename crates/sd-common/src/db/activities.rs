use chrono::NaiveDate;
use tracing::instrument;

use crate::api::activities::{
    AmActivity, AmActivityInsert, RecruiterActivity, RecruiterActivityInsert,
};
use crate::db::util::TimedClientExt;
use crate::db::{db_error, PgPool};

db_error!(ActivityStorageError {});

fn map_recruiter_activity(row: &tokio_postgres::Row) -> RecruiterActivity {
    RecruiterActivity {
        id: row.get("id"),
        employee_id: row.get("employee_id"),
        job_id: row.get("job_id"),
        activity_date: row.get("activity_date"),
        resumes_sourced: row.get("resumes_sourced"),
        submitted: row.get("submitted"),
        am_submissions: row.get("am_submissions"),
        end_client_submissions: row.get("end_client_submissions"),
        feedback_received: row.get("feedback_received"),
        interviews_scheduled: row.get("interviews_scheduled"),
        hired: row.get("hired"),
        created_at: row.get("created_at"),
    }
}

const RECRUITER_ACTIVITY_COLUMNS: &str = "id, employee_id, job_id, activity_date,
    resumes_sourced, submitted, am_submissions, end_client_submissions,
    feedback_received, interviews_scheduled, hired, created_at";

#[instrument(skip(pool))]
pub async fn list_recruiter_activities(
    pool: &PgPool,
) -> Result<Vec<RecruiterActivity>, ActivityStorageError> {
    let client = pool.get().await?;
    let query = format!(
        "SELECT {RECRUITER_ACTIVITY_COLUMNS} FROM ops.recruiter_activities
         ORDER BY activity_date DESC, created_at DESC"
    );
    let rows = client
        .timed_query_cached(&query, &[], "list_recruiter_activities")
        .await?;

    Ok(rows.iter().map(map_recruiter_activity).collect())
}

/// Activity rows inside a date window, inclusive on both ends. Feeds the
/// weekly KPI rollup.
#[instrument(skip(pool))]
pub async fn list_recruiter_activities_in_window(
    pool: &PgPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<RecruiterActivity>, ActivityStorageError> {
    let client = pool.get().await?;
    let query = format!(
        "SELECT {RECRUITER_ACTIVITY_COLUMNS} FROM ops.recruiter_activities
         WHERE activity_date >= $1 AND activity_date <= $2"
    );
    let rows = client
        .timed_query_cached(&query, &[&start, &end], "list_recruiter_activities_in_window")
        .await?;

    Ok(rows.iter().map(map_recruiter_activity).collect())
}

#[instrument(skip(pool, insert))]
pub async fn insert_recruiter_activity(
    pool: &PgPool,
    insert: &RecruiterActivityInsert,
) -> Result<RecruiterActivity, ActivityStorageError> {
    let client = pool.get().await?;
    let query = format!(
        "INSERT INTO ops.recruiter_activities (
            employee_id, job_id, activity_date, resumes_sourced, submitted,
            am_submissions, end_client_submissions, feedback_received,
            interviews_scheduled, hired
         ) VALUES ($1, $2, COALESCE($3, CURRENT_DATE), $4, $5, $6, $7, $8, $9, $10)
         RETURNING {RECRUITER_ACTIVITY_COLUMNS}"
    );
    let row = client
        .timed_query_one_cached(
            &query,
            &[
                &insert.employee_id,
                &insert.job_id,
                &insert.activity_date,
                &insert.resumes_sourced,
                &insert.submitted,
                &insert.am_submissions,
                &insert.end_client_submissions,
                &insert.feedback_received,
                &insert.interviews_scheduled,
                &insert.hired,
            ],
            "insert_recruiter_activity",
        )
        .await?;

    Ok(map_recruiter_activity(&row))
}

fn map_am_activity(row: &tokio_postgres::Row) -> AmActivity {
    AmActivity {
        id: row.get("id"),
        employee_id: row.get("employee_id"),
        client_id: row.get("client_id"),
        activity_date: row.get("activity_date"),
        action_taken: row.get("action_taken"),
        outcome: row.get("outcome"),
        next_step: row.get("next_step"),
        created_at: row.get("created_at"),
    }
}

#[instrument(skip(pool))]
pub async fn list_am_activities(pool: &PgPool) -> Result<Vec<AmActivity>, ActivityStorageError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query_cached(
            "SELECT id, employee_id, client_id, activity_date, action_taken,
                    outcome, next_step, created_at
             FROM ops.am_activities
             ORDER BY activity_date DESC, created_at DESC",
            &[],
            "list_am_activities",
        )
        .await?;

    Ok(rows.iter().map(map_am_activity).collect())
}

#[instrument(skip(pool, insert))]
pub async fn insert_am_activity(
    pool: &PgPool,
    insert: &AmActivityInsert,
) -> Result<AmActivity, ActivityStorageError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_one_cached(
            "INSERT INTO ops.am_activities (
                employee_id, client_id, activity_date, action_taken, outcome, next_step
             ) VALUES ($1, $2, COALESCE($3, CURRENT_DATE), $4, $5, $6)
             RETURNING id, employee_id, client_id, activity_date, action_taken,
                       outcome, next_step, created_at",
            &[
                &insert.employee_id,
                &insert.client_id,
                &insert.activity_date,
                &insert.action_taken,
                &insert.outcome,
                &insert.next_step,
            ],
            "insert_am_activity",
        )
        .await?;

    Ok(map_am_activity(&row))
}
