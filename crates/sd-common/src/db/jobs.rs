use std::str::FromStr;

use tracing::instrument;
use uuid::Uuid;

use crate::api::jobs::{Job, JobAssignment, JobCounters, JobInsert, JobStatus, PriorityLevel};
use crate::db::util::TimedClientExt;
use crate::db::{db_error, PgPool};

db_error!(JobStorageError {
    #[error("job not found: {0}")]
    NotFound(Uuid),
    #[error("recruiter already assigned to job")]
    AlreadyAssigned,
    #[error("failed to map job row: {0}")]
    Mapping(String),
});

fn map_job(row: &tokio_postgres::Row) -> Result<Job, JobStorageError> {
    let status: String = row.get("status");
    let priority: String = row.get("priority");
    Ok(Job {
        id: row.get("id"),
        client_id: row.get("client_id"),
        client_name: row.get("client_name"),
        title: row.get("title"),
        priority: PriorityLevel::from_str(&priority)
            .map_err(|_| JobStorageError::Mapping(format!("unknown priority: {priority}")))?,
        open_date: row.get("open_date"),
        status: JobStatus::from_str(&status)
            .map_err(|_| JobStorageError::Mapping(format!("unknown job status: {status}")))?,
        submissions: row.get("submissions"),
        interviews: row.get("interviews"),
        offers: row.get("offers"),
        starts: row.get("starts"),
        recruiters_assigned: row.get("recruiters_assigned"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

const JOB_SELECT: &str = "SELECT j.id, j.client_id, c.name AS client_name, j.title, j.priority,
            j.open_date, j.status, j.submissions, j.interviews, j.offers, j.starts,
            COALESCE(ARRAY_AGG(jr.employee_id) FILTER (WHERE jr.employee_id IS NOT NULL),
                     '{}') AS recruiters_assigned,
            j.created_at, j.updated_at
     FROM ops.jobs j
     JOIN ops.clients c ON c.id = j.client_id
     LEFT JOIN ops.job_recruiters jr ON jr.job_id = j.id";

#[instrument(skip(pool))]
pub async fn list_jobs(pool: &PgPool) -> Result<Vec<Job>, JobStorageError> {
    let client = pool.get().await?;
    let query = format!("{JOB_SELECT} GROUP BY j.id, c.name ORDER BY j.open_date DESC, j.id");
    let rows = client.timed_query_cached(&query, &[], "list_jobs").await?;

    rows.iter().map(map_job).collect()
}

/// Per-job status and counters, the owner dashboard's input.
#[instrument(skip(pool))]
pub async fn list_job_counters(pool: &PgPool) -> Result<Vec<JobCounters>, JobStorageError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query_cached(
            "SELECT id, status, submissions, interviews, offers, starts FROM ops.jobs",
            &[],
            "list_job_counters",
        )
        .await?;

    rows.iter()
        .map(|row| {
            let status: String = row.get("status");
            Ok(JobCounters {
                id: row.get("id"),
                status: JobStatus::from_str(&status)
                    .map_err(|_| JobStorageError::Mapping(format!("unknown job status: {status}")))?,
                submissions: row.get("submissions"),
                interviews: row.get("interviews"),
                offers: row.get("offers"),
                starts: row.get("starts"),
            })
        })
        .collect()
}

/// Every (job, recruiter) assignment pair.
#[instrument(skip(pool))]
pub async fn list_job_assignments(pool: &PgPool) -> Result<Vec<JobAssignment>, JobStorageError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query_cached(
            "SELECT job_id, employee_id FROM ops.job_recruiters",
            &[],
            "list_job_assignments",
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| JobAssignment {
            job_id: row.get("job_id"),
            employee_id: row.get("employee_id"),
        })
        .collect())
}

#[instrument(skip(pool, insert))]
pub async fn insert_job(pool: &PgPool, insert: &JobInsert) -> Result<Job, JobStorageError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_one_cached(
            "WITH inserted AS (
                INSERT INTO ops.jobs (
                    client_id, title, priority, open_date, status,
                    submissions, interviews, offers, starts
                ) VALUES ($1, $2, $3, COALESCE($4, CURRENT_DATE), $5, $6, $7, $8, $9)
                RETURNING *
             )
             SELECT i.id, i.client_id, c.name AS client_name, i.title, i.priority,
                    i.open_date, i.status, i.submissions, i.interviews, i.offers, i.starts,
                    '{}'::uuid[] AS recruiters_assigned, i.created_at, i.updated_at
             FROM inserted i
             JOIN ops.clients c ON c.id = i.client_id",
            &[
                &insert.client_id,
                &insert.title,
                &insert.priority.as_ref(),
                &insert.open_date,
                &insert.status.as_ref(),
                &insert.submissions,
                &insert.interviews,
                &insert.offers,
                &insert.starts,
            ],
            "insert_job",
        )
        .await?;

    map_job(&row)
}

#[instrument(skip(pool, update))]
pub async fn update_job(pool: &PgPool, id: Uuid, update: &JobInsert) -> Result<Job, JobStorageError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_opt_cached(
            "WITH updated AS (
                UPDATE ops.jobs SET
                    client_id = $2,
                    title = $3,
                    priority = $4,
                    open_date = COALESCE($5, open_date),
                    status = $6,
                    submissions = $7,
                    interviews = $8,
                    offers = $9,
                    starts = $10,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
             )
             SELECT u.id, u.client_id, c.name AS client_name, u.title, u.priority,
                    u.open_date, u.status, u.submissions, u.interviews, u.offers, u.starts,
                    COALESCE((SELECT ARRAY_AGG(jr.employee_id)
                              FROM ops.job_recruiters jr WHERE jr.job_id = u.id),
                             '{}') AS recruiters_assigned,
                    u.created_at, u.updated_at
             FROM updated u
             JOIN ops.clients c ON c.id = u.client_id",
            &[
                &id,
                &update.client_id,
                &update.title,
                &update.priority.as_ref(),
                &update.open_date,
                &update.status.as_ref(),
                &update.submissions,
                &update.interviews,
                &update.offers,
                &update.starts,
            ],
            "update_job",
        )
        .await?
        .ok_or(JobStorageError::NotFound(id))?;

    map_job(&row)
}

#[instrument(skip(pool))]
pub async fn delete_job(pool: &PgPool, id: Uuid) -> Result<(), JobStorageError> {
    let client = pool.get().await?;
    let deleted = client
        .timed_execute_cached("DELETE FROM ops.jobs WHERE id = $1", &[&id], "delete_job")
        .await?;

    if deleted == 0 {
        return Err(JobStorageError::NotFound(id));
    }
    Ok(())
}

#[instrument(skip(pool))]
pub async fn assign_recruiter(
    pool: &PgPool,
    job_id: Uuid,
    employee_id: Uuid,
) -> Result<(), JobStorageError> {
    let client = pool.get().await?;
    let inserted = client
        .timed_execute_cached(
            "INSERT INTO ops.job_recruiters (job_id, employee_id)
             VALUES ($1, $2)
             ON CONFLICT (job_id, employee_id) DO NOTHING",
            &[&job_id, &employee_id],
            "assign_recruiter",
        )
        .await?;

    if inserted == 0 {
        return Err(JobStorageError::AlreadyAssigned);
    }
    Ok(())
}

#[instrument(skip(pool))]
pub async fn unassign_recruiter(
    pool: &PgPool,
    job_id: Uuid,
    employee_id: Uuid,
) -> Result<(), JobStorageError> {
    let client = pool.get().await?;
    client
        .timed_execute_cached(
            "DELETE FROM ops.job_recruiters WHERE job_id = $1 AND employee_id = $2",
            &[&job_id, &employee_id],
            "unassign_recruiter",
        )
        .await?;

    Ok(())
}
