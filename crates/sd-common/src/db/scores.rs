use tracing::instrument;
use uuid::Uuid;

use crate::api::scores::{EmployeeScore, EmployeeScoreInsert};
use crate::db::util::TimedClientExt;
use crate::db::{db_error, PgPool};

db_error!(ScoreStorageError {
    #[error("score not found: {0}")]
    NotFound(Uuid),
    #[error("sub-scores must be between 1 and 5")]
    SubScoreOutOfRange,
});

fn map_score(row: &tokio_postgres::Row) -> EmployeeScore {
    EmployeeScore {
        id: row.get("id"),
        employee_id: row.get("employee_id"),
        employee_name: row.get("employee_name"),
        employee_role: row.get("employee_role"),
        score_month: row.get("score_month"),
        productivity: row.get("productivity"),
        quality: row.get("quality"),
        discipline: row.get("discipline"),
        ownership: row.get("ownership"),
        final_score: row.get("final_score"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Scores, best first, optionally restricted to one month.
#[instrument(skip(pool))]
pub async fn list_scores(
    pool: &PgPool,
    month: Option<&str>,
) -> Result<Vec<EmployeeScore>, ScoreStorageError> {
    let client = pool.get().await?;

    let base = "SELECT s.id, s.employee_id, e.name AS employee_name, e.role AS employee_role,
            s.score_month, s.productivity, s.quality, s.discipline, s.ownership,
            s.final_score, s.created_at, s.updated_at
     FROM ops.employee_scores s
     JOIN ops.employees e ON e.id = s.employee_id";

    let rows = match month {
        Some(month) => {
            let query = format!("{base} WHERE s.score_month = $1 ORDER BY s.final_score DESC");
            client.timed_query_cached(&query, &[&month], "list_scores").await?
        }
        None => {
            let query = format!("{base} ORDER BY s.final_score DESC");
            client.timed_query_cached(&query, &[], "list_scores").await?
        }
    };

    Ok(rows.iter().map(map_score).collect())
}

/// Insert a monthly scorecard. `final_score` is derived here, never taken
/// from the caller.
#[instrument(skip(pool, insert))]
pub async fn insert_score(
    pool: &PgPool,
    insert: &EmployeeScoreInsert,
) -> Result<EmployeeScore, ScoreStorageError> {
    if !insert.sub_scores_in_range() {
        return Err(ScoreStorageError::SubScoreOutOfRange);
    }

    let client = pool.get().await?;
    let row = client
        .timed_query_one_cached(
            "WITH inserted AS (
                INSERT INTO ops.employee_scores (
                    employee_id, score_month, productivity, quality,
                    discipline, ownership, final_score
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
             )
             SELECT i.id, i.employee_id, e.name AS employee_name, e.role AS employee_role,
                    i.score_month, i.productivity, i.quality, i.discipline, i.ownership,
                    i.final_score, i.created_at, i.updated_at
             FROM inserted i
             JOIN ops.employees e ON e.id = i.employee_id",
            &[
                &insert.employee_id,
                &insert.score_month,
                &insert.productivity,
                &insert.quality,
                &insert.discipline,
                &insert.ownership,
                &insert.final_score(),
            ],
            "insert_score",
        )
        .await?;

    Ok(map_score(&row))
}

#[instrument(skip(pool, update))]
pub async fn update_score(
    pool: &PgPool,
    id: Uuid,
    update: &EmployeeScoreInsert,
) -> Result<EmployeeScore, ScoreStorageError> {
    if !update.sub_scores_in_range() {
        return Err(ScoreStorageError::SubScoreOutOfRange);
    }

    let client = pool.get().await?;
    let row = client
        .timed_query_opt_cached(
            "WITH updated AS (
                UPDATE ops.employee_scores SET
                    productivity = $2,
                    quality = $3,
                    discipline = $4,
                    ownership = $5,
                    final_score = $6,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
             )
             SELECT u.id, u.employee_id, e.name AS employee_name, e.role AS employee_role,
                    u.score_month, u.productivity, u.quality, u.discipline, u.ownership,
                    u.final_score, u.created_at, u.updated_at
             FROM updated u
             JOIN ops.employees e ON e.id = u.employee_id",
            &[
                &id,
                &update.productivity,
                &update.quality,
                &update.discipline,
                &update.ownership,
                &update.final_score(),
            ],
            "update_score",
        )
        .await?
        .ok_or(ScoreStorageError::NotFound(id))?;

    Ok(map_score(&row))
}
