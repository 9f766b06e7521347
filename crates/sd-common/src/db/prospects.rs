use std::str::FromStr;

use tracing::instrument;
use uuid::Uuid;

use crate::api::prospects::{BdProspect, BdProspectInsert, BdStage};
use crate::db::util::TimedClientExt;
use crate::db::{db_error, PgPool};

db_error!(ProspectStorageError {
    #[error("prospect not found: {0}")]
    NotFound(Uuid),
    #[error("probability must be between 0 and 100")]
    ProbabilityOutOfRange,
    #[error("failed to map prospect row: {0}")]
    Mapping(String),
});

fn map_prospect(row: &tokio_postgres::Row) -> Result<BdProspect, ProspectStorageError> {
    let stage: String = row.get("stage");
    Ok(BdProspect {
        id: row.get("id"),
        prospect_name: row.get("prospect_name"),
        contact_name: row.get("contact_name"),
        contact_email: row.get("contact_email"),
        industry: row.get("industry"),
        stage: BdStage::from_str(&stage)
            .map_err(|_| ProspectStorageError::Mapping(format!("unknown bd stage: {stage}")))?,
        probability: row.get("probability"),
        bd_owner_id: row.get("bd_owner_id"),
        last_follow_up: row.get("last_follow_up"),
        next_action: row.get("next_action"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

const PROSPECT_COLUMNS: &str = "id, prospect_name, contact_name, contact_email, industry,
    stage, probability, bd_owner_id, last_follow_up, next_action, created_at, updated_at";

#[instrument(skip(pool))]
pub async fn list_prospects(pool: &PgPool) -> Result<Vec<BdProspect>, ProspectStorageError> {
    let client = pool.get().await?;
    let query = format!(
        "SELECT {PROSPECT_COLUMNS} FROM ops.bd_prospects
         ORDER BY probability DESC, prospect_name"
    );
    let rows = client.timed_query_cached(&query, &[], "list_prospects").await?;

    rows.iter().map(map_prospect).collect()
}

#[instrument(skip(pool, insert))]
pub async fn insert_prospect(
    pool: &PgPool,
    insert: &BdProspectInsert,
) -> Result<BdProspect, ProspectStorageError> {
    if !(0..=100).contains(&insert.probability) {
        return Err(ProspectStorageError::ProbabilityOutOfRange);
    }

    let client = pool.get().await?;
    let query = format!(
        "INSERT INTO ops.bd_prospects (
            prospect_name, contact_name, contact_email, industry, stage,
            probability, bd_owner_id, last_follow_up, next_action
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {PROSPECT_COLUMNS}"
    );
    let row = client
        .timed_query_one_cached(
            &query,
            &[
                &insert.prospect_name,
                &insert.contact_name,
                &insert.contact_email,
                &insert.industry,
                &insert.stage.as_ref(),
                &insert.probability,
                &insert.bd_owner_id,
                &insert.last_follow_up,
                &insert.next_action,
            ],
            "insert_prospect",
        )
        .await?;

    map_prospect(&row)
}

#[instrument(skip(pool, update))]
pub async fn update_prospect(
    pool: &PgPool,
    id: Uuid,
    update: &BdProspectInsert,
) -> Result<BdProspect, ProspectStorageError> {
    if !(0..=100).contains(&update.probability) {
        return Err(ProspectStorageError::ProbabilityOutOfRange);
    }

    let client = pool.get().await?;
    let query = format!(
        "UPDATE ops.bd_prospects SET
            prospect_name = $2,
            contact_name = $3,
            contact_email = $4,
            industry = $5,
            stage = $6,
            probability = $7,
            bd_owner_id = $8,
            last_follow_up = $9,
            next_action = $10,
            updated_at = NOW()
         WHERE id = $1
         RETURNING {PROSPECT_COLUMNS}"
    );
    let row = client
        .timed_query_opt_cached(
            &query,
            &[
                &id,
                &update.prospect_name,
                &update.contact_name,
                &update.contact_email,
                &update.industry,
                &update.stage.as_ref(),
                &update.probability,
                &update.bd_owner_id,
                &update.last_follow_up,
                &update.next_action,
            ],
            "update_prospect",
        )
        .await?
        .ok_or(ProspectStorageError::NotFound(id))?;

    map_prospect(&row)
}

#[instrument(skip(pool))]
pub async fn delete_prospect(pool: &PgPool, id: Uuid) -> Result<(), ProspectStorageError> {
    let client = pool.get().await?;
    let deleted = client
        .timed_execute_cached(
            "DELETE FROM ops.bd_prospects WHERE id = $1",
            &[&id],
            "delete_prospect",
        )
        .await?;

    if deleted == 0 {
        return Err(ProspectStorageError::NotFound(id));
    }
    Ok(())
}
