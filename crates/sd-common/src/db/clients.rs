use std::str::FromStr;

use tracing::instrument;
use uuid::Uuid;

use crate::api::clients::{Client, ClientInsert, ClientRef, ClientStatus};
use crate::db::util::TimedClientExt;
use crate::db::{db_error, PgPool};

db_error!(ClientStorageError {
    #[error("client not found: {0}")]
    NotFound(Uuid),
    #[error("failed to map client row: {0}")]
    Mapping(String),
});

fn map_client(row: &tokio_postgres::Row) -> Result<Client, ClientStorageError> {
    let status: String = row.get("status");
    Ok(Client {
        id: row.get("id"),
        name: row.get("name"),
        account_manager_id: row.get("account_manager_id"),
        account_manager_name: row.get("account_manager_name"),
        billing_type: row.get("billing_type"),
        payment_terms: row.get("payment_terms"),
        status: ClientStatus::from_str(&status)
            .map_err(|_| ClientStorageError::Mapping(format!("unknown client status: {status}")))?,
        last_payment_date: row.get("last_payment_date"),
        outstanding: row.get("outstanding"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[instrument(skip(pool))]
pub async fn list_clients(pool: &PgPool) -> Result<Vec<Client>, ClientStorageError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query_cached(
            "SELECT c.id, c.name, c.account_manager_id, e.name AS account_manager_name,
                    c.billing_type, c.payment_terms, c.status, c.last_payment_date,
                    c.outstanding, c.created_at, c.updated_at
             FROM ops.clients c
             LEFT JOIN ops.employees e ON e.id = c.account_manager_id
             ORDER BY c.name",
            &[],
            "list_clients",
        )
        .await?;

    rows.iter().map(map_client).collect()
}

/// The id/name/outstanding triples the aging table and owner KPIs need.
#[instrument(skip(pool))]
pub async fn list_client_refs(pool: &PgPool) -> Result<Vec<ClientRef>, ClientStorageError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query_cached(
            "SELECT id, name, outstanding FROM ops.clients ORDER BY name",
            &[],
            "list_client_refs",
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| ClientRef {
            id: row.get("id"),
            name: row.get("name"),
            outstanding: row.get("outstanding"),
        })
        .collect())
}

#[instrument(skip(pool))]
pub async fn list_client_statuses(pool: &PgPool) -> Result<Vec<ClientStatus>, ClientStorageError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query_cached("SELECT status FROM ops.clients", &[], "list_client_statuses")
        .await?;

    rows.iter()
        .map(|row| {
            let status: String = row.get("status");
            ClientStatus::from_str(&status).map_err(|_| {
                ClientStorageError::Mapping(format!("unknown client status: {status}"))
            })
        })
        .collect()
}

#[instrument(skip(pool, insert))]
pub async fn insert_client(
    pool: &PgPool,
    insert: &ClientInsert,
) -> Result<Client, ClientStorageError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_one_cached(
            "WITH inserted AS (
                INSERT INTO ops.clients (
                    name, account_manager_id, billing_type, payment_terms,
                    status, last_payment_date, outstanding
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
             )
             SELECT i.id, i.name, i.account_manager_id, e.name AS account_manager_name,
                    i.billing_type, i.payment_terms, i.status, i.last_payment_date,
                    i.outstanding, i.created_at, i.updated_at
             FROM inserted i
             LEFT JOIN ops.employees e ON e.id = i.account_manager_id",
            &[
                &insert.name,
                &insert.account_manager_id,
                &insert.billing_type,
                &insert.payment_terms,
                &insert.status.as_ref(),
                &insert.last_payment_date,
                &insert.outstanding,
            ],
            "insert_client",
        )
        .await?;

    map_client(&row)
}

#[instrument(skip(pool, update))]
pub async fn update_client(
    pool: &PgPool,
    id: Uuid,
    update: &ClientInsert,
) -> Result<Client, ClientStorageError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_opt_cached(
            "WITH updated AS (
                UPDATE ops.clients SET
                    name = $2,
                    account_manager_id = $3,
                    billing_type = $4,
                    payment_terms = $5,
                    status = $6,
                    last_payment_date = $7,
                    outstanding = $8,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
             )
             SELECT u.id, u.name, u.account_manager_id, e.name AS account_manager_name,
                    u.billing_type, u.payment_terms, u.status, u.last_payment_date,
                    u.outstanding, u.created_at, u.updated_at
             FROM updated u
             LEFT JOIN ops.employees e ON e.id = u.account_manager_id",
            &[
                &id,
                &update.name,
                &update.account_manager_id,
                &update.billing_type,
                &update.payment_terms,
                &update.status.as_ref(),
                &update.last_payment_date,
                &update.outstanding,
            ],
            "update_client",
        )
        .await?
        .ok_or(ClientStorageError::NotFound(id))?;

    map_client(&row)
}

#[instrument(skip(pool))]
pub async fn delete_client(pool: &PgPool, id: Uuid) -> Result<(), ClientStorageError> {
    let client = pool.get().await?;
    let deleted = client
        .timed_execute_cached("DELETE FROM ops.clients WHERE id = $1", &[&id], "delete_client")
        .await?;

    if deleted == 0 {
        return Err(ClientStorageError::NotFound(id));
    }
    Ok(())
}
