use tracing::instrument;

use crate::api::finance::{Payment, PaymentInsert};
use crate::db::util::TimedClientExt;
use crate::db::{db_error, PgPool};

db_error!(PaymentStorageError {});

fn map_payment(row: &tokio_postgres::Row) -> Payment {
    Payment {
        id: row.get("id"),
        client_id: row.get("client_id"),
        client_name: row.get("client_name"),
        invoice_id: row.get("invoice_id"),
        invoice_no: row.get("invoice_no"),
        amount: row.get("amount"),
        date_received: row.get("date_received"),
        payment_mode: row.get("payment_mode"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    }
}

#[instrument(skip(pool))]
pub async fn list_payments(pool: &PgPool) -> Result<Vec<Payment>, PaymentStorageError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query_cached(
            "SELECT p.id, p.client_id, c.name AS client_name, p.invoice_id,
                    i.invoice_no, p.amount, p.date_received, p.payment_mode,
                    p.notes, p.created_at
             FROM ops.payments p
             JOIN ops.clients c ON c.id = p.client_id
             LEFT JOIN ops.invoices i ON i.id = p.invoice_id
             ORDER BY p.date_received DESC, p.created_at DESC",
            &[],
            "list_payments",
        )
        .await?;

    Ok(rows.iter().map(map_payment).collect())
}

/// Just the amounts, summed into the owner dashboard.
#[instrument(skip(pool))]
pub async fn list_payment_amounts(pool: &PgPool) -> Result<Vec<f64>, PaymentStorageError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query_cached("SELECT amount FROM ops.payments", &[], "list_payment_amounts")
        .await?;

    Ok(rows.iter().map(|row| row.get("amount")).collect())
}

#[instrument(skip(pool, insert))]
pub async fn insert_payment(
    pool: &PgPool,
    insert: &PaymentInsert,
) -> Result<Payment, PaymentStorageError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_one_cached(
            "WITH inserted AS (
                INSERT INTO ops.payments (
                    client_id, invoice_id, amount, date_received, payment_mode, notes
                ) VALUES ($1, $2, $3, COALESCE($4, CURRENT_DATE), $5, $6)
                RETURNING *
             )
             SELECT p.id, p.client_id, c.name AS client_name, p.invoice_id,
                    i.invoice_no, p.amount, p.date_received, p.payment_mode,
                    p.notes, p.created_at
             FROM inserted p
             JOIN ops.clients c ON c.id = p.client_id
             LEFT JOIN ops.invoices i ON i.id = p.invoice_id",
            &[
                &insert.client_id,
                &insert.invoice_id,
                &insert.amount,
                &insert.date_received,
                &insert.payment_mode,
                &insert.notes,
            ],
            "insert_payment",
        )
        .await?;

    Ok(map_payment(&row))
}
