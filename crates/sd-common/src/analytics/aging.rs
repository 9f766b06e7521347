use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::clients::ClientRef;
use crate::api::finance::{InvoiceRef, InvoiceStatus};

/// Receivables aging row for one client. Bucket sums are invoice amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientAging {
    pub client_id: Uuid,
    pub client_name: String,
    /// Not yet due, or up to 15 days past due. The merge is intentional:
    /// anything less than 16 days past due counts as current.
    pub days_0_to_15: f64,
    pub days_16_to_30: f64,
    pub days_31_to_60: f64,
    pub days_60_plus: f64,
    pub total: f64,
}

/// Bucket the non-paid invoices of each client by days overdue.
///
/// Invoices without a due date are excluded from aging entirely, and clients
/// whose buckets all sum to zero are dropped from the result. Output order
/// follows the input client order.
pub fn receivables_aging(
    clients: &[ClientRef],
    invoices: &[InvoiceRef],
    today: NaiveDate,
) -> Vec<ClientAging> {
    clients
        .iter()
        .filter_map(|client| {
            let mut row = ClientAging {
                client_id: client.id,
                client_name: client.name.clone(),
                days_0_to_15: 0.0,
                days_16_to_30: 0.0,
                days_31_to_60: 0.0,
                days_60_plus: 0.0,
                total: 0.0,
            };

            for invoice in invoices
                .iter()
                .filter(|inv| inv.client_id == client.id && inv.status != InvoiceStatus::Paid)
            {
                let Some(due_date) = invoice.due_date else {
                    continue;
                };

                let days_overdue = (today - due_date).num_days();
                if days_overdue <= 15 {
                    row.days_0_to_15 += invoice.amount;
                } else if days_overdue <= 30 {
                    row.days_16_to_30 += invoice.amount;
                } else if days_overdue <= 60 {
                    row.days_31_to_60 += invoice.amount;
                } else {
                    row.days_60_plus += invoice.amount;
                }
            }

            row.total = row.days_0_to_15 + row.days_16_to_30 + row.days_31_to_60 + row.days_60_plus;
            (row.total > 0.0).then_some(row)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(name: &str) -> ClientRef {
        ClientRef {
            id: Uuid::new_v4(),
            name: name.into(),
            outstanding: 0.0,
        }
    }

    fn invoice(client_id: Uuid, amount: f64, due: Option<NaiveDate>, status: InvoiceStatus) -> InvoiceRef {
        InvoiceRef {
            client_id,
            amount,
            due_date: due,
            status,
        }
    }

    fn day(offset_back: i64) -> NaiveDate {
        today() - chrono::Duration::days(offset_back)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    #[test]
    fn splits_invoices_across_the_documented_buckets() {
        let acme = client("Acme");
        let invoices = vec![
            invoice(acme.id, 1000.0, Some(day(10)), InvoiceStatus::Sent),
            invoice(acme.id, 2000.0, Some(day(40)), InvoiceStatus::Overdue),
        ];

        let rows = receivables_aging(&[acme], &invoices, today());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].days_0_to_15, 1000.0);
        assert_eq!(rows[0].days_16_to_30, 0.0);
        assert_eq!(rows[0].days_31_to_60, 2000.0);
        assert_eq!(rows[0].days_60_plus, 0.0);
        assert_eq!(rows[0].total, 3000.0);
    }

    #[test]
    fn not_yet_due_counts_as_current() {
        let acme = client("Acme");
        let invoices = vec![invoice(
            acme.id,
            500.0,
            Some(today() + chrono::Duration::days(20)),
            InvoiceStatus::Sent,
        )];

        let rows = receivables_aging(&[acme], &invoices, today());

        assert_eq!(rows[0].days_0_to_15, 500.0);
        assert_eq!(rows[0].total, 500.0);
    }

    #[test]
    fn bucket_boundaries_partition_without_overlap() {
        let acme = client("Acme");
        // One invoice exactly on each boundary day.
        let invoices = vec![
            invoice(acme.id, 1.0, Some(day(15)), InvoiceStatus::Sent),
            invoice(acme.id, 2.0, Some(day(16)), InvoiceStatus::Sent),
            invoice(acme.id, 4.0, Some(day(30)), InvoiceStatus::Sent),
            invoice(acme.id, 8.0, Some(day(31)), InvoiceStatus::Sent),
            invoice(acme.id, 16.0, Some(day(60)), InvoiceStatus::Sent),
            invoice(acme.id, 32.0, Some(day(61)), InvoiceStatus::Sent),
        ];

        let rows = receivables_aging(&[acme], &invoices, today());

        assert_eq!(rows[0].days_0_to_15, 1.0);
        assert_eq!(rows[0].days_16_to_30, 6.0);
        assert_eq!(rows[0].days_31_to_60, 24.0);
        assert_eq!(rows[0].days_60_plus, 32.0);
        assert_eq!(
            rows[0].total,
            rows[0].days_0_to_15 + rows[0].days_16_to_30 + rows[0].days_31_to_60 + rows[0].days_60_plus
        );
    }

    #[test]
    fn paid_and_undated_invoices_are_excluded() {
        let acme = client("Acme");
        let invoices = vec![
            invoice(acme.id, 700.0, Some(day(45)), InvoiceStatus::Paid),
            invoice(acme.id, 900.0, None, InvoiceStatus::Sent),
        ];

        let rows = receivables_aging(&[acme], &invoices, today());

        assert!(rows.is_empty());
    }

    #[test]
    fn zero_total_clients_are_dropped() {
        let acme = client("Acme");
        let globex = client("Globex");
        let invoices = vec![invoice(globex.id, 100.0, Some(day(5)), InvoiceStatus::Sent)];

        let rows = receivables_aging(&[acme, globex.clone()], &invoices, today());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].client_id, globex.id);
    }

    #[test]
    fn empty_inputs_yield_an_empty_result() {
        assert!(receivables_aging(&[], &[], today()).is_empty());
    }
}
