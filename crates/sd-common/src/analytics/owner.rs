use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::clients::{ClientRef, ClientStatus};
use crate::api::finance::{InvoiceRef, InvoiceStatus};
use crate::api::jobs::JobCounters;

/// Days past due before an invoice counts toward the quick-stat overdue
/// amount. Deliberately independent of the aging table's 60+ bucket; the two
/// overdue definitions coexist and must not be unified.
const QUICK_STAT_OVERDUE_DAYS: i64 = 30;

/// Placeholder until collection tracking lands; mirrored into both periods.
const AVG_COLLECTION_DAYS: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiFormat {
    Number,
    Currency,
    Percent,
    Days,
}

/// One dashboard card: a labeled this-period/prior-period pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiMetric {
    pub label: &'static str,
    pub this_period: f64,
    pub last_period: f64,
    pub format: KpiFormat,
}

/// Everything the owner dashboard aggregates over, fetched as independent
/// snapshots (slight skew between them is accepted).
#[derive(Debug, Clone, Default)]
pub struct OwnerSnapshot {
    pub clients: Vec<ClientRef>,
    pub client_statuses: Vec<ClientStatus>,
    pub jobs: Vec<JobCounters>,
    pub invoices: Vec<InvoiceRef>,
    pub payment_amounts: Vec<f64>,
}

/// The aggregates a snapshot reduces to; also the pluggable prior-period
/// input. There is no real historical baseline yet, so an absent prior
/// reports zeros (the visible 100%-growth quirk is intentional).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnerTotals {
    pub active_clients: f64,
    pub active_jobs: f64,
    pub submissions: f64,
    pub interviews: f64,
    pub starts: f64,
    pub invoiced: f64,
    pub received: f64,
    pub outstanding: f64,
}

pub fn totals(snapshot: &OwnerSnapshot) -> OwnerTotals {
    OwnerTotals {
        active_clients: snapshot
            .client_statuses
            .iter()
            .filter(|status| **status == ClientStatus::Active)
            .count() as f64,
        active_jobs: snapshot
            .jobs
            .iter()
            .filter(|job| !job.status.is_terminal())
            .count() as f64,
        submissions: snapshot.jobs.iter().map(|j| j.submissions as f64).sum(),
        interviews: snapshot.jobs.iter().map(|j| j.interviews as f64).sum(),
        starts: snapshot.jobs.iter().map(|j| j.starts as f64).sum(),
        invoiced: snapshot.invoices.iter().map(|i| i.amount).sum(),
        received: snapshot.payment_amounts.iter().sum(),
        outstanding: snapshot.clients.iter().map(|c| c.outstanding).sum(),
    }
}

/// Build the owner KPI cards from the current snapshot and an optional prior
/// period.
pub fn owner_kpis(snapshot: &OwnerSnapshot, prior: Option<&OwnerTotals>) -> Vec<KpiMetric> {
    let now = totals(snapshot);
    let prior = prior.copied().unwrap_or_default();

    vec![
        metric("Active Clients", now.active_clients, prior.active_clients, KpiFormat::Number),
        metric("Active Jobs", now.active_jobs, prior.active_jobs, KpiFormat::Number),
        metric("Submissions", now.submissions, prior.submissions, KpiFormat::Number),
        metric("Interviews", now.interviews, prior.interviews, KpiFormat::Number),
        metric("Starts / Placements", now.starts, prior.starts, KpiFormat::Number),
        metric("Revenue Invoiced", now.invoiced, prior.invoiced, KpiFormat::Currency),
        metric("Payment Received", now.received, prior.received, KpiFormat::Currency),
        metric(
            "Outstanding Receivable",
            now.outstanding,
            prior.outstanding,
            KpiFormat::Currency,
        ),
        metric(
            "Avg Collection Days",
            AVG_COLLECTION_DAYS,
            AVG_COLLECTION_DAYS,
            KpiFormat::Days,
        ),
    ]
}

fn metric(label: &'static str, this_period: f64, last_period: f64, format: KpiFormat) -> KpiMetric {
    KpiMetric {
        label,
        this_period,
        last_period,
        format,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuickStats {
    pub active_clients: i64,
    pub active_jobs: i64,
    pub filled_jobs: i64,
    pub overdue_amount: f64,
}

/// Header-card stats. Overdue here means status ≠ Paid, a due date present,
/// and strictly more than 30 days past due.
pub fn quick_stats(
    client_statuses: &[ClientStatus],
    jobs: &[JobCounters],
    invoices: &[InvoiceRef],
    today: NaiveDate,
) -> QuickStats {
    use crate::api::jobs::JobStatus;

    let overdue_amount = invoices
        .iter()
        .filter(|inv| inv.status != InvoiceStatus::Paid)
        .filter_map(|inv| {
            let due = inv.due_date?;
            ((today - due).num_days() > QUICK_STAT_OVERDUE_DAYS).then_some(inv.amount)
        })
        .sum();

    QuickStats {
        active_clients: client_statuses
            .iter()
            .filter(|status| **status == ClientStatus::Active)
            .count() as i64,
        active_jobs: jobs.iter().filter(|job| !job.status.is_terminal()).count() as i64,
        filled_jobs: jobs
            .iter()
            .filter(|job| job.status == JobStatus::Filled)
            .count() as i64,
        overdue_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::jobs::JobStatus;
    use uuid::Uuid;

    fn job(status: JobStatus, submissions: i32, starts: i32) -> JobCounters {
        JobCounters {
            id: Uuid::new_v4(),
            status,
            submissions,
            interviews: 1,
            offers: 0,
            starts,
        }
    }

    fn invoice(amount: f64, due_days_ago: Option<i64>, status: InvoiceStatus) -> InvoiceRef {
        InvoiceRef {
            client_id: Uuid::new_v4(),
            amount,
            due_date: due_days_ago.map(|d| today() - chrono::Duration::days(d)),
            status,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    fn snapshot() -> OwnerSnapshot {
        OwnerSnapshot {
            clients: vec![
                ClientRef {
                    id: Uuid::new_v4(),
                    name: "Acme".into(),
                    outstanding: 1500.0,
                },
                ClientRef {
                    id: Uuid::new_v4(),
                    name: "Globex".into(),
                    outstanding: 500.0,
                },
            ],
            client_statuses: vec![ClientStatus::Active, ClientStatus::Hold, ClientStatus::Active],
            jobs: vec![
                job(JobStatus::Open, 3, 1),
                job(JobStatus::Filled, 5, 2),
                job(JobStatus::ClosedNoHire, 1, 0),
            ],
            invoices: vec![
                invoice(1000.0, Some(10), InvoiceStatus::Sent),
                invoice(2000.0, Some(45), InvoiceStatus::Overdue),
            ],
            payment_amounts: vec![800.0, 200.0],
        }
    }

    #[test]
    fn totals_cover_the_whole_snapshot() {
        let t = totals(&snapshot());

        assert_eq!(t.active_clients, 2.0);
        assert_eq!(t.active_jobs, 1.0);
        assert_eq!(t.submissions, 9.0);
        assert_eq!(t.starts, 3.0);
        assert_eq!(t.invoiced, 3000.0);
        assert_eq!(t.received, 1000.0);
        assert_eq!(t.outstanding, 2000.0);
    }

    #[test]
    fn missing_prior_period_reports_zeros() {
        let kpis = owner_kpis(&snapshot(), None);

        let active_clients = kpis.iter().find(|k| k.label == "Active Clients").unwrap();
        assert_eq!(active_clients.this_period, 2.0);
        assert_eq!(active_clients.last_period, 0.0);
    }

    #[test]
    fn supplied_prior_period_is_passed_through() {
        let prior = OwnerTotals {
            active_clients: 5.0,
            ..OwnerTotals::default()
        };
        let kpis = owner_kpis(&snapshot(), Some(&prior));

        let active_clients = kpis.iter().find(|k| k.label == "Active Clients").unwrap();
        assert_eq!(active_clients.last_period, 5.0);
    }

    #[test]
    fn quick_stat_overdue_uses_the_thirty_day_threshold() {
        let invoices = vec![
            // 30 days exactly is not overdue; 31 is.
            invoice(100.0, Some(30), InvoiceStatus::Sent),
            invoice(200.0, Some(31), InvoiceStatus::Sent),
            invoice(400.0, Some(90), InvoiceStatus::Paid),
            invoice(800.0, None, InvoiceStatus::Sent),
        ];

        let stats = quick_stats(&[], &[], &invoices, today());

        assert_eq!(stats.overdue_amount, 200.0);
    }

    #[test]
    fn quick_stats_count_active_and_filled_jobs() {
        let jobs = vec![
            job(JobStatus::Open, 0, 0),
            job(JobStatus::Interviewing, 0, 0),
            job(JobStatus::Filled, 0, 0),
        ];
        let stats = quick_stats(&[ClientStatus::Active], &jobs, &[], today());

        assert_eq!(stats.active_clients, 1);
        assert_eq!(stats.active_jobs, 2);
        assert_eq!(stats.filled_jobs, 1);
    }

    #[test]
    fn empty_inputs_yield_zeroes() {
        let stats = quick_stats(&[], &[], &[], today());
        assert_eq!(stats, QuickStats::default());

        let kpis = owner_kpis(&OwnerSnapshot::default(), None);
        assert!(kpis
            .iter()
            .filter(|k| k.label != "Avg Collection Days")
            .all(|k| k.this_period == 0.0));
    }
}
