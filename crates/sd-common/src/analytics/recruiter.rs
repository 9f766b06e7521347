use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::activities::RecruiterActivity;
use crate::api::employees::EmployeeRef;
use crate::api::jobs::JobAssignment;

/// Monday-to-Sunday window the weekly rollup operates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    /// The week containing `date`, starting on Monday.
    pub fn containing(date: NaiveDate) -> Self {
        let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruiterKpi {
    pub recruiter_id: Uuid,
    pub recruiter_name: String,
    /// Distinct job assignments, regardless of job status.
    pub open_positions: i64,
    /// Jobs touched this week over assigned jobs, as a rounded percentage.
    pub job_coverage_ratio: i64,
    pub am_submissions: i64,
    pub end_client_submissions: i64,
    pub interviews: i64,
    pub hired: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecruiterKpiSummary {
    pub total_open_positions: i64,
    /// Mean of the per-recruiter coverage ratios, not a ratio of totals.
    pub avg_job_coverage_ratio: i64,
    pub total_am_submissions: i64,
    pub total_end_client_submissions: i64,
    pub total_interviews: i64,
    pub total_hired: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruiterKpiReport {
    pub week: WeekWindow,
    pub recruiters: Vec<RecruiterKpi>,
    pub summary: RecruiterKpiSummary,
}

/// Roll weekly activity up into per-recruiter KPIs plus a team summary.
///
/// Activity rows outside the window are ignored, so callers may pass either a
/// pre-filtered set or the raw table.
pub fn weekly_recruiter_kpis(
    recruiters: &[EmployeeRef],
    assignments: &[JobAssignment],
    activities: &[RecruiterActivity],
    week: WeekWindow,
) -> RecruiterKpiReport {
    let rows: Vec<RecruiterKpi> = recruiters
        .iter()
        .map(|recruiter| {
            let open_positions = assignments
                .iter()
                .filter(|a| a.employee_id == recruiter.id)
                .count() as i64;

            let weekly: Vec<&RecruiterActivity> = activities
                .iter()
                .filter(|a| a.employee_id == recruiter.id && week.contains(a.activity_date))
                .collect();

            let jobs_with_activity = weekly
                .iter()
                .map(|a| a.job_id)
                .collect::<HashSet<_>>()
                .len() as i64;

            let job_coverage_ratio = if open_positions > 0 {
                (jobs_with_activity as f64 / open_positions as f64 * 100.0).round() as i64
            } else {
                0
            };

            RecruiterKpi {
                recruiter_id: recruiter.id,
                recruiter_name: recruiter.name.clone(),
                open_positions,
                job_coverage_ratio,
                am_submissions: weekly.iter().map(|a| a.am_submissions as i64).sum(),
                end_client_submissions: weekly
                    .iter()
                    .map(|a| a.end_client_submissions as i64)
                    .sum(),
                interviews: weekly.iter().map(|a| a.interviews_scheduled as i64).sum(),
                hired: weekly.iter().map(|a| a.hired as i64).sum(),
            }
        })
        .collect();

    let summary = summarize(&rows);

    RecruiterKpiReport {
        week,
        recruiters: rows,
        summary,
    }
}

fn summarize(rows: &[RecruiterKpi]) -> RecruiterKpiSummary {
    let avg_job_coverage_ratio = if rows.is_empty() {
        0
    } else {
        let sum: i64 = rows.iter().map(|r| r.job_coverage_ratio).sum();
        (sum as f64 / rows.len() as f64).round() as i64
    };

    RecruiterKpiSummary {
        total_open_positions: rows.iter().map(|r| r.open_positions).sum(),
        avg_job_coverage_ratio,
        total_am_submissions: rows.iter().map(|r| r.am_submissions).sum(),
        total_end_client_submissions: rows.iter().map(|r| r.end_client_submissions).sum(),
        total_interviews: rows.iter().map(|r| r.interviews).sum(),
        total_hired: rows.iter().map(|r| r.hired).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn recruiter(name: &str) -> EmployeeRef {
        EmployeeRef {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    fn assignment(employee_id: Uuid) -> JobAssignment {
        JobAssignment {
            job_id: Uuid::new_v4(),
            employee_id,
        }
    }

    fn activity(employee_id: Uuid, job_id: Uuid, date: NaiveDate, am_submissions: i32) -> RecruiterActivity {
        RecruiterActivity {
            id: Uuid::new_v4(),
            employee_id,
            job_id,
            activity_date: date,
            resumes_sourced: 0,
            submitted: 0,
            am_submissions,
            end_client_submissions: 0,
            feedback_received: 0,
            interviews_scheduled: 0,
            hired: 0,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn week() -> WeekWindow {
        WeekWindow::containing(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap())
    }

    #[test]
    fn week_window_starts_on_monday() {
        // 2026-08-06 is a Thursday.
        let window = week();
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2026, 8, 3).unwrap());
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2026, 8, 9).unwrap());
        assert_eq!(window.start.weekday(), chrono::Weekday::Mon);
    }

    #[test]
    fn coverage_counts_distinct_jobs_with_activity() {
        let r = recruiter("Priya");
        let assignments: Vec<_> = (0..4).map(|_| assignment(r.id)).collect();
        let window = week();

        let activities = vec![
            activity(r.id, assignments[0].job_id, window.start, 3),
            activity(r.id, assignments[1].job_id, window.start + Duration::days(1), 5),
            // Second touch on an already-covered job must not inflate coverage.
            activity(r.id, assignments[0].job_id, window.start + Duration::days(2), 0),
        ];

        let report = weekly_recruiter_kpis(&[r], &assignments, &activities, window);
        let kpi = &report.recruiters[0];

        assert_eq!(kpi.open_positions, 4);
        assert_eq!(kpi.job_coverage_ratio, 50);
        assert_eq!(kpi.am_submissions, 8);
    }

    #[test]
    fn zero_assignments_yield_zero_coverage_not_nan() {
        let r = recruiter("Sam");
        let report = weekly_recruiter_kpis(&[r], &[], &[], week());

        assert_eq!(report.recruiters[0].open_positions, 0);
        assert_eq!(report.recruiters[0].job_coverage_ratio, 0);
    }

    #[test]
    fn activities_outside_the_window_are_ignored() {
        let r = recruiter("Priya");
        let a = assignment(r.id);
        let window = week();

        let activities = vec![activity(r.id, a.job_id, window.start - Duration::days(1), 9)];
        let report = weekly_recruiter_kpis(&[r], &[a], &activities, window);

        assert_eq!(report.recruiters[0].am_submissions, 0);
        assert_eq!(report.recruiters[0].job_coverage_ratio, 0);
    }

    #[test]
    fn summary_averages_coverage_and_sums_counters() {
        let r1 = recruiter("A");
        let r2 = recruiter("B");
        let a1 = assignment(r1.id);
        let a2a = assignment(r2.id);
        let a2b = assignment(r2.id);
        let window = week();

        let activities = vec![
            activity(r1.id, a1.job_id, window.start, 2),
            activity(r2.id, a2a.job_id, window.start, 4),
        ];

        let report = weekly_recruiter_kpis(
            &[r1, r2],
            &[a1, a2a, a2b],
            &activities,
            window,
        );

        // Coverage 100 and 50 average to 75; counters sum.
        assert_eq!(report.summary.avg_job_coverage_ratio, 75);
        assert_eq!(report.summary.total_open_positions, 3);
        assert_eq!(report.summary.total_am_submissions, 6);
    }

    #[test]
    fn no_recruiters_produce_a_zeroed_summary() {
        let report = weekly_recruiter_kpis(&[], &[], &[], week());
        assert_eq!(report.summary, RecruiterKpiSummary::default());
        assert!(report.recruiters.is_empty());
    }
}
