use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Monthly performance scorecard. `final_score` is the stored mean of the
/// four sub-scores, recomputed on every write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeScore {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: Option<String>,
    pub employee_role: Option<String>,
    pub score_month: String,
    pub productivity: f64,
    pub quality: f64,
    pub discipline: f64,
    pub ownership: f64,
    pub final_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeScoreInsert {
    pub employee_id: Uuid,
    pub score_month: String,
    pub productivity: f64,
    pub quality: f64,
    pub discipline: f64,
    pub ownership: f64,
}

impl EmployeeScoreInsert {
    /// Sub-scores live on a 1–5 scale.
    pub fn sub_scores_in_range(&self) -> bool {
        [self.productivity, self.quality, self.discipline, self.ownership]
            .iter()
            .all(|score| (1.0..=5.0).contains(score))
    }

    pub fn final_score(&self) -> f64 {
        (self.productivity + self.quality + self.discipline + self.ownership) / 4.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiTarget {
    pub id: Uuid,
    pub department: String,
    pub kpi_name: String,
    pub target_value: f64,
    pub period: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert() -> EmployeeScoreInsert {
        EmployeeScoreInsert {
            employee_id: Uuid::nil(),
            score_month: "2026-07".into(),
            productivity: 4.0,
            quality: 3.0,
            discipline: 5.0,
            ownership: 4.0,
        }
    }

    #[test]
    fn final_score_is_the_mean_of_the_four() {
        assert_eq!(insert().final_score(), 4.0);
    }

    #[test]
    fn range_check_rejects_out_of_scale_scores() {
        assert!(insert().sub_scores_in_range());

        let mut low = insert();
        low.quality = 0.5;
        assert!(!low.sub_scores_in_range());

        let mut high = insert();
        high.ownership = 5.5;
        assert!(!high.sub_scores_in_range());
    }
}
