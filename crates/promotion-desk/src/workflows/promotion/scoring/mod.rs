mod config;
mod policy;
mod rules;
mod table;

pub use config::ScoringConfig;
pub use policy::select_criteria;
pub use table::{score_table_csv, write_score_table, ScoreTableError};

use serde::{Deserialize, Serialize};

use super::domain::{Activity, ActivityCategory, Criteria, CriteriaId};

/// Stateless calculator that applies the scoring configuration to activities.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn points_for(&self, activity: &Activity) -> f32 {
        rules::activity_points(activity, &self.config)
    }

    pub fn score(&self, activities: &[Activity], criteria: Option<&Criteria>) -> ScoreSheet {
        let tallies = rules::tally_by_category(activities, &self.config);
        policy::build_sheet(&tallies, criteria)
    }
}

/// Whether a score sheet meets its criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    Ineligible,
    /// No criteria were defined for the posting's title.
    Unchecked,
}

impl Eligibility {
    pub const fn label(self) -> &'static str {
        match self {
            Eligibility::Eligible => "eligible",
            Eligibility::Ineligible => "ineligible",
            Eligibility::Unchecked => "unchecked",
        }
    }
}

/// Per-category totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreLine {
    pub category: ActivityCategory,
    pub category_label: &'static str,
    pub count: u32,
    pub raw_points: f32,
    /// Raw points capped at the category maximum.
    pub counted_points: f32,
    pub min_points: Option<f32>,
    pub max_points: Option<f32>,
    pub min_count: Option<u32>,
    pub satisfied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shortfall {
    CategoryPoints {
        category: ActivityCategory,
        required: f32,
        actual: f32,
    },
    CategoryCount {
        category: ActivityCategory,
        required: u32,
        actual: u32,
    },
    Total {
        required: f32,
        actual: f32,
    },
}

impl Shortfall {
    pub fn summary(&self) -> String {
        match self {
            Shortfall::CategoryPoints {
                category,
                required,
                actual,
            } => format!(
                "{}: {:.2} points, {:.2} required",
                category.label(),
                actual,
                required
            ),
            Shortfall::CategoryCount {
                category,
                required,
                actual,
            } => format!(
                "{}: {actual} activities, {required} required",
                category.label()
            ),
            Shortfall::Total { required, actual } => {
                format!("total: {actual:.2} points, {required:.2} required")
            }
        }
    }
}

/// Scoring output for one application, kept for audits and the jury.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSheet {
    pub criteria_id: Option<CriteriaId>,
    pub lines: Vec<ScoreLine>,
    pub total_points: f32,
    pub required_total: Option<f32>,
    pub eligibility: Eligibility,
    pub shortfalls: Vec<Shortfall>,
}

impl ScoreSheet {
    pub fn summary(&self) -> String {
        match (self.eligibility, self.required_total) {
            (Eligibility::Eligible, Some(required)) => format!(
                "eligible with {:.2} points ({:.2} required)",
                self.total_points, required
            ),
            (Eligibility::Ineligible, _) => {
                let reasons: Vec<String> = self.shortfalls.iter().map(Shortfall::summary).collect();
                format!("ineligible: {}", reasons.join("; "))
            }
            _ => format!("{:.2} points, no criteria defined", self.total_points),
        }
    }

    pub fn line(&self, category: ActivityCategory) -> Option<&ScoreLine> {
        self.lines.iter().find(|line| line.category == category)
    }
}
