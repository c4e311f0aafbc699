use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::ActivityCategory;

/// Point values and author-sharing rules used by the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub base_points: BTreeMap<ActivityCategory, f32>,
    /// Share of the base points a lead author keeps regardless of author count.
    pub lead_author_floor: f32,
}

impl ScoringConfig {
    pub fn base_points_for(&self, category: ActivityCategory) -> f32 {
        self.base_points.get(&category).copied().unwrap_or(0.0)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let base_points = [
            (ActivityCategory::IndexedArticle, 30.0),
            (ActivityCategory::NationalArticle, 10.0),
            (ActivityCategory::Book, 40.0),
            (ActivityCategory::BookChapter, 15.0),
            (ActivityCategory::ConferencePaper, 5.0),
            (ActivityCategory::Project, 20.0),
            (ActivityCategory::Patent, 30.0),
            (ActivityCategory::Citation, 1.0),
            (ActivityCategory::ThesisSupervision, 8.0),
            (ActivityCategory::Teaching, 2.0),
            (ActivityCategory::Award, 10.0),
        ]
        .into_iter()
        .collect();

        Self {
            base_points,
            lead_author_floor: 0.5,
        }
    }
}
