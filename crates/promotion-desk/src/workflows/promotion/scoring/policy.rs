use std::collections::{BTreeMap, BTreeSet};

use super::super::domain::{AcademicTitle, ActivityCategory, Criteria};
use super::rules::{round_points, CategoryTally};
use super::{Eligibility, ScoreLine, ScoreSheet, Shortfall};

/// Picks the criteria governing a posting: a department-specific entry wins over
/// the title-wide default.
pub fn select_criteria<'a>(
    criteria: &'a [Criteria],
    title: AcademicTitle,
    department: &str,
) -> Option<&'a Criteria> {
    criteria
        .iter()
        .find(|entry| entry.academic_title == title && entry.applies_to_department(department))
        .or_else(|| {
            criteria
                .iter()
                .find(|entry| entry.academic_title == title && entry.department.is_none())
        })
}

pub(crate) fn build_sheet(
    tallies: &BTreeMap<ActivityCategory, CategoryTally>,
    criteria: Option<&Criteria>,
) -> ScoreSheet {
    let mut categories: BTreeSet<ActivityCategory> = tallies.keys().copied().collect();
    if let Some(criteria) = criteria {
        categories.extend(criteria.rules.iter().map(|rule| rule.category));
    }

    let mut lines = Vec::with_capacity(categories.len());
    let mut shortfalls = Vec::new();
    let mut total_points = 0.0;

    for category in categories {
        let tally = tallies.get(&category).copied().unwrap_or_default();
        let rule = criteria.and_then(|criteria| criteria.rule_for(category));

        let counted_points = match rule.and_then(|rule| rule.max_points) {
            Some(cap) => tally.points.min(cap),
            None => tally.points,
        };

        let mut satisfied = true;
        if let Some(rule) = rule {
            if let Some(required) = rule.min_points {
                if counted_points < required {
                    satisfied = false;
                    shortfalls.push(Shortfall::CategoryPoints {
                        category,
                        required,
                        actual: counted_points,
                    });
                }
            }
            if let Some(required) = rule.min_count {
                if tally.count < required {
                    satisfied = false;
                    shortfalls.push(Shortfall::CategoryCount {
                        category,
                        required,
                        actual: tally.count,
                    });
                }
            }
        }

        total_points += counted_points;
        lines.push(ScoreLine {
            category,
            category_label: category.label(),
            count: tally.count,
            raw_points: tally.points,
            counted_points,
            min_points: rule.and_then(|rule| rule.min_points),
            max_points: rule.and_then(|rule| rule.max_points),
            min_count: rule.and_then(|rule| rule.min_count),
            satisfied,
        });
    }

    let total_points = round_points(total_points);

    let (criteria_id, required_total, eligibility) = match criteria {
        Some(criteria) => {
            if total_points < criteria.minimum_total {
                shortfalls.push(Shortfall::Total {
                    required: criteria.minimum_total,
                    actual: total_points,
                });
            }
            let eligibility = if shortfalls.is_empty() {
                Eligibility::Eligible
            } else {
                Eligibility::Ineligible
            };
            (
                Some(criteria.id.clone()),
                Some(criteria.minimum_total),
                eligibility,
            )
        }
        None => (None, None, Eligibility::Unchecked),
    };

    ScoreSheet {
        criteria_id,
        lines,
        total_points,
        required_total,
        eligibility,
        shortfalls,
    }
}
