use std::collections::BTreeMap;

use super::super::domain::{Activity, ActivityCategory};
use super::config::ScoringConfig;

/// Fraction of an activity's base points credited to one of `author_count` authors.
pub(crate) fn author_share(author_count: u8, lead_author: bool, lead_floor: f32) -> f32 {
    let share = match author_count {
        0 | 1 => 1.0,
        2 => 0.8,
        3 => 0.6,
        4 => 0.5,
        n => 1.0 / f32::from(n),
    };

    if lead_author && author_count > 1 {
        share.max(lead_floor)
    } else {
        share
    }
}

pub(crate) fn round_points(points: f32) -> f32 {
    (points * 100.0).round() / 100.0
}

pub(crate) fn activity_points(activity: &Activity, config: &ScoringConfig) -> f32 {
    let base = config.base_points_for(activity.category);
    let share = author_share(
        activity.author_count,
        activity.lead_author,
        config.lead_author_floor,
    );
    round_points(base * share)
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct CategoryTally {
    pub count: u32,
    pub points: f32,
}

pub(crate) fn tally_by_category(
    activities: &[Activity],
    config: &ScoringConfig,
) -> BTreeMap<ActivityCategory, CategoryTally> {
    let mut tallies: BTreeMap<ActivityCategory, CategoryTally> = BTreeMap::new();
    for activity in activities {
        let entry = tallies.entry(activity.category).or_default();
        entry.count += 1;
        entry.points = round_points(entry.points + activity_points(activity, config));
    }
    tallies
}
