use std::collections::BTreeSet;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::engine::Snapshot;
use crate::skills::rating::{self, SkillRating};

/// One day-bucketed chart point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub day: NaiveDate,
    pub rating: i32,
}

/// Midnight UTC at the start of the given day
pub fn day_start_utc(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// As-of reconstruction of a parent skill's historical average, computed
/// fresh from leaf history: one candidate day per distinct calendar day in
/// any child's history, each point averaging the latest rating every child
/// had by the end of that day. Children with nothing recorded yet contribute
/// nothing, and days where no child has contributed are skipped rather than
/// emitted as gaps.
///
/// The series is lazy (one point per `next()`) and restartable via `Clone`.
#[derive(Debug, Clone)]
pub struct TrendSeries {
    days: Vec<NaiveDate>,
    child_histories: Vec<Vec<SkillRating>>,
    position: usize,
}

impl TrendSeries {
    fn new(snapshot: &Snapshot, parent_id: Uuid) -> Self {
        let child_histories: Vec<Vec<SkillRating>> = snapshot
            .children_of(parent_id)
            .iter()
            .map(|child| snapshot.ratings_for(child.id).to_vec())
            .collect();

        let days: BTreeSet<NaiveDate> = child_histories
            .iter()
            .flatten()
            .map(|r| r.date.date_naive())
            .collect();

        TrendSeries {
            days: days.into_iter().collect(),
            child_histories,
            position: 0,
        }
    }
}

impl Iterator for TrendSeries {
    type Item = TrendPoint;

    fn next(&mut self) -> Option<TrendPoint> {
        while self.position < self.days.len() {
            let day = self.days[self.position];
            self.position += 1;

            // "As of end of day": everything up to the following midnight counts
            let cutoff = day_start_utc(day) + Duration::days(1);

            let mut values = Vec::new();
            for history in &self.child_histories {
                // Histories are ascending by (date, updated_at), so the last
                // entry within the cutoff is the as-of value
                if let Some(known) = history.iter().rev().find(|r| r.date <= cutoff) {
                    values.push(known.rating);
                }
            }

            if !values.is_empty() {
                return Some(TrendPoint {
                    day,
                    rating: values.iter().sum::<i32>() / values.len() as i32,
                });
            }
        }
        None
    }
}

/// The synthetic day-bucketed series for a parent skill. For a leaf (or an
/// unknown id) the series is empty; leaves chart their raw history instead.
pub fn trend_series(snapshot: &Snapshot, skill_id: Uuid) -> TrendSeries {
    TrendSeries::new(snapshot, skill_id)
}

/// Chart data for any skill: parents get the synthetic as-of series,
/// leaves get their own history deduplicated to one point per calendar day.
pub fn chart_series(snapshot: &Snapshot, skill_id: Uuid) -> Vec<TrendPoint> {
    if snapshot.children_of(skill_id).is_empty() {
        rating::latest_per_day(snapshot.ratings_for(skill_id))
            .iter()
            .map(|r| TrendPoint {
                day: r.date.date_naive(),
                rating: r.rating,
            })
            .collect()
    } else {
        trend_series(snapshot, skill_id).collect()
    }
}
