use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::engine::{trend, Snapshot};
use crate::skills::rating::{self, SkillRating};

/// Change from the previous entry: newest minus second-newest for leaves,
/// current-average minus previous-average for parents. None when there is
/// not enough history to compare.
pub fn rating_delta(snapshot: &Snapshot, skill_id: Uuid) -> Option<i32> {
    let children = snapshot.children_of(skill_id);
    if children.is_empty() {
        leaf_delta(snapshot.ratings_for(skill_id))
    } else {
        let child_ids: Vec<Uuid> = children.iter().map(|c| c.id).collect();
        rollup_delta(snapshot, &child_ids)
    }
}

/// Newest rating minus second-newest. Fewer than two entries means there is
/// nothing to compare, not a zero change.
fn leaf_delta(ratings: &[SkillRating]) -> Option<i32> {
    // History is ascending by (date, updated_at)
    if ratings.len() < 2 {
        return None;
    }
    let newest = &ratings[ratings.len() - 1];
    let second = &ratings[ratings.len() - 2];
    Some(newest.rating - second.rating)
}

/// Parent delta across children. A child with two or more entries feeds its
/// newest and second-newest into the running sums; a child with exactly one
/// entry feeds it into both sums, participating in the average with zero net
/// change; a child with none is excluded entirely. Defined only when at
/// least one child has real history (two or more entries).
fn rollup_delta(snapshot: &Snapshot, child_ids: &[Uuid]) -> Option<i32> {
    let mut newest_total = 0;
    let mut previous_total = 0;
    let mut contributing = 0;
    let mut has_history = false;

    for &child_id in child_ids {
        let history = snapshot.ratings_for(child_id);
        match history.len() {
            0 => {}
            1 => {
                newest_total += history[0].rating;
                previous_total += history[0].rating;
                contributing += 1;
            }
            n => {
                newest_total += history[n - 1].rating;
                previous_total += history[n - 2].rating;
                contributing += 1;
                has_history = true;
            }
        }
    }

    if !has_history || contributing == 0 {
        return None;
    }
    Some(newest_total / contributing - previous_total / contributing)
}

/// Change over the trailing 7-day window. Leaves use their direct history;
/// parents use their synthetic day-bucketed series. Defined only when the
/// window holds at least two distinct records, so a skill with a single
/// rating never produces a weekly delta.
pub fn weekly_delta(snapshot: &Snapshot, skill_id: Uuid, now: DateTime<Utc>) -> Option<i32> {
    let window_start = now - Duration::days(7);
    let children = snapshot.children_of(skill_id);

    if children.is_empty() {
        let window = rating::since(snapshot.ratings_for(skill_id), window_start);
        if window.len() < 2 {
            return None;
        }
        Some(window[window.len() - 1].rating - window[0].rating)
    } else {
        let window: Vec<trend::TrendPoint> = trend::trend_series(snapshot, skill_id)
            .filter(|p| trend::day_start_utc(p.day) >= window_start)
            .collect();
        if window.len() < 2 {
            return None;
        }
        Some(window[window.len() - 1].rating - window[0].rating)
    }
}
