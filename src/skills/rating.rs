use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use uuid::Uuid;

/// One self-rating entry in a skill's append-only history.
/// Entries are never edited, only superseded by newer ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRating {
    pub id: Uuid,
    pub skill_id: Uuid,
    pub rating: i32,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl SkillRating {
    /// Create a rating dated now. Values outside [0, 100] are clamped here,
    /// before they can ever reach an aggregate.
    pub fn new(skill_id: Uuid, rating: i32, notes: Option<String>) -> Self {
        Self::dated(skill_id, rating, Utc::now(), notes)
    }

    /// Create a backdated rating
    pub fn dated(skill_id: Uuid, rating: i32, date: DateTime<Utc>, notes: Option<String>) -> Self {
        SkillRating {
            id: Uuid::new_v4(),
            skill_id,
            rating: rating.clamp(0, 100),
            date,
            notes,
            updated_at: Utc::now(),
        }
    }

    /// Sort key for "most recent": event date first, insertion time second,
    /// so same-day entries resolve deterministically.
    pub fn recency_key(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.date, self.updated_at)
    }
}

/// The single most recent rating, or None for an empty history.
/// Ties on date fall back to updated_at.
pub fn latest(ratings: &[SkillRating]) -> Option<&SkillRating> {
    ratings.iter().max_by_key(|r| r.recency_key())
}

/// Full history sorted ascending by date, ties by updated_at
pub fn sorted_by_date(ratings: &[SkillRating]) -> Vec<SkillRating> {
    let mut sorted = ratings.to_vec();
    sorted.sort_by_key(|r| r.recency_key());
    sorted
}

/// The subset with date >= window_start, sorted ascending
pub fn since(ratings: &[SkillRating], window_start: DateTime<Utc>) -> Vec<SkillRating> {
    let mut windowed: Vec<SkillRating> = ratings
        .iter()
        .filter(|r| r.date >= window_start)
        .cloned()
        .collect();
    windowed.sort_by_key(|r| r.recency_key());
    windowed
}

/// Deduplicate to one entry per UTC calendar day, keeping the latest
/// (date, updated_at) entry for each day. Returned ascending by day.
pub fn latest_per_day(ratings: &[SkillRating]) -> Vec<SkillRating> {
    use std::collections::HashMap;

    let mut last_per_day: HashMap<chrono::NaiveDate, &SkillRating> = HashMap::new();
    for rating in ratings {
        let day = rating.date.date_naive();
        let supersedes = match last_per_day.get(&day) {
            Some(existing) => rating.recency_key() >= existing.recency_key(),
            None => true,
        };
        if supersedes {
            last_per_day.insert(day, rating);
        }
    }

    let mut deduped: Vec<SkillRating> = last_per_day.into_values().cloned().collect();
    deduped.sort_by_key(|r| r.recency_key());
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at_day(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + Duration::days(day)
    }

    #[test]
    fn clamps_at_construction() {
        let skill_id = Uuid::new_v4();
        assert_eq!(SkillRating::new(skill_id, 150, None).rating, 100);
        assert_eq!(SkillRating::new(skill_id, -5, None).rating, 0);
        assert_eq!(SkillRating::new(skill_id, 55, None).rating, 55);
    }

    #[test]
    fn latest_is_none_for_empty_history() {
        assert!(latest(&[]).is_none());
    }

    #[test]
    fn latest_breaks_same_date_ties_by_updated_at() {
        let skill_id = Uuid::new_v4();
        let date = at_day(0);
        let mut first = SkillRating::dated(skill_id, 40, date, None);
        let mut second = SkillRating::dated(skill_id, 60, date, None);
        first.updated_at = at_day(0);
        second.updated_at = at_day(0) + Duration::seconds(5);

        let history = vec![second.clone(), first];
        assert_eq!(latest(&history).unwrap().id, second.id);
    }

    #[test]
    fn sorted_by_date_is_ascending() {
        let skill_id = Uuid::new_v4();
        let history = vec![
            SkillRating::dated(skill_id, 70, at_day(3), None),
            SkillRating::dated(skill_id, 50, at_day(1), None),
            SkillRating::dated(skill_id, 60, at_day(2), None),
        ];
        let sorted = sorted_by_date(&history);
        let ratings: Vec<i32> = sorted.iter().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![50, 60, 70]);
    }

    #[test]
    fn since_filters_to_window() {
        let skill_id = Uuid::new_v4();
        let history = vec![
            SkillRating::dated(skill_id, 50, at_day(0), None),
            SkillRating::dated(skill_id, 60, at_day(5), None),
            SkillRating::dated(skill_id, 70, at_day(9), None),
        ];
        let windowed = since(&history, at_day(4));
        assert_eq!(windowed.len(), 2);
        assert_eq!(windowed[0].rating, 60);
        assert_eq!(windowed[1].rating, 70);
    }

    #[test]
    fn latest_per_day_keeps_one_entry_per_day() {
        let skill_id = Uuid::new_v4();
        let morning = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2025, 6, 1, 20, 0, 0).unwrap();
        let next_day = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let history = vec![
            SkillRating::dated(skill_id, 40, morning, None),
            SkillRating::dated(skill_id, 55, evening, None),
            SkillRating::dated(skill_id, 60, next_day, None),
        ];
        let deduped = latest_per_day(&history);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].rating, 55);
        assert_eq!(deduped[1].rating, 60);
    }
}
