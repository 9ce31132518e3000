use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use rallyup_lib::{
    chart_series, effective_rating, rating_delta, trend_series, weekly_delta, Skill,
    SkillCategory, SkillRating, SkillTier, Snapshot,
};

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() + Duration::days(n)
}

#[test]
fn skill_without_ratings_reports_zero_and_no_delta() {
    let skill = Skill::new("Dink", SkillCategory::Dinking);
    let snapshot = Snapshot::from_entities(vec![skill.clone()], vec![]);

    assert_eq!(effective_rating(&snapshot, skill.id), 0);
    assert_eq!(rating_delta(&snapshot, skill.id), None);
    assert_eq!(weekly_delta(&snapshot, skill.id, day(10)), None);
    assert!(chart_series(&snapshot, skill.id).is_empty());
}

#[test]
fn leaf_history_drives_rating_and_delta() {
    let skill = Skill::new("Dink", SkillCategory::Dinking);
    let ratings = vec![
        SkillRating::dated(skill.id, 50, day(1), None),
        SkillRating::dated(skill.id, 70, day(3), None),
    ];
    let snapshot = Snapshot::from_entities(vec![skill.clone()], ratings);

    assert_eq!(effective_rating(&snapshot, skill.id), 70);
    assert_eq!(rating_delta(&snapshot, skill.id), Some(20));
    assert_eq!(SkillTier::from_rating(effective_rating(&snapshot, skill.id)), SkillTier::Advanced);
}

#[test]
fn parent_rollup_excludes_unrated_children() {
    let parent = Skill::new("Serve", SkillCategory::Serves);
    let a = Skill::subskill_of(parent.id, "Power serve", SkillCategory::Serves);
    let b = Skill::subskill_of(parent.id, "Spin serve", SkillCategory::Serves);
    let c = Skill::subskill_of(parent.id, "Lob serve", SkillCategory::Serves);
    let ratings = vec![
        SkillRating::dated(a.id, 80, day(1), None),
        SkillRating::dated(b.id, 60, day(1), None),
    ];
    let snapshot = Snapshot::from_entities(vec![parent.clone(), a, b, c], ratings);

    // 70, not 46: the unrated child is excluded, not averaged in as 0
    assert_eq!(effective_rating(&snapshot, parent.id), 70);
}

#[test]
fn parent_delta_is_difference_of_truncated_averages() {
    let parent = Skill::new("Drives", SkillCategory::Drives);
    let a = Skill::subskill_of(parent.id, "Forehand", SkillCategory::Drives);
    let b = Skill::subskill_of(parent.id, "Backhand", SkillCategory::Drives);
    let ratings = vec![
        SkillRating::dated(a.id, 80, day(0), None),
        SkillRating::dated(a.id, 90, day(2), None),
        SkillRating::dated(b.id, 60, day(0), None),
        SkillRating::dated(b.id, 70, day(2), None),
    ];
    let snapshot = Snapshot::from_entities(vec![parent.clone(), a, b], ratings);

    // (90 + 70) / 2 - (80 + 60) / 2
    assert_eq!(rating_delta(&snapshot, parent.id), Some(10));
}

#[test]
fn out_of_range_values_are_clamped_before_any_aggregate() {
    let skill = Skill::new("Dink", SkillCategory::Dinking);
    let ratings = vec![
        SkillRating::dated(skill.id, -5, day(1), None),
        SkillRating::dated(skill.id, 150, day(2), None),
    ];
    let snapshot = Snapshot::from_entities(vec![skill.clone()], ratings);

    assert_eq!(effective_rating(&snapshot, skill.id), 100);
    assert_eq!(rating_delta(&snapshot, skill.id), Some(100));
}

#[test]
fn parent_trend_has_no_gap_points() {
    let parent = Skill::new("Serve", SkillCategory::Serves);
    let a = Skill::subskill_of(parent.id, "Power serve", SkillCategory::Serves);
    let b = Skill::subskill_of(parent.id, "Spin serve", SkillCategory::Serves);
    let ratings = vec![
        SkillRating::dated(a.id, 60, day(0), None),
        SkillRating::dated(b.id, 40, day(4), None),
    ];
    let snapshot = Snapshot::from_entities(vec![parent.clone(), a, b], ratings);

    let points: Vec<_> = trend_series(&snapshot, parent.id).collect();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].rating, 60);
    assert_eq!(points[1].rating, 50);
}

#[test]
fn same_day_ratings_resolve_by_insertion_order() {
    let skill = Skill::new("Dink", SkillCategory::Dinking);
    let date = day(1);
    let mut earlier = SkillRating::dated(skill.id, 40, date, None);
    let mut later = SkillRating::dated(skill.id, 65, date, None);
    earlier.updated_at = day(1);
    later.updated_at = day(1) + Duration::seconds(30);

    let snapshot = Snapshot::from_entities(vec![skill.clone()], vec![later, earlier]);
    assert_eq!(effective_rating(&snapshot, skill.id), 65);
}

#[test]
fn weekly_delta_spans_the_trailing_window_only() {
    let skill = Skill::new("Defense", SkillCategory::Defense);
    let now = day(14);
    let ratings = vec![
        SkillRating::dated(skill.id, 20, day(1), None), // outside the window
        SkillRating::dated(skill.id, 45, day(8), None),
        SkillRating::dated(skill.id, 52, day(13), None),
    ];
    let snapshot = Snapshot::from_entities(vec![skill.clone()], ratings);

    assert_eq!(weekly_delta(&snapshot, skill.id, now), Some(7));
}

#[test]
fn parent_weekly_delta_uses_the_synthetic_series() {
    let parent = Skill::new("Serve", SkillCategory::Serves);
    let a = Skill::subskill_of(parent.id, "Power serve", SkillCategory::Serves);
    let b = Skill::subskill_of(parent.id, "Spin serve", SkillCategory::Serves);
    let now = day(7);
    let ratings = vec![
        SkillRating::dated(a.id, 60, day(1), None),
        SkillRating::dated(b.id, 40, day(5), None),
    ];
    let snapshot = Snapshot::from_entities(vec![parent.clone(), a, b], ratings);

    // Synthetic points: 60 on day 1, 50 on day 5
    assert_eq!(weekly_delta(&snapshot, parent.id, now), Some(-10));
}

#[test]
fn recomputing_without_writes_is_identical() {
    let parent = Skill::new("Serve", SkillCategory::Serves);
    let a = Skill::subskill_of(parent.id, "Power serve", SkillCategory::Serves);
    let b = Skill::subskill_of(parent.id, "Spin serve", SkillCategory::Serves);
    let ratings = vec![
        SkillRating::dated(a.id, 55, day(0), None),
        SkillRating::dated(a.id, 65, day(2), None),
        SkillRating::dated(b.id, 45, day(3), None),
    ];
    let snapshot = Snapshot::from_entities(vec![parent.clone(), a, b], ratings);

    assert_eq!(
        effective_rating(&snapshot, parent.id),
        effective_rating(&snapshot, parent.id)
    );
    assert_eq!(
        rating_delta(&snapshot, parent.id),
        rating_delta(&snapshot, parent.id)
    );
    let first: Vec<_> = trend_series(&snapshot, parent.id).collect();
    let second: Vec<_> = trend_series(&snapshot, parent.id).collect();
    assert_eq!(first, second);
}

#[test]
fn unknown_ids_behave_as_empty_skills() {
    let snapshot = Snapshot::from_entities(vec![], vec![]);
    let ghost = Uuid::new_v4();
    assert_eq!(effective_rating(&snapshot, ghost), 0);
    assert_eq!(rating_delta(&snapshot, ghost), None);
    assert!(chart_series(&snapshot, ghost).is_empty());
}
