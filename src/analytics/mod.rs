use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::engine::trend::TrendPoint;
use crate::engine::{aggregate, delta, trend, Snapshot};
use crate::error::RallyupError;
use crate::skills::model::{ProgressChecker, Skill};
use crate::skills::rating::SkillRating;
use crate::skills::store::SkillStore;
use crate::skills::tier::SkillTier;

/// One row of the skill list screen
#[derive(Serialize, Debug, Clone)]
pub struct SkillSummary {
    pub skill: Skill,
    pub subskill_count: usize,
    pub rating: i32,
    pub tier: SkillTier,
    pub delta: Option<i32>,
}

#[derive(Serialize, Debug, Clone)]
pub struct OverviewPayload {
    pub skills: Vec<SkillSummary>,
    pub session_count: usize,
}

/// A subskill row on the detail screen
#[derive(Serialize, Debug, Clone)]
pub struct SubskillEntry {
    pub skill: Skill,
    /// Latest direct rating, 0 when unrated
    pub rating: i32,
    pub delta: Option<i32>,
}

#[derive(Serialize, Debug, Clone)]
pub struct DetailPayload {
    pub skill: Skill,
    pub rating: i32,
    pub tier: SkillTier,
    pub delta: Option<i32>,
    pub weekly_delta: Option<i32>,
    pub subskills: Vec<SubskillEntry>,
    pub chart: Vec<TrendPoint>,
    pub checkers: Vec<ProgressChecker>,
}

/// Everything the skill list screen shows: active root skills in display
/// order with their rollup ratings, tiers, and deltas. Recomputed from
/// scratch on every call; nothing here is cached.
pub async fn load_overview(store: &SkillStore) -> Result<OverviewPayload, RallyupError> {
    // Active skills only; archived subskills drop out of list rollups
    let skills = store.fetch_active_skills().await?;
    let ratings = store.fetch_all_ratings().await?;
    let snapshot = Snapshot::from_entities(skills, ratings);

    let mut summaries = Vec::new();
    for skill in snapshot.skills().iter().filter(|s| s.is_root()) {
        let rating = aggregate::effective_rating(&snapshot, skill.id);
        summaries.push(SkillSummary {
            skill: skill.clone(),
            subskill_count: snapshot.children_of(skill.id).len(),
            rating,
            tier: SkillTier::from_rating(rating),
            delta: delta::rating_delta(&snapshot, skill.id),
        });
    }

    let session_count = store.fetch_all_sessions().await?.len();
    Ok(OverviewPayload {
        skills: summaries,
        session_count,
    })
}

/// Everything the detail screen shows for one skill, or None when the id has
/// no backing record. Archived subskills are included, matching the detail
/// view's use of the full skill set.
pub async fn load_detail(
    store: &SkillStore,
    skill_id: Uuid,
) -> Result<Option<DetailPayload>, RallyupError> {
    let snapshot = Snapshot::load(store).await?;
    let skill = match snapshot.skill(skill_id) {
        Some(skill) => skill.clone(),
        None => return Ok(None),
    };

    let subskills: Vec<SubskillEntry> = snapshot
        .children_of(skill_id)
        .iter()
        .map(|child| SubskillEntry {
            skill: (*child).clone(),
            rating: snapshot
                .latest_rating(child.id)
                .map(|r| r.rating)
                .unwrap_or(0),
            delta: delta::rating_delta(&snapshot, child.id),
        })
        .collect();

    let rating = aggregate::effective_rating(&snapshot, skill_id);
    let checkers = store.fetch_checkers_for_skill(skill_id).await?;

    Ok(Some(DetailPayload {
        rating,
        tier: SkillTier::from_rating(rating),
        delta: delta::rating_delta(&snapshot, skill_id),
        weekly_delta: delta::weekly_delta(&snapshot, skill_id, Utc::now()),
        subskills,
        chart: trend::chart_series(&snapshot, skill_id),
        checkers,
        skill,
    }))
}

/// Record a new rating entry for a skill. The value is clamped to [0, 100]
/// by construction before it is saved.
pub async fn record_rating(
    store: &SkillStore,
    skill_id: Uuid,
    rating: i32,
    notes: Option<String>,
) -> Result<SkillRating, RallyupError> {
    let entry = SkillRating::new(skill_id, rating, notes);
    store.save_rating(&entry).await?;
    tracing::debug!(skill_id = %skill_id, rating = entry.rating, "Rating recorded");
    Ok(entry)
}

/// Archive a skill together with its subskills
pub async fn archive_skill_tree(
    store: &SkillStore,
    skill_id: Uuid,
) -> Result<(), RallyupError> {
    let all_skills = store.fetch_all_skills().await?;
    for child in all_skills.iter().filter(|s| s.parent_id() == Some(skill_id)) {
        store.archive_skill(child.id).await?;
    }
    store.archive_skill(skill_id).await
}

/// Hard-delete a skill, its subskills, and all of their ratings and checkers
pub async fn delete_skill_tree(
    store: &SkillStore,
    skill_id: Uuid,
) -> Result<(), RallyupError> {
    let all_skills = store.fetch_all_skills().await?;
    for child in all_skills.iter().filter(|s| s.parent_id() == Some(skill_id)) {
        store.delete_skill(child.id).await?;
    }
    store.delete_skill(skill_id).await
}
