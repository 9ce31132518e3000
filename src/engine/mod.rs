pub mod aggregate;
pub mod delta;
pub mod trend;

use std::collections::HashMap;
use uuid::Uuid;

use crate::error::RallyupError;
use crate::skills::model::Skill;
use crate::skills::rating::{self, SkillRating};
use crate::skills::store::SkillStore;

/// One consistent fetch of skills and ratings. Every engine computation runs
/// over a snapshot, never against live storage, so results are pure and safe
/// to recompute from any task. Snapshots are cheap to rebuild and are never
/// cached across writes.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    skills: Vec<Skill>,
    ratings_by_skill: HashMap<Uuid, Vec<SkillRating>>,
}

impl Snapshot {
    /// Build a snapshot from in-memory entities (tests and hosts with their
    /// own storage use this directly). Ratings are grouped and date-sorted
    /// here so lookups stay cheap.
    pub fn from_entities(skills: Vec<Skill>, ratings: Vec<SkillRating>) -> Self {
        let mut grouped: HashMap<Uuid, Vec<SkillRating>> = HashMap::new();
        for r in ratings {
            grouped.entry(r.skill_id).or_default().push(r);
        }
        let ratings_by_skill = grouped
            .into_iter()
            .map(|(id, list)| (id, rating::sorted_by_date(&list)))
            .collect();
        Snapshot {
            skills,
            ratings_by_skill,
        }
    }

    /// Fetch everything from the store into a fresh snapshot
    pub async fn load(store: &SkillStore) -> Result<Self, RallyupError> {
        let skills = store.fetch_all_skills().await?;
        let ratings = store.fetch_all_ratings().await?;
        Ok(Self::from_entities(skills, ratings))
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn skill(&self, id: Uuid) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }

    /// Direct children of a skill, in display order. Queried fresh each call,
    /// never cached on the entity.
    pub fn children_of(&self, id: Uuid) -> Vec<&Skill> {
        let mut children: Vec<&Skill> = self
            .skills
            .iter()
            .filter(|s| s.parent_id() == Some(id))
            .collect();
        children.sort_by_key(|s| (s.display_order, s.created_at));
        children
    }

    /// A skill's rating history, ascending by date. Empty for unknown skills.
    pub fn ratings_for(&self, id: Uuid) -> &[SkillRating] {
        self.ratings_by_skill
            .get(&id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Most recent rating by (date, updated_at), None when unrated
    pub fn latest_rating(&self, id: Uuid) -> Option<&SkillRating> {
        rating::latest(self.ratings_for(id))
    }
}
