use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use uuid::Uuid;

/// Where a skill sits in the two-level tree. Subskills always hang off a
/// root skill; there is no deeper nesting, and the constructors below are
/// the only way to build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hierarchy {
    Root,
    Subskill { parent_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillStatus {
    Active,
    Archived,
}

/// Pickleball skill domains, used for grouping and icon selection in the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Dinking,
    Drops,
    Drives,
    Defense,
    Offense,
    Strategy,
    Serves,
}

impl SkillCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            SkillCategory::Dinking => "Dinking",
            SkillCategory::Drops => "Drops",
            SkillCategory::Drives => "Drives",
            SkillCategory::Defense => "Defense",
            SkillCategory::Offense => "Offense",
            SkillCategory::Strategy => "Strategy",
            SkillCategory::Serves => "Serves",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub hierarchy: Hierarchy,
    pub category: SkillCategory,
    /// Free-text notes shown on the detail screen
    #[serde(default)]
    pub notes: String,
    pub status: SkillStatus,
    pub archived_date: Option<DateTime<Utc>>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Skill {
    /// Create a new root skill
    pub fn new<S: Into<String>>(name: S, category: SkillCategory) -> Self {
        let now = Utc::now();
        Skill {
            id: Uuid::new_v4(),
            name: name.into(),
            hierarchy: Hierarchy::Root,
            category,
            notes: String::new(),
            status: SkillStatus::Active,
            archived_date: None,
            display_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a subskill under an existing root skill
    pub fn subskill_of<S: Into<String>>(parent_id: Uuid, name: S, category: SkillCategory) -> Self {
        let mut skill = Skill::new(name, category);
        skill.hierarchy = Hierarchy::Subskill { parent_id };
        skill
    }

    pub fn parent_id(&self) -> Option<Uuid> {
        match self.hierarchy {
            Hierarchy::Root => None,
            Hierarchy::Subskill { parent_id } => Some(parent_id),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self.hierarchy, Hierarchy::Root)
    }

    /// 0 for root skills, 1 for subskills
    pub fn hierarchy_level(&self) -> u8 {
        match self.hierarchy {
            Hierarchy::Root => 0,
            Hierarchy::Subskill { .. } => 1,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SkillStatus::Active
    }
}

/// A named boolean checklist item under a skill.
/// is_completed and completed_date are set and cleared together on toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressChecker {
    pub id: Uuid,
    pub skill_id: Uuid,
    pub name: String,
    pub is_completed: bool,
    pub completed_date: Option<DateTime<Utc>>,
    pub display_order: i32,
    pub updated_at: DateTime<Utc>,
}

impl ProgressChecker {
    pub fn new<S: Into<String>>(skill_id: Uuid, name: S) -> Self {
        ProgressChecker {
            id: Uuid::new_v4(),
            skill_id,
            name: name.into(),
            is_completed: false,
            completed_date: None,
            display_order: 0,
            updated_at: Utc::now(),
        }
    }
}

/// A practice session log entry, independent of any single skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    /// Minutes on court
    pub duration: i32,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(date: DateTime<Utc>, duration: i32, notes: Option<String>) -> Self {
        Session {
            id: Uuid::new_v4(),
            date,
            duration,
            notes,
            updated_at: Utc::now(),
        }
    }
}
