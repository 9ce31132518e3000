use std::cmp::Reverse;
use std::path::PathBuf;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config;
use crate::error::RallyupError;
use crate::metrics::StoreMetrics;
use crate::skills::model::{ProgressChecker, Session, Skill, SkillStatus};
use crate::skills::rating::{self, SkillRating};

/// Durable entity store: one pretty-printed JSON file per record, grouped in
/// per-entity directories under the data dir. Rating files are only ever
/// created, never rewritten, which keeps rating history append-only on disk.
///
/// Writes are serialized through an internal lock; reads go straight to disk
/// so every fetch sees the latest saved state.
pub struct SkillStore {
    root: PathBuf,
    write_lock: Mutex<()>,
    pub metrics: StoreMetrics,
}

impl SkillStore {
    /// Store rooted at the configured data directory
    pub fn new() -> Self {
        Self::with_root(config::data_dir())
    }

    /// Store rooted at an explicit directory (tests use a temp dir)
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        SkillStore {
            root: root.into(),
            write_lock: Mutex::new(()),
            metrics: StoreMetrics::new(),
        }
    }

    fn skills_dir(&self) -> PathBuf {
        self.root.join("skills")
    }

    fn ratings_dir(&self) -> PathBuf {
        self.root.join("ratings")
    }

    fn checkers_dir(&self) -> PathBuf {
        self.root.join("checkers")
    }

    fn sessions_dir(&self) -> PathBuf {
        self.root.join("sessions")
    }

    /// Load every record in a directory, skipping files that fail to parse
    async fn read_records<T: DeserializeOwned>(
        &self,
        dir: PathBuf,
    ) -> Result<Vec<T>, RallyupError> {
        let mut records = Vec::new();

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Directory doesn't exist yet, nothing stored
                return Ok(records);
            }
            Err(e) => {
                return Err(RallyupError::new(
                    format!("Failed to read store directory: {}", e),
                    "io"
                ).with_context(format!("path: {:?}", dir)));
            }
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            match tokio::fs::read_to_string(&path).await {
                Ok(text) => {
                    match serde_json::from_str::<T>(&text) {
                        Ok(record) => records.push(record),
                        Err(e) => {
                            self.metrics.record_parse_failure();
                            tracing::warn!(
                                path = ?path,
                                error = %e,
                                "Failed to parse store record"
                            );
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        path = ?path,
                        error = %e,
                        "Failed to read store record"
                    );
                }
            }
        }

        self.metrics.record_read(records.len() as u64);
        Ok(records)
    }

    /// Load a single record by id, None when the file doesn't exist
    async fn read_record<T: DeserializeOwned>(
        &self,
        dir: PathBuf,
        id: Uuid,
    ) -> Result<Option<T>, RallyupError> {
        let path = dir.join(format!("{}.json", id));
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(RallyupError::new(
                    format!("Failed to read store record: {}", e),
                    "io"
                ).with_context(format!("path: {:?}", path)));
            }
        };

        let record = serde_json::from_str::<T>(&text)
            .map_err(|e| RallyupError::new(
                format!("Failed to parse store record: {}", e),
                "json_parse"
            ).with_context(format!("path: {:?}", path)))?;

        self.metrics.record_read(1);
        Ok(Some(record))
    }

    async fn write_record<T: Serialize>(
        &self,
        dir: PathBuf,
        id: Uuid,
        record: &T,
    ) -> Result<(), RallyupError> {
        let _guard = self.write_lock.lock().await;

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| RallyupError::new(
                format!("Failed to create store directory: {}", e),
                "io"
            ).with_context(format!("path: {:?}", dir)))?;

        let path = dir.join(format!("{}.json", id));
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| RallyupError::new(
                format!("Failed to serialize store record: {}", e),
                "json_serialize"
            ))?;

        tokio::fs::write(&path, json)
            .await
            .map_err(|e| RallyupError::new(
                format!("Failed to write store record: {}", e),
                "io"
            ).with_context(format!("path: {:?}", path)))?;

        self.metrics.record_write();
        Ok(())
    }

    /// Remove a record file; missing files are not an error
    async fn delete_record(&self, dir: PathBuf, id: Uuid) -> Result<(), RallyupError> {
        let _guard = self.write_lock.lock().await;

        let path = dir.join(format!("{}.json", id));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                self.metrics.record_delete();
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RallyupError::new(
                format!("Failed to delete store record: {}", e),
                "io"
            ).with_context(format!("path: {:?}", path))),
        }
    }

    // --- skills ---

    /// All skills, root and subskill alike, in display order
    pub async fn fetch_all_skills(&self) -> Result<Vec<Skill>, RallyupError> {
        let mut skills: Vec<Skill> = self.read_records(self.skills_dir()).await?;
        skills.sort_by_key(|s| (s.display_order, s.created_at));
        Ok(skills)
    }

    pub async fn fetch_active_skills(&self) -> Result<Vec<Skill>, RallyupError> {
        let mut skills = self.fetch_all_skills().await?;
        skills.retain(|s| s.status == SkillStatus::Active);
        Ok(skills)
    }

    /// Archived skills, most recently archived first
    pub async fn fetch_archived_skills(&self) -> Result<Vec<Skill>, RallyupError> {
        let mut skills: Vec<Skill> = self.read_records(self.skills_dir()).await?;
        skills.retain(|s| s.status == SkillStatus::Archived);
        skills.sort_by_key(|s| Reverse(s.archived_date));
        Ok(skills)
    }

    pub async fn fetch_skill(&self, id: Uuid) -> Result<Option<Skill>, RallyupError> {
        self.read_record(self.skills_dir(), id).await
    }

    pub async fn save_skill(&self, skill: &Skill) -> Result<(), RallyupError> {
        self.write_record(self.skills_dir(), skill.id, skill).await
    }

    /// Soft delete: the row stays, flagged archived with a timestamp
    pub async fn archive_skill(&self, id: Uuid) -> Result<(), RallyupError> {
        if let Some(mut skill) = self.fetch_skill(id).await? {
            skill.status = SkillStatus::Archived;
            skill.archived_date = Some(Utc::now());
            skill.updated_at = Utc::now();
            self.save_skill(&skill).await?;
        }
        Ok(())
    }

    /// Hard delete of one skill and its own ratings and checkers.
    /// Child skills are the caller's responsibility.
    pub async fn delete_skill(&self, id: Uuid) -> Result<(), RallyupError> {
        let ratings = self.fetch_ratings_for_skill(id).await?;
        for r in ratings {
            self.delete_record(self.ratings_dir(), r.id).await?;
        }
        let checkers = self.fetch_checkers_for_skill(id).await?;
        for c in checkers {
            self.delete_record(self.checkers_dir(), c.id).await?;
        }
        self.delete_record(self.skills_dir(), id).await
    }

    /// Rewrite display_order to match the given ordering
    pub async fn reorder_skills(&self, skills: &[Skill]) -> Result<(), RallyupError> {
        for (index, skill) in skills.iter().enumerate() {
            if let Some(mut stored) = self.fetch_skill(skill.id).await? {
                stored.display_order = index as i32;
                stored.updated_at = Utc::now();
                self.save_skill(&stored).await?;
            }
        }
        Ok(())
    }

    // --- ratings ---

    /// Every rating on record, across all skills, unordered
    pub async fn fetch_all_ratings(&self) -> Result<Vec<SkillRating>, RallyupError> {
        self.read_records(self.ratings_dir()).await
    }

    /// One skill's history, ascending by date
    pub async fn fetch_ratings_for_skill(
        &self,
        skill_id: Uuid,
    ) -> Result<Vec<SkillRating>, RallyupError> {
        let mut ratings = self.fetch_all_ratings().await?;
        ratings.retain(|r| r.skill_id == skill_id);
        Ok(rating::sorted_by_date(&ratings))
    }

    pub async fn fetch_latest_rating(
        &self,
        skill_id: Uuid,
    ) -> Result<Option<SkillRating>, RallyupError> {
        let ratings = self.fetch_ratings_for_skill(skill_id).await?;
        Ok(rating::latest(&ratings).cloned())
    }

    pub async fn save_rating(&self, rating: &SkillRating) -> Result<(), RallyupError> {
        self.write_record(self.ratings_dir(), rating.id, rating).await
    }

    pub async fn delete_rating(&self, id: Uuid) -> Result<(), RallyupError> {
        self.delete_record(self.ratings_dir(), id).await
    }

    // --- progress checkers ---

    pub async fn fetch_checkers_for_skill(
        &self,
        skill_id: Uuid,
    ) -> Result<Vec<ProgressChecker>, RallyupError> {
        let mut checkers: Vec<ProgressChecker> = self.read_records(self.checkers_dir()).await?;
        checkers.retain(|c| c.skill_id == skill_id);
        checkers.sort_by_key(|c| (c.display_order, c.updated_at));
        Ok(checkers)
    }

    pub async fn save_checker(&self, checker: &ProgressChecker) -> Result<(), RallyupError> {
        self.write_record(self.checkers_dir(), checker.id, checker).await
    }

    /// Flip completion; is_completed and completed_date move together
    pub async fn toggle_checker(&self, id: Uuid) -> Result<(), RallyupError> {
        let checker: Option<ProgressChecker> = self.read_record(self.checkers_dir(), id).await?;
        if let Some(mut checker) = checker {
            checker.is_completed = !checker.is_completed;
            checker.completed_date = if checker.is_completed {
                Some(Utc::now())
            } else {
                None
            };
            checker.updated_at = Utc::now();
            self.save_checker(&checker).await?;
        }
        Ok(())
    }

    pub async fn delete_checker(&self, id: Uuid) -> Result<(), RallyupError> {
        self.delete_record(self.checkers_dir(), id).await
    }

    // --- practice sessions ---

    /// All practice sessions, ascending by date
    pub async fn fetch_all_sessions(&self) -> Result<Vec<Session>, RallyupError> {
        let mut sessions: Vec<Session> = self.read_records(self.sessions_dir()).await?;
        sessions.sort_by_key(|s| (s.date, s.updated_at));
        Ok(sessions)
    }

    pub async fn fetch_session(&self, id: Uuid) -> Result<Option<Session>, RallyupError> {
        self.read_record(self.sessions_dir(), id).await
    }

    pub async fn save_session(&self, session: &Session) -> Result<(), RallyupError> {
        self.write_record(self.sessions_dir(), session.id, session).await
    }

    pub async fn delete_session(&self, id: Uuid) -> Result<(), RallyupError> {
        self.delete_record(self.sessions_dir(), id).await
    }
}

impl Default for SkillStore {
    fn default() -> Self {
        Self::new()
    }
}
