pub mod analytics;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod skills;

pub use analytics::{DetailPayload, OverviewPayload, SkillSummary, SubskillEntry};
pub use engine::aggregate::effective_rating;
pub use engine::delta::{rating_delta, weekly_delta};
pub use engine::trend::{chart_series, trend_series, TrendPoint, TrendSeries};
pub use engine::Snapshot;
pub use error::RallyupError;
pub use skills::model::{Hierarchy, ProgressChecker, Session, Skill, SkillCategory, SkillStatus};
pub use skills::rating::SkillRating;
pub use skills::store::SkillStore;
pub use skills::tier::SkillTier;
