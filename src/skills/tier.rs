use serde::{Serialize, Deserialize};

/// Named mastery band derived from a 0-100 effective rating.
/// Bands are closed and non-overlapping, so every score maps to exactly one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillTier {
    Beginner,
    Developing,
    Solid,
    Advanced,
    Weapon,
}

impl SkillTier {
    pub fn from_rating(rating: i32) -> Self {
        match rating {
            i32::MIN..=20 => SkillTier::Beginner,
            21..=40 => SkillTier::Developing,
            41..=60 => SkillTier::Solid,
            61..=80 => SkillTier::Advanced,
            _ => SkillTier::Weapon,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SkillTier::Beginner => "Beginner",
            SkillTier::Developing => "Developing",
            SkillTier::Solid => "Solid",
            SkillTier::Advanced => "Advanced",
            SkillTier::Weapon => "Weapon",
        }
    }

    /// 0 (beginner) through 4 (weapon)
    pub fn rank(&self) -> u8 {
        *self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_score_maps_to_exactly_one_tier() {
        for rating in 0..=100 {
            // from_rating is total; this would panic or skip if a band were missing
            let _ = SkillTier::from_rating(rating);
        }
    }

    #[test]
    fn band_edges() {
        assert_eq!(SkillTier::from_rating(0), SkillTier::Beginner);
        assert_eq!(SkillTier::from_rating(20), SkillTier::Beginner);
        assert_eq!(SkillTier::from_rating(21), SkillTier::Developing);
        assert_eq!(SkillTier::from_rating(40), SkillTier::Developing);
        assert_eq!(SkillTier::from_rating(41), SkillTier::Solid);
        assert_eq!(SkillTier::from_rating(60), SkillTier::Solid);
        assert_eq!(SkillTier::from_rating(61), SkillTier::Advanced);
        assert_eq!(SkillTier::from_rating(80), SkillTier::Advanced);
        assert_eq!(SkillTier::from_rating(81), SkillTier::Weapon);
        assert_eq!(SkillTier::from_rating(100), SkillTier::Weapon);
    }

    #[test]
    fn rank_never_decreases_as_rating_increases() {
        let mut prev = SkillTier::from_rating(0).rank();
        for rating in 1..=100 {
            let rank = SkillTier::from_rating(rating).rank();
            assert!(rank >= prev, "tier rank dropped at rating {}", rating);
            prev = rank;
        }
    }
}
