//! Skill identifiers and definitions

use serde::{Deserialize, Serialize};

/// Unique identifier for a trainable skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillId {
    Swords,
    Axes,
    Archery,
    Mining,
    Woodcutting,
    Excavation,
    Herbalism,
    Fitness,
    Sorcery,
}

impl SkillId {
    /// All skills, in display order
    pub fn all() -> &'static [SkillId] {
        &[
            SkillId::Swords,
            SkillId::Axes,
            SkillId::Archery,
            SkillId::Mining,
            SkillId::Woodcutting,
            SkillId::Excavation,
            SkillId::Herbalism,
            SkillId::Fitness,
            SkillId::Sorcery,
        ]
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            SkillId::Swords => "Swords",
            SkillId::Axes => "Axes",
            SkillId::Archery => "Archery",
            SkillId::Mining => "Mining",
            SkillId::Woodcutting => "Woodcutting",
            SkillId::Excavation => "Excavation",
            SkillId::Herbalism => "Herbalism",
            SkillId::Fitness => "Fitness",
            SkillId::Sorcery => "Sorcery",
        }
    }
}

/// Experience required to advance out of a given level.
///
/// Thresholds are per-level: leveling up consumes the threshold amount and
/// carries the remainder into the new level, so stored experience is always
/// below the current level's threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExperienceCurve {
    /// `base + per_level * level`
    Linear { base: f64, per_level: f64 },
    /// `base + scale * level^exponent`
    ///
    /// The shape used by most grind-style progression systems: early levels
    /// come quickly, later levels stretch out.
    Polynomial { base: f64, scale: f64, exponent: f64 },
}

impl ExperienceCurve {
    /// Experience needed to advance from `level` to `level + 1`
    pub fn threshold(&self, level: u32) -> f64 {
        match self {
            ExperienceCurve::Linear { base, per_level } => base + per_level * f64::from(level),
            ExperienceCurve::Polynomial {
                base,
                scale,
                exponent,
            } => base + scale * f64::from(level).powf(*exponent),
        }
    }
}

/// Immutable catalog entry for a skill
///
/// Loaded once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct SkillDefinition {
    pub id: SkillId,
    pub display_name: &'static str,
    /// Level cap; experience past the cap is discarded
    pub max_level: u32,
    pub curve: ExperienceCurve,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_skills_have_names() {
        for skill in SkillId::all() {
            assert!(!skill.name().is_empty());
        }
        assert_eq!(SkillId::all().len(), 9);
    }

    #[test]
    fn test_linear_curve() {
        let curve = ExperienceCurve::Linear {
            base: 100.0,
            per_level: 50.0,
        };
        assert_eq!(curve.threshold(0), 100.0);
        assert_eq!(curve.threshold(4), 300.0);
    }

    #[test]
    fn test_polynomial_curve_is_monotonic() {
        let curve = ExperienceCurve::Polynomial {
            base: 100.0,
            scale: 10.0,
            exponent: 1.5,
        };
        let mut previous = 0.0;
        for level in 0..100 {
            let threshold = curve.threshold(level);
            assert!(threshold > previous);
            previous = threshold;
        }
    }
}
