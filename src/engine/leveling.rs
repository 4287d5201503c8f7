use crate::models::Character;

pub const DEFAULT_COMPLETIONS_PER_LEVEL: i32 = 7;

/// Cumulative-experience leveling. Reaching level `L + 1` requires
/// `completions_per_level * L` completed tasks in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelingRule {
    completions_per_level: i32,
}

impl Default for LevelingRule {
    fn default() -> Self {
        Self {
            completions_per_level: DEFAULT_COMPLETIONS_PER_LEVEL,
        }
    }
}

impl LevelingRule {
    /// Returns `None` unless at least one completion is required per level.
    pub fn new(completions_per_level: i32) -> Option<Self> {
        (completions_per_level >= 1).then_some(Self {
            completions_per_level,
        })
    }

    pub fn completions_per_level(&self) -> i32 {
        self.completions_per_level
    }

    /// Total experience needed to leave `level`.
    pub fn threshold(&self, level: i32) -> i64 {
        i64::from(self.completions_per_level) * i64::from(level.max(1))
    }

    pub fn should_level_up(&self, character: &Character) -> bool {
        i64::from(character.experience) >= self.threshold(character.level)
    }

    pub fn experience_to_next_level(&self, character: &Character) -> i64 {
        (self.threshold(character.level) - i64::from(character.experience)).max(0)
    }
}
