use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Every fifth level grants a big reward.
pub const BIG_REWARD_INTERVAL: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Reward {
    pub level: i32,
    pub title: String,
    pub description: String,
    pub is_big: bool,
}

impl Reward {
    pub fn new(level: i32, title: String, description: String, is_big: bool) -> Self {
        Self {
            level,
            title,
            description,
            is_big,
        }
    }

    /// The stock reward used to fill an empty catalog.
    pub fn default_for_level(level: i32) -> Self {
        if level % BIG_REWARD_INTERVAL == 0 {
            Self::new(
                level,
                "Big Reward".to_string(),
                format!("Level {} - a major milestone!", level),
                true,
            )
        } else {
            Self::new(
                level,
                "Level Up Reward".to_string(),
                format!("You reached level {}!", level),
                false,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rewards_are_big_on_multiples_of_five() {
        assert!(Reward::default_for_level(5).is_big);
        assert!(Reward::default_for_level(50).is_big);
        assert!(!Reward::default_for_level(7).is_big);
        assert_eq!(Reward::default_for_level(7).level, 7);
    }
}
