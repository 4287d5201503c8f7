use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const MIN_HEALTH: i32 = 0;
pub const MAX_HEALTH: i32 = 15;
pub const STARTING_STAT: i32 = 10;

/// The four trainable attributes. Used both as a character's totals and as
/// a task's reward vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Stats {
    pub strength: i32,
    pub agility: i32,
    pub charisma: i32,
    pub endurance: i32,
}

impl Stats {
    pub fn new(strength: i32, agility: i32, charisma: i32, endurance: i32) -> Self {
        Self {
            strength,
            agility,
            charisma,
            endurance,
        }
    }

    pub fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Adds a reward vector. Stats have no upper bound, so this saturates
    /// instead of wrapping.
    pub fn add(&mut self, reward: &Stats) {
        self.strength = self.strength.saturating_add(reward.strength);
        self.agility = self.agility.saturating_add(reward.agility);
        self.charisma = self.charisma.saturating_add(reward.charisma);
        self.endurance = self.endurance.saturating_add(reward.endurance);
    }

    pub fn is_non_negative(&self) -> bool {
        self.strength >= 0 && self.agility >= 0 && self.charisma >= 0 && self.endurance >= 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub is_admin: bool,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub stats: Stats,
    pub health: i32,
    pub level: i32,
    pub experience: i32,
    pub points: i32,
    pub game_over: bool,
    pub last_daily_check: Option<NaiveDate>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Character {
    pub fn new(id: String, name: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id,
            name,
            is_admin: false,
            stats: Stats::uniform(STARTING_STAT),
            health: MAX_HEALTH,
            level: 1,
            experience: 0,
            points: 0,
            game_over: false,
            last_daily_check: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.game_over
    }

    /// Sets health and keeps `game_over` in lockstep with it. Callers are
    /// expected to have validated the range already; anything outside it
    /// is clamped here so the invariant can never be broken.
    pub fn set_health(&mut self, health: i32) {
        self.health = health.clamp(MIN_HEALTH, MAX_HEALTH);
        self.game_over = self.health == MIN_HEALTH;
    }

    /// Removes `amount` health, flooring at zero. Returns true if the
    /// character crossed into game over with this call.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.is_alive();
        self.set_health(self.health.saturating_sub(amount.max(0)));
        was_alive && self.game_over
    }

    pub fn touch(&mut self, now: i64) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character() -> Character {
        Character::new("user_test".to_string(), "Test".to_string())
    }

    #[test]
    fn test_new_character_defaults() {
        let c = character();
        assert_eq!(c.level, 1);
        assert_eq!(c.health, MAX_HEALTH);
        assert_eq!(c.stats, Stats::uniform(STARTING_STAT));
        assert!(c.is_alive());
        assert!(c.last_daily_check.is_none());
    }

    #[test]
    fn test_set_health_keeps_game_over_in_lockstep() {
        let mut c = character();
        c.set_health(0);
        assert!(c.game_over);
        c.set_health(4);
        assert!(!c.game_over);
        c.set_health(99);
        assert_eq!(c.health, MAX_HEALTH);
        c.set_health(-3);
        assert_eq!(c.health, 0);
        assert!(c.game_over);
    }

    #[test]
    fn test_take_damage_floors_at_zero() {
        let mut c = character();
        c.set_health(2);
        assert!(!c.take_damage(1));
        assert!(c.take_damage(5));
        assert_eq!(c.health, 0);
        // Already dead: no second transition
        assert!(!c.take_damage(1));
    }

    #[test]
    fn test_stats_add_saturates() {
        let mut stats = Stats::new(i32::MAX - 1, 1, 2, 3);
        stats.add(&Stats::new(5, 1, 0, 2));
        assert_eq!(stats, Stats::new(i32::MAX, 2, 2, 5));
    }
}
