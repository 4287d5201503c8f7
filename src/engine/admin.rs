use super::{Engine, EngineError};
use crate::models::{Character, Reward, MAX_HEALTH, MIN_HEALTH};
use crate::store::{CharacterStore, RewardCatalog};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideResult {
    pub success: bool,
    pub new_health: i32,
    pub game_over: bool,
}

impl Engine {
    /// Sets a character's health directly. This is the only way out of game
    /// over; it never touches stats, experience or level. A revival counts
    /// as today's daily check.
    pub async fn set_health(
        &self,
        actor_id: &str,
        target_id: &str,
        new_health: i32,
    ) -> Result<OverrideResult, EngineError> {
        self.require_admin(actor_id).await?;
        if !(MIN_HEALTH..=MAX_HEALTH).contains(&new_health) {
            return Err(EngineError::InvalidRange(new_health));
        }

        let _guard = self.locks.lock(target_id).await;
        let mut target = self.load_character(target_id).await?;
        let was_game_over = target.game_over;
        target.set_health(new_health);
        if was_game_over && target.is_alive() {
            // Days spent in game over are not charged after a revival
            target.last_daily_check = Some(self.today());
        }
        target.touch(self.now());
        self.store.save_character(&target).await?;

        tracing::warn!(
            "Admin {} set {}'s health to {}{}",
            actor_id,
            target.name,
            target.health,
            match (was_game_over, target.game_over) {
                (true, false) => " (revived)",
                (false, true) => " (game over)",
                _ => "",
            }
        );

        Ok(OverrideResult {
            success: true,
            new_health: target.health,
            game_over: target.game_over,
        })
    }

    pub async fn list_characters(&self, actor_id: &str) -> Result<Vec<Character>, EngineError> {
        self.require_admin(actor_id).await?;
        Ok(self.store.list_characters().await?)
    }

    pub async fn list_rewards(&self, actor_id: &str) -> Result<Vec<Reward>, EngineError> {
        self.require_admin(actor_id).await?;
        Ok(self.store.list_rewards().await?)
    }

    pub async fn upsert_reward(
        &self,
        actor_id: &str,
        reward: Reward,
    ) -> Result<Reward, EngineError> {
        self.require_admin(actor_id).await?;
        if reward.level < 1 {
            return Err(EngineError::InvalidRange(reward.level));
        }
        self.store.upsert_reward(&reward).await?;
        tracing::info!("Admin {} saved reward for level {}", actor_id, reward.level);
        Ok(reward)
    }

    pub async fn delete_reward(&self, actor_id: &str, level: i32) -> Result<(), EngineError> {
        self.require_admin(actor_id).await?;
        if !self.store.delete_reward(level).await? {
            return Err(EngineError::NotFound {
                entity: "reward",
                id: level.to_string(),
            });
        }
        tracing::info!("Admin {} deleted reward for level {}", actor_id, level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::*;
    use crate::models::Assignment;
    use crate::store::CharacterStore;
    use chrono::Weekday;

    async fn kill(store: &crate::store::MemoryStore, id: &str) {
        let mut c = character(store, id).await;
        c.set_health(0);
        store.save_character(&c).await.unwrap();
    }

    #[tokio::test]
    async fn test_admin_revives_game_over_character() {
        let store = store_with_characters().await;
        add_daily(&store, "a", Weekday::Mon, Assignment::Everyone).await;
        kill(&store, HERO).await;
        let engine = engine_at(store.clone(), monday(), 7);

        let result = engine.set_health(ADMIN, HERO, 15).await.unwrap();
        assert_eq!(
            result,
            OverrideResult {
                success: true,
                new_health: 15,
                game_over: false
            }
        );

        let completed = engine.complete_task_on(HERO, "a", monday()).await.unwrap();
        assert!(completed.success);
    }

    #[tokio::test]
    async fn test_revival_is_not_charged_for_the_locked_out_day() {
        let store = store_with_characters().await;
        add_daily(&store, "sun", Weekday::Sun, Assignment::Everyone).await;
        add_daily(&store, "mon", Weekday::Mon, Assignment::Everyone).await;
        kill(&store, HERO).await;
        let engine = engine_at(store.clone(), monday(), 7);

        engine.set_health(ADMIN, HERO, 10).await.unwrap();
        assert_eq!(character(&store, HERO).await.last_daily_check, Some(monday()));

        let same_day = engine.evaluate_daily_check(HERO, monday()).await.unwrap();
        assert!(same_day.already_checked);
        assert_eq!(same_day.new_health, 10);

        // The day after revival is judged normally
        let tuesday = monday().succ_opt().unwrap();
        let next = engine.evaluate_daily_check(HERO, tuesday).await.unwrap();
        assert_eq!(next.new_health, 9);
    }

    #[tokio::test]
    async fn test_health_change_without_revival_keeps_check_date() {
        let store = store_with_characters().await;
        let engine = engine_at(store.clone(), monday(), 7);

        engine.set_health(ADMIN, HERO, 5).await.unwrap();
        assert!(character(&store, HERO).await.last_daily_check.is_none());
    }

    #[tokio::test]
    async fn test_out_of_range_health_rejected_without_change() {
        let store = store_with_characters().await;
        let engine = engine_at(store.clone(), monday(), 7);
        let before = character(&store, HERO).await;

        for value in [20, 16, -1] {
            let err = engine.set_health(ADMIN, HERO, value).await.unwrap_err();
            assert!(matches!(err, EngineError::InvalidRange(v) if v == value));
        }
        assert_eq!(character(&store, HERO).await, before);
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let store = store_with_characters().await;
        let engine = engine_at(store.clone(), monday(), 7);

        let err = engine.set_health(HERO, ADMIN, 1).await.unwrap_err();
        assert!(matches!(err, EngineError::Forbidden(_)));
        assert_eq!(character(&store, ADMIN).await.health, 15);

        assert!(matches!(engine.list_characters(HERO).await, Err(EngineError::Forbidden(_))));
        assert!(matches!(engine.list_rewards(HERO).await, Err(EngineError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_setting_zero_health_is_game_over() {
        let store = store_with_characters().await;
        let engine = engine_at(store.clone(), monday(), 7);

        let result = engine.set_health(ADMIN, HERO, 0).await.unwrap();
        assert!(result.game_over);
        assert!(character(&store, HERO).await.game_over);
    }

    #[tokio::test]
    async fn test_override_leaves_progression_alone() {
        let store = store_with_characters().await;
        let engine = engine_at(store.clone(), monday(), 1);
        let before = character(&store, HERO).await;

        engine.set_health(ADMIN, HERO, 3).await.unwrap();
        let after = character(&store, HERO).await;
        assert_eq!(after.level, before.level);
        assert_eq!(after.stats, before.stats);
        assert_eq!(after.experience, before.experience);
    }

    #[tokio::test]
    async fn test_unknown_target() {
        let store = store_with_characters().await;
        let engine = engine_at(store.clone(), monday(), 7);
        assert!(matches!(
            engine.set_health(ADMIN, "ghost", 5).await,
            Err(EngineError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_reward_administration() {
        let store = store_with_characters().await;
        let engine = engine_at(store.clone(), monday(), 7);

        let reward = Reward::new(3, "Cinema".to_string(), "Pick the movie".to_string(), false);
        engine.upsert_reward(ADMIN, reward.clone()).await.unwrap();
        assert_eq!(engine.list_rewards(ADMIN).await.unwrap(), vec![reward]);

        let invalid = Reward::new(0, "Nope".to_string(), String::new(), false);
        assert!(matches!(
            engine.upsert_reward(ADMIN, invalid).await,
            Err(EngineError::InvalidRange(0))
        ));

        engine.delete_reward(ADMIN, 3).await.unwrap();
        assert!(matches!(
            engine.delete_reward(ADMIN, 3).await,
            Err(EngineError::NotFound { entity: "reward", .. })
        ));
    }
}
