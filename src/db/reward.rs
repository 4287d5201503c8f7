use crate::models::Reward;
use sqlx::PgPool;

pub struct RewardRepository {
    pool: PgPool,
}

impl RewardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_level(&self, level: i32) -> Result<Option<Reward>, sqlx::Error> {
        sqlx::query_as::<_, Reward>("SELECT * FROM level_rewards WHERE level = $1")
            .bind(level)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_all(&self) -> Result<Vec<Reward>, sqlx::Error> {
        sqlx::query_as::<_, Reward>("SELECT * FROM level_rewards ORDER BY level")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn upsert(&self, reward: &Reward) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO level_rewards (level, title, description, is_big)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (level) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                is_big = EXCLUDED.is_big",
        )
        .bind(reward.level)
        .bind(&reward.title)
        .bind(&reward.description)
        .bind(reward.is_big)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_by_level(&self, level: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM level_rewards WHERE level = $1")
            .bind(level)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
