use super::character::upsert_query;
use crate::clock::PeriodKey;
use crate::models::{Character, TaskCompletion};
use sqlx::PgPool;

pub struct CompletionRepository {
    pool: PgPool,
}

impl CompletionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn exists(
        &self,
        character_id: &str,
        task_id: &str,
        period_key: &PeriodKey,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM task_completions
                WHERE character_id = $1 AND task_id = $2 AND period_key = $3
            )",
        )
        .bind(character_id)
        .bind(task_id)
        .bind(period_key.to_string())
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_task_ids(
        &self,
        character_id: &str,
        period_key: &PeriodKey,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT task_id FROM task_completions WHERE character_id = $1 AND period_key = $2",
        )
        .bind(character_id)
        .bind(period_key.to_string())
        .fetch_all(&self.pool)
        .await
    }

    /// Records the completion and saves the character in one transaction.
    /// The unique key on (character_id, task_id, period_key) settles races:
    /// if the row already exists nothing is written and this returns false.
    pub async fn commit(
        &self,
        completion: &TaskCompletion,
        character: &Character,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO task_completions (character_id, task_id, period_key, completed_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (character_id, task_id, period_key) DO NOTHING",
        )
        .bind(&completion.character_id)
        .bind(&completion.task_id)
        .bind(completion.period_key.to_string())
        .bind(completion.completed_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        upsert_query(character).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(true)
    }
}
