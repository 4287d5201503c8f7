pub mod character;
pub mod task;
pub mod completion;
pub mod reward;

use crate::clock::{Period, PeriodKey};
use crate::models::{Character, Reward, Task, TaskCompletion};
use crate::store::{CharacterStore, GameStore, RewardCatalog, StorageError, TaskCatalog};
use async_trait::async_trait;
use character::CharacterRepository;
use completion::CompletionRepository;
use reward::RewardRepository;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::collections::HashSet;
use std::time::Duration;
use task::TaskRepository;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
}

/// PostgreSQL-backed store made of one repository per table.
pub struct PgStore {
    characters: CharacterRepository,
    tasks: TaskRepository,
    completions: CompletionRepository,
    rewards: RewardRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            characters: CharacterRepository::new(pool.clone()),
            tasks: TaskRepository::new(pool.clone()),
            completions: CompletionRepository::new(pool.clone()),
            rewards: RewardRepository::new(pool),
        }
    }
}

#[async_trait]
impl CharacterStore for PgStore {
    async fn get_character(&self, id: &str) -> Result<Option<Character>, StorageError> {
        self.characters
            .get_by_id(id)
            .await
            .map_err(|e| StorageError::database("get_character", e))
    }

    async fn find_character_by_name(&self, name: &str) -> Result<Option<Character>, StorageError> {
        self.characters
            .get_by_name(name)
            .await
            .map_err(|e| StorageError::database("find_character_by_name", e))
    }

    async fn list_characters(&self) -> Result<Vec<Character>, StorageError> {
        self.characters
            .get_all()
            .await
            .map_err(|e| StorageError::database("list_characters", e))
    }

    async fn save_character(&self, character: &Character) -> Result<(), StorageError> {
        self.characters
            .upsert(character)
            .await
            .map_err(|e| StorageError::database("save_character", e))
    }
}

#[async_trait]
impl TaskCatalog for PgStore {
    async fn get_task(&self, id: &str) -> Result<Option<Task>, StorageError> {
        let row = self
            .tasks
            .get_by_id(id)
            .await
            .map_err(|e| StorageError::database("get_task", e))?;
        row.map(Task::try_from).transpose()
    }

    async fn list_tasks_for_period(
        &self,
        character_id: &str,
        period: Period,
    ) -> Result<Vec<Task>, StorageError> {
        let rows = match period {
            Period::Day(date) => self.tasks.get_daily_for(character_id, date).await,
            Period::Week(_) => self.tasks.get_weekly_for(character_id).await,
        }
        .map_err(|e| StorageError::database("list_tasks_for_period", e))?;
        rows.into_iter().map(Task::try_from).collect()
    }

    async fn is_task_completed(
        &self,
        character_id: &str,
        task_id: &str,
        period_key: &PeriodKey,
    ) -> Result<bool, StorageError> {
        self.completions
            .exists(character_id, task_id, period_key)
            .await
            .map_err(|e| StorageError::database("is_task_completed", e))
    }

    async fn completed_task_ids(
        &self,
        character_id: &str,
        period_key: &PeriodKey,
    ) -> Result<HashSet<String>, StorageError> {
        let ids = self
            .completions
            .get_task_ids(character_id, period_key)
            .await
            .map_err(|e| StorageError::database("completed_task_ids", e))?;
        Ok(ids.into_iter().collect())
    }

    async fn insert_task(&self, task: &Task) -> Result<(), StorageError> {
        self.tasks
            .create(task)
            .await
            .map_err(|e| StorageError::database("insert_task", e))
    }

    async fn count_tasks(&self) -> Result<i64, StorageError> {
        self.tasks
            .count()
            .await
            .map_err(|e| StorageError::database("count_tasks", e))
    }
}

#[async_trait]
impl RewardCatalog for PgStore {
    async fn get_reward(&self, level: i32) -> Result<Option<Reward>, StorageError> {
        self.rewards
            .get_by_level(level)
            .await
            .map_err(|e| StorageError::database("get_reward", e))
    }

    async fn list_rewards(&self) -> Result<Vec<Reward>, StorageError> {
        self.rewards
            .get_all()
            .await
            .map_err(|e| StorageError::database("list_rewards", e))
    }

    async fn upsert_reward(&self, reward: &Reward) -> Result<(), StorageError> {
        self.rewards
            .upsert(reward)
            .await
            .map_err(|e| StorageError::database("upsert_reward", e))
    }

    async fn delete_reward(&self, level: i32) -> Result<bool, StorageError> {
        self.rewards
            .delete_by_level(level)
            .await
            .map_err(|e| StorageError::database("delete_reward", e))
    }
}

#[async_trait]
impl GameStore for PgStore {
    async fn commit_completion(
        &self,
        completion: &TaskCompletion,
        character: &Character,
    ) -> Result<bool, StorageError> {
        self.completions
            .commit(completion, character)
            .await
            .map_err(|e| StorageError::database("commit_completion", e))
    }
}
