//! Collaborator contracts the progression engine depends on.
//!
//! `db::PgStore` is the production implementation; `MemoryStore` backs
//! tests and database-less runs.

pub mod memory;

pub use memory::MemoryStore;

use crate::clock::{Period, PeriodKey};
use crate::models::{Character, Reward, Task, TaskCompletion};
use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt::Display;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing store failed; includes the operation for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// A stored record cannot be turned back into a model value.
    #[error("Corrupt {entity} record {id}: {message}")]
    Corrupt {
        entity: &'static str,
        id: String,
        message: String,
    },
}

impl StorageError {
    pub fn database(operation: &'static str, err: impl Display) -> Self {
        StorageError::Database {
            operation,
            message: err.to_string(),
        }
    }

    pub fn corrupt(
        entity: &'static str,
        id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        StorageError::Corrupt {
            entity,
            id: id.into(),
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait CharacterStore: Send + Sync {
    async fn get_character(&self, id: &str) -> Result<Option<Character>, StorageError>;

    /// Case-insensitive lookup by display name.
    async fn find_character_by_name(&self, name: &str) -> Result<Option<Character>, StorageError>;

    async fn list_characters(&self) -> Result<Vec<Character>, StorageError>;

    /// Atomic per-character upsert.
    async fn save_character(&self, character: &Character) -> Result<(), StorageError>;
}

#[async_trait]
pub trait TaskCatalog: Send + Sync {
    async fn get_task(&self, id: &str) -> Result<Option<Task>, StorageError>;

    /// Active tasks assigned to the character for the period, ordered by
    /// title then id.
    async fn list_tasks_for_period(
        &self,
        character_id: &str,
        period: Period,
    ) -> Result<Vec<Task>, StorageError>;

    async fn is_task_completed(
        &self,
        character_id: &str,
        task_id: &str,
        period_key: &PeriodKey,
    ) -> Result<bool, StorageError>;

    async fn completed_task_ids(
        &self,
        character_id: &str,
        period_key: &PeriodKey,
    ) -> Result<HashSet<String>, StorageError>;

    async fn insert_task(&self, task: &Task) -> Result<(), StorageError>;

    async fn count_tasks(&self) -> Result<i64, StorageError>;
}

#[async_trait]
pub trait RewardCatalog: Send + Sync {
    async fn get_reward(&self, level: i32) -> Result<Option<Reward>, StorageError>;

    /// All rewards ordered by level.
    async fn list_rewards(&self) -> Result<Vec<Reward>, StorageError>;

    async fn upsert_reward(&self, reward: &Reward) -> Result<(), StorageError>;

    /// Returns false if no reward existed for the level.
    async fn delete_reward(&self, level: i32) -> Result<bool, StorageError>;
}

/// Everything the engine needs, plus the one write that must span two
/// records.
#[async_trait]
pub trait GameStore: CharacterStore + TaskCatalog + RewardCatalog {
    /// Marks the completion and saves the updated character as one unit.
    /// Returns false, writing nothing, if the completion already exists.
    async fn commit_completion(
        &self,
        completion: &TaskCompletion,
        character: &Character,
    ) -> Result<bool, StorageError>;
}
