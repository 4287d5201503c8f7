use crate::clock::PeriodKey;
use crate::store::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A repeat completion within the same period. Nothing was changed.
    #[error("Task {task_id} is already completed for {period}")]
    AlreadyCompleted { task_id: String, period: PeriodKey },

    #[error("Value {0} is outside the allowed range")]
    InvalidRange(i32),

    #[error("Character {0} is not an admin")]
    Forbidden(String),

    /// The character is in game over and must be revived first.
    #[error("Character {0} is in game over")]
    InactiveCharacter(String),

    #[error("Task {task_id} is not assigned to {character_id}")]
    NotAssigned { task_id: String, character_id: String },

    #[error("Task {task_id} is not scheduled for today")]
    NotScheduled { task_id: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl EngineError {
    pub fn character_not_found(id: &str) -> Self {
        EngineError::NotFound {
            entity: "character",
            id: id.to_string(),
        }
    }

    pub fn task_not_found(id: &str) -> Self {
        EngineError::NotFound {
            entity: "task",
            id: id.to_string(),
        }
    }

    /// Everything except storage failures is a caller-level outcome the
    /// transport can report and move on from.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EngineError::Storage(_))
    }
}
