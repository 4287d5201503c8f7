use crate::clock::PeriodKey;
use serde::{Deserialize, Serialize};

/// Records that a character finished a task within one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub character_id: String,
    pub task_id: String,
    pub period_key: PeriodKey,
    pub completed_at: i64,
}

impl TaskCompletion {
    pub fn new(
        character_id: String,
        task_id: String,
        period_key: PeriodKey,
        completed_at: i64,
    ) -> Self {
        Self {
            character_id,
            task_id,
            period_key,
            completed_at,
        }
    }
}
