use super::{Engine, EngineError};
use crate::clock::{Period, PeriodKey};
use crate::models::{Character, Task};
use crate::store::{CharacterStore, TaskCatalog};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

/// Read projection of a character for callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterView {
    #[serde(flatten)]
    pub character: Character,
    pub experience_to_next_level: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskStatus {
    #[serde(flatten)]
    pub task: Task,
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodayTasks {
    pub date: NaiveDate,
    pub day: Weekday,
    pub tasks: Vec<TaskStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyTasks {
    pub period: PeriodKey,
    pub tasks: Vec<TaskStatus>,
}

impl Engine {
    pub async fn get_character_view(&self, id: &str) -> Result<CharacterView, EngineError> {
        let character = self.load_character(id).await?;
        Ok(self.view_of(character))
    }

    /// Character selection by display name.
    pub async fn login(&self, name: &str) -> Result<CharacterView, EngineError> {
        let character = self
            .store
            .find_character_by_name(name.trim())
            .await?
            .ok_or_else(|| EngineError::character_not_found(name))?;
        tracing::info!("{} logged in", character.name);
        Ok(self.view_of(character))
    }

    pub async fn tasks_today(&self, character_id: &str) -> Result<TodayTasks, EngineError> {
        let today = self.today();
        let tasks = self.task_statuses(character_id, Period::Day(today)).await?;
        Ok(TodayTasks {
            date: today,
            day: today.weekday(),
            tasks,
        })
    }

    pub async fn tasks_this_week(&self, character_id: &str) -> Result<WeeklyTasks, EngineError> {
        let period = Period::Week(self.today());
        let tasks = self.task_statuses(character_id, period).await?;
        Ok(WeeklyTasks {
            period: period.key(),
            tasks,
        })
    }

    fn view_of(&self, character: Character) -> CharacterView {
        CharacterView {
            experience_to_next_level: self.leveling.experience_to_next_level(&character),
            character,
        }
    }

    async fn task_statuses(
        &self,
        character_id: &str,
        period: Period,
    ) -> Result<Vec<TaskStatus>, EngineError> {
        // Unknown ids are an error rather than an empty list
        self.load_character(character_id).await?;

        let tasks = self.store.list_tasks_for_period(character_id, period).await?;
        let done = self.store.completed_task_ids(character_id, &period.key()).await?;
        Ok(tasks
            .into_iter()
            .map(|task| TaskStatus {
                is_completed: done.contains(&task.id),
                task,
            })
            .collect())
    }
}
