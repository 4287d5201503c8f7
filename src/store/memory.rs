use super::{CharacterStore, GameStore, RewardCatalog, StorageError, TaskCatalog};
use crate::clock::{Period, PeriodKey};
use crate::models::{Character, Reward, Task, TaskCompletion};
use async_trait::async_trait;
use chrono::Datelike;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct MemoryState {
    characters: HashMap<String, Character>,
    tasks: HashMap<String, Task>,
    /// (character_id, task_id, period_key)
    completions: HashSet<(String, String, String)>,
    rewards: BTreeMap<i32, Reward>,
}

/// Process-local store. Every call takes one lock, so each method is atomic.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self, operation: &'static str) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|_| StorageError::database(operation, "memory store lock poisoned"))
    }
}

fn completion_key(
    character_id: &str,
    task_id: &str,
    period_key: &PeriodKey,
) -> (String, String, String) {
    (character_id.to_string(), task_id.to_string(), period_key.to_string())
}

#[async_trait]
impl CharacterStore for MemoryStore {
    async fn get_character(&self, id: &str) -> Result<Option<Character>, StorageError> {
        Ok(self.state("get_character")?.characters.get(id).cloned())
    }

    async fn find_character_by_name(&self, name: &str) -> Result<Option<Character>, StorageError> {
        let state = self.state("find_character_by_name")?;
        Ok(state
            .characters
            .values()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn list_characters(&self) -> Result<Vec<Character>, StorageError> {
        let state = self.state("list_characters")?;
        let mut characters: Vec<Character> = state.characters.values().cloned().collect();
        characters.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(characters)
    }

    async fn save_character(&self, character: &Character) -> Result<(), StorageError> {
        self.state("save_character")?
            .characters
            .insert(character.id.clone(), character.clone());
        Ok(())
    }
}

#[async_trait]
impl TaskCatalog for MemoryStore {
    async fn get_task(&self, id: &str) -> Result<Option<Task>, StorageError> {
        Ok(self.state("get_task")?.tasks.get(id).cloned())
    }

    async fn list_tasks_for_period(
        &self,
        character_id: &str,
        period: Period,
    ) -> Result<Vec<Task>, StorageError> {
        let state = self.state("list_tasks_for_period")?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| t.is_active && t.assigned_to.applies_to(character_id))
            .filter(|t| match period {
                Period::Day(date) => t.schedule.day_of_week() == Some(date.weekday()),
                Period::Week(_) => t.schedule.is_weekly(),
            })
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        Ok(tasks)
    }

    async fn is_task_completed(
        &self,
        character_id: &str,
        task_id: &str,
        period_key: &PeriodKey,
    ) -> Result<bool, StorageError> {
        let state = self.state("is_task_completed")?;
        Ok(state
            .completions
            .contains(&completion_key(character_id, task_id, period_key)))
    }

    async fn completed_task_ids(
        &self,
        character_id: &str,
        period_key: &PeriodKey,
    ) -> Result<HashSet<String>, StorageError> {
        let state = self.state("completed_task_ids")?;
        let period = period_key.to_string();
        Ok(state
            .completions
            .iter()
            .filter(|(c, _, p)| c == character_id && *p == period)
            .map(|(_, t, _)| t.clone())
            .collect())
    }

    async fn insert_task(&self, task: &Task) -> Result<(), StorageError> {
        self.state("insert_task")?
            .tasks
            .insert(task.id.clone(), task.clone());
        Ok(())
    }

    async fn count_tasks(&self) -> Result<i64, StorageError> {
        Ok(self.state("count_tasks")?.tasks.len() as i64)
    }
}

#[async_trait]
impl RewardCatalog for MemoryStore {
    async fn get_reward(&self, level: i32) -> Result<Option<Reward>, StorageError> {
        Ok(self.state("get_reward")?.rewards.get(&level).cloned())
    }

    async fn list_rewards(&self) -> Result<Vec<Reward>, StorageError> {
        Ok(self.state("list_rewards")?.rewards.values().cloned().collect())
    }

    async fn upsert_reward(&self, reward: &Reward) -> Result<(), StorageError> {
        self.state("upsert_reward")?
            .rewards
            .insert(reward.level, reward.clone());
        Ok(())
    }

    async fn delete_reward(&self, level: i32) -> Result<bool, StorageError> {
        Ok(self.state("delete_reward")?.rewards.remove(&level).is_some())
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn commit_completion(
        &self,
        completion: &TaskCompletion,
        character: &Character,
    ) -> Result<bool, StorageError> {
        let mut state = self.state("commit_completion")?;
        let key = completion_key(
            &completion.character_id,
            &completion.task_id,
            &completion.period_key,
        );
        if !state.completions.insert(key) {
            return Ok(false);
        }
        state.characters.insert(character.id.clone(), character.clone());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignment, Schedule};
    use chrono::{NaiveDate, Weekday};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[tokio::test]
    async fn test_list_tasks_filters_by_period_and_assignment() {
        let store = MemoryStore::new();
        let daily = |id: &str, day, who| {
            Task::new(id.to_string(), id.to_string(), Schedule::Daily { day_of_week: day }, who)
        };
        let mut retired = daily("retired", Weekday::Mon, Assignment::Everyone);
        retired.is_active = false;
        let tasks = vec![
            daily("b-mine", Weekday::Mon, Assignment::Character("a".into())),
            daily("a-both", Weekday::Mon, Assignment::Everyone),
            daily("theirs", Weekday::Mon, Assignment::Character("b".into())),
            daily("tuesday", Weekday::Tue, Assignment::Everyone),
            retired,
            Task::new("w".into(), "weekly".into(), Schedule::Weekly, Assignment::Everyone),
        ];
        for task in &tasks {
            store.insert_task(task).await.unwrap();
        }

        let ids: Vec<String> = store
            .list_tasks_for_period("a", Period::Day(monday()))
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["a-both", "b-mine"]);

        let weekly = store.list_tasks_for_period("a", Period::Week(monday())).await.unwrap();
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].id, "w");
    }

    #[tokio::test]
    async fn test_commit_completion_is_at_most_once() {
        let store = MemoryStore::new();
        let mut character = Character::new("a".into(), "A".into());
        store.save_character(&character).await.unwrap();

        let key = PeriodKey::day(monday());
        let completion = TaskCompletion::new("a".into(), "t".into(), key.clone(), 0);
        character.experience = 1;
        assert!(store.commit_completion(&completion, &character).await.unwrap());

        character.experience = 2;
        assert!(!store.commit_completion(&completion, &character).await.unwrap());

        let saved = store.get_character("a").await.unwrap().unwrap();
        assert_eq!(saved.experience, 1);
        assert!(store.is_task_completed("a", "t", &key).await.unwrap());
        assert!(store.completed_task_ids("a", &key).await.unwrap().contains("t"));
    }
}
