use super::{Engine, EngineError};
use crate::clock::period_key_for;
use crate::models::{Reward, Stats, TaskCompletion};
use crate::store::{GameStore, RewardCatalog, TaskCatalog};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionResult {
    pub success: bool,
    pub stats: Stats,
    pub points: i32,
    pub experience: i32,
    pub level_up: bool,
    pub new_level: Option<i32>,
    pub reward: Option<Reward>,
}

impl Engine {
    /// Completes a task for the current game day.
    pub async fn complete_task(
        &self,
        character_id: &str,
        task_id: &str,
    ) -> Result<CompletionResult, EngineError> {
        self.complete_task_on(character_id, task_id, self.today()).await
    }

    /// Completes a task as of `today`. Daily tasks are keyed by the date,
    /// weekly tasks by the ISO week containing it.
    pub async fn complete_task_on(
        &self,
        character_id: &str,
        task_id: &str,
        today: NaiveDate,
    ) -> Result<CompletionResult, EngineError> {
        let _guard = self.locks.lock(character_id).await;

        let mut character = self.load_character(character_id).await?;
        if !character.is_alive() {
            tracing::debug!("{} tried to complete {} while in game over", character_id, task_id);
            return Err(EngineError::InactiveCharacter(character.id));
        }

        let task = self
            .store
            .get_task(task_id)
            .await?
            .filter(|t| t.is_active)
            .ok_or_else(|| EngineError::task_not_found(task_id))?;

        if !task.assigned_to.applies_to(&character.id) {
            return Err(EngineError::NotAssigned {
                task_id: task.id,
                character_id: character.id,
            });
        }
        if !task.is_due_on(today) {
            return Err(EngineError::NotScheduled { task_id: task.id });
        }

        let period = period_key_for(&task.schedule, today);
        if self.store.is_task_completed(&character.id, &task.id, &period).await? {
            tracing::debug!("{} already completed {} for {}", character_id, task_id, period);
            return Err(EngineError::AlreadyCompleted {
                task_id: task.id,
                period,
            });
        }

        character.stats.add(&task.rewards);
        character.points = character.points.saturating_add(task.points);
        character.experience = character.experience.saturating_add(1);

        // At most one level per completion; any backlog drains on later ones
        let level_up = self.leveling.should_level_up(&character);
        let reward = if level_up {
            character.level += 1;
            self.store.get_reward(character.level).await?
        } else {
            None
        };

        let now = self.now();
        character.touch(now);
        let completion =
            TaskCompletion::new(character.id.clone(), task.id.clone(), period.clone(), now);
        if !self.store.commit_completion(&completion, &character).await? {
            return Err(EngineError::AlreadyCompleted {
                task_id: task.id,
                period,
            });
        }

        tracing::info!(
            "{} completed '{}' ({}), experience now {}",
            character.name,
            task.title,
            period,
            character.experience
        );
        if level_up {
            tracing::info!(
                "{} reached level {}{}",
                character.name,
                character.level,
                if reward.is_some() { "" } else { " (no reward configured)" }
            );
        }

        Ok(CompletionResult {
            success: true,
            stats: character.stats,
            points: character.points,
            experience: character.experience,
            level_up,
            new_level: level_up.then_some(character.level),
            reward,
        })
    }
}
