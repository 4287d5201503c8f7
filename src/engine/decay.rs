use super::{Engine, EngineError};
use crate::clock::{needs_daily_check, previous_day, previous_week, starts_new_week, Period};
use crate::store::{CharacterStore, TaskCatalog};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCheckResult {
    pub health_reduced: bool,
    pub new_health: i32,
    pub game_over: bool,
    pub daily_loss: i32,
    pub weekly_loss: i32,
    /// The check had already run for this day; nothing was evaluated.
    pub already_checked: bool,
}

impl Engine {
    /// Applies the health penalty for yesterday's unfinished daily tasks
    /// and, on the first check of a new week, last week's unfinished weekly
    /// tasks. Runs at most once per character per day; repeat calls and
    /// calls for an earlier day are no-ops.
    pub async fn evaluate_daily_check(
        &self,
        character_id: &str,
        today: NaiveDate,
    ) -> Result<DailyCheckResult, EngineError> {
        let _guard = self.locks.lock(character_id).await;

        let mut character = self.load_character(character_id).await?;
        if !needs_daily_check(character.last_daily_check, today) {
            return Ok(DailyCheckResult {
                health_reduced: false,
                new_health: character.health,
                game_over: character.game_over,
                daily_loss: 0,
                weekly_loss: 0,
                already_checked: true,
            });
        }

        let mut daily_loss = 0;
        let mut weekly_loss = 0;
        let mut health_reduced = false;

        if character.is_alive() {
            let yesterday = previous_day(today);
            if self.incomplete_count(&character.id, Period::Day(yesterday)).await? > 0 {
                daily_loss = 1;
            }
            if starts_new_week(character.last_daily_check, today) {
                let last_week = Period::Week(previous_week(today));
                weekly_loss = self.incomplete_count(&character.id, last_week).await?;
            }

            let total = daily_loss + weekly_loss;
            if total > 0 {
                let before = character.health;
                let died = character.take_damage(total);
                health_reduced = character.health < before;
                tracing::info!(
                    "{} lost {} health ({} daily, {} weekly), now {}",
                    character.name,
                    before - character.health,
                    daily_loss,
                    weekly_loss,
                    character.health
                );
                if died {
                    tracing::info!("{} has reached game over", character.name);
                }
            }
        }

        character.last_daily_check = Some(today);
        character.touch(self.now());
        self.store.save_character(&character).await?;

        Ok(DailyCheckResult {
            health_reduced,
            new_health: character.health,
            game_over: character.game_over,
            daily_loss,
            weekly_loss,
            already_checked: false,
        })
    }

    async fn incomplete_count(
        &self,
        character_id: &str,
        period: Period,
    ) -> Result<i32, EngineError> {
        let tasks = self.store.list_tasks_for_period(character_id, period).await?;
        if tasks.is_empty() {
            return Ok(0);
        }
        let done = self.store.completed_task_ids(character_id, &period.key()).await?;
        let missing = tasks.iter().filter(|t| !done.contains(&t.id)).count();
        Ok(i32::try_from(missing).unwrap_or(i32::MAX))
    }
}
