use crate::models::{Assignment, Schedule, Stats, Task};
use crate::store::StorageError;
use chrono::{Datelike, NaiveDate, Weekday};
use sqlx::{FromRow, PgPool};

/// Flat row shape of the `tasks` table.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    #[sqlx(flatten)]
    pub rewards: Stats,
    pub points: i32,
    pub is_weekly: bool,
    pub day_of_week: Option<i16>,
    pub assigned_to: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

impl TryFrom<TaskRow> for Task {
    type Error = StorageError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let schedule = match (row.is_weekly, row.day_of_week) {
            (true, None) => Schedule::Weekly,
            (false, Some(day)) => {
                let day_of_week = u8::try_from(day)
                    .ok()
                    .and_then(|d| Weekday::try_from(d).ok())
                    .ok_or_else(|| {
                        let message = format!("invalid day_of_week {}", day);
                        StorageError::corrupt("task", &row.id, message)
                    })?;
                Schedule::Daily { day_of_week }
            }
            (true, Some(_)) => {
                return Err(StorageError::corrupt("task", &row.id, "weekly task has a day_of_week"));
            }
            (false, None) => {
                return Err(StorageError::corrupt("task", &row.id, "daily task has no day_of_week"));
            }
        };

        Ok(Task {
            id: row.id,
            title: row.title,
            rewards: row.rewards,
            points: row.points,
            schedule,
            assigned_to: Assignment::from(row.assigned_to),
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

fn day_number(day: Weekday) -> i16 {
    day.num_days_from_monday() as i16
}

pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<TaskRow>, sqlx::Error> {
        sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Active daily tasks falling on `date`'s weekday for a character.
    pub async fn get_daily_for(
        &self,
        character_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<TaskRow>, sqlx::Error> {
        sqlx::query_as::<_, TaskRow>(
            "SELECT * FROM tasks
             WHERE is_active AND NOT is_weekly AND day_of_week = $1
               AND (assigned_to IS NULL OR assigned_to = $2)
             ORDER BY title, id",
        )
        .bind(day_number(date.weekday()))
        .bind(character_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Active weekly tasks for a character.
    pub async fn get_weekly_for(&self, character_id: &str) -> Result<Vec<TaskRow>, sqlx::Error> {
        sqlx::query_as::<_, TaskRow>(
            "SELECT * FROM tasks
             WHERE is_active AND is_weekly
               AND (assigned_to IS NULL OR assigned_to = $1)
             ORDER BY title, id",
        )
        .bind(character_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn create(&self, task: &Task) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO tasks (
                id, title, strength, agility, charisma, endurance, points,
                is_weekly, day_of_week, assigned_to, is_active, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(task.rewards.strength)
        .bind(task.rewards.agility)
        .bind(task.rewards.charisma)
        .bind(task.rewards.endurance)
        .bind(task.points)
        .bind(task.schedule.is_weekly())
        .bind(task.schedule.day_of_week().map(day_number))
        .bind(task.assigned_to.character_id())
        .bind(task.is_active)
        .bind(task.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(is_weekly: bool, day_of_week: Option<i16>) -> TaskRow {
        TaskRow {
            id: "t".to_string(),
            title: "Walk".to_string(),
            rewards: Stats::new(1, 2, 0, 0),
            points: 5,
            is_weekly,
            day_of_week,
            assigned_to: None,
            is_active: true,
            created_at: 0,
        }
    }

    #[test]
    fn test_row_to_task() {
        let task = Task::try_from(row(false, Some(6))).unwrap();
        assert_eq!(task.schedule, Schedule::Daily { day_of_week: Weekday::Sun });
        assert_eq!(task.assigned_to, Assignment::Everyone);

        let weekly = Task::try_from(row(true, None)).unwrap();
        assert_eq!(weekly.schedule, Schedule::Weekly);
    }

    #[test]
    fn test_inconsistent_rows_are_corrupt() {
        assert!(matches!(Task::try_from(row(false, None)), Err(StorageError::Corrupt { .. })));
        assert!(matches!(Task::try_from(row(true, Some(2))), Err(StorageError::Corrupt { .. })));
        assert!(matches!(Task::try_from(row(false, Some(9))), Err(StorageError::Corrupt { .. })));
    }

    #[test]
    fn test_day_number_round_trips() {
        assert_eq!(day_number(Weekday::Mon), 0);
        assert_eq!(day_number(Weekday::Sun), 6);
    }
}
