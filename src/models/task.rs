use super::character::Stats;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// When a task recurs. Daily tasks come back every week on their weekday,
/// weekly tasks once per ISO week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    Daily { day_of_week: Weekday },
    Weekly,
}

impl Schedule {
    pub fn is_weekly(&self) -> bool {
        matches!(self, Schedule::Weekly)
    }

    pub fn day_of_week(&self) -> Option<Weekday> {
        match self {
            Schedule::Daily { day_of_week } => Some(*day_of_week),
            Schedule::Weekly => None,
        }
    }
}

/// Who a task applies to. Serialized as the character id, or `null` for
/// everyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Assignment {
    Everyone,
    Character(String),
}

impl Assignment {
    pub fn applies_to(&self, character_id: &str) -> bool {
        match self {
            Assignment::Everyone => true,
            Assignment::Character(id) => id == character_id,
        }
    }

    pub fn character_id(&self) -> Option<&str> {
        match self {
            Assignment::Everyone => None,
            Assignment::Character(id) => Some(id),
        }
    }
}

impl From<Option<String>> for Assignment {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(id) => Assignment::Character(id),
            None => Assignment::Everyone,
        }
    }
}

impl From<Assignment> for Option<String> {
    fn from(value: Assignment) -> Self {
        match value {
            Assignment::Everyone => None,
            Assignment::Character(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub rewards: Stats,
    pub points: i32,
    pub schedule: Schedule,
    pub assigned_to: Assignment,
    pub is_active: bool,
    pub created_at: i64,
}

impl Task {
    pub fn new(id: String, title: String, schedule: Schedule, assigned_to: Assignment) -> Self {
        Self {
            id,
            title,
            rewards: Stats::default(),
            points: 0,
            schedule,
            assigned_to,
            is_active: true,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn with_rewards(mut self, rewards: Stats, points: i32) -> Self {
        self.rewards = rewards;
        self.points = points;
        self
    }

    /// Whether the task can be completed on `date`. Weekly tasks are due on
    /// every day of their week.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        match self.schedule {
            Schedule::Daily { day_of_week } => date.weekday() == day_of_week,
            Schedule::Weekly => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_membership() {
        assert!(Assignment::Everyone.applies_to("anyone"));
        let mine = Assignment::Character("user_a".to_string());
        assert!(mine.applies_to("user_a"));
        assert!(!mine.applies_to("user_b"));
    }

    #[test]
    fn test_assignment_serializes_as_optional_id() {
        let json = serde_json::to_value(Assignment::Everyone).unwrap();
        assert!(json.is_null());
        let parsed: Assignment = serde_json::from_str("\"user_a\"").unwrap();
        assert_eq!(parsed, Assignment::Character("user_a".to_string()));
    }

    #[test]
    fn test_daily_task_due_only_on_its_weekday() {
        let task = Task::new(
            "t1".to_string(),
            "Stretch".to_string(),
            Schedule::Daily { day_of_week: Weekday::Sun },
            Assignment::Everyone,
        );
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert!(task.is_due_on(sunday));
        assert!(!task.is_due_on(sunday.succ_opt().unwrap()));
    }
}
