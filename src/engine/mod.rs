//! Character progression and health decay.
//!
//! The engine is the only writer of a character's stats, level and health.
//! Every mutating operation takes the character's lock for its whole
//! read-modify-write, so operations on one character never interleave.

mod admin;
mod decay;
mod error;
mod leveling;
mod locks;
mod progression;
mod sweep;
mod view;

pub use admin::OverrideResult;
pub use decay::DailyCheckResult;
pub use error::EngineError;
pub use leveling::{LevelingRule, DEFAULT_COMPLETIONS_PER_LEVEL};
pub use progression::CompletionResult;
pub use sweep::{spawn_daily_sweep, SweepReport};
pub use view::{CharacterView, TaskStatus, TodayTasks, WeeklyTasks};

use crate::clock::{Clock, GameCalendar};
use crate::models::Character;
use crate::store::{CharacterStore, GameStore};
use chrono::NaiveDate;
use locks::CharacterLocks;
use std::sync::Arc;

pub struct Engine {
    store: Arc<dyn GameStore>,
    clock: Arc<dyn Clock>,
    calendar: GameCalendar,
    leveling: LevelingRule,
    locks: CharacterLocks,
}

impl Engine {
    pub fn new(
        store: Arc<dyn GameStore>,
        clock: Arc<dyn Clock>,
        calendar: GameCalendar,
        leveling: LevelingRule,
    ) -> Self {
        Self {
            store,
            clock,
            calendar,
            leveling,
            locks: CharacterLocks::new(),
        }
    }

    /// The current game day.
    pub fn today(&self) -> NaiveDate {
        self.calendar.today(self.clock.as_ref())
    }

    fn now(&self) -> i64 {
        self.clock.now().timestamp()
    }

    async fn load_character(&self, id: &str) -> Result<Character, EngineError> {
        self.store
            .get_character(id)
            .await?
            .ok_or_else(|| EngineError::character_not_found(id))
    }

    async fn require_admin(&self, actor_id: &str) -> Result<Character, EngineError> {
        let actor = self.load_character(actor_id).await?;
        if !actor.is_admin {
            tracing::debug!("Rejected admin operation from {}", actor_id);
            return Err(EngineError::Forbidden(actor_id.to_string()));
        }
        Ok(actor)
    }
}
