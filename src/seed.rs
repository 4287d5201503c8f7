//! Startup data: the two starter characters, a task catalog, the stock
//! level rewards and admin grants.

use crate::models::{Assignment, Character, Reward, Schedule, Stats, Task};
use crate::store::{CharacterStore, GameStore, RewardCatalog, TaskCatalog};
use anyhow::{bail, Context, Result};
use chrono::Weekday;
use serde::Deserialize;

const SEED_CONTENT: &str = include_str!("../data/seed.json");

pub const DEFAULT_REWARD_LEVELS: i32 = 50;

#[derive(Debug, Deserialize)]
struct SeedFile {
    characters: Vec<SeedCharacter>,
    tasks: Vec<SeedTask>,
}

#[derive(Debug, Deserialize)]
struct SeedCharacter {
    id: String,
    name: String,
    #[serde(default)]
    is_admin: bool,
    health: i32,
    level: i32,
}

#[derive(Debug, Deserialize)]
struct SeedTask {
    id: String,
    title: String,
    #[serde(default)]
    points: i32,
    #[serde(default)]
    strength: i32,
    #[serde(default)]
    agility: i32,
    #[serde(default)]
    charisma: i32,
    #[serde(default)]
    endurance: i32,
    #[serde(default)]
    is_weekly: bool,
    day_of_week: Option<Weekday>,
    assigned_to: Option<String>,
}

impl SeedTask {
    fn into_task(self) -> Result<Task> {
        let schedule = match (self.is_weekly, self.day_of_week) {
            (true, None) => Schedule::Weekly,
            (false, Some(day_of_week)) => Schedule::Daily { day_of_week },
            _ => bail!("Seed task {} must be weekly or have a day_of_week, not both", self.id),
        };
        let rewards = Stats::new(self.strength, self.agility, self.charisma, self.endurance);
        if !rewards.is_non_negative() {
            bail!("Seed task {} has a negative stat reward", self.id);
        }
        Ok(Task::new(self.id, self.title, schedule, Assignment::from(self.assigned_to))
            .with_rewards(rewards, self.points))
    }
}

/// Loads the embedded characters and tasks if the store has no characters
/// yet, and fills an empty reward catalog.
pub async fn load_seed_data(store: &dyn GameStore) -> Result<()> {
    let seed: SeedFile = serde_json::from_str(SEED_CONTENT).context("Failed to parse seed.json")?;

    if store.list_characters().await?.is_empty() {
        for entry in &seed.characters {
            let mut character = Character::new(entry.id.clone(), entry.name.clone());
            character.is_admin = entry.is_admin;
            character.level = entry.level.max(1);
            character.set_health(entry.health);
            store.save_character(&character).await?;
        }
        tracing::info!("Created {} starter characters", seed.characters.len());
    } else {
        tracing::info!("Characters already present, skipping character seed");
    }

    if store.count_tasks().await? == 0 {
        let count = seed.tasks.len();
        for entry in seed.tasks {
            let task = entry.into_task()?;
            store.insert_task(&task).await?;
        }
        tracing::info!("Created {} starter tasks", count);
    }

    if store.list_rewards().await?.is_empty() {
        for level in 1..=DEFAULT_REWARD_LEVELS {
            store.upsert_reward(&Reward::default_for_level(level)).await?;
        }
        tracing::info!("Created level rewards 1-{}", DEFAULT_REWARD_LEVELS);
    }

    Ok(())
}

/// Reads admin ids or names from the ADMINS environment variable, falling
/// back to an admins.txt file.
pub async fn read_admin_list() -> Option<Vec<String>> {
    if let Ok(admins_env) = std::env::var("ADMINS") {
        tracing::info!("Loading admins from ADMINS environment variable");
        return Some(parse_admin_list(&admins_env.replace(',', "\n")));
    }
    match tokio::fs::read_to_string("admins.txt").await {
        Ok(contents) => {
            tracing::info!("Loading admins from admins.txt file");
            Some(parse_admin_list(&contents))
        }
        Err(_) => None,
    }
}

fn parse_admin_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Grants the admin flag to each listed character, matched by id or name.
pub async fn grant_admins(store: &dyn GameStore, admins: &[String]) -> Result<usize> {
    let mut granted = 0;
    for admin in admins {
        let found = match store.get_character(admin).await? {
            Some(character) => Some(character),
            None => store.find_character_by_name(admin).await?,
        };
        match found {
            Some(mut character) if !character.is_admin => {
                character.is_admin = true;
                character.touch(chrono::Utc::now().timestamp());
                store.save_character(&character).await?;
                tracing::info!("Granted admin to {}", character.name);
                granted += 1;
            }
            Some(_) => {}
            None => tracing::warn!("Admin {} does not match any character", admin),
        }
    }
    Ok(granted)
}
