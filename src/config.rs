use crate::clock::GameCalendar;
use crate::engine::{LevelingRule, DEFAULT_COMPLETIONS_PER_LEVEL};
use anyhow::{Context, Result};
use std::time::Duration;

/// Istanbul time, where the game was first played.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 3;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub calendar: GameCalendar,
    pub leveling: LevelingRule,
    pub daily_sweep: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("Invalid PORT")?;

        let offset_hours = match lookup("UTC_OFFSET_HOURS") {
            Some(value) => value.parse::<i32>().context("Invalid UTC_OFFSET_HOURS")?,
            None => DEFAULT_UTC_OFFSET_HOURS,
        };
        let calendar = GameCalendar::from_offset_hours(offset_hours)
            .context("UTC_OFFSET_HOURS must be between -23 and 23")?;

        let completions_per_level = match lookup("COMPLETIONS_PER_LEVEL") {
            Some(value) => value.parse::<i32>().context("Invalid COMPLETIONS_PER_LEVEL")?,
            None => DEFAULT_COMPLETIONS_PER_LEVEL,
        };
        let leveling = LevelingRule::new(completions_per_level)
            .context("COMPLETIONS_PER_LEVEL must be at least 1")?;

        let daily_sweep = match lookup("DAILY_SWEEP_SECS") {
            Some(value) => {
                let secs = value.parse::<u64>().context("Invalid DAILY_SWEEP_SECS")?;
                anyhow::ensure!(secs > 0, "DAILY_SWEEP_SECS must be greater than zero");
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            calendar,
            leveling,
            daily_sweep,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.leveling.completions_per_level(), DEFAULT_COMPLETIONS_PER_LEVEL);
        assert!(config.daily_sweep.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/habitquest"),
            ("PORT", "8080"),
            ("COMPLETIONS_PER_LEVEL", "3"),
            ("DAILY_SWEEP_SECS", "600"),
        ])
        .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/habitquest"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.leveling.completions_per_level(), 3);
        assert_eq!(config.daily_sweep, Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config(&[("PORT", "abc")]).is_err());
        assert!(config(&[("COMPLETIONS_PER_LEVEL", "0")]).is_err());
        assert!(config(&[("UTC_OFFSET_HOURS", "40")]).is_err());
        assert!(config(&[("DAILY_SWEEP_SECS", "0")]).is_err());
    }
}
