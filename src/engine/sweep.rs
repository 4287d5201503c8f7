use super::Engine;
use crate::store::CharacterStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub checked: usize,
    pub health_reduced: usize,
    pub game_over: usize,
    pub failed: usize,
}

impl Engine {
    /// Runs the daily check for every character. Uses the same per-day
    /// guard as the on-demand check, so overlapping with client-triggered
    /// checks is harmless.
    pub async fn run_daily_sweep(&self) -> SweepReport {
        let today = self.today();
        let mut report = SweepReport::default();

        let characters = match self.store.list_characters().await {
            Ok(characters) => characters,
            Err(e) => {
                tracing::error!("Daily sweep could not list characters: {}", e);
                return report;
            }
        };

        for character in characters {
            match self.evaluate_daily_check(&character.id, today).await {
                Ok(result) => {
                    if !result.already_checked {
                        report.checked += 1;
                    }
                    if result.health_reduced {
                        report.health_reduced += 1;
                    }
                    if result.game_over {
                        report.game_over += 1;
                    }
                }
                Err(e) => {
                    tracing::error!("Daily check failed for {}: {}", character.id, e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}

/// Runs the sweep on a fixed interval, starting immediately.
pub fn spawn_daily_sweep(engine: Arc<Engine>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let report = engine.run_daily_sweep().await;
            tracing::debug!(
                "Daily sweep: {} checked, {} lost health, {} in game over, {} failed",
                report.checked,
                report.health_reduced,
                report.game_over,
                report.failed
            );
        }
    })
}
