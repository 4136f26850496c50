use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::database::models::VaultRecord;
use crate::engine::generator::render_threadlight;
use crate::state::AppState;

/// Themes the background pulse cycles through between operator-driven
/// generations.
const PULSE_THEMES: &[&str] = &["aurora", "ember", "tide", "quiet"];

/// Background pulse: on a fixed interval, renders one threadlight post and
/// stores it as a vault record. Disabled entirely via config (tests, CLI).
pub struct Scheduler {
    handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn start(state: AppState) -> Self {
        if !state.config.scheduler.enabled {
            debug!("Scheduler disabled by configuration");
            return Self { handle: None };
        }

        let interval = Duration::from_secs(state.config.scheduler.interval_secs.max(1));
        info!("Starting vault pulse scheduler (every {:?})", interval);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; consume it so the first
            // pulse lands one full interval after startup.
            ticker.tick().await;

            let mut cursor = 0usize;
            loop {
                ticker.tick().await;
                let theme = PULSE_THEMES[cursor % PULSE_THEMES.len()];
                cursor += 1;

                if let Err(err) = record_pulse(&state, theme).await {
                    warn!("Scheduled vault pulse failed: {err}");
                }
            }
        });

        Self { handle: Some(handle) }
    }

    pub fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Vault pulse scheduler stopped");
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn record_pulse(state: &AppState, theme: &str) -> Result<(), sqlx::Error> {
    let post = render_threadlight(theme, None);
    let record = VaultRecord::new(theme, vec![post]);

    sqlx::query("INSERT INTO vault_records (id, theme, posts, created_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(&record.id)
        .bind(&record.theme)
        .bind(&record.posts)
        .bind(record.created_at)
        .execute(&state.pool)
        .await?;

    debug!("Recorded scheduled vault pulse for theme {theme}");
    Ok(())
}
