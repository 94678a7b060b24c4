//! Periodic reaper for stale token records
//!
//! The historical implementation swept other users' tokens as a side
//! effect of any logout. Here the sweep runs as an independent scheduled
//! job over the token store, in its own transaction, decoupled from any
//! request path.

use anyhow::Result;
use chrono::{Duration, Utc};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::repositories::TokenRepository;

#[derive(Clone)]
pub struct TokenReaper {
    tokens: TokenRepository,
    retention: Duration,
}

impl TokenReaper {
    /// Create a reaper that removes token records older than `retention`
    pub fn new(tokens: TokenRepository, retention: Duration) -> Self {
        Self { tokens, retention }
    }

    /// Delete every token record older than the retention window,
    /// across all users. Returns the number of removed records.
    pub async fn sweep(&self) -> Result<u64> {
        let cutoff = Utc::now() - self.retention;
        let removed = self.tokens.delete_older_than(cutoff).await?;

        if removed > 0 {
            info!("Removed {} stale token records", removed);
        }

        Ok(removed)
    }

    /// Start the recurring sweep on the given cron schedule. The
    /// returned scheduler must be kept alive by the caller.
    pub async fn start(self, schedule: &str) -> Result<JobScheduler> {
        let scheduler = JobScheduler::new().await?;

        let job = Job::new_async(schedule, move |_uuid, _lock| {
            let reaper = self.clone();
            Box::pin(async move {
                if let Err(e) = reaper.sweep().await {
                    error!("Token sweep failed: {}", e);
                }
            })
        })?;

        scheduler.add(job).await?;
        scheduler.start().await?;

        info!("Token reaper scheduled: {}", schedule);
        Ok(scheduler)
    }
}
