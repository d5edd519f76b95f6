//! Periodic deletion of expired contact sessions.

use super::ContactSessionService;
use crate::error::SupportResult;
use crate::session::ports::ContactSessionRepository;
use mockable::Clock;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Runs [`ContactSessionService::clear_expired`] on a fixed interval.
pub struct ExpirySweeper<R, C>
where
    R: ContactSessionRepository,
    C: Clock + Send + Sync,
{
    sessions: ContactSessionService<R, C>,
    interval: Duration,
}

impl<R, C> ExpirySweeper<R, C>
where
    R: ContactSessionRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a sweeper over the given session service.
    #[must_use]
    pub const fn new(sessions: ContactSessionService<R, C>, interval: Duration) -> Self {
        Self { sessions, interval }
    }

    /// Runs one sweep and logs the result.
    ///
    /// # Errors
    ///
    /// Returns the underlying error when the deletion fails.
    pub async fn sweep_once(&self) -> SupportResult<usize> {
        let deleted = self.sessions.clear_expired().await?;
        if deleted == 0 {
            tracing::debug!("no expired contact sessions to delete");
        } else {
            tracing::info!(deleted_sessions = deleted, "deleted expired contact sessions");
        }
        Ok(deleted)
    }

    /// Spawns the sweep loop on the current tokio runtime.
    ///
    /// The first sweep runs immediately. Failed sweeps are logged and the loop
    /// keeps ticking; abort the returned handle to stop it.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(err) = self.sweep_once().await {
                    tracing::warn!(error = %err, "contact session sweep failed");
                }
            }
        })
    }
}
