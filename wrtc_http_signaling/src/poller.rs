//! Long-poll for candidates gathered after the offer was sent

use crate::config::PollBudget;
use crate::connection::{Connection, ConnectionId, ConnectionManager, IceCandidate};
use crate::error::ConnectionError;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Suspends the current request for a while
pub trait Timer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Waits, in fixed intervals, until a connection has gathered new candidates
///
/// The poll is an ordinary future: dropping it (for example because the
/// client went away and the host dropped the request) stops it at the next
/// interval.
#[derive(Debug, Clone)]
pub struct CandidatePoller<T> {
    timer: T,
    interval: Duration,
    max_attempts: u32,
}

impl<T: Timer> CandidatePoller<T> {
    pub fn new(timer: T, budget: PollBudget) -> Self {
        Self {
            timer,
            interval: budget.interval(),
            max_attempts: budget.max_attempts,
        }
    }

    /// Drain candidates of connection `id`, waiting up to the attempt budget
    /// for at least one to show up
    ///
    /// An empty result means nothing was gathered in time. The connection is
    /// looked up again on every attempt; if it vanished meanwhile that attempt
    /// simply yields nothing.
    pub async fn poll<M: ConnectionManager>(
        &self,
        manager: &M,
        id: &ConnectionId,
    ) -> Result<Vec<IceCandidate>, ConnectionError> {
        let mut candidates = Vec::new();
        let mut attempts = 0;

        while candidates.is_empty() && attempts < self.max_attempts {
            self.timer.sleep(self.interval).await;
            attempts += 1;
            if let Some(connection) = manager.get_connection(id) {
                candidates.extend(connection.take_additional_candidates()?);
            }
        }

        debug!(
            connection_id = %id,
            attempts,
            candidates = candidates.len(),
            "Candidate poll finished"
        );
        Ok(candidates)
    }
}
