//! Dashboard Data Container
//!
//! Single in-memory slot for the dashboard summary. Each fetch waits out a
//! simulated delay and overwrites the slot; nothing is persisted and nothing
//! here depends on the auth state.

use crate::dashboard::error::{DashboardError, DashboardResult};
use crate::dashboard::types::{mock_dashboard_data, DashboardData};
use crate::sequence::{RequestSequence, Ticket};
use std::time::Duration;
use tokio::sync::watch;

/// Default simulated latency of a dashboard fetch
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(1000);

/// Snapshot of the dashboard state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub data: Option<DashboardData>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Holds the fetched dashboard summary
pub struct DashboardContainer {
    state: watch::Sender<DashboardState>,
    sequence: RequestSequence,
    fetch_delay: Duration,
}

impl DashboardContainer {
    pub fn new(fetch_delay: Duration) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        Self {
            state,
            sequence: RequestSequence::new(),
            fetch_delay,
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    pub fn data(&self) -> Option<DashboardData> {
        self.state.borrow().data.clone()
    }

    /// Load the summary after a simulated delay, replacing any earlier data.
    ///
    /// Only the most recently issued fetch applies; older ones resolve with
    /// [`DashboardError::Superseded`].
    pub async fn fetch(&self) -> DashboardResult<DashboardData> {
        let (ticket, ()) = self.sequence.issue_with(|| {
            self.state.send_modify(|state| {
                state.loading = true;
                state.error = None;
            });
        });

        tracing::debug!(request = ticket, "Dashboard fetch started");

        let mut pending = PendingFetch {
            container: self,
            ticket,
            settled: false,
        };

        tokio::time::sleep(self.fetch_delay).await;

        let data = mock_dashboard_data();
        let applied = self.sequence.apply_if_current(ticket, || {
            self.state.send_modify(|state| {
                state.loading = false;
                state.data = Some(data.clone());
            });
        });
        pending.settled = true;

        if applied.is_none() {
            tracing::debug!(request = ticket, "Dashboard fetch discarded, superseded");
            return Err(DashboardError::Superseded);
        }

        tracing::info!(
            request = ticket,
            patients = data.recent_patients.len(),
            "Dashboard data loaded"
        );
        Ok(data)
    }

    /// Fetch only when nothing has been loaded yet
    pub async fn ensure_loaded(&self) -> DashboardResult<DashboardData> {
        if let Some(data) = self.data() {
            return Ok(data);
        }
        self.fetch().await
    }
}

/// Clears the loading flag if a fetch future is dropped before it resolves
struct PendingFetch<'a> {
    container: &'a DashboardContainer,
    ticket: Ticket,
    settled: bool,
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let container = self.container;
        container.sequence.apply_if_current(self.ticket, || {
            container.state.send_modify(|state| state.loading = false);
        });
    }
}
