use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::{
    domain::{LoopValue, PlayerState, ShowDirectory, ShowId, ShowStatus},
    error::{ApiError, ErrorCode},
    protocol::Intent,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    command, directory_codec, status_codec,
    transport::{ShowfileEndpoints, ShowfileTransport},
    view::{directory_options, DirectoryOption, StatusView},
};

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOperation {
    Refresh,
    LoadDirectory,
    Command { intent: &'static str },
}

/// Most recent failure the session swallowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub operation: SessionOperation,
    pub error: ApiError,
    pub at: DateTime<Utc>,
}

impl ErrorRecord {
    pub fn new(operation: SessionOperation, error: ApiError) -> Self {
        Self {
            operation,
            error,
            at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    /// A response arrived after a newer one had already been applied.
    Stale,
    Failed,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    StatusUpdated(StatusView),
    DirectoryUpdated(Vec<DirectoryOption>),
    StaleResponseDiscarded {
        operation: SessionOperation,
        sequence: u64,
    },
    Error(ErrorRecord),
}

struct SessionState {
    status: Option<ShowStatus>,
    view: StatusView,
    loop_next: LoopValue,
    refresh_issued: u64,
    refresh_applied: u64,
    directory: ShowDirectory,
    directory_issued: u64,
    directory_applied: u64,
    last_error: Option<ErrorRecord>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: None,
            view: StatusView::default(),
            loop_next: LoopValue::On,
            refresh_issued: 0,
            refresh_applied: 0,
            directory: ShowDirectory::default(),
            directory_issued: 0,
            directory_applied: 0,
            last_error: None,
        }
    }
}

/// Client-side control surface for one show player.
///
/// Every state change is server-confirmed: commands are sent, then the status
/// is fetched again and whatever the player reports is adopted. Operations
/// take `&self` and may overlap; responses are ordered by request sequence so
/// an older response never overwrites a newer one.
pub struct ControlSession {
    transport: Arc<dyn ShowfileTransport>,
    endpoints: ShowfileEndpoints,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl ControlSession {
    pub fn new(transport: Arc<dyn ShowfileTransport>) -> Arc<Self> {
        Self::with_endpoints(transport, ShowfileEndpoints::default())
    }

    pub fn with_endpoints(
        transport: Arc<dyn ShowfileTransport>,
        endpoints: ShowfileEndpoints,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            transport,
            endpoints,
            inner: Mutex::new(SessionState::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn view(&self) -> StatusView {
        self.inner.lock().await.view.clone()
    }

    pub async fn status(&self) -> Option<ShowStatus> {
        self.inner.lock().await.status.clone()
    }

    pub async fn player_state(&self) -> PlayerState {
        self.inner
            .lock()
            .await
            .status
            .as_ref()
            .map(PlayerState::from_status)
            .unwrap_or_default()
    }

    pub async fn directory(&self) -> ShowDirectory {
        self.inner.lock().await.directory.clone()
    }

    pub async fn directory_options(&self) -> Vec<DirectoryOption> {
        directory_options(&self.inner.lock().await.directory)
    }

    /// Loop flag the next toggle will send.
    pub async fn loop_next(&self) -> LoopValue {
        self.inner.lock().await.loop_next
    }

    pub async fn last_error(&self) -> Option<ErrorRecord> {
        self.inner.lock().await.last_error.clone()
    }

    /// True once any status or directory response has been applied.
    pub async fn has_heard_from_player(&self) -> bool {
        let guard = self.inner.lock().await;
        guard.refresh_applied > 0 || guard.directory_applied > 0
    }

    pub async fn clear_last_error(&self) {
        self.inner.lock().await.last_error = None;
    }

    /// Fetches the status and, unless a newer response already landed,
    /// replaces the rendered view. Failures leave the view untouched.
    pub async fn refresh(&self) -> RefreshOutcome {
        let sequence = {
            let mut guard = self.inner.lock().await;
            guard.refresh_issued += 1;
            guard.refresh_issued
        };

        let raw = match self.transport.get_json(&self.endpoints.status).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(sequence, error = %err, "status refresh failed; keeping previous view");
                self.record_error(SessionOperation::Refresh, err.into()).await;
                return RefreshOutcome::Failed;
            }
        };
        let status = status_codec::decode(&raw);

        let view = {
            let mut guard = self.inner.lock().await;
            if sequence <= guard.refresh_applied {
                debug!(
                    sequence,
                    applied = guard.refresh_applied,
                    "discarding stale status response"
                );
                drop(guard);
                let _ = self.events.send(SessionEvent::StaleResponseDiscarded {
                    operation: SessionOperation::Refresh,
                    sequence,
                });
                return RefreshOutcome::Stale;
            }

            let view = StatusView::from_status(&status);
            guard.refresh_applied = sequence;
            guard.loop_next = LoopValue::from_looping(status.looping).toggled();
            guard.view = view.clone();
            guard.status = Some(status);
            view
        };

        info!(
            sequence,
            show = %view.show,
            status = %view.status,
            looping = %view.looping,
            "status applied"
        );
        let _ = self.events.send(SessionEvent::StatusUpdated(view));
        RefreshOutcome::Applied
    }

    /// Replaces the selectable list with a fresh listing. A failed fetch or a
    /// listing without `shows` keeps the previous list.
    pub async fn load_directory(&self) -> RefreshOutcome {
        let sequence = {
            let mut guard = self.inner.lock().await;
            guard.directory_issued += 1;
            guard.directory_issued
        };

        let decoded = match self.transport.get_json(&self.endpoints.directory).await {
            Ok(raw) => directory_codec::try_decode(&raw).map_err(ApiError::from),
            Err(err) => Err(err.into()),
        };
        let directory = match decoded {
            Ok(directory) => directory,
            Err(err) => {
                warn!(sequence, error = %err.message, "directory load failed; keeping previous list");
                self.record_error(SessionOperation::LoadDirectory, err).await;
                return RefreshOutcome::Failed;
            }
        };

        let options = {
            let mut guard = self.inner.lock().await;
            if sequence <= guard.directory_applied {
                debug!(sequence, "discarding stale directory response");
                drop(guard);
                let _ = self.events.send(SessionEvent::StaleResponseDiscarded {
                    operation: SessionOperation::LoadDirectory,
                    sequence,
                });
                return RefreshOutcome::Stale;
            }
            guard.directory_applied = sequence;
            let options = directory_options(&directory);
            guard.directory = directory;
            options
        };

        info!(sequence, shows = options.len(), "directory applied");
        let _ = self.events.send(SessionEvent::DirectoryUpdated(options));
        RefreshOutcome::Applied
    }

    /// Sends the command for `intent`, then refreshes regardless of whether the
    /// send succeeded. The returned outcome is that of the refresh.
    pub async fn send_command(&self, intent: Intent) -> RefreshOutcome {
        let operation = SessionOperation::Command {
            intent: intent.name(),
        };
        let command = command::build(&intent);

        match serde_json::to_value(&command) {
            Ok(body) => {
                debug!(intent = intent.name(), %body, "sending show command");
                if let Err(err) = self.transport.post_json(&self.endpoints.command, &body).await {
                    warn!(intent = intent.name(), error = %err, "show command failed");
                    self.record_error(operation, err.into()).await;
                }
            }
            Err(err) => {
                self.record_error(
                    operation,
                    ApiError::new(ErrorCode::Internal, format!("failed to encode command: {err}")),
                )
                .await;
            }
        }

        self.refresh().await
    }

    pub async fn start(&self) -> RefreshOutcome {
        self.send_command(Intent::Start).await
    }

    pub async fn stop(&self) -> RefreshOutcome {
        self.send_command(Intent::Stop).await
    }

    pub async fn resume(&self) -> RefreshOutcome {
        self.send_command(Intent::Resume).await
    }

    pub async fn select_show(&self, show: ShowId) -> RefreshOutcome {
        self.send_command(Intent::SelectShow(show)).await
    }

    /// Flips looping relative to the last confirmed status.
    pub async fn toggle_loop(&self) -> RefreshOutcome {
        let next = self.loop_next().await;
        self.send_command(Intent::ToggleLoop(next)).await
    }

    async fn record_error(&self, operation: SessionOperation, error: ApiError) {
        let record = ErrorRecord::new(operation, error);
        self.inner.lock().await.last_error = Some(record.clone());
        let _ = self.events.send(SessionEvent::Error(record));
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
