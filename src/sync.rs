//! Synchronization of file-tree moves with the remote project store.
//!
//! A move has already been applied to the in-memory tree by the time it
//! reaches this module; what remains is persisting it. For a project the
//! user owns that is a plain update. For a shared project the store is
//! instead asked to create a fork carrying the mutated tree, after which the
//! client navigates to the fork.
//!
//! At most one sync is in flight per synchronizer: dispatching while a
//! previous request is still running aborts it and its outcome is discarded
//! (latest request wins). Outcomes are posted as [`Notification`]s on the
//! bridge; a failed sync never stops the event stream.

use crate::bridge::Notification;
use crate::project::FileId;
use crate::services::{ProjectService, ProjectUpdate};
use crate::session::{AnonymousTokenStore, MoveSnapshot, Navigator};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A tree move to reconcile with the remote store
#[derive(Debug, Clone)]
pub struct MoveRequest {
    /// Id of the item that was moved
    pub source_id: FileId,
    /// Session state captured when the move was dispatched
    pub snapshot: MoveSnapshot,
}

/// Supervisor for move persistence tasks
pub struct MoveSynchronizer {
    service: Arc<dyn ProjectService>,
    tokens: AnonymousTokenStore,
    navigator: Arc<dyn Navigator>,
    notifications: Sender<Notification>,
    in_flight: Option<JoinHandle<()>>,
}

impl MoveSynchronizer {
    pub fn new(
        service: Arc<dyn ProjectService>,
        tokens: AnonymousTokenStore,
        navigator: Arc<dyn Navigator>,
        notifications: Sender<Notification>,
    ) -> Self {
        Self {
            service,
            tokens,
            navigator,
            notifications,
            in_flight: None,
        }
    }

    /// Start syncing a move, cancelling any sync still in flight.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, request: MoveRequest) {
        if let Some(previous) = self.in_flight.take() {
            if !previous.is_finished() {
                tracing::debug!("cancelling in-flight move sync");
            }
            previous.abort();
        }

        let service = Arc::clone(&self.service);
        let tokens = self.tokens.clone();
        let navigator = Arc::clone(&self.navigator);
        let notifications = self.notifications.clone();
        self.in_flight = Some(tokio::spawn(async move {
            run_sync(service, tokens, navigator, notifications, request).await;
        }));
    }

    /// Whether no sync is currently running
    pub fn is_idle(&self) -> bool {
        self.in_flight
            .as_ref()
            .map_or(true, |handle| handle.is_finished())
    }
}

async fn run_sync(
    service: Arc<dyn ProjectService>,
    tokens: AnonymousTokenStore,
    navigator: Arc<dyn Navigator>,
    notifications: Sender<Notification>,
    request: MoveRequest,
) {
    let MoveRequest {
        source_id,
        snapshot,
    } = request;
    let update = ProjectUpdate {
        name: snapshot.project.name.clone(),
        description: snapshot.project.description.clone(),
        files: snapshot.tree,
    };

    if snapshot.is_own_project {
        tracing::info!(project = %snapshot.project.id, "persisting moved item");
        match service.update_project(&snapshot.project.id, &update).await {
            Ok(()) => {
                let _ = notifications.send(Notification::MoveItemSuccess { source_id });
            }
            Err(error) => {
                // Detail stays in the log; the pane-facing event carries none.
                tracing::warn!(%error, project = %snapshot.project.id, "project update failed");
                let _ = notifications.send(Notification::MoveItemFail { source_id });
            }
        }
    } else {
        tracing::info!(project = %snapshot.project.id, "forking project to persist move");
        match service.create_project(&update).await {
            Ok(created) => {
                if let Some(token) = created.anonymous_token {
                    tokens.install(token);
                }
                navigator.open_project(&created.id);
                let _ = notifications.send(Notification::MoveItemSuccess { source_id });
                let _ = notifications.send(Notification::ForkProjectSuccess);
            }
            Err(error) => {
                tracing::warn!(%error, "forking the project failed");
                let _ = notifications.send(Notification::ForkProjectFail {
                    message: error.to_string(),
                });
            }
        }
    }
}
