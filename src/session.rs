//! Shared session state: project identity snapshots, the anonymous-token
//! credential store and the injected navigation capability.

use crate::project::{ProjectId, ProjectItem};
use std::sync::{Arc, RwLock};

/// Identity of the project currently open in the session
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInfo {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
}

/// Read-only snapshot of session state taken when a move request is
/// dispatched. Later session mutations do not affect an in-flight sync.
#[derive(Debug, Clone)]
pub struct MoveSnapshot {
    pub project: ProjectInfo,
    /// Whether the current user owns the project; a move on a non-owned
    /// project forks instead of updating
    pub is_own_project: bool,
    /// The explorer tree with the move already applied
    pub tree: ProjectItem,
}

/// Shared store for the anonymous access token issued on project creation.
///
/// Cloning shares the underlying cell: the synchronizer installs a token on
/// fork success and the HTTP service reads it back as a bearer credential.
#[derive(Clone, Default)]
pub struct AnonymousTokenStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl AnonymousTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a token, replacing any previous one
    pub fn install(&self, token: String) {
        if let Ok(mut slot) = self.inner.write() {
            tracing::debug!("installed anonymous project token");
            *slot = Some(token);
        }
    }

    /// The currently installed token, if any
    pub fn current(&self) -> Option<String> {
        self.inner.read().ok()?.clone()
    }

    /// Drop the installed token
    pub fn clear(&self) {
        if let Ok(mut slot) = self.inner.write() {
            *slot = None;
        }
    }
}

/// Injected navigation capability.
///
/// The synchronizer redirects to a freshly forked project through this trait
/// so the core stays testable without a browsing context.
pub trait Navigator: Send + Sync {
    /// Navigate the client to the project with the given id
    fn open_project(&self, id: &ProjectId);
}
