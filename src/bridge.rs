//! Bridge between async sync tasks and the synchronous event loop.
//!
//! The main loop stays synchronous; move synchronization runs on the tokio
//! runtime. Outcomes travel back over a std::sync::mpsc channel that the
//! main loop drains without blocking on each turn.

use crate::project::FileId;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

/// Outcomes posted by async tasks for the event loop to consume
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A tree move was persisted to the remote store
    MoveItemSuccess { source_id: FileId },
    /// Persisting a tree move failed; detail is logged, not carried
    MoveItemFail { source_id: FileId },
    /// A fork of a non-owned project was created
    ForkProjectSuccess,
    /// Creating the fork failed
    ForkProjectFail { message: String },
}

/// Channel pair delivering [`Notification`]s to the synchronous main loop
///
/// - Lightweight, cloneable sender that can be passed to async tasks
/// - Non-blocking receiver drained each turn of the main loop
#[derive(Clone)]
pub struct NotificationBridge {
    sender: mpsc::Sender<Notification>,
    // Receiver wrapped in Arc<Mutex<>> to allow cloning
    receiver: Arc<Mutex<mpsc::Receiver<Notification>>>,
}

impl NotificationBridge {
    /// Create a new bridge with an unbounded channel
    ///
    /// Unbounded is fine here: notifications are rare (one or two per move
    /// request) and the main loop drains the channel every turn.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    /// Get a cloneable sender for async tasks
    pub fn sender(&self) -> mpsc::Sender<Notification> {
        self.sender.clone()
    }

    /// Drain all pending notifications without blocking
    pub fn try_recv_all(&self) -> Vec<Notification> {
        let mut notifications = Vec::new();
        if let Ok(receiver) = self.receiver.lock() {
            while let Ok(notification) = receiver.try_recv() {
                notifications.push(notification);
            }
        }
        notifications
    }
}

impl Default for NotificationBridge {
    fn default() -> Self {
        Self::new()
    }
}
