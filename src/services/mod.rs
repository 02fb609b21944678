//! Remote project store contract.
//!
//! [`ProjectService`] is the seam the move synchronizer talks through; the
//! one production implementation is [`http::HttpProjectService`]. Tests
//! substitute scripted doubles.

pub mod http;

pub use http::HttpProjectService;

use crate::project::{ProjectId, ProjectItem};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Payload for both project update and project creation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectUpdate {
    pub name: String,
    pub description: String,
    /// The full explorer tree to persist
    pub files: ProjectItem,
}

/// Response to a successful project creation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProject {
    pub id: ProjectId,
    /// Credential allowing continued edit access without prior
    /// authentication, issued for anonymous creators
    #[serde(default)]
    pub anonymous_token: Option<String>,
}

/// Project store failure
#[derive(Debug)]
pub enum ServiceError {
    /// The request never completed (connection, TLS, timeout)
    Transport(String),
    /// The store answered with a non-success status
    Status { code: u16, message: String },
    /// The store answered with a body this client cannot decode
    Decode(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Transport(msg) => write!(f, "transport error: {msg}"),
            ServiceError::Status { code, message } => {
                write!(f, "server returned {code}: {message}")
            }
            ServiceError::Decode(msg) => write!(f, "invalid response: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Persistence operations the workspace core needs from the project store
#[async_trait]
pub trait ProjectService: Send + Sync {
    /// Overwrite an existing project's name, description and tree
    async fn update_project(
        &self,
        id: &ProjectId,
        update: &ProjectUpdate,
    ) -> Result<(), ServiceError>;

    /// Create a new project from the given payload
    async fn create_project(&self, update: &ProjectUpdate) -> Result<CreatedProject, ServiceError>;
}
