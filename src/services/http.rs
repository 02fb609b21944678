//! HTTP client for the remote project store.
//!
//! ureq is blocking, so the async trait methods hop onto tokio's blocking
//! pool. The anonymous token (when one is installed) rides along as a bearer
//! credential on every request.

use super::{CreatedProject, ProjectService, ProjectUpdate, ServiceError};
use crate::config::RemoteConfig;
use crate::project::ProjectId;
use crate::session::AnonymousTokenStore;
use async_trait::async_trait;
use std::time::Duration;

/// Project store client speaking JSON over HTTP
#[derive(Clone)]
pub struct HttpProjectService {
    base_url: String,
    timeout: Duration,
    tokens: AnonymousTokenStore,
}

impl HttpProjectService {
    pub fn new(config: &RemoteConfig, tokens: AnonymousTokenStore) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.request_timeout_secs),
            tokens,
        }
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        let mut request = ureq::request(method, url)
            .set("Content-Type", "application/json")
            .timeout(self.timeout);
        if let Some(token) = self.tokens.current() {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        request
    }

    fn update_blocking(&self, id: &ProjectId, body: &str) -> Result<(), ServiceError> {
        let url = format!("{}/projects/{}", self.base_url, id);
        tracing::debug!(%url, "updating project");
        self.request("PUT", &url)
            .send_string(body)
            .map_err(map_ureq_error)?;
        Ok(())
    }

    fn create_blocking(&self, body: &str) -> Result<CreatedProject, ServiceError> {
        let url = format!("{}/projects", self.base_url);
        tracing::debug!(%url, "creating project");
        let response = self
            .request("POST", &url)
            .send_string(body)
            .map_err(map_ureq_error)?;
        let text = response
            .into_string()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

fn map_ureq_error(error: ureq::Error) -> ServiceError {
    match error {
        ureq::Error::Status(code, response) => ServiceError::Status {
            code,
            message: response.into_string().unwrap_or_default(),
        },
        other => ServiceError::Transport(other.to_string()),
    }
}

#[async_trait]
impl ProjectService for HttpProjectService {
    async fn update_project(
        &self,
        id: &ProjectId,
        update: &ProjectUpdate,
    ) -> Result<(), ServiceError> {
        let body =
            serde_json::to_string(update).map_err(|e| ServiceError::Transport(e.to_string()))?;
        let service = self.clone();
        let id = id.clone();
        tokio::task::spawn_blocking(move || service.update_blocking(&id, &body))
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?
    }

    async fn create_project(&self, update: &ProjectUpdate) -> Result<CreatedProject, ServiceError> {
        let body =
            serde_json::to_string(update).map_err(|e| ServiceError::Transport(e.to_string()))?;
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.create_blocking(&body))
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?
    }
}
