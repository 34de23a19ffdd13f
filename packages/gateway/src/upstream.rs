//! Clients for the jobs-listing API and the user-account API.

use dispatch_core::{AuthResponse, Job, LoginForm, RegisterForm, User};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GatewayConfig;

/// Upstream errors.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP client setup failed: {0}")]
    Client(String),
    #[error("request to {url} failed: {source}")]
    Transport { url: Url, source: reqwest::Error },
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("invalid response body: {0}")]
    Body(String),
}

/// Build the shared HTTP client with the configured timeout.
pub fn http_client(config: &GatewayConfig) -> Result<Client, UpstreamError> {
    Client::builder()
        .timeout(config.upstream_timeout)
        .build()
        .map_err(|e| UpstreamError::Client(e.to_string()))
}

/// Source of the job snapshot.
#[derive(Debug, Clone)]
pub struct JobsUpstream {
    client: Client,
    url: Url,
}

impl JobsUpstream {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    /// Fetch every job. Coordinates are returned exactly as the upstream sent them.
    pub async fn fetch_jobs(&self) -> Result<Vec<Job>, UpstreamError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let jobs: Vec<Job> = response
            .json()
            .await
            .map_err(|e| UpstreamError::Body(e.to_string()))?;
        tracing::debug!("Fetched {} jobs from {}", jobs.len(), self.url);
        Ok(jobs)
    }
}

/// Lenient view of whatever the user-account API returns.
#[derive(Debug, Default, Deserialize)]
struct AuthBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum AuthAction {
    Register,
    Login,
}

impl AuthAction {
    fn path(self) -> &'static str {
        match self {
            AuthAction::Register => "api/users/register",
            AuthAction::Login => "api/users/login",
        }
    }

    fn succeeded(self) -> &'static str {
        match self {
            AuthAction::Register => "Registration successful",
            AuthAction::Login => "Login successful",
        }
    }

    fn failed(self) -> &'static str {
        match self {
            AuthAction::Register => "Registration failed",
            AuthAction::Login => "Login failed",
        }
    }
}

/// Thin client over the external user-account API.
///
/// Never returns an error: every failure becomes an unsuccessful
/// [`AuthResponse`] carrying a message fit for the user.
#[derive(Debug, Clone)]
pub struct AuthUpstream {
    client: Client,
    base: Url,
}

impl AuthUpstream {
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    pub async fn register(&self, form: &RegisterForm) -> AuthResponse {
        self.submit(AuthAction::Register, form).await
    }

    pub async fn login(&self, form: &LoginForm) -> AuthResponse {
        self.submit(AuthAction::Login, form).await
    }

    async fn submit<B: Serialize>(&self, action: AuthAction, body: &B) -> AuthResponse {
        match self.try_submit(action, body).await {
            Ok(response) => response,
            Err(message) => {
                tracing::error!("{} error: {}", action.failed(), message);
                AuthResponse::failure(message)
            }
        }
    }

    async fn try_submit<B: Serialize>(
        &self,
        action: AuthAction,
        body: &B,
    ) -> Result<AuthResponse, String> {
        let url = self
            .endpoint(action)
            .map_err(|_| action.failed().to_string())?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Auth upstream unreachable: {}", e);
                action.failed().to_string()
            })?;

        let status = response.status();
        if !status.is_success() {
            let parsed: AuthBody = response.json().await.unwrap_or_default();
            return Err(parsed
                .message
                .unwrap_or_else(|| action.failed().to_string()));
        }

        let parsed: AuthBody = response.json().await.map_err(|e| {
            tracing::warn!("Auth upstream sent an unreadable body: {}", e);
            action.failed().to_string()
        })?;

        Ok(AuthResponse {
            success: true,
            message: parsed
                .message
                .unwrap_or_else(|| action.succeeded().to_string()),
            user: parsed.user,
            token: parsed.token,
        })
    }

    fn endpoint(&self, action: AuthAction) -> Result<Url, UpstreamError> {
        let mut base = self.base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(action.path())
            .map_err(|e| UpstreamError::Client(e.to_string()))
    }
}

/// Both upstream clients, built from one config.
#[derive(Debug, Clone)]
pub struct Upstreams {
    pub jobs: JobsUpstream,
    pub auth: AuthUpstream,
}

impl Upstreams {
    pub fn from_config(config: &GatewayConfig) -> Result<Self, UpstreamError> {
        let client = http_client(config)?;
        Ok(Self {
            jobs: JobsUpstream::new(client.clone(), config.jobs_api_url.clone()),
            auth: AuthUpstream::new(client, config.auth_api_url.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(base: &str) -> AuthUpstream {
        AuthUpstream::new(Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn endpoint_joins_under_base_path() {
        let plain = auth("http://localhost:3001");
        assert_eq!(
            plain.endpoint(AuthAction::Login).unwrap().as_str(),
            "http://localhost:3001/api/users/login"
        );

        let prefixed = auth("https://accounts.example.com/v1");
        assert_eq!(
            prefixed.endpoint(AuthAction::Register).unwrap().as_str(),
            "https://accounts.example.com/v1/api/users/register"
        );
    }
}
