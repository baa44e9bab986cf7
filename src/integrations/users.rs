//! Users port: role-based authorization.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Users port errors.
#[derive(Debug, Error)]
pub enum UsersError {
    #[error("Unauthorized.")]
    Unauthorized,

    #[error("Forbidden.")]
    Forbidden,

    #[error("Users service request failed: {0}")]
    Remote(String),
}

/// Authorization against the user service.
#[async_trait]
pub trait UsersPort: Send + Sync {
    /// Check that the token holder has one of the required roles.
    async fn authorize(&self, token: Option<&str>, roles: &[&str]) -> Result<(), UsersError>;
}

/// Users port over the user service HTTP API.
pub struct HttpUsersAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUsersAdapter {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Serialize)]
struct AuthorizeRequest<'a> {
    token: Option<&'a str>,
    roles: &'a [&'a str],
}

#[async_trait]
impl UsersPort for HttpUsersAdapter {
    async fn authorize(&self, token: Option<&str>, roles: &[&str]) -> Result<(), UsersError> {
        let url = format!("{}/authorize", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&AuthorizeRequest { token, roles })
            .send()
            .await
            .map_err(|e| UsersError::Remote(e.to_string()))?;

        match response.status() {
            reqwest::StatusCode::NO_CONTENT => Ok(()),
            reqwest::StatusCode::UNAUTHORIZED => Err(UsersError::Unauthorized),
            reqwest::StatusCode::FORBIDDEN => Err(UsersError::Forbidden),
            status => Err(UsersError::Remote(format!(
                "got status {status} from users service"
            ))),
        }
    }
}
