/// Hosted identity service client
///
/// Speaks the auth-as-a-service user endpoint: the caller's bearer token plus
/// our service api key resolve to a user object, or a 401/403 when the
/// credential is invalid or expired.
use crate::{
    error::{AppError, AppResult},
    models::Principal,
    services::providers::IdentityProvider,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ApiUser {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Clone)]
pub struct RestIdentityProvider {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
}

impl RestIdentityProvider {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key,
            base_url,
        })
    }
}

#[async_trait::async_trait]
impl IdentityProvider for RestIdentityProvider {
    async fn verify_token(&self, bearer_token: &str) -> AppResult<Option<Principal>> {
        let url = format!("{}/user", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(bearer_token)
            .send()
            .await?;

        // Credential rejection is a definitive answer, not an upstream fault.
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            tracing::debug!(provider = "identity", "Token rejected");
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(
                "Identity service error",
                format!("status {}: {}", status, body),
            ));
        }

        let user: ApiUser = response.json().await?;
        match user.id {
            Some(id) if !id.is_empty() => {
                tracing::debug!(user_id = %id, provider = "identity", "Token verified");
                Ok(Some(Principal { id }))
            }
            _ => Ok(None),
        }
    }
}
