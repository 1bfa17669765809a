//! Client-credentials exchange against the Reddit token endpoint.

use crate::api::decode_envelope;
use oauth2::{AccessToken, ClientId, ClientSecret};
use reqwest::Client;
use serde::Deserialize;
use subfeed_core::{CoreError, RedditApiError, StatusSink};
use tracing::{debug, error, info};
use url::Url;

pub const FETCHING_TOKEN: &str = "Fetching access token...";
pub const TOKEN_RETRIEVED: &str = "Access token retrieved";

/// Application credentials, supplied per request and never stored.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: ClientId::new(client_id.into()),
            client_secret: ClientSecret::new(client_secret.into()),
        }
    }

    /// Trims both halves and returns `None` if either is blank.
    pub fn from_inputs(client_id: &str, client_secret: &str) -> Option<Self> {
        let client_id = client_id.trim();
        let client_secret = client_secret.trim();
        if client_id.is_empty() || client_secret.is_empty() {
            return None;
        }
        Some(Self::new(client_id, client_secret))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct CredentialExchanger {
    http_client: Client,
    token_url: Url,
}

impl CredentialExchanger {
    pub fn new(http_client: Client, token_url: Url) -> Self {
        Self {
            http_client,
            token_url,
        }
    }

    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Trades the credentials for a bearer token. One request, no retry.
    pub async fn exchange(
        &self,
        credentials: &Credentials,
        status: &dyn StatusSink,
    ) -> Result<AccessToken, CoreError> {
        status.info(FETCHING_TOKEN);
        match self.request_token(credentials).await {
            Ok(token) => {
                status.info(TOKEN_RETRIEVED);
                Ok(token)
            }
            Err(e) => {
                error!("Token exchange failed: {}", e);
                status.error(&format!("Error getting access token: {}", e.detail()));
                Err(e)
            }
        }
    }

    async fn request_token(&self, credentials: &Credentials) -> Result<AccessToken, CoreError> {
        info!("Requesting access token for client {}", credentials.client_id.as_str());
        let response = self
            .http_client
            .post(self.token_url.clone())
            .basic_auth(
                credentials.client_id.as_str(),
                Some(credentials.client_secret.secret()),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let value = decode_envelope(status, &body).map_err(|e| match e {
            RedditApiError::ServiceError { message, .. } => {
                RedditApiError::AuthenticationFailed { reason: message }
            }
            other => other,
        })?;

        let token: TokenResponse = serde_json::from_value(value).map_err(|e| {
            error!("Failed to parse token response: {}", e);
            RedditApiError::InvalidResponse {
                details: "token response has no access_token".to_string(),
            }
        })?;

        debug!(
            "Received {} token, expires in {:?}s",
            token.token_type.as_deref().unwrap_or("unknown"),
            token.expires_in
        );
        Ok(AccessToken::new(token.access_token))
    }
}
