pub mod api;
pub mod auth;


pub use api::{ListingFetcher, RedditListing, RedditListingChild, RedditListingData};
pub use auth::{CredentialExchanger, Credentials};
pub use oauth2::AccessToken;

use reqwest::Client;
use subfeed_core::{ConfigError, CoreError, ListingQuery, PostRecord, RedditSettings, StatusSink};
use tracing::debug;
use url::Url;

/// Token exchange and listing retrieval sharing one HTTP client.
#[derive(Debug, Clone)]
pub struct RedditClient {
    exchanger: CredentialExchanger,
    fetcher: ListingFetcher,
}

impl RedditClient {
    pub fn new(settings: &RedditSettings) -> Result<Self, CoreError> {
        let token_url = parse_setting("token_url", &settings.token_url)?;
        let api_base = parse_setting("api_base", &settings.api_base)?;

        let mut builder = Client::builder().user_agent(&settings.user_agent);
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;
        debug!("Reddit client ready: token {}, api {}", token_url, api_base);

        Ok(Self {
            exchanger: CredentialExchanger::new(http_client.clone(), token_url),
            fetcher: ListingFetcher::new(http_client, api_base),
        })
    }

    pub async fn authenticate(
        &self,
        credentials: &Credentials,
        status: &dyn StatusSink,
    ) -> Result<AccessToken, CoreError> {
        self.exchanger.exchange(credentials, status).await
    }

    pub async fn fetch_posts(
        &self,
        access_token: &AccessToken,
        query: &ListingQuery,
        status: &dyn StatusSink,
    ) -> Result<Vec<PostRecord>, CoreError> {
        self.fetcher.fetch(access_token, query, status).await
    }

    pub fn exchanger(&self) -> &CredentialExchanger {
        &self.exchanger
    }

    pub fn fetcher(&self) -> &ListingFetcher {
        &self.fetcher
    }
}

fn parse_setting(field: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}
