use oauth2::AccessToken;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use subfeed_core::{CoreError, ListingQuery, PostRecord, RedditApiError, StatusSink};
use tracing::{debug, error, info};
use url::Url;

pub const POSTS_FETCHED: &str = "Posts fetched successfully";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListing<T> {
    #[serde(default)]
    pub kind: Option<String>,
    pub data: RedditListingData<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingData<T> {
    pub children: Vec<RedditListingChild<T>>,
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub dist: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingChild<T> {
    #[serde(default)]
    pub kind: Option<String>,
    pub data: T,
}

impl<T> RedditListing<T> {
    /// Child payloads in the order the service returned them.
    pub fn into_items(self) -> Vec<T> {
        self.data.children.into_iter().map(|child| child.data).collect()
    }
}

/// Parses a response body, turning an `error` field into a service error.
///
/// Reddit reports failures either as `{"error": "..."}` or as
/// `{"message": "Not Found", "error": 404}`; both land in
/// [`RedditApiError::ServiceError`].
pub(crate) fn decode_envelope(status: StatusCode, body: &str) -> Result<Value, RedditApiError> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) if status.is_success() => {
            return Err(RedditApiError::InvalidResponse {
                details: format!("body is not JSON: {}", e),
            });
        }
        Err(_) => {
            return Err(RedditApiError::RequestFailed {
                status_code: status.as_u16(),
            });
        }
    };

    if let Some(message) = service_error_message(&value) {
        return Err(RedditApiError::ServiceError {
            message,
            status_code: Some(status.as_u16()),
        });
    }

    if !status.is_success() {
        return Err(RedditApiError::RequestFailed {
            status_code: status.as_u16(),
        });
    }

    Ok(value)
}

fn service_error_message(value: &Value) -> Option<String> {
    let error = match value.get("error")? {
        Value::Null => return None,
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    match value.get("message").and_then(Value::as_str) {
        Some(message) => Some(format!("{} ({})", message, error)),
        None => Some(error),
    }
}

#[derive(Debug, Clone)]
pub struct ListingFetcher {
    http_client: Client,
    api_base: Url,
}

impl ListingFetcher {
    pub fn new(http_client: Client, api_base: Url) -> Self {
        Self {
            http_client,
            api_base,
        }
    }

    /// `{base}/r/{channel}/{sort}.json?limit={n}`, plus `&t=` for `top`.
    pub fn listing_url(&self, query: &ListingQuery) -> Result<Url, CoreError> {
        let channel = query.channel.trim();
        let channel = channel.strip_prefix("r/").unwrap_or(channel);
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| CoreError::InvalidInput {
                message: format!("API base {} cannot hold a path", self.api_base),
            })?
            .pop_if_empty()
            .push("r")
            .push(channel)
            .push(&format!("{}.json", query.sort.as_str()));

        url.query_pairs_mut()
            .append_pair("limit", &query.limit.to_string());
        if query.sort.uses_time_window() {
            if let Some(window) = query.time_window {
                url.query_pairs_mut().append_pair("t", window.as_str());
            }
        }
        Ok(url)
    }

    /// Retrieves one page of posts, preserving service order.
    pub async fn fetch(
        &self,
        access_token: &AccessToken,
        query: &ListingQuery,
        status: &dyn StatusSink,
    ) -> Result<Vec<PostRecord>, CoreError> {
        match self.request_listing(access_token, query).await {
            Ok(posts) => {
                status.info(POSTS_FETCHED);
                Ok(posts)
            }
            Err(e) => {
                error!("Listing request for r/{} failed: {}", query.channel, e);
                status.error(&format!("Error fetching posts: {}", e.detail()));
                Err(e)
            }
        }
    }

    async fn request_listing(
        &self,
        access_token: &AccessToken,
        query: &ListingQuery,
    ) -> Result<Vec<PostRecord>, CoreError> {
        let url = self.listing_url(query)?;
        info!("Making Reddit API request: GET {}", url.path());
        debug!("Listing query: {}", url.query().unwrap_or_default());

        let response = self
            .http_client
            .get(url)
            .bearer_auth(access_token.secret())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let value = decode_envelope(status, &body)?;

        let listing: RedditListing<PostRecord> = serde_json::from_value(value).map_err(|e| {
            error!("Failed to parse subreddit posts: {}", e);
            RedditApiError::InvalidResponse {
                details: format!("Failed to parse posts for r/{}", query.channel),
            }
        })?;

        let posts = listing.into_items();
        info!("Retrieved {} posts from r/{}", posts.len(), query.channel);
        Ok(posts)
    }
}
