use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Reddit API error: {0}")]
    RedditApi(#[from] RedditApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl CoreError {
    /// The underlying message without the category prefix, for status lines.
    pub fn detail(&self) -> String {
        match self {
            CoreError::RedditApi(RedditApiError::AuthenticationFailed { reason }) => reason.clone(),
            CoreError::RedditApi(e) => e.to_string(),
            CoreError::Config(e) => e.to_string(),
            CoreError::Network(e) => e.to_string(),
            CoreError::InvalidInput { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RedditApiError {
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    /// The service answered with an `error` field in its JSON body.
    #[error("{message}")]
    ServiceError {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Invalid API response: {details}")]
    InvalidResponse { details: String },

    #[error("Request failed with status {status_code}")]
    RequestFailed { status_code: u16 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
