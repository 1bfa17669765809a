use crate::events::UiEvent;
use crate::selection::SelectionState;
use reddit_client::Credentials;
use subfeed_core::{
    parse_limit, AppConfig, CoreError, LayoutConfig, ListingQuery, MISSING_CHANNEL,
    MISSING_CREDENTIALS,
};

/// Raw text of the input widgets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedInputs {
    pub client_id: String,
    pub client_secret: String,
    pub channel: String,
    pub limit: String,
}

/// Everything one pipeline run needs, read at trigger time.
#[derive(Debug, Clone)]
pub struct FeedRequest {
    pub credentials: Credentials,
    pub query: ListingQuery,
}

/// Widget state for one viewer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub inputs: FeedInputs,
    pub selection: SelectionState,
    pub columns: u32,
    pub thumbnail_size_px: u32,
}

impl Default for Session {
    fn default() -> Self {
        let layout = LayoutConfig::default();
        Self {
            inputs: FeedInputs {
                limit: subfeed_core::DEFAULT_LIMIT.to_string(),
                ..FeedInputs::default()
            },
            selection: SelectionState::default(),
            columns: layout.columns,
            thumbnail_size_px: layout.thumbnail_size_px,
        }
    }
}

impl Session {
    pub fn from_config(config: &AppConfig) -> Self {
        let mut session = Self {
            inputs: FeedInputs {
                client_id: config.reddit.client_id.clone().unwrap_or_default(),
                client_secret: config.reddit.client_secret.clone().unwrap_or_default(),
                channel: config.feed.channel.clone().unwrap_or_default(),
                limit: config.feed.limit.clone(),
            },
            columns: config.feed.columns,
            thumbnail_size_px: config.feed.thumbnail_size,
            ..Self::default()
        };
        if let Some(window) = config.feed.time_window {
            session.selection.select_time(window);
        }
        session.selection.select_sort(config.feed.sort);
        session.selection.select_layout(config.feed.layout);
        session
    }

    /// Applies the state change carried by `event`.
    pub fn apply(&mut self, event: &UiEvent) {
        match event {
            UiEvent::SortClicked(sort) => self.selection.select_sort(*sort),
            UiEvent::TimeClicked(window) => self.selection.select_time(*window),
            UiEvent::LayoutClicked(layout) => self.selection.select_layout(*layout),
            UiEvent::ColumnsChanged(columns) => self.columns = *columns,
            UiEvent::ThumbnailSizeChanged(size) => self.thumbnail_size_px = *size,
            UiEvent::ClientIdChanged(value) => self.inputs.client_id = value.clone(),
            UiEvent::ClientSecretChanged(value) => self.inputs.client_secret = value.clone(),
            UiEvent::ChannelChanged(value) => self.inputs.channel = value.clone(),
            UiEvent::LimitChanged(value) => self.inputs.limit = value.clone(),
            UiEvent::RefreshRequested => {}
        }
    }

    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            mode: self.selection.layout(),
            columns: self.columns,
            thumbnail_size_px: self.thumbnail_size_px,
        }
    }

    /// Validates the inputs. Credentials are checked before the channel.
    pub fn feed_request(&self) -> Result<FeedRequest, CoreError> {
        let credentials =
            Credentials::from_inputs(&self.inputs.client_id, &self.inputs.client_secret)
                .ok_or_else(|| CoreError::InvalidInput {
                    message: MISSING_CREDENTIALS.to_string(),
                })?;

        let channel = self.inputs.channel.trim();
        if channel.is_empty() {
            return Err(CoreError::InvalidInput {
                message: MISSING_CHANNEL.to_string(),
            });
        }

        let query = ListingQuery::new(
            channel,
            self.selection.sort(),
            parse_limit(&self.inputs.limit) as i64,
            self.selection.query_time_window(),
        );
        Ok(FeedRequest { credentials, query })
    }
}
