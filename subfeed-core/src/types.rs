use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_LIMIT: u32 = 5;
pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 100;

/// Ordering requested from the listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Best,
    Hot,
    New,
    Top,
    Rising,
}

impl SortMode {
    pub const ALL: [SortMode; 5] = [
        SortMode::Best,
        SortMode::Hot,
        SortMode::New,
        SortMode::Top,
        SortMode::Rising,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Best => "best",
            SortMode::Hot => "hot",
            SortMode::New => "new",
            SortMode::Top => "top",
            SortMode::Rising => "rising",
        }
    }

    /// Only the `top` listing accepts a time window.
    pub fn uses_time_window(&self) -> bool {
        matches!(self, SortMode::Top)
    }
}

/// Recency filter for the `top` sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 6] = [
        TimeWindow::Hour,
        TimeWindow::Day,
        TimeWindow::Week,
        TimeWindow::Month,
        TimeWindow::Year,
        TimeWindow::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Grid,
    List,
}

impl LayoutMode {
    pub const ALL: [LayoutMode; 2] = [LayoutMode::Grid, LayoutMode::List];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Grid => "grid",
            LayoutMode::List => "list",
        }
    }
}

macro_rules! impl_named_enum {
    ($ty:ty, $field:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                <$ty>::ALL
                    .into_iter()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| ConfigError::InvalidValue {
                        field: $field.to_string(),
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl_named_enum!(SortMode, "sort");
impl_named_enum!(TimeWindow, "time_window");
impl_named_enum!(LayoutMode, "layout");

/// One page request against a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub channel: String,
    pub sort: SortMode,
    pub limit: u32,
    pub time_window: Option<TimeWindow>,
}

impl ListingQuery {
    /// Builds a query, clamping `limit` into `[MIN_LIMIT, MAX_LIMIT]`.
    ///
    /// The time window is kept only for sorts that use one.
    pub fn new(
        channel: impl Into<String>,
        sort: SortMode,
        limit: i64,
        time_window: Option<TimeWindow>,
    ) -> Self {
        Self {
            channel: channel.into(),
            sort,
            limit: clamp_limit(limit),
            time_window: time_window.filter(|_| sort.uses_time_window()),
        }
    }
}

pub fn clamp_limit(raw: i64) -> u32 {
    raw.clamp(MIN_LIMIT as i64, MAX_LIMIT as i64) as u32
}

/// Reads a limit typed by the user.
///
/// Leading whitespace and an optional sign are accepted, then digits up to the
/// first non-digit. Input without digits falls back to [`DEFAULT_LIMIT`]. The
/// result is clamped into `[MIN_LIMIT, MAX_LIMIT]`.
pub fn parse_limit(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = unsigned
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return DEFAULT_LIMIT;
    }

    let magnitude = unsigned[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    clamp_limit(if negative { -magnitude } else { magnitude })
}

/// Minimal projection of a listing child; other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub permalink: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub mode: LayoutMode,
    pub columns: u32,
    pub thumbnail_size_px: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Grid,
            columns: 3,
            thumbnail_size_px: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusState {
    pub message: String,
    pub is_error: bool,
}

impl StatusState {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}
