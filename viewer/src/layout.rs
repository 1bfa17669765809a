use serde::Serialize;
use subfeed_core::{LayoutConfig, LayoutMode};

/// What the presentation layer needs to lay out rendered items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderParameters {
    pub mode: LayoutMode,
    pub columns: u32,
    pub thumbnail_size_px: u32,
}

impl RenderParameters {
    pub fn class_name(&self) -> &'static str {
        self.mode.as_str()
    }

    /// CSS custom properties for the feed container.
    pub fn custom_properties(&self) -> Vec<(&'static str, String)> {
        vec![
            ("--columns", self.columns.to_string()),
            ("--thumbnail-size", format!("{}px", self.thumbnail_size_px)),
        ]
    }
}

/// Pure mapping from widget state to render parameters.
pub struct LayoutController;

impl LayoutController {
    pub fn apply(config: &LayoutConfig) -> RenderParameters {
        RenderParameters {
            mode: config.mode,
            columns: config.columns.max(1),
            thumbnail_size_px: config.thumbnail_size_px,
        }
    }
}
