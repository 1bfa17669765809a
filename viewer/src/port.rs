use crate::layout::RenderParameters;
use media_feed::RenderedFeed;

/// The presentation layer the viewer drives.
pub trait UiPort: Send + Sync {
    /// Drops everything shown by the previous render.
    fn clear_feed(&self);

    fn show_feed(&self, feed: &RenderedFeed);

    fn apply_layout(&self, params: &RenderParameters);

    fn set_time_filter_visible(&self, visible: bool);
}
