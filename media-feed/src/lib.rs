pub mod classify;
pub mod render;

pub use classify::{classify, classify_all, ClassifiedItem, MediaKind, MediaSource};
pub use render::{
    truncate_title, FeedRenderer, Hyperlink, LinkRow, MediaCard, MediaElement, PlaybackOptions,
    RenderedFeed,
};
