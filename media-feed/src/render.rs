use crate::classify::{classify_all, ClassifiedItem, MediaKind, MediaSource};
use serde::Serialize;
use subfeed_core::PostRecord;
use tracing::debug;

pub const TITLE_MAX_CHARS: usize = 100;
pub const VIDEO_MIME_TYPE: &str = "video/mp4";

/// How a video element should behave: a looping, muted, inline clip that
/// still shows its controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackOptions {
    pub autoplay: bool,
    pub looped: bool,
    pub muted: bool,
    pub plays_inline: bool,
    pub controls: bool,
    pub mime_type: &'static str,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            autoplay: true,
            looped: true,
            muted: true,
            plays_inline: true,
            controls: true,
            mime_type: VIDEO_MIME_TYPE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaElement {
    pub kind: MediaKind,
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playback: Option<PlaybackOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaCard {
    pub media: MediaElement,
    pub title: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hyperlink {
    pub href: String,
    pub label: String,
    pub new_context: bool,
}

impl Hyperlink {
    fn external(href: String, label: String) -> Self {
        Self {
            href,
            label,
            new_context: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRow {
    pub permalink: Hyperlink,
    pub url: Hyperlink,
}

/// Output of one render pass. Each render produces a fresh value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedFeed {
    pub cards: Vec<MediaCard>,
    pub links: Vec<LinkRow>,
}

impl RenderedFeed {
    pub fn len(&self) -> usize {
        self.cards.len() + self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.links.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FeedRenderer {
    web_base: String,
}

impl FeedRenderer {
    pub fn new(web_base: impl Into<String>) -> Self {
        let web_base = web_base.into();
        Self {
            web_base: web_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn render(&self, items: &[ClassifiedItem]) -> RenderedFeed {
        let mut feed = RenderedFeed::default();
        for item in items {
            match item {
                ClassifiedItem::Image(source) => {
                    feed.cards.push(media_card(MediaKind::Image, source));
                }
                ClassifiedItem::Video(source) => {
                    feed.cards.push(media_card(MediaKind::Video, source));
                }
                ClassifiedItem::NonMedia { permalink, url } => {
                    feed.links.push(self.link_row(permalink, url));
                }
            }
        }
        debug!(
            "Rendered {} media cards and {} links",
            feed.cards.len(),
            feed.links.len()
        );
        feed
    }

    /// Classifies and renders in one step.
    pub fn render_posts(&self, posts: &[PostRecord]) -> RenderedFeed {
        self.render(&classify_all(posts))
    }

    pub fn permalink_url(&self, permalink: &str) -> String {
        if permalink.starts_with('/') {
            format!("{}{}", self.web_base, permalink)
        } else {
            format!("{}/{}", self.web_base, permalink)
        }
    }

    fn link_row(&self, permalink: &str, url: &str) -> LinkRow {
        LinkRow {
            permalink: Hyperlink::external(self.permalink_url(permalink), permalink.to_string()),
            url: Hyperlink::external(url.to_string(), url.to_string()),
        }
    }
}

fn media_card(kind: MediaKind, source: &MediaSource) -> MediaCard {
    let media = match kind {
        MediaKind::Image => MediaElement {
            kind,
            src: source.src.clone(),
            alt: Some(source.title.clone()),
            playback: None,
        },
        MediaKind::Video => MediaElement {
            kind,
            src: source.src.clone(),
            alt: None,
            playback: Some(PlaybackOptions::default()),
        },
    };
    MediaCard {
        media,
        title: truncate_title(&source.title),
        link: source.link.clone(),
    }
}

/// First [`TITLE_MAX_CHARS`] characters of `title`.
pub fn truncate_title(title: &str) -> String {
    title.chars().take(TITLE_MAX_CHARS).collect()
}
