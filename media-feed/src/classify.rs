//! Decides whether a post links to an image, a video, or something else.
//!
//! Rules are checked in order and the first match wins:
//!
//! 1. A url ending in `.gifv` is rewritten to `.mp4`.
//! 2. Video hosts (`redgifs.com`, `v.redd.it`) or a path ending in `.mp4` give a video.
//! 3. The image host `i.redd.it` gives an image.
//! 4. Everything else, including urls that do not parse, is a plain link.

use serde::Serialize;
use subfeed_core::PostRecord;
use tracing::trace;
use url::Url;

pub const ANIMATED_IMAGE_EXT: &str = ".gifv";
pub const VIDEO_EXT: &str = ".mp4";

const VIDEO_HOSTS: &[&str] = &["redgifs.com", "v.redd.it"];
const IMAGE_HOSTS: &[&str] = &["i.redd.it"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// A displayable resource and the post it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    /// Url to load, after normalization.
    pub src: String,
    pub title: String,
    /// The post's url as received.
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedItem {
    Image(MediaSource),
    Video(MediaSource),
    NonMedia { permalink: String, url: String },
}

impl ClassifiedItem {
    pub fn media_kind(&self) -> Option<MediaKind> {
        match self {
            ClassifiedItem::Image(_) => Some(MediaKind::Image),
            ClassifiedItem::Video(_) => Some(MediaKind::Video),
            ClassifiedItem::NonMedia { .. } => None,
        }
    }
}

pub fn classify(post: &PostRecord) -> ClassifiedItem {
    let src = normalize(&post.url);
    let item = match media_kind(&src) {
        Some(kind) => {
            let source = MediaSource {
                src,
                title: post.title.clone(),
                link: post.url.clone(),
            };
            match kind {
                MediaKind::Video => ClassifiedItem::Video(source),
                MediaKind::Image => ClassifiedItem::Image(source),
            }
        }
        None => ClassifiedItem::NonMedia {
            permalink: post.permalink.clone(),
            url: post.url.clone(),
        },
    };
    trace!("Classified {} as {:?}", post.url, item.media_kind());
    item
}

pub fn classify_all(posts: &[PostRecord]) -> Vec<ClassifiedItem> {
    posts.iter().map(classify).collect()
}

fn normalize(url: &str) -> String {
    match url.strip_suffix(ANIMATED_IMAGE_EXT) {
        Some(stem) => format!("{}{}", stem, VIDEO_EXT),
        None => url.to_string(),
    }
}

fn media_kind(url: &str) -> Option<MediaKind> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;

    if VIDEO_HOSTS.iter().any(|domain| host_matches(host, domain))
        || parsed.path().ends_with(VIDEO_EXT)
    {
        Some(MediaKind::Video)
    } else if IMAGE_HOSTS.iter().any(|domain| host_matches(host, domain)) {
        Some(MediaKind::Image)
    } else {
        None
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
