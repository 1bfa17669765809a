#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use media_feed::RenderedFeed;
use subfeed_core::AppConfig;
use viewer::{RenderParameters, UiPort, Viewer};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq)]
pub enum PortCall {
    Cleared,
    Feed(RenderedFeed),
    Layout(RenderParameters),
    TimeFilter(bool),
}

#[derive(Default)]
pub struct RecordingPort {
    calls: Mutex<Vec<PortCall>>,
}

impl RecordingPort {
    pub fn calls(&self) -> Vec<PortCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn feeds(&self) -> Vec<RenderedFeed> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PortCall::Feed(feed) => Some(feed),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: PortCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl UiPort for RecordingPort {
    fn clear_feed(&self) {
        self.push(PortCall::Cleared);
    }

    fn show_feed(&self, feed: &RenderedFeed) {
        self.push(PortCall::Feed(feed.clone()));
    }

    fn apply_layout(&self, params: &RenderParameters) {
        self.push(PortCall::Layout(*params));
    }

    fn set_time_filter_visible(&self, visible: bool) {
        self.push(PortCall::TimeFilter(visible));
    }
}

pub fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.reddit.token_url = format!("{}/api/v1/access_token", server.uri());
    config.reddit.api_base = server.uri();
    config
}

pub fn viewer_for(config: &AppConfig) -> (Arc<Viewer>, Arc<RecordingPort>) {
    let port = Arc::new(RecordingPort::default());
    let viewer = Viewer::from_config(config, port.clone()).expect("viewer");
    (Arc::new(viewer), port)
}

pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok",
            "token_type": "bearer",
            "expires_in": 86400
        })))
        .mount(server)
        .await;
}

pub fn listing(posts: &[(&str, &str, &str)]) -> serde_json::Value {
    let children: Vec<_> = posts
        .iter()
        .map(|(title, url, permalink)| {
            serde_json::json!({
                "kind": "t3",
                "data": {"title": title, "url": url, "permalink": permalink}
            })
        })
        .collect();
    serde_json::json!({"kind": "Listing", "data": {"children": children}})
}
