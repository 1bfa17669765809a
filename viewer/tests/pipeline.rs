mod common;

use std::time::Duration;

use common::{config_for, listing, mount_token, viewer_for, PortCall};
use pretty_assertions::assert_eq;
use subfeed_core::{LayoutMode, SortMode, TimeWindow, MISSING_CHANNEL, MISSING_CREDENTIALS};
use viewer::{PipelineFailure, PipelineOutcome, UiEvent};
use wiremock::matchers::{basic_auth, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn missing_credentials_short_circuit_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (viewer, port) = viewer_for(&config_for(&server));
    let outcome = viewer
        .handle(UiEvent::ChannelChanged("pics".into()))
        .await
        .expect("fetch triggered");

    assert!(matches!(
        outcome,
        PipelineOutcome::Failed {
            failure: PipelineFailure::InvalidInput(_),
            ..
        }
    ));
    let status = viewer.status().current();
    assert!(status.is_error);
    assert_eq!(status.message, MISSING_CREDENTIALS);
    assert_eq!(port.calls(), vec![PortCall::Cleared]);
    assert!(port.feeds().is_empty());
}

#[tokio::test]
async fn missing_channel_short_circuit_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.reddit.client_id = Some("id".into());
    config.reddit.client_secret = Some("secret".into());
    let (viewer, _port) = viewer_for(&config);

    viewer.refresh().await.expect("fetch triggered");
    assert_eq!(viewer.status().current().message, MISSING_CHANNEL);
}

#[tokio::test]
async fn successful_run_renders_every_post() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/r/pics/top.json"))
        .and(query_param("limit", "3"))
        .and(query_param("t", "day"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(&[
            ("a", "https://i.redd.it/a.png", "/r/pics/comments/a/"),
            ("b", "https://example.com/b", "/r/pics/comments/b/"),
            ("c", "https://i.imgur.com/c.gifv", "/r/pics/comments/c/"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.reddit.client_id = Some("id".into());
    config.reddit.client_secret = Some("secret".into());
    config.feed.channel = Some("pics".into());
    config.feed.limit = "3".into();
    let (viewer, port) = viewer_for(&config);

    let outcome = viewer
        .handle(UiEvent::SortClicked(SortMode::Top))
        .await
        .expect("fetch triggered");

    let feed = outcome.feed().expect("rendered");
    assert_eq!(feed.len(), 3);
    assert_eq!(feed.cards.len(), 2);
    assert_eq!(feed.links.len(), 1);
    assert_eq!(feed.cards[1].media.src, "https://i.imgur.com/c.mp4");
    assert_eq!(
        feed.links[0].permalink.href,
        "https://reddit.com/r/pics/comments/b/"
    );

    let status = viewer.status().current();
    assert!(!status.is_error);
    assert_eq!(status.message, "Posts fetched successfully");

    assert_eq!(
        port.calls()[..2].to_vec(),
        vec![PortCall::TimeFilter(true), PortCall::Cleared]
    );
    assert_eq!(port.feeds().len(), 1);
}

#[tokio::test]
async fn credential_failure_skips_listing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"message": "Unauthorized", "error": 401})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.reddit.client_id = Some("id".into());
    config.reddit.client_secret = Some("bad".into());
    config.feed.channel = Some("pics".into());
    let (viewer, port) = viewer_for(&config);

    let outcome = viewer.refresh().await.expect("fetch triggered");
    assert!(matches!(
        outcome,
        PipelineOutcome::Failed {
            failure: PipelineFailure::Credential(_),
            ..
        }
    ));
    let status = viewer.status().current();
    assert!(status.is_error);
    assert_eq!(status.message, "Error getting access token: Unauthorized (401)");
    assert!(port.feeds().is_empty());
}

#[tokio::test]
async fn listing_failure_renders_nothing() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/r/nope/best.json"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"message": "Not Found", "error": 404})),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.reddit.client_id = Some("id".into());
    config.reddit.client_secret = Some("secret".into());
    config.feed.channel = Some("nope".into());
    let (viewer, port) = viewer_for(&config);

    let outcome = viewer.refresh().await.expect("fetch triggered");
    assert!(matches!(
        outcome,
        PipelineOutcome::Failed {
            failure: PipelineFailure::Listing(_),
            ..
        }
    ));
    assert_eq!(
        viewer.status().current().message,
        "Error fetching posts: Not Found (404)"
    );
    assert!(port.feeds().is_empty());
}

#[tokio::test]
async fn newer_run_wins_over_slow_older_run() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/r/slow/best.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing(&[("old", "https://i.redd.it/old.png", "/old")]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/fast/best.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(&[
            ("new1", "https://i.redd.it/n1.png", "/n1"),
            ("new2", "https://v.redd.it/n2", "/n2"),
        ])))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.reddit.client_id = Some("id".into());
    config.reddit.client_secret = Some("secret".into());
    let (viewer, port) = viewer_for(&config);

    let slow = {
        let viewer = viewer.clone();
        tokio::spawn(async move { viewer.handle(UiEvent::ChannelChanged("slow".into())).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let fast = viewer
        .handle(UiEvent::ChannelChanged("fast".into()))
        .await
        .expect("fetch triggered");
    let slow = slow.await.unwrap().expect("fetch triggered");

    assert!(matches!(slow, PipelineOutcome::Superseded { .. }));
    assert!(fast.run() > slow.run());
    assert_eq!(fast.feed().map(|f| f.len()), Some(2));

    let feeds = port.feeds();
    assert_eq!(feeds.len(), 1);
    assert_eq!(feeds[0].cards[0].title, "new1");
    assert_eq!(
        viewer.status().current().message,
        "Posts fetched successfully"
    );
}

#[tokio::test]
async fn run_overtaken_during_token_exchange_reports_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(basic_auth("slow", "secret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"access_token": "old"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(basic_auth("fast", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "new"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/pics/best.json"))
        .and(header("authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(&[(
            "fresh",
            "https://i.redd.it/fresh.png",
            "/fresh",
        )])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.reddit.client_secret = Some("secret".into());
    config.feed.channel = Some("pics".into());
    let (viewer, port) = viewer_for(&config);
    let mut updates = viewer.status().subscribe();

    let slow = {
        let viewer = viewer.clone();
        tokio::spawn(async move { viewer.handle(UiEvent::ClientIdChanged("slow".into())).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let fast = viewer
        .handle(UiEvent::ClientIdChanged("fast".into()))
        .await
        .expect("fetch triggered");
    assert_eq!(fast.feed().map(|f| f.len()), Some(1));
    assert_eq!(
        updates.borrow_and_update().message,
        "Posts fetched successfully"
    );

    let slow = slow.await.unwrap().expect("fetch triggered");
    assert!(matches!(slow, PipelineOutcome::Superseded { .. }));

    // The stale exchange resolved with "Access token retrieved", which must not be published.
    assert!(!updates.has_changed().unwrap());
    assert_eq!(
        viewer.status().current().message,
        "Posts fetched successfully"
    );
    assert_eq!(port.feeds().len(), 1);
}

#[tokio::test]
async fn sliders_update_layout_without_fetching() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (viewer, port) = viewer_for(&config_for(&server));
    viewer.initialize();

    assert!(viewer.handle(UiEvent::ColumnsChanged(5)).await.is_none());
    assert!(viewer
        .handle(UiEvent::ThumbnailSizeChanged(320))
        .await
        .is_none());

    let layouts: Vec<_> = port
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            PortCall::Layout(params) => Some(params),
            _ => None,
        })
        .collect();
    assert_eq!(layouts.len(), 3);
    assert_eq!(layouts[2].columns, 5);
    assert_eq!(layouts[2].thumbnail_size_px, 320);
    assert_eq!(layouts[2].mode, LayoutMode::Grid);
}

#[tokio::test]
async fn layout_button_updates_layout_then_fetches() {
    let server = MockServer::start().await;
    let (viewer, port) = viewer_for(&config_for(&server));

    let outcome = viewer.handle(UiEvent::LayoutClicked(LayoutMode::List)).await;
    assert!(outcome.is_some());

    let calls = port.calls();
    assert!(matches!(calls[0], PortCall::Layout(params) if params.mode == LayoutMode::List));
    assert_eq!(calls[1], PortCall::Cleared);
}

#[tokio::test]
async fn other_sort_hides_time_filter_but_keeps_choice() {
    let server = MockServer::start().await;
    let (viewer, port) = viewer_for(&config_for(&server));

    viewer.handle(UiEvent::SortClicked(SortMode::Top)).await;
    viewer.handle(UiEvent::TimeClicked(TimeWindow::Week)).await;
    viewer.handle(UiEvent::SortClicked(SortMode::New)).await;

    let session = viewer.session();
    assert!(!session.selection.time_filter_visible());
    assert_eq!(session.selection.time_group().active(), Some(TimeWindow::Week));
    assert!(port.calls().contains(&PortCall::TimeFilter(false)));
}
