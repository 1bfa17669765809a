//! One fetch-classify-render run.
//!
//! Runs are numbered. When a newer run has started by the time a network call
//! resolves, the older run stops without reporting status or touching the feed,
//! so the last trigger always wins. Starting a run (clearing the feed) and
//! showing a run's feed happen under one lock, so a stale feed can never land
//! after a newer run has cleared.

use crate::port::UiPort;
use crate::session::FeedRequest;
use media_feed::{FeedRenderer, RenderedFeed};
use reddit_client::RedditClient;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use subfeed_core::{
    AppConfig, CoreError, ErrorReporter, StatusReporter, StatusSink, StatusState,
};
use tracing::{debug, info};

pub const FETCHING_POSTS: &str = "Fetching posts...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u64);

#[derive(Debug, Default)]
pub struct RunTracker {
    latest: AtomicU64,
}

impl RunTracker {
    pub fn begin(&self) -> RunId {
        RunId(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, run: RunId) -> bool {
        self.latest.load(Ordering::SeqCst) == run.0
    }
}

/// Forwards status only while its run is the latest one.
struct RunStatus<'a> {
    reporter: &'a StatusReporter,
    runs: &'a RunTracker,
    display: &'a Mutex<()>,
    run: RunId,
}

impl StatusSink for RunStatus<'_> {
    fn report(&self, status: StatusState) {
        let _display = lock_display(self.display);
        if self.runs.is_current(self.run) {
            self.reporter.report(status);
        } else {
            debug!("Dropping status from superseded run {}", self.run.0);
        }
    }
}

#[derive(Debug)]
pub enum PipelineFailure {
    InvalidInput(CoreError),
    Credential(CoreError),
    Listing(CoreError),
}

impl PipelineFailure {
    pub fn error(&self) -> &CoreError {
        match self {
            PipelineFailure::InvalidInput(e)
            | PipelineFailure::Credential(e)
            | PipelineFailure::Listing(e) => e,
        }
    }
}

#[derive(Debug)]
pub enum PipelineOutcome {
    Rendered { run: RunId, feed: RenderedFeed },
    Failed { run: RunId, failure: PipelineFailure },
    Superseded { run: RunId },
}

impl PipelineOutcome {
    pub fn run(&self) -> RunId {
        match self {
            PipelineOutcome::Rendered { run, .. }
            | PipelineOutcome::Failed { run, .. }
            | PipelineOutcome::Superseded { run } => *run,
        }
    }

    pub fn feed(&self) -> Option<&RenderedFeed> {
        match self {
            PipelineOutcome::Rendered { feed, .. } => Some(feed),
            _ => None,
        }
    }
}

pub struct FeedPipeline {
    client: RedditClient,
    renderer: FeedRenderer,
    status: Arc<StatusReporter>,
    runs: RunTracker,
    display: Mutex<()>,
    errors: ErrorReporter,
}

impl FeedPipeline {
    pub fn new(client: RedditClient, renderer: FeedRenderer, status: Arc<StatusReporter>) -> Self {
        Self {
            client,
            renderer,
            status,
            runs: RunTracker::default(),
            display: Mutex::new(()),
            errors: ErrorReporter::new(),
        }
    }

    pub fn from_config(config: &AppConfig, status: Arc<StatusReporter>) -> Result<Self, CoreError> {
        let client = RedditClient::new(&config.reddit)?;
        let renderer = FeedRenderer::new(config.reddit.web_base.clone());
        Ok(Self::new(client, renderer, status))
    }

    pub fn status(&self) -> &Arc<StatusReporter> {
        &self.status
    }

    /// Clears the feed, then exchanges credentials, fetches one page and
    /// renders it. Failures are reported on the status line and leave the
    /// feed empty.
    pub async fn run(
        &self,
        request: Result<FeedRequest, CoreError>,
        port: &dyn UiPort,
    ) -> PipelineOutcome {
        let run = self.start(port);
        let status = RunStatus {
            reporter: &self.status,
            runs: &self.runs,
            display: &self.display,
            run,
        };

        let request = match request {
            Ok(request) => request,
            Err(e) => {
                status.error(&e.detail());
                return PipelineOutcome::Failed {
                    run,
                    failure: PipelineFailure::InvalidInput(e),
                };
            }
        };
        info!(
            "Run {}: r/{} sorted by {} (limit {})",
            run.0, request.query.channel, request.query.sort, request.query.limit
        );
        status.info(FETCHING_POSTS);

        let token = self.client.authenticate(&request.credentials, &status).await;
        if !self.runs.is_current(run) {
            return self.superseded(run);
        }
        let token = match token {
            Ok(token) => token,
            Err(e) => return self.failed(run, PipelineFailure::Credential(e)),
        };

        let posts = self
            .client
            .fetch_posts(&token, &request.query, &status)
            .await;
        if !self.runs.is_current(run) {
            return self.superseded(run);
        }
        let posts = match posts {
            Ok(posts) => posts,
            Err(e) => return self.failed(run, PipelineFailure::Listing(e)),
        };

        let feed = self.renderer.render_posts(&posts);
        if !self.present(run, &feed, port) {
            return self.superseded(run);
        }
        PipelineOutcome::Rendered { run, feed }
    }

    /// Takes a new run id and clears the feed for it.
    fn start(&self, port: &dyn UiPort) -> RunId {
        let _display = lock_display(&self.display);
        let run = self.runs.begin();
        port.clear_feed();
        run
    }

    /// Shows `feed` if `run` is still the latest run.
    fn present(&self, run: RunId, feed: &RenderedFeed, port: &dyn UiPort) -> bool {
        let _display = lock_display(&self.display);
        if !self.runs.is_current(run) {
            return false;
        }
        port.show_feed(feed);
        true
    }

    fn failed(&self, run: RunId, failure: PipelineFailure) -> PipelineOutcome {
        self.errors.report_error(failure.error());
        PipelineOutcome::Failed { run, failure }
    }

    fn superseded(&self, run: RunId) -> PipelineOutcome {
        info!("Run {} superseded by a newer run, discarding result", run.0);
        PipelineOutcome::Superseded { run }
    }
}

fn lock_display(display: &Mutex<()>) -> MutexGuard<'_, ()> {
    display.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::RenderParameters;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CountingPort {
        cleared: AtomicUsize,
        shown: AtomicUsize,
    }

    impl UiPort for CountingPort {
        fn clear_feed(&self) {
            self.cleared.fetch_add(1, Ordering::SeqCst);
        }

        fn show_feed(&self, _feed: &RenderedFeed) {
            self.shown.fetch_add(1, Ordering::SeqCst);
        }

        fn apply_layout(&self, _params: &RenderParameters) {}

        fn set_time_filter_visible(&self, _visible: bool) {}
    }

    fn pipeline() -> FeedPipeline {
        FeedPipeline::from_config(&AppConfig::default(), Arc::new(StatusReporter::new()))
            .expect("pipeline")
    }

    #[test]
    fn test_run_ids_increase() {
        let runs = RunTracker::default();
        let first = runs.begin();
        let second = runs.begin();
        assert!(second > first);
        assert!(!runs.is_current(first));
        assert!(runs.is_current(second));
    }

    #[test]
    fn test_stale_run_status_is_dropped() {
        let reporter = StatusReporter::new();
        let runs = RunTracker::default();
        let stale = runs.begin();
        let _fresh = runs.begin();

        let display = Mutex::new(());
        let status = RunStatus {
            reporter: &reporter,
            runs: &runs,
            display: &display,
            run: stale,
        };
        status.info("Posts fetched successfully");
        assert_eq!(reporter.current().message, subfeed_core::MISSING_CREDENTIALS);
    }

    #[test]
    fn test_stale_run_cannot_show_after_newer_run_cleared() {
        let pipeline = pipeline();
        let port = CountingPort::default();

        let stale = pipeline.start(&port);
        let fresh = pipeline.start(&port);
        let feed = RenderedFeed::default();

        assert!(!pipeline.present(stale, &feed, &port));
        assert!(pipeline.present(fresh, &feed, &port));
        assert_eq!(port.cleared.load(Ordering::SeqCst), 2);
        assert_eq!(port.shown.load(Ordering::SeqCst), 1);
    }
}
