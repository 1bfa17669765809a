pub mod events;
pub mod layout;
pub mod pipeline;
pub mod port;
pub mod selection;
pub mod session;

pub use events::{Action, EventKind, EventTable, UiEvent};
pub use layout::{LayoutController, RenderParameters};
pub use pipeline::{FeedPipeline, PipelineFailure, PipelineOutcome, RunId};
pub use port::UiPort;
pub use selection::{ButtonGroup, SelectionState};
pub use session::{FeedInputs, FeedRequest, Session};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use subfeed_core::{AppConfig, CoreError, StatusReporter};
use tracing::debug;

/// Ties the session, the event table and the pipeline to a presentation port.
pub struct Viewer {
    session: Mutex<Session>,
    events: EventTable,
    pipeline: FeedPipeline,
    port: Arc<dyn UiPort>,
}

impl Viewer {
    pub fn new(session: Session, pipeline: FeedPipeline, port: Arc<dyn UiPort>) -> Self {
        Self {
            session: Mutex::new(session),
            events: EventTable::standard(),
            pipeline,
            port,
        }
    }

    pub fn from_config(config: &AppConfig, port: Arc<dyn UiPort>) -> Result<Self, CoreError> {
        let status = Arc::new(StatusReporter::new());
        let pipeline = FeedPipeline::from_config(config, status)?;
        Ok(Self::new(Session::from_config(config), pipeline, port))
    }

    pub fn status(&self) -> &StatusReporter {
        self.pipeline.status()
    }

    pub fn session(&self) -> Session {
        self.lock_session().clone()
    }

    /// Pushes the initial layout and time-filter visibility to the port.
    pub fn initialize(&self) {
        let (params, time_visible) = {
            let session = self.lock_session();
            (
                LayoutController::apply(&session.layout_config()),
                session.selection.time_filter_visible(),
            )
        };
        self.port.apply_layout(&params);
        self.port.set_time_filter_visible(time_visible);
    }

    /// Applies `event` to the session and runs the actions registered for it.
    ///
    /// Returns the pipeline outcome when the event triggered a fetch.
    pub async fn handle(&self, event: UiEvent) -> Option<PipelineOutcome> {
        let kind = event.kind();
        let actions = self.events.actions_for(kind);
        debug!("Handling {:?} -> {:?}", kind, actions);

        let (params, time_visible, request) = {
            let mut session = self.lock_session();
            session.apply(&event);
            let request = actions
                .contains(&Action::DisplayMedia)
                .then(|| session.feed_request());
            (
                LayoutController::apply(&session.layout_config()),
                session.selection.time_filter_visible(),
                request,
            )
        };

        if kind == EventKind::SortButton {
            self.port.set_time_filter_visible(time_visible);
        }

        let mut request = request;
        let mut outcome = None;
        for action in actions {
            match action {
                Action::UpdateLayout => self.port.apply_layout(&params),
                Action::DisplayMedia => {
                    if let Some(request) = request.take() {
                        outcome = Some(self.pipeline.run(request, self.port.as_ref()).await);
                    }
                }
            }
        }
        outcome
    }

    pub async fn refresh(&self) -> Option<PipelineOutcome> {
        self.handle(UiEvent::RefreshRequested).await
    }

    fn lock_session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
