//! The single status line shared by every stage of the feed pipeline.

use crate::StatusState;
use tokio::sync::watch;
use tracing::{error, info};

pub const MISSING_CREDENTIALS: &str = "Please enter Client ID and Secret";
pub const MISSING_CHANNEL: &str = "Please enter a subreddit or multireddit";

/// Anything that accepts status transitions.
pub trait StatusSink: Send + Sync {
    fn report(&self, status: StatusState);

    fn info(&self, message: &str) {
        self.report(StatusState::ok(message));
    }

    fn error(&self, message: &str) {
        self.report(StatusState::error(message));
    }
}

/// Holds the latest [`StatusState`]. Each report replaces the previous one.
#[derive(Debug)]
pub struct StatusReporter {
    tx: watch::Sender<StatusState>,
}

impl StatusReporter {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StatusState::error(MISSING_CREDENTIALS));
        Self { tx }
    }

    pub fn current(&self) -> StatusState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusState> {
        self.tx.subscribe()
    }
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for StatusReporter {
    fn report(&self, status: StatusState) {
        if status.is_error {
            error!("Status: {}", status.message);
        } else {
            info!("Status: {}", status.message);
        }
        self.tx.send_replace(status);
    }
}
