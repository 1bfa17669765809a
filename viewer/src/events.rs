use std::collections::HashMap;
use subfeed_core::{LayoutMode, SortMode, TimeWindow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SortClicked(SortMode),
    TimeClicked(TimeWindow),
    LayoutClicked(LayoutMode),
    ColumnsChanged(u32),
    ThumbnailSizeChanged(u32),
    ClientIdChanged(String),
    ClientSecretChanged(String),
    ChannelChanged(String),
    LimitChanged(String),
    RefreshRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SortButton,
    TimeButton,
    LayoutButton,
    ColumnsSlider,
    SizeSlider,
    ClientIdInput,
    ClientSecretInput,
    ChannelInput,
    LimitInput,
    Refresh,
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            UiEvent::SortClicked(_) => EventKind::SortButton,
            UiEvent::TimeClicked(_) => EventKind::TimeButton,
            UiEvent::LayoutClicked(_) => EventKind::LayoutButton,
            UiEvent::ColumnsChanged(_) => EventKind::ColumnsSlider,
            UiEvent::ThumbnailSizeChanged(_) => EventKind::SizeSlider,
            UiEvent::ClientIdChanged(_) => EventKind::ClientIdInput,
            UiEvent::ClientSecretChanged(_) => EventKind::ClientSecretInput,
            UiEvent::ChannelChanged(_) => EventKind::ChannelInput,
            UiEvent::LimitChanged(_) => EventKind::LimitInput,
            UiEvent::RefreshRequested => EventKind::Refresh,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UpdateLayout,
    DisplayMedia,
}

/// Which actions follow each kind of event, in order.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    handlers: HashMap<EventKind, Vec<Action>>,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: EventKind, actions: &[Action]) -> &mut Self {
        self.handlers.insert(kind, actions.to_vec());
        self
    }

    pub fn actions_for(&self, kind: EventKind) -> &[Action] {
        self.handlers.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn standard() -> Self {
        use Action::*;
        use EventKind::*;

        let mut table = Self::new();
        table
            .register(SortButton, &[DisplayMedia])
            .register(TimeButton, &[DisplayMedia])
            .register(LayoutButton, &[UpdateLayout, DisplayMedia])
            .register(ColumnsSlider, &[UpdateLayout])
            .register(SizeSlider, &[UpdateLayout])
            .register(ClientIdInput, &[DisplayMedia])
            .register(ClientSecretInput, &[DisplayMedia])
            .register(ChannelInput, &[DisplayMedia])
            .register(LimitInput, &[DisplayMedia])
            .register(Refresh, &[DisplayMedia]);
        table
    }
}
