//! Button groups for sort, time filter and layout.
//!
//! A group has at most one active option; selecting an option replaces the
//! previous one, so siblings can never be active together.

use subfeed_core::{LayoutMode, SortMode, TimeWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonGroup<T> {
    active: Option<T>,
}

impl<T: Copy + PartialEq> ButtonGroup<T> {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn with_active(option: T) -> Self {
        Self {
            active: Some(option),
        }
    }

    pub fn select(&mut self, option: T) {
        self.active = Some(option);
    }

    pub fn active(&self) -> Option<T> {
        self.active
    }

    pub fn is_active(&self, option: T) -> bool {
        self.active == Some(option)
    }
}

impl<T: Copy + PartialEq> Default for ButtonGroup<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    sort: ButtonGroup<SortMode>,
    time: ButtonGroup<TimeWindow>,
    time_visible: bool,
    layout: ButtonGroup<LayoutMode>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            sort: ButtonGroup::with_active(SortMode::Best),
            time: ButtonGroup::new(),
            time_visible: false,
            layout: ButtonGroup::with_active(LayoutMode::Grid),
        }
    }
}

impl SelectionState {
    /// Choosing `top` shows the time filter and falls back to `day` when no
    /// window is chosen yet. Other sorts hide it but keep its selection.
    pub fn select_sort(&mut self, sort: SortMode) {
        self.sort.select(sort);
        self.time_visible = sort.uses_time_window();
        if self.time_visible && self.time.active().is_none() {
            self.time.select(TimeWindow::Day);
        }
    }

    pub fn select_time(&mut self, window: TimeWindow) {
        self.time.select(window);
    }

    pub fn select_layout(&mut self, layout: LayoutMode) {
        self.layout.select(layout);
    }

    pub fn sort_group(&self) -> &ButtonGroup<SortMode> {
        &self.sort
    }

    pub fn time_group(&self) -> &ButtonGroup<TimeWindow> {
        &self.time
    }

    pub fn layout_group(&self) -> &ButtonGroup<LayoutMode> {
        &self.layout
    }

    pub fn time_filter_visible(&self) -> bool {
        self.time_visible
    }

    pub fn sort(&self) -> SortMode {
        self.sort.active().unwrap_or_default()
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout.active().unwrap_or_default()
    }

    /// The window sent with a query: present only for `top`.
    pub fn query_time_window(&self) -> Option<TimeWindow> {
        if self.sort().uses_time_window() {
            Some(self.time.active().unwrap_or(TimeWindow::Day))
        } else {
            None
        }
    }
}
