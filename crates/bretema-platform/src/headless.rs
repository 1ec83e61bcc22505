//! Scripted window without an OS surface.
//!
//! Used by tests and `--headless` runs. Each [`Window::poll_events`] call
//! consumes one [`HeadlessStep`] from the script, then drains events queued
//! with [`HeadlessWindow::push_event`].

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use glam::UVec2;
use tracing::debug;

use crate::window::{Window, WindowEvent};
use crate::WindowConfig;

/// One poll's worth of scripted activity.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadlessStep {
    /// Nothing happens this poll.
    Idle,
    /// Change the size and report `Resized`.
    Resize(UVec2),
    /// Report an event as-is.
    Event(WindowEvent),
    /// Report `CloseRequested`.
    Close,
    /// Several steps applied in the same poll, in order.
    Batch(Vec<HeadlessStep>),
}

/// A window driven entirely by code.
#[derive(Debug)]
pub struct HeadlessWindow {
    title: String,
    size: Cell<UVec2>,
    script: RefCell<VecDeque<HeadlessStep>>,
    pending: RefCell<VecDeque<WindowEvent>>,
    polls: Cell<u64>,
    close_after: Cell<Option<u64>>,
}

impl HeadlessWindow {
    #[must_use]
    pub fn new(config: &WindowConfig) -> Self {
        debug!(
            "Headless window '{}' created: {}x{}",
            config.title, config.width, config.height
        );
        Self {
            title: config.title.clone(),
            size: Cell::new(UVec2::new(config.width, config.height)),
            script: RefCell::default(),
            pending: RefCell::default(),
            polls: Cell::new(0),
            close_after: Cell::new(None),
        }
    }

    /// Replace the script. Steps run one per poll; once exhausted, polls are idle.
    #[must_use]
    pub fn with_script(self, steps: impl IntoIterator<Item = HeadlessStep>) -> Self {
        self.script.replace(steps.into_iter().collect());
        self
    }

    /// Append a step to the end of the script.
    pub fn push_step(&self, step: HeadlessStep) {
        self.script.borrow_mut().push_back(step);
    }

    /// Resize immediately, without emitting an event.
    pub fn set_size(&self, size: UVec2) {
        self.size.set(size);
    }

    /// Queue an event for the next poll.
    pub fn push_event(&self, event: WindowEvent) {
        self.pending.borrow_mut().push_back(event);
    }

    /// Queue a close request for the next poll.
    pub fn request_close(&self) {
        self.push_event(WindowEvent::CloseRequested);
    }

    /// Emit `CloseRequested` on the `polls`-th poll (1-based).
    pub fn close_after(&self, polls: u64) {
        self.close_after.set(Some(polls));
    }

    /// Number of polls served so far.
    #[must_use]
    pub fn poll_count(&self) -> u64 {
        self.polls.get()
    }

    /// Steps left in the script.
    #[must_use]
    pub fn remaining_steps(&self) -> usize {
        self.script.borrow().len()
    }

    fn apply(&self, step: HeadlessStep, events: &mut Vec<WindowEvent>) {
        match step {
            HeadlessStep::Idle => {}
            HeadlessStep::Resize(size) => {
                self.size.set(size);
                events.push(WindowEvent::Resized(size));
            }
            HeadlessStep::Event(event) => events.push(event),
            HeadlessStep::Close => events.push(WindowEvent::CloseRequested),
            HeadlessStep::Batch(steps) => {
                for step in steps {
                    self.apply(step, events);
                }
            }
        }
    }
}

impl Window for HeadlessWindow {
    fn title(&self) -> &str {
        &self.title
    }

    fn size(&self) -> UVec2 {
        self.size.get()
    }

    fn poll_events(&self, events: &mut Vec<WindowEvent>) {
        let poll = self.polls.get() + 1;
        self.polls.set(poll);

        let step = self.script.borrow_mut().pop_front();
        if let Some(step) = step {
            self.apply(step, events);
        }

        events.extend(self.pending.borrow_mut().drain(..));

        if self.close_after.get() == Some(poll) {
            events.push(WindowEvent::CloseRequested);
        }
    }
}
