//! Platform abstraction layer
//!
//! Narrow interfaces to everything outside the simulation:
//! - Input: live pressed-key map written by device listeners
//! - HUD: per-fighter health bars
//! - Overlay: title/message/button menu
//! - Frame scheduling: one callback per display frame
//!
//! The browser implementations live in `web` (wasm32 only).

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::collections::{HashSet, VecDeque};

use crate::sim::KeySource;

/// Pressed-key map. Device callbacks mutate it at any time; the simulation
/// reads whatever is held at the instant of the read.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: impl Into<String>) {
        self.pressed.insert(key.into());
    }

    pub fn release(&mut self, key: &str) {
        self.pressed.remove(key);
    }

    /// Drop every held key (focus loss)
    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

impl KeySource for InputState {
    fn is_down(&self, key: &str) -> bool {
        self.pressed.contains(key)
    }
}

/// Health bar for one fighter
pub trait HealthDisplay {
    /// `ratio` is remaining health in [0, 1]
    fn set_fill_ratio(&mut self, ratio: f32);
}

/// Menu overlay with a single action button
pub trait Overlay {
    fn show(&mut self, title: &str, message: &str, action_label: &str);
    fn hide(&mut self);
}

/// Identifies one requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Display-refresh scheduling. The platform delivers each scheduled handle
/// back to [`crate::Game::on_frame`] once, unless it was cancelled first.
pub trait FrameScheduler {
    fn schedule_next(&mut self) -> FrameHandle;
    fn cancel(&mut self, handle: FrameHandle);
}

/// Scheduler driven by hand, one frame at a time (tests, headless runs)
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    queue: VecDeque<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames waiting to fire
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Take the oldest due frame
    pub fn pop_due(&mut self) -> Option<FrameHandle> {
        self.queue.pop_front()
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.queue.push_back(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.queue.retain(|h| *h != handle);
    }
}
