//! Start/stop handle over the display-refresh tick.
//!
//! The host delivers ticks; the loop only decides whether they count and
//! keeps the elapsed-time bookkeeping.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Running,
    Stopped,
}

#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    last_tick: Option<Instant>,
    frames: u64,
}

impl Default for FrameLoop {
    fn default() -> Self {
        FrameLoop {
            state: LoopState::Initializing,
            last_tick: None,
            frames: 0,
        }
    }
}

impl FrameLoop {
    pub fn start(&mut self) {
        if self.state != LoopState::Running {
            tracing::info!(frames = self.frames, "frame loop started");
            self.state = LoopState::Running;
            self.last_tick = None;
        }
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            tracing::info!(frames = self.frames, "frame loop stopped");
            self.state = LoopState::Stopped;
        }
    }

    pub fn toggle(&mut self) {
        match self.state {
            LoopState::Running => self.stop(),
            _ => self.start(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Records a tick at `now` and returns the time since the previous one.
    /// The first tick after a start reports zero.
    pub fn advance(&mut self, now: Instant) -> Duration {
        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);
        self.frames += 1;
        elapsed
    }
}
