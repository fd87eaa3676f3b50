//! Cooperative cancellation and interactive playback control.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation token.
///
/// Cloned handles share one flag. The pipeline polls the token once per
/// frame and inside the pause sub-loop; there is no asynchronous
/// cancellation, so observing the flag always happens at a frame boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request termination. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Interactive playback command for one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Control {
    /// Keep processing
    #[default]
    Continue,
    /// Toggle the pause state; while paused no frame is consumed and no
    /// tracker state mutates
    TogglePause,
    /// Stop processing and shut down gracefully
    Quit,
}

/// Trait for interactive pause/quit input.
///
/// Polled once per frame, and repeatedly while paused. `poll` may block
/// (e.g. a UI waiting on a key press); a non-interactive run can return
/// [`Control::Continue`] unconditionally.
pub trait ControlSource {
    fn poll(&mut self) -> Control;
}

/// Control source for non-interactive runs: never pauses, never quits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoControl;

impl ControlSource for NoControl {
    fn poll(&mut self) -> Control {
        Control::Continue
    }
}
