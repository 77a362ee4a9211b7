use crate::common::{FaceAuthError, Result};
use std::time::Duration;
use tokio::time::Instant;

/// Continuous face presence required before a photo is taken.
pub const CAPTURE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    Idle,
    /// Waiting for a face to stay in view for the debounce period.
    Armed,
    /// Photo triggered, waiting for the capture sequence to finish.
    Capturing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecision {
    /// Not armed; the frame does not touch the stability timer.
    Ignored,
    Waiting,
    /// Debounce satisfied. The state is already Capturing.
    Capture,
}

#[derive(Debug, Clone)]
pub struct CaptureState {
    phase: CapturePhase,
    stable_since: Option<Instant>,
    debounce: Duration,
}

impl Default for CaptureState {
    fn default() -> Self {
        Self::new(CAPTURE_DELAY)
    }
}

impl CaptureState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            phase: CapturePhase::Idle,
            stable_since: None,
            debounce,
        }
    }

    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    pub fn stable_since(&self) -> Option<Instant> {
        self.stable_since
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn arm(&mut self) -> Result<()> {
        if self.phase != CapturePhase::Idle {
            return Err(FaceAuthError::Busy);
        }
        self.phase = CapturePhase::Armed;
        self.stable_since = None;
        Ok(())
    }

    pub fn on_frame(&mut self, face_in_view: bool, now: Instant) -> FrameDecision {
        if self.phase != CapturePhase::Armed {
            self.stable_since = None;
            return FrameDecision::Ignored;
        }

        if !face_in_view {
            self.stable_since = None;
            return FrameDecision::Waiting;
        }

        let anchor = *self.stable_since.get_or_insert(now);
        if now.saturating_duration_since(anchor) >= self.debounce {
            // Disarm before anything else so a second frame cannot re-trigger.
            self.phase = CapturePhase::Capturing;
            self.stable_since = None;
            return FrameDecision::Capture;
        }

        FrameDecision::Waiting
    }

    pub fn reset(&mut self) {
        self.phase = CapturePhase::Idle;
        self.stable_since = None;
    }
}
