pub mod capture;
pub mod controller;
pub mod detector;

pub use capture::{CaptureState, CapturePhase, FrameDecision, CAPTURE_DELAY};
pub use controller::{CaptureController, FrameProcessor, PendingAuth, SdkStatus};
pub use detector::{FaceDetector, FaceBox, Frame};
