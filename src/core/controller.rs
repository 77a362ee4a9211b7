//! Async driver around [`CaptureState`].
//!
//! One task owns the state machine, the pending operation and the mounted
//! camera. Everything else (frame callbacks, login/signup requests, the
//! capture sequence reporting back) talks to it over a single FIFO channel.

use crate::camera::Camera;
use crate::common::{FaceAuthError, Result};
use crate::core::capture::{CaptureState, FrameDecision};
use crate::core::detector::{FaceDetector, Frame};
use crate::service::client::FaceAuthApi;
use crate::service::protocol::{AuthCall, AuthResult};
use crate::transfer::PhotoReader;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;

/// Status surfaced to the application. Written only by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SdkStatus {
    pub is_loading: bool,
    pub error: Option<String>,
    pub face_detected: bool,
}

type Reply = oneshot::Sender<Result<AuthResult>>;

struct PendingOperation {
    call: AuthCall,
    reply: Reply,
}

enum Command {
    Arm { call: AuthCall, reply: Reply },
    Frame { face_in_view: bool, at: Instant },
    SetCamera(Option<Arc<dyn Camera>>),
    Finished { error: Option<String> },
}

/// Future returned by a login or signup request.
#[must_use = "the capture result is only observable by awaiting it"]
pub struct PendingAuth {
    rx: oneshot::Receiver<Result<AuthResult>>,
}

impl Future for PendingAuth {
    type Output = Result<AuthResult>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(FaceAuthError::ControllerStopped)))
    }
}

#[derive(Clone)]
pub struct CaptureController {
    tx: mpsc::UnboundedSender<Command>,
}

impl CaptureController {
    /// Spawns the controller task on the current tokio runtime.
    pub fn spawn(
        api: Arc<dyn FaceAuthApi>,
        reader: Arc<dyn PhotoReader>,
        debounce: Duration,
    ) -> (Self, watch::Receiver<SdkStatus>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(SdkStatus::default());

        let task = ControllerTask {
            state: CaptureState::new(debounce),
            pending: None,
            camera: None,
            api,
            reader,
            status: status_tx,
            events: tx.downgrade(),
        };
        tokio::spawn(task.run(rx));

        (Self { tx }, status_rx)
    }

    /// Arms the controller for `call`. The request is sent immediately; the
    /// returned future settles when the capture sequence finishes, or right
    /// away with [`FaceAuthError::Busy`] if another operation is in flight.
    pub fn start(&self, call: AuthCall) -> PendingAuth {
        let (reply, rx) = oneshot::channel();
        if let Err(mpsc::error::SendError(Command::Arm { reply, .. })) =
            self.tx.send(Command::Arm { call, reply })
        {
            let _ = reply.send(Err(FaceAuthError::ControllerStopped));
        }
        PendingAuth { rx }
    }

    pub fn attach_camera(&self, camera: Arc<dyn Camera>) {
        let _ = self.tx.send(Command::SetCamera(Some(camera)));
    }

    pub fn detach_camera(&self) {
        let _ = self.tx.send(Command::SetCamera(None));
    }

    pub fn frame_processor(&self, detector: Arc<dyn FaceDetector>) -> FrameProcessor {
        FrameProcessor {
            detector,
            tx: self.tx.clone(),
        }
    }
}

/// Per-frame callback handed to the camera surface.
///
/// May be invoked from the camera's own thread. Detection runs there; the
/// result is posted to the controller rather than touching shared state.
#[derive(Clone)]
pub struct FrameProcessor {
    detector: Arc<dyn FaceDetector>,
    tx: mpsc::UnboundedSender<Command>,
}

impl FrameProcessor {
    /// Returns whether a face was in view.
    pub fn process(&self, frame: &Frame) -> bool {
        let face_in_view = match self.detector.scan_faces(frame) {
            Ok(faces) => !faces.is_empty(),
            Err(e) => {
                tracing::warn!("Detection error: {}", e);
                false
            }
        };
        let _ = self.tx.send(Command::Frame {
            face_in_view,
            at: Instant::now(),
        });
        face_in_view
    }
}

struct ControllerTask {
    state: CaptureState,
    pending: Option<PendingOperation>,
    camera: Option<Arc<dyn Camera>>,
    api: Arc<dyn FaceAuthApi>,
    reader: Arc<dyn PhotoReader>,
    status: watch::Sender<SdkStatus>,
    // Weak so the task stops once every handle and frame processor is dropped.
    events: mpsc::WeakUnboundedSender<Command>,
}

impl ControllerTask {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = rx.recv().await {
            match command {
                Command::Arm { call, reply } => self.arm(call, reply),
                Command::Frame { face_in_view, at } => self.on_frame(face_in_view, at),
                Command::SetCamera(camera) => {
                    tracing::debug!("Camera {}", if camera.is_some() { "attached" } else { "detached" });
                    self.camera = camera;
                }
                Command::Finished { error } => self.finish(error),
            }
        }
        tracing::debug!("Capture controller stopped");
    }

    fn arm(&mut self, call: AuthCall, reply: Reply) {
        if let Err(e) = self.state.arm() {
            tracing::debug!("Rejecting {}: operation already in progress", call.endpoint());
            let _ = reply.send(Err(e));
            return;
        }

        tracing::info!("Armed for {}, waiting for a stable face", call.endpoint());
        self.pending = Some(PendingOperation { call, reply });
        self.status.send_modify(|status| {
            status.is_loading = true;
            status.error = None;
        });
    }

    fn on_frame(&mut self, face_in_view: bool, at: Instant) {
        self.status.send_if_modified(|status| {
            let changed = status.face_detected != face_in_view;
            status.face_detected = face_in_view;
            changed
        });

        if self.state.on_frame(face_in_view, at) != FrameDecision::Capture {
            return;
        }

        let Some(operation) = self.pending.take() else {
            // Armed without a pending operation cannot happen; recover to Idle.
            tracing::warn!("Capture triggered with no pending operation");
            self.state.reset();
            return;
        };

        tracing::debug!("Face stable for {:?}, capturing", self.state.debounce());
        let sequence = CaptureSequence {
            camera: self.camera.clone(),
            api: Arc::clone(&self.api),
            reader: Arc::clone(&self.reader),
        };
        tokio::spawn(sequence.run(operation, self.events.upgrade()));
    }

    fn finish(&mut self, error: Option<String>) {
        self.state.reset();
        self.pending = None;
        match &error {
            Some(message) => tracing::warn!("Face auth failed: {}", message),
            None => tracing::info!("Face auth completed"),
        }
        self.status.send_modify(|status| {
            status.is_loading = false;
            if error.is_some() {
                status.error = error;
            }
        });
    }
}

struct CaptureSequence {
    camera: Option<Arc<dyn Camera>>,
    api: Arc<dyn FaceAuthApi>,
    reader: Arc<dyn PhotoReader>,
}

impl CaptureSequence {
    async fn run(self, operation: PendingOperation, events: Option<mpsc::UnboundedSender<Command>>) {
        let PendingOperation { call, reply } = operation;
        let outcome = self.capture_and_authenticate(call).await;

        // Reset before replying so a caller re-arming on the result finds the controller idle.
        if let Some(events) = events {
            let _ = events.send(Command::Finished {
                error: outcome.as_ref().err().map(ToString::to_string),
            });
        }
        let _ = reply.send(outcome);
    }

    async fn capture_and_authenticate(&self, call: AuthCall) -> Result<AuthResult> {
        let camera = self.camera.as_ref().ok_or(FaceAuthError::CameraUnavailable)?;

        let photo = camera.take_photo().await.map_err(|e| match e {
            FaceAuthError::Camera(_) | FaceAuthError::CameraUnavailable => e,
            other => FaceAuthError::Camera(other.to_string()),
        })?;
        tracing::debug!("Photo captured: {} ({}x{})", photo.path.display(), photo.width, photo.height);

        let image_base64 = self.reader.read_base64(&photo.path).await.map_err(|e| match e {
            FaceAuthError::Transfer(_) => e,
            other => FaceAuthError::Transfer(other.to_string()),
        })?;

        self.api.call(call, image_base64).await
    }
}
