use crate::camera::{Camera, CameraDevice, CameraSubsystem, PermissionStatus};
use crate::common::{Result, SdkOptions};
use crate::core::controller::{CaptureController, FrameProcessor, PendingAuth, SdkStatus};
use crate::core::detector::FaceDetector;
use crate::service::client::{ApiClient, FaceAuthApi};
use crate::service::protocol::{AuthCall, SignupOptions};
use crate::transfer::{FsPhotoReader, PhotoReader};
use std::sync::Arc;
use tokio::sync::watch;

/// Properties for the host's camera surface.
#[derive(Clone)]
pub struct CameraProps {
    pub device: Option<CameraDevice>,
    /// Only true once camera permission is granted.
    pub is_active: bool,
    pub frame_processor: FrameProcessor,
    /// Still-photo capability is always requested.
    pub photo: bool,
}

/// Face login/signup for one application session.
pub struct BioLogreen {
    controller: CaptureController,
    status: watch::Receiver<SdkStatus>,
    cameras: Arc<dyn CameraSubsystem>,
    device: Option<CameraDevice>,
    permission: PermissionStatus,
    frame_processor: FrameProcessor,
}

impl BioLogreen {
    pub async fn new(
        options: SdkOptions,
        cameras: Arc<dyn CameraSubsystem>,
        detector: Arc<dyn FaceDetector>,
    ) -> Result<Self> {
        let api = Arc::new(ApiClient::new(&options)?);
        Ok(Self::with_parts(options, cameras, detector, api, Arc::new(FsPhotoReader)).await)
    }

    /// Like [`BioLogreen::new`] with a caller-supplied API and photo reader.
    pub async fn with_parts(
        options: SdkOptions,
        cameras: Arc<dyn CameraSubsystem>,
        detector: Arc<dyn FaceDetector>,
        api: Arc<dyn FaceAuthApi>,
        reader: Arc<dyn PhotoReader>,
    ) -> Self {
        let (controller, status) = CaptureController::spawn(api, reader, options.debounce);
        let frame_processor = controller.frame_processor(detector);
        let device = cameras.device(options.camera_position);
        if device.is_none() {
            tracing::warn!("No {:?} camera device found", options.camera_position);
        }

        let mut sdk = Self {
            controller,
            status,
            cameras,
            device,
            permission: PermissionStatus::NotDetermined,
            frame_processor,
        };
        sdk.refresh_permission().await;
        sdk
    }

    /// Queries camera permission and requests it if not yet granted.
    pub async fn refresh_permission(&mut self) -> PermissionStatus {
        let mut permission = self.cameras.permission_status();
        if !permission.is_granted() {
            tracing::debug!("Camera permission is {:?}, requesting", permission);
            permission = self.cameras.request_permission().await;
            if !permission.is_granted() {
                tracing::warn!("Camera permission not granted ({:?}); camera stays inactive", permission);
            }
        }
        self.permission = permission;
        permission
    }

    pub fn login_with_face(&self) -> PendingAuth {
        self.controller.start(AuthCall::Login)
    }

    pub fn signup_with_face(&self, options: Option<SignupOptions>) -> PendingAuth {
        self.controller.start(AuthCall::from(options))
    }

    pub fn attach_camera(&self, camera: Arc<dyn Camera>) {
        self.controller.attach_camera(camera);
    }

    pub fn detach_camera(&self) {
        self.controller.detach_camera();
    }

    pub fn camera_props(&self) -> CameraProps {
        CameraProps {
            device: self.device.clone(),
            is_active: self.permission.is_granted(),
            frame_processor: self.frame_processor.clone(),
            photo: true,
        }
    }

    pub fn permission(&self) -> PermissionStatus {
        self.permission
    }

    pub fn status(&self) -> SdkStatus {
        self.status.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.status.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.status.borrow().error.clone()
    }

    pub fn face_detected(&self) -> bool {
        self.status.borrow().face_detected
    }

    /// A receiver that is notified on every status change.
    pub fn subscribe(&self) -> watch::Receiver<SdkStatus> {
        self.status.clone()
    }
}
