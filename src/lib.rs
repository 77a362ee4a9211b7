// Core modules
pub mod core;
pub mod camera;
pub mod service;
pub mod common;
pub mod transfer;
pub mod sdk;

// Re-export commonly used types
pub use crate::common::{Config, SdkOptions, FaceAuthError, Result, DEFAULT_BASE_URL};
pub use crate::core::{
    CaptureController, CaptureState, FaceBox, FaceDetector, Frame, FrameProcessor, PendingAuth,
    SdkStatus, CAPTURE_DELAY,
};
pub use crate::camera::{Camera, CameraDevice, CameraPosition, CameraSubsystem, PermissionStatus, PhotoFile};
pub use crate::service::{ApiClient, AuthResult, FaceAuthApi, SignupOptions, protocol};
pub use crate::transfer::{FsPhotoReader, PhotoReader};
pub use crate::sdk::{BioLogreen, CameraProps};
