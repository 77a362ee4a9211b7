use async_trait::async_trait;
use biologreen::{
    BioLogreen, Camera, CameraDevice, CameraPosition, CameraSubsystem, FaceAuthError, FaceBox,
    Frame, PermissionStatus, PhotoFile, Result, SdkOptions, SignupOptions,
};
use httpmock::prelude::*;
use image::DynamicImage;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct Cameras;

#[async_trait]
impl CameraSubsystem for Cameras {
    fn device(&self, position: CameraPosition) -> Option<CameraDevice> {
        Some(CameraDevice {
            id: "0".into(),
            name: "test camera".into(),
            position,
        })
    }

    fn permission_status(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }
}

static SHOTS: AtomicUsize = AtomicUsize::new(0);

/// Writes a small PNG to the temp dir for every shot.
struct DiskCamera;

#[async_trait]
impl Camera for DiskCamera {
    async fn take_photo(&self) -> Result<PhotoFile> {
        let shot = SHOTS.fetch_add(1, Ordering::SeqCst);
        let path: PathBuf = std::env::temp_dir().join(format!(
            "biologreen-flow-{}-{}.png",
            std::process::id(),
            shot
        ));
        let target = path.clone();
        tokio::task::spawn_blocking(move || DynamicImage::new_rgb8(8, 8).save(target))
            .await
            .map_err(|e| FaceAuthError::Camera(e.to_string()))??;
        Ok(PhotoFile { path, width: 8, height: 8 })
    }
}

fn face_toggle() -> (Arc<AtomicBool>, Arc<dyn biologreen::FaceDetector>) {
    let face = Arc::new(AtomicBool::new(true));
    let seen = face.clone();
    let detector = move |_: &Frame| -> Result<Vec<FaceBox>> {
        Ok(if seen.load(Ordering::SeqCst) {
            vec![FaceBox { x1: 1.0, y1: 1.0, x2: 6.0, y2: 6.0, confidence: 0.95 }]
        } else {
            Vec::new()
        })
    };
    let detector: Arc<dyn biologreen::FaceDetector> = Arc::new(detector);
    (face, detector)
}

async fn sdk_for(server: &MockServer) -> (BioLogreen, Arc<AtomicBool>) {
    let (face, detector) = face_toggle();
    let options = SdkOptions::new("flow-key")
        .with_base_url(server.base_url())
        .with_debounce(Duration::from_millis(50));
    let sdk = BioLogreen::new(options, Arc::new(Cameras), detector).await.unwrap();
    sdk.attach_camera(Arc::new(DiskCamera));
    (sdk, face)
}

/// Streams frames to the SDK until `done` resolves.
async fn with_frames<T>(sdk: &BioLogreen, done: impl std::future::Future<Output = T>) -> T {
    let processor = sdk.camera_props().frame_processor;
    let feeder = tokio::spawn(async move {
        let frame = Frame::new(DynamicImage::new_luma8(8, 8));
        loop {
            processor.process(&frame);
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    });
    let out = tokio::time::timeout(Duration::from_secs(10), done)
        .await
        .expect("capture did not finish");
    feeder.abort();
    out
}

#[tokio::test]
async fn login_round_trip_then_signup() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/login-face")
                .header("x-api-key", "flow-key")
                .body_contains("image_base64");
            then.status(200).json_body(json!({ "user_id": 42, "is_new_user": true }));
        })
        .await;
    let signup = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/signup-face")
                .body_contains("\"custom_fields\":{\"plan\":\"pro\"}");
            then.status(200).json_body(json!({
                "user_id": 43,
                "is_new_user": true,
                "custom_fields": { "plan": "pro" }
            }));
        })
        .await;

    let (sdk, _face) = sdk_for(&server).await;
    assert!(sdk.camera_props().is_active);

    let result = with_frames(&sdk, sdk.login_with_face()).await.unwrap();
    assert_eq!(result.user_id(), Some(42));
    assert_eq!(result.is_new_user(), Some(true));
    login.assert_async().await;

    // Back to idle: the next operation arms immediately.
    let options = SignupOptions::default().with_field("plan", "pro");
    let result = with_frames(&sdk, sdk.signup_with_face(Some(options))).await.unwrap();
    assert_eq!(result.user_id(), Some(43));
    signup.assert_async().await;

    let mut status = sdk.subscribe();
    status.wait_for(|s| !s.is_loading).await.unwrap();
    assert!(sdk.error().is_none());
}

#[tokio::test]
async fn server_detail_reaches_caller_and_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login-face");
            then.status(401).json_body(json!({ "detail": "invalid api key" }));
        })
        .await;

    let (sdk, _face) = sdk_for(&server).await;
    let err = with_frames(&sdk, sdk.login_with_face()).await.unwrap_err();
    assert_eq!(err.to_string(), "invalid api key");

    let mut status = sdk.subscribe();
    let settled = status.wait_for(|s| !s.is_loading).await.unwrap().clone();
    assert_eq!(settled.error.as_deref(), Some("invalid api key"));
}

#[tokio::test]
async fn concurrent_request_is_rejected_without_disturbing_the_first() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login-face");
            then.status(200).json_body(json!({ "user_id": 5, "is_new_user": false }));
        })
        .await;

    let (sdk, face) = sdk_for(&server).await;
    face.store(false, Ordering::SeqCst);

    let first = sdk.login_with_face();
    let second = sdk.signup_with_face(None).await;
    assert!(matches!(second, Err(FaceAuthError::Busy)));
    assert!(sdk.is_loading());

    face.store(true, Ordering::SeqCst);
    let result = with_frames(&sdk, first).await.unwrap();
    assert_eq!(result.user_id(), Some(5));
    assert_eq!(result.is_new_user(), Some(false));
}

#[tokio::test]
async fn unexpected_success_body_resolves_without_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login-face");
            then.status(200).json_body(json!({ "user_id": "u-42", "status": "ok" }));
        })
        .await;

    let (sdk, _face) = sdk_for(&server).await;
    let result = with_frames(&sdk, sdk.login_with_face()).await.unwrap();
    assert_eq!(result.get("user_id"), Some(&json!("u-42")));
    assert_eq!(result.user_id(), None);

    let mut status = sdk.subscribe();
    let settled = status.wait_for(|s| !s.is_loading).await.unwrap().clone();
    assert!(settled.error.is_none());
}
