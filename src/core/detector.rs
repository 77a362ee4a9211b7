use crate::common::Result;
use image::DynamicImage;

#[derive(Debug, Clone)]
pub struct FaceBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub confidence: f32,
}

/// One frame of the live camera stream.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: DynamicImage,
}

impl Frame {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }
}

/// Face detection over a single frame.
///
/// Runs inside the frame callback, so implementations must be callable from
/// whatever thread the camera host delivers frames on. Only the number of
/// returned boxes drives capture.
pub trait FaceDetector: Send + Sync {
    fn scan_faces(&self, frame: &Frame) -> Result<Vec<FaceBox>>;
}

impl<F> FaceDetector for F
where
    F: Fn(&Frame) -> Result<Vec<FaceBox>> + Send + Sync,
{
    fn scan_faces(&self, frame: &Frame) -> Result<Vec<FaceBox>> {
        self(frame)
    }
}
