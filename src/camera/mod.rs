//! Camera collaborator contracts.
//!
//! The SDK never renders or drives a camera itself. The host application hands
//! it a [`CameraSubsystem`] (device lookup + permissions) and, once the camera
//! surface is mounted, a [`Camera`] that can take still photos.

use crate::common::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraPosition {
    #[default]
    Front,
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub id: String,
    pub name: String,
    pub position: CameraPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    NotDetermined,
    Denied,
    Restricted,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Reference to a still photo written to disk by the camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[async_trait]
pub trait CameraSubsystem: Send + Sync {
    fn device(&self, position: CameraPosition) -> Option<CameraDevice>;

    fn permission_status(&self) -> PermissionStatus;

    async fn request_permission(&self) -> PermissionStatus;
}

/// A mounted camera surface capable of still capture.
#[async_trait]
pub trait Camera: Send + Sync {
    async fn take_photo(&self) -> Result<PhotoFile>;
}
