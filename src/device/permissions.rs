//! Camera permission check.
//!
//! There is no permission dialog in a terminal; "granted" means the camera
//! device node can be opened by this user.

use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// The user switched the camera off in config; don't ask again.
    NeverAskAgain,
}

#[derive(Debug)]
pub enum PermissionError {
    Io(String),
}

impl fmt::Display for PermissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionError::Io(msg) => write!(f, "permission check failed: {msg}"),
        }
    }
}

impl std::error::Error for PermissionError {}

#[async_trait]
pub trait PermissionGate: Send + Sync {
    async fn request_camera(&self) -> Result<PermissionStatus, PermissionError>;
}

/// Checks access to a video device node such as `/dev/video0`.
pub struct DevicePermissions {
    device: PathBuf,
    enabled: bool,
}

impl DevicePermissions {
    pub fn new(device: PathBuf, enabled: bool) -> Self {
        Self { device, enabled }
    }
}

#[async_trait]
impl PermissionGate for DevicePermissions {
    async fn request_camera(&self) -> Result<PermissionStatus, PermissionError> {
        if !self.enabled {
            return Ok(PermissionStatus::NeverAskAgain);
        }
        match tokio::fs::File::open(&self.device).await {
            Ok(_) => Ok(PermissionStatus::Granted),
            Err(e) if matches!(e.kind(), ErrorKind::PermissionDenied | ErrorKind::NotFound) => {
                debug!("Camera device {} unavailable: {}", self.device.display(), e);
                Ok(PermissionStatus::Denied)
            }
            Err(e) => Err(PermissionError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_camera_never_asks() {
        let gate = DevicePermissions::new(PathBuf::from("/dev/video0"), false);
        assert_eq!(
            gate.request_camera().await.unwrap(),
            PermissionStatus::NeverAskAgain
        );
    }

    #[tokio::test]
    async fn test_missing_device_is_denied() {
        let dir = tempfile::tempdir().unwrap();
        let gate = DevicePermissions::new(dir.path().join("video9"), true);
        assert_eq!(gate.request_camera().await.unwrap(), PermissionStatus::Denied);
    }

    #[tokio::test]
    async fn test_readable_device_is_granted() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let gate = DevicePermissions::new(file.path().to_path_buf(), true);
        assert_eq!(
            gate.request_camera().await.unwrap(),
            PermissionStatus::Granted
        );
    }
}
