//! Image picker: camera capture and gallery selection.
//!
//! `CommandPicker` shells out to user-configurable programs, since a terminal
//! has no built-in camera or file dialog:
//!
//! - camera: the command writes a capture to `{output}`, which is deleted
//!   again once it has been read
//! - gallery: the command prints the chosen path on stdout
//!
//! Either command may be cancelled, which yields a response with no assets.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use base64::{Engine, prelude::BASE64_STANDARD};
use log::{debug, info, warn};
use uuid::Uuid;

/// Where the user wants the image to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Camera,
    Gallery,
}

impl ImageSource {
    pub fn label(self) -> &'static str {
        match self {
            ImageSource::Camera => "camera",
            ImageSource::Gallery => "gallery",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MediaType {
    Photo,
    Video,
    #[default]
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOptions {
    pub media_type: MediaType,
    pub include_base64: bool,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            media_type: MediaType::Mixed,
            include_base64: true,
        }
    }
}

/// One picked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// File contents, present when `include_base64` was requested.
    pub base64: Option<String>,
    pub mime_type: Option<String>,
    /// Displayable location, `file://...`.
    pub uri: String,
    pub file_name: Option<String>,
}

/// Empty `assets` means the user cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickerResponse {
    pub assets: Vec<Asset>,
}

#[derive(Debug)]
pub enum PickError {
    /// The picker program could not be started or its output read.
    Io(String),
    /// The picker program failed.
    Command { status: Option<i32>, stderr: String },
    /// The file is not of the requested media type.
    Unsupported(String),
    /// The asset lacks a field needed to attach it.
    MissingData(&'static str),
}

impl fmt::Display for PickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickError::Io(msg) => write!(f, "picker I/O error: {msg}"),
            PickError::Command { status, stderr } => match status {
                Some(code) => write!(f, "picker exited with status {code}: {stderr}"),
                None => write!(f, "picker terminated by signal: {stderr}"),
            },
            PickError::Unsupported(what) => write!(f, "unsupported media: {what}"),
            PickError::MissingData(field) => write!(f, "picked asset has no {field}"),
        }
    }
}

impl std::error::Error for PickError {}

#[async_trait]
pub trait ImagePicker: Send + Sync {
    async fn launch_camera(&self, options: &PickerOptions) -> Result<PickerResponse, PickError>;

    async fn launch_image_library(
        &self,
        options: &PickerOptions,
    ) -> Result<PickerResponse, PickError>;
}

// ============================================================================
// Asset loading
// ============================================================================

/// Guess a mime type from the file extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "bmp" => "image/bmp",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mpeg" | "mpg" => "video/mpeg",
        "3gp" => "video/3gpp",
        _ => return None,
    };
    Some(mime)
}

fn accepts(media_type: MediaType, mime: &str) -> bool {
    match media_type {
        MediaType::Photo => mime.starts_with("image/"),
        MediaType::Video => mime.starts_with("video/"),
        MediaType::Mixed => true,
    }
}

/// Read a file from disk into an `Asset`.
pub async fn load_asset(path: &Path, options: &PickerOptions) -> Result<Asset, PickError> {
    let mime = mime_for_path(path)
        .ok_or_else(|| PickError::Unsupported(path.display().to_string()))?;
    if !accepts(options.media_type, mime) {
        return Err(PickError::Unsupported(format!(
            "{} is {mime}, expected {:?}",
            path.display(),
            options.media_type
        )));
    }

    let base64 = if options.include_base64 {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PickError::Io(format!("{}: {e}", path.display())))?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Some(BASE64_STANDARD.encode(&bytes))
    } else {
        None
    };

    Ok(Asset {
        base64,
        mime_type: Some(mime.to_string()),
        uri: format!("file://{}", path.display()),
        file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
    })
}

// ============================================================================
// Command-backed picker
// ============================================================================

pub struct CommandPicker {
    camera_command: String,
    gallery_command: String,
    capture_dir: PathBuf,
}

impl CommandPicker {
    pub fn new(camera_command: String, gallery_command: String) -> Self {
        Self {
            camera_command,
            gallery_command,
            capture_dir: std::env::temp_dir(),
        }
    }

    /// Directory camera captures are written to (defaults to the system temp dir).
    pub fn with_capture_dir(mut self, dir: PathBuf) -> Self {
        self.capture_dir = dir;
        self
    }

    async fn run(command: &str) -> Result<Option<String>, PickError> {
        debug!("Running picker command: {}", command);
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| PickError::Io(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if output.status.success() {
            return Ok(Some(stdout));
        }
        // Dialogs exit non-zero without output when the user cancels
        if stdout.trim().is_empty() && stderr.is_empty() {
            info!("Picker command cancelled (status {:?})", output.status.code());
            return Ok(None);
        }
        warn!("Picker command failed: {:?} {}", output.status.code(), stderr);
        Err(PickError::Command {
            status: output.status.code(),
            stderr,
        })
    }
}

/// Quote a path for `sh -c`.
fn shell_quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', r"'\''"))
}

/// First non-empty stdout line as a path; accepts `file://` URIs.
fn path_from_stdout(stdout: &str) -> Option<PathBuf> {
    let line = stdout.lines().map(str::trim).find(|l| !l.is_empty())?;
    let line = line.strip_prefix("file://").unwrap_or(line);
    Some(PathBuf::from(line))
}

/// Remove a camera capture once its bytes have been read (or the pick failed).
async fn discard_capture(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Removed capture {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove capture {}: {}", path.display(), e),
    }
}

#[async_trait]
impl ImagePicker for CommandPicker {
    async fn launch_camera(&self, options: &PickerOptions) -> Result<PickerResponse, PickError> {
        let output = self
            .capture_dir
            .join(format!("plif-capture-{}.jpg", Uuid::new_v4()));
        let command = self
            .camera_command
            .replace("{output}", &shell_quote(&output));

        let result = match Self::run(&command).await {
            Ok(Some(_)) if output.exists() => load_asset(&output, options)
                .await
                .map(|asset| PickerResponse {
                    assets: vec![asset],
                }),
            Ok(_) => Ok(PickerResponse::default()),
            Err(e) => Err(e),
        };
        discard_capture(&output).await;
        result
    }

    async fn launch_image_library(
        &self,
        options: &PickerOptions,
    ) -> Result<PickerResponse, PickError> {
        let Some(stdout) = Self::run(&self.gallery_command).await? else {
            return Ok(PickerResponse::default());
        };
        let Some(path) = path_from_stdout(&stdout) else {
            return Ok(PickerResponse::default());
        };
        let asset = load_asset(&path, options).await?;
        Ok(PickerResponse {
            assets: vec![asset],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a.PNG")), Some("image/png"));
        assert_eq!(mime_for_path(Path::new("/x/y.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("clip.mov")), Some("video/quicktime"));
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("noext")), None);
    }

    #[test]
    fn test_path_from_stdout() {
        assert_eq!(
            path_from_stdout("\n/home/me/cat.png\n"),
            Some(PathBuf::from("/home/me/cat.png"))
        );
        assert_eq!(
            path_from_stdout("file:///tmp/a.jpg"),
            Some(PathBuf::from("/tmp/a.jpg"))
        );
        assert_eq!(path_from_stdout("  \n"), None);
    }

    #[test]
    fn test_shell_quote_escapes_single_quotes() {
        assert_eq!(shell_quote(Path::new("/tmp/it's.jpg")), r"'/tmp/it'\''s.jpg'");
    }

    #[tokio::test]
    async fn test_load_asset_encodes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.png");
        std::fs::write(&path, b"abc").unwrap();

        let asset = load_asset(&path, &PickerOptions::default()).await.unwrap();
        assert_eq!(asset.base64.as_deref(), Some("YWJj"));
        assert_eq!(asset.mime_type.as_deref(), Some("image/png"));
        assert_eq!(asset.uri, format!("file://{}", path.display()));
        assert_eq!(asset.file_name.as_deref(), Some("x.png"));
    }

    #[tokio::test]
    async fn test_load_asset_without_base64() {
        let asset = load_asset(
            Path::new("/does/not/matter.jpg"),
            &PickerOptions {
                include_base64: false,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(asset.base64.is_none());
    }

    #[tokio::test]
    async fn test_load_asset_rejects_wrong_media() {
        let options = PickerOptions {
            media_type: MediaType::Photo,
            include_base64: false,
        };
        let err = load_asset(Path::new("clip.mp4"), &options).await.unwrap_err();
        assert!(matches!(err, PickError::Unsupported(_)));

        let err = load_asset(Path::new("notes.txt"), &PickerOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PickError::Unsupported(_)));
    }

    #[tokio::test]
    async fn test_gallery_command_returns_asset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pic.jpg");
        std::fs::write(&path, b"jpegbytes").unwrap();

        let picker = CommandPicker::new(
            "false".to_string(),
            format!("printf '%s\\n' {}", shell_quote(&path)),
        );
        let response = picker
            .launch_image_library(&PickerOptions::default())
            .await
            .unwrap();
        assert_eq!(response.assets.len(), 1);
        assert_eq!(response.assets[0].mime_type.as_deref(), Some("image/jpeg"));
        assert_eq!(
            response.assets[0].base64.as_deref(),
            Some(BASE64_STANDARD.encode(b"jpegbytes").as_str())
        );
    }

    #[tokio::test]
    async fn test_cancelled_gallery_has_no_assets() {
        let picker = CommandPicker::new("true".to_string(), "exit 1".to_string());
        let response = picker
            .launch_image_library(&PickerOptions::default())
            .await
            .unwrap();
        assert!(response.assets.is_empty());

        let picker = CommandPicker::new("true".to_string(), "true".to_string());
        let response = picker
            .launch_image_library(&PickerOptions::default())
            .await
            .unwrap();
        assert!(response.assets.is_empty());
    }

    #[tokio::test]
    async fn test_failing_gallery_reports_stderr() {
        let picker = CommandPicker::new(
            "true".to_string(),
            "echo 'no display' >&2; exit 3".to_string(),
        );
        let err = picker
            .launch_image_library(&PickerOptions::default())
            .await
            .unwrap_err();
        match err {
            PickError::Command { status, stderr } => {
                assert_eq!(status, Some(3));
                assert_eq!(stderr, "no display");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_gallery_pick_of_missing_file_is_error() {
        let picker = CommandPicker::new(
            "true".to_string(),
            "echo /definitely/missing/file.png".to_string(),
        );
        let err = picker
            .launch_image_library(&PickerOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PickError::Io(_)));
    }

    #[tokio::test]
    async fn test_camera_command_writes_capture() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.jpg");
        std::fs::write(&source, b"frame").unwrap();

        let picker = CommandPicker::new(
            format!("cp {} {{output}}", shell_quote(&source)),
            "true".to_string(),
        )
        .with_capture_dir(dir.path().to_path_buf());
        let response = picker.launch_camera(&PickerOptions::default()).await.unwrap();

        assert_eq!(response.assets.len(), 1);
        let asset = &response.assets[0];
        assert_eq!(asset.mime_type.as_deref(), Some("image/jpeg"));
        assert!(asset.uri.contains("plif-capture-"));
        assert_eq!(asset.base64.as_deref(), Some(BASE64_STANDARD.encode(b"frame").as_str()));
    }

    fn leftover_captures(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|p| p.to_string_lossy().contains("plif-capture-"))
            .collect()
    }

    #[tokio::test]
    async fn test_camera_capture_removed_after_read() {
        let dir = tempfile::tempdir().unwrap();
        let picker = CommandPicker::new("printf frame > {output}".to_string(), "true".to_string())
            .with_capture_dir(dir.path().to_path_buf());
        let response = picker.launch_camera(&PickerOptions::default()).await.unwrap();

        assert_eq!(response.assets.len(), 1);
        assert_eq!(
            response.assets[0].base64.as_deref(),
            Some(BASE64_STANDARD.encode(b"frame").as_str())
        );
        assert!(leftover_captures(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_camera_capture_removed_when_command_fails() {
        let dir = tempfile::tempdir().unwrap();
        let picker = CommandPicker::new(
            "touch {output}; echo 'camera busy' >&2; exit 2".to_string(),
            "true".to_string(),
        )
        .with_capture_dir(dir.path().to_path_buf());
        let err = picker
            .launch_camera(&PickerOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, PickError::Command { status: Some(2), .. }));
        assert!(leftover_captures(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_camera_capture_removed_when_load_fails() {
        let dir = tempfile::tempdir().unwrap();
        let picker = CommandPicker::new("touch {output}".to_string(), "true".to_string())
            .with_capture_dir(dir.path().to_path_buf());
        let options = PickerOptions {
            media_type: MediaType::Video,
            include_base64: true,
        };
        let err = picker.launch_camera(&options).await.unwrap_err();

        assert!(matches!(err, PickError::Unsupported(_)));
        assert!(leftover_captures(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_camera_without_capture_has_no_assets() {
        let dir = tempfile::tempdir().unwrap();
        let picker = CommandPicker::new("true".to_string(), "true".to_string())
            .with_capture_dir(dir.path().to_path_buf());
        let response = picker.launch_camera(&PickerOptions::default()).await.unwrap();
        assert!(response.assets.is_empty());
    }
}
