use std::path::{Path, PathBuf};

use reqwest::multipart::Part;

use super::ApiError;

/// An image picked on a training or menu-item form, sent as the `image`
/// multipart part.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Read an image from disk, guessing its content type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        let mime = Self::check_path(path)?;
        let bytes = std::fs::read(path)
            .map_err(|e| ApiError::Validation(format!("Could not read {}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self { file_name, mime, bytes })
    }

    /// Read `path` on the blocking pool so the caller's task never waits on
    /// the filesystem.
    pub async fn load(path: PathBuf) -> Result<Self, ApiError> {
        tokio::task::spawn_blocking(move || Self::from_path(&path))
            .await
            .map_err(|e| ApiError::Validation(format!("Could not read image: {}", e)))?
    }

    /// Content type for `path`, or a validation error for unsupported files.
    /// Does not touch the filesystem.
    pub fn check_path(path: &Path) -> Result<&'static str, ApiError> {
        Self::mime_for(path).ok_or_else(|| {
            ApiError::Validation(format!(
                "{} is not a supported image (jpg, png, gif, webp)",
                path.display()
            ))
        })
    }

    fn mime_for(path: &Path) -> Option<&'static str> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            _ => None,
        }
    }

    pub(crate) fn into_part(self) -> Result<Part, ApiError> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(self.mime)?)
    }
}
