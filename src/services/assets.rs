//! Uploaded image storage on the local filesystem.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Stores article images under a single public directory, named by upload
/// timestamp so filenames never collide with user input.
#[derive(Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).context("Failed to create images directory")?;
        Ok(Self { root })
    }

    /// Extracts and validates the extension of an uploaded filename.
    pub fn validate_extension(original_name: &str) -> Result<String, String> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| "File has no extension".to_string())?;

        if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            Ok(ext)
        } else {
            Err(format!(
                "Unsupported image type '.{ext}', expected one of: png, jpg, jpeg"
            ))
        }
    }

    /// Writes `bytes` under a timestamp-derived name and returns that name.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let ext = Self::validate_extension(original_name)
            .map_err(|e| anyhow::anyhow!(e))?;
        let filename = format!("{}.{ext}", chrono::Utc::now().timestamp_millis());

        tokio::fs::write(self.root.join(&filename), bytes)
            .await
            .context("Failed to write image file")?;

        Ok(filename)
    }

    /// Best-effort removal; a missing file is not an error.
    pub async fn delete(&self, filename: &str) -> Result<()> {
        match tokio::fs::remove_file(self.root.join(filename)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to delete image file"),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}
