//! Local checks on an image before it is uploaded.

use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

use crate::config::Config;

pub const NO_FILE_MESSAGE: &str = "No file selected";
pub const INVALID_TYPE_MESSAGE: &str =
    "Invalid file type. Please select a valid image file (JPEG, PNG, GIF, WebP).";

const MIB: u64 = 1024 * 1024;

/// An image held in memory, together with its declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, declaring its type from the extension.
    #[tracing::instrument]
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image file {}", path.display()))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let mime_type = mime_type_for_path(path);

        debug!("Read {} ({}, {} bytes)", name, mime_type, bytes.len());

        Ok(Self::new(name, mime_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Declared MIME type for a path, based only on its extension.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Checks a candidate upload against the configured limits.
///
/// Every violated rule contributes one message; an empty list means the file
/// may be uploaded.
pub fn validate_file(file: Option<&ImageFile>, config: &Config) -> Vec<String> {
    let Some(file) = file else {
        return vec![NO_FILE_MESSAGE.to_string()];
    };

    let mut errors = Vec::new();

    if !config.allowed_types.iter().any(|t| *t == file.mime_type) {
        errors.push(INVALID_TYPE_MESSAGE.to_string());
    }

    if file.size() > config.max_file_size {
        errors.push(format!(
            "File size too large. Maximum size is {}.",
            format_size(config.max_file_size)
        ));
    }

    errors
}

fn format_size(bytes: u64) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}
