//! Generated file metadata
//!
//! An artifact is created only after the output file has been verified
//! non-empty. Persisting it is the caller's business.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Audio,
    Video,
}

impl ArtifactKind {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            // The hosted provider returns MP3 frames
            Self::Audio => "mp3",
            Self::Video => "mp4",
        }
    }

    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }

    /// `audio_1a2b3c4d.mp3` style name, unique per call
    #[must_use]
    pub fn unique_file_name(self) -> String {
        let id = uuid::Uuid::new_v4().simple().to_string();
        format!("{}_{}.{}", self.prefix(), &id[..8], self.extension())
    }
}

/// A generated file plus what is known about it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub source_text: String,
    pub created_at: DateTime<Utc>,
}

impl Artifact {
    /// Build from a verified output file, reading its size from disk.
    pub async fn from_output(kind: ArtifactKind, path: &Path, source_text: &str) -> std::io::Result<Self> {
        let size_bytes = tokio::fs::metadata(path).await?.len();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self {
            kind,
            file_name,
            path: path.to_path_buf(),
            size_bytes,
            source_text: source_text.to_string(),
            created_at: Utc::now(),
        })
    }

    /// Size in megabytes, rounded to two decimals
    #[must_use]
    pub fn size_mb(&self) -> f64 {
        size_mb(self.size_bytes)
    }
}

#[must_use]
pub fn size_mb(bytes: u64) -> f64 {
    (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
}
