//! Generation errors
//!
//! Every failure inside the speech and video paths is one of these variants.
//! Callers that only want the boolean outcome use the `synthesize` /
//! `render_video` wrappers, which log the error and collapse it to `false`.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse failure classes, one per row of the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network or provider failure in speech synthesis
    Upstream,
    /// Allocation failure while rasterizing frames
    ResourceExhausted,
    /// Encoder missing, non-zero exit, or timeout
    ExternalProcess,
    /// The call "succeeded" but the output file is missing or empty
    OutputVerification,
    /// Malformed color, empty text, zero duration, ...
    InvalidInput,
    /// Disk IO, image encoding, panics in the raster task
    Internal,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Upstream => "upstream",
            Self::ResourceExhausted => "resource-exhausted",
            Self::ExternalProcess => "external-process",
            Self::OutputVerification => "output-verification",
            Self::InvalidInput => "invalid-input",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Speech provider error: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Out of memory: {0}")]
    OutOfMemory(String),

    #[error("Rasterization failed: {0}")]
    Render(String),

    #[error("Invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Encoder unavailable: {0}")]
    EncoderUnavailable(String),

    #[error("Encoder exited with {status}: {stderr}")]
    Encoder { status: String, stderr: String },

    #[error("Encoder timed out after {0}s")]
    EncoderTimeout(u64),

    #[error("Output missing or empty: {}", .0.display())]
    EmptyOutput(PathBuf),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerationError {
    /// Which taxonomy class this error falls into
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Provider(_) | Self::Http(_) => FailureKind::Upstream,
            Self::OutOfMemory(_) => FailureKind::ResourceExhausted,
            Self::EncoderUnavailable(_) | Self::Encoder { .. } | Self::EncoderTimeout(_) => {
                FailureKind::ExternalProcess
            }
            Self::EmptyOutput(_) => FailureKind::OutputVerification,
            Self::InvalidColor(_) | Self::InvalidRequest(_) => FailureKind::InvalidInput,
            Self::Render(_) | Self::Font(_) | Self::Image(_) | Self::Io(_) => FailureKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            GenerationError::Provider("503".into()).kind(),
            FailureKind::Upstream
        );
        assert_eq!(
            GenerationError::EncoderTimeout(60).kind(),
            FailureKind::ExternalProcess
        );
        assert_eq!(
            GenerationError::EmptyOutput(PathBuf::from("/tmp/x.mp4")).kind(),
            FailureKind::OutputVerification
        );
        assert_eq!(
            GenerationError::InvalidColor("#ZZZZZZ".into()).kind(),
            FailureKind::InvalidInput
        );
        assert_eq!(
            GenerationError::OutOfMemory("frame buffer".into()).kind(),
            FailureKind::ResourceExhausted
        );
    }

    #[test]
    fn test_display_messages() {
        let err = GenerationError::Encoder {
            status: "exit status: 1".into(),
            stderr: "Unknown encoder 'libx264'".into(),
        };
        assert_eq!(
            err.to_string(),
            "Encoder exited with exit status: 1: Unknown encoder 'libx264'"
        );
        assert_eq!(FailureKind::ExternalProcess.to_string(), "external-process");
    }
}
