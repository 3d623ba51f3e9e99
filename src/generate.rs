//! Request-level orchestration
//!
//! [`Generator`] validates a [`GenerationRequest`], picks a unique output name
//! under the configured output directory, runs the speech or video path and
//! returns an [`Artifact`] for the verified file. Concurrent generations are
//! bounded by a semaphore sized from `max_concurrent_renders`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{info, instrument};

use crate::artifact::{Artifact, ArtifactKind};
use crate::config::Config;
use crate::error::{GenerationError, Result};
use crate::request::GenerationRequest;
use crate::speech::SpeechSynthesizer;
use crate::video::VideoRenderer;

/// What `check_dependencies` found
#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
    pub ffmpeg_path: String,
    pub ffmpeg_available: bool,
    /// Face long texts would be drawn with
    pub font: String,
    pub output_dir: PathBuf,
    pub output_dir_writable: bool,
}

impl DependencyReport {
    /// Whether both generation paths can run
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ffmpeg_available && self.output_dir_writable
    }
}

/// Runs generation requests against one configuration.
#[derive(Debug)]
pub struct Generator {
    output_dir: PathBuf,
    speech: SpeechSynthesizer,
    video: VideoRenderer,
    permits: Semaphore,
}

impl Generator {
    /// Build the speech and video backends and create the output directory.
    pub fn new(config: &Config) -> Result<Self> {
        let speech = SpeechSynthesizer::from_config(&config.speech)?;
        let video = VideoRenderer::from_app_config(config);
        Self::with_backends(config, speech, video)
    }

    /// Use pre-built backends
    pub fn with_backends(
        config: &Config,
        speech: SpeechSynthesizer,
        video: VideoRenderer,
    ) -> Result<Self> {
        std::fs::create_dir_all(&config.output_dir)?;
        Ok(Self {
            output_dir: config.output_dir.clone(),
            speech,
            video,
            permits: Semaphore::new(config.max_concurrent_renders.max(1)),
        })
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn video(&self) -> &VideoRenderer {
        &self.video
    }

    /// Generate into a freshly named file under the output directory.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Artifact> {
        let kind = kind_of(request);
        let path = self.output_dir.join(kind.unique_file_name());
        self.generate_to(request, &path).await
    }

    /// Generate into `path`.
    #[instrument(skip(self, request, path), fields(kind = ?kind_of(request), path = %path.display()))]
    pub async fn generate_to(&self, request: &GenerationRequest, path: &Path) -> Result<Artifact> {
        request.validate()?;

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| GenerationError::Io(std::io::Error::other("generator is shut down")))?;

        match request {
            GenerationRequest::Audio { text } => {
                self.speech.try_synthesize(text, path).await?;
            }
            GenerationRequest::Video { text, style } => {
                self.video
                    .try_render(
                        text,
                        path,
                        &style.background,
                        &style.text_color,
                        style.duration.seconds(),
                    )
                    .await?;
            }
        }

        let artifact = Artifact::from_output(kind_of(request), path, request.text()).await?;
        info!(
            "Generated {} ({:.2} MB)",
            artifact.file_name,
            artifact.size_mb()
        );
        Ok(artifact)
    }

    /// Probe the encoder, fonts and output directory.
    pub async fn check_dependencies(&self) -> DependencyReport {
        let encoder = self.video.encoder();
        let output_dir_writable = tempfile::Builder::new()
            .prefix(".textcast-probe-")
            .tempfile_in(&self.output_dir)
            .is_ok();

        DependencyReport {
            ffmpeg_path: encoder.config().ffmpeg_path.clone(),
            ffmpeg_available: encoder.check_available().await,
            font: self.video.resolve_font("").describe(),
            output_dir: self.output_dir.clone(),
            output_dir_writable,
        }
    }
}

fn kind_of(request: &GenerationRequest) -> ArtifactKind {
    match request {
        GenerationRequest::Audio { .. } => ArtifactKind::Audio,
        GenerationRequest::Video { .. } => ArtifactKind::Video,
    }
}
