//! Text-on-background video clips
//!
//! Renders a still text frame at 640x360, writes it as a 15 fps PNG sequence
//! into a private temporary directory, and hands the sequence to ffmpeg.
//!
//! # Example
//!
//! ```rust,no_run
//! use textcast::video::VideoRenderer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let renderer = VideoRenderer::default();
//!     let ok = renderer
//!         .render_video("Hello World", "hello.mp4".as_ref(), "#000000", "#FFFFFF", 5)
//!         .await;
//!     println!("rendered: {ok}");
//! }
//! ```

pub mod bitmap;
pub mod color;
pub mod encoder;
pub mod font;
pub mod frame;
pub mod wrap;

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

pub use color::HexColor;
pub use encoder::{Encoder, EncoderConfig};
pub use font::{font_size_for, FontFace};
pub use frame::{FrameSequence, FrameSpec, TextLayout};
pub use wrap::wrap_text;

use crate::config::{Config, VideoConfig};
use crate::error::{GenerationError, Result};

/// Outcome of a successful render
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub output: PathBuf,
    pub size_bytes: u64,
    /// Frames written before the encoder ran
    pub frames: usize,
    pub font: String,
    pub elapsed_secs: f64,
}

/// Video renderer
#[derive(Debug, Clone)]
pub struct VideoRenderer {
    spec: FrameSpec,
    fonts: Vec<PathBuf>,
    encoder: Encoder,
    work_dir: Option<PathBuf>,
}

impl Default for VideoRenderer {
    fn default() -> Self {
        Self::from_config(&VideoConfig::default(), None)
    }
}

impl VideoRenderer {
    /// Build from the `[video]` section plus the optional scratch root
    #[must_use]
    pub fn from_config(video: &VideoConfig, work_dir: Option<PathBuf>) -> Self {
        Self {
            spec: FrameSpec::default(),
            fonts: video.fonts.clone(),
            encoder: Encoder::with_config(EncoderConfig::from(video)),
            work_dir,
        }
    }

    #[must_use]
    pub fn from_app_config(config: &Config) -> Self {
        Self::from_config(&config.video, config.work_dir.clone())
    }

    /// Replace the encoder
    #[must_use]
    pub fn with_encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Directory under which frame directories are created
    #[must_use]
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_fonts(mut self, fonts: Vec<PathBuf>) -> Self {
        self.fonts = fonts;
        self
    }

    #[must_use]
    pub fn spec(&self) -> FrameSpec {
        self.spec
    }

    #[must_use]
    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// The face a text would be drawn with
    #[must_use]
    pub fn resolve_font(&self, text: &str) -> FontFace {
        FontFace::resolve(&self.fonts, font_size_for(text))
    }

    /// Render `text` into an MP4 at `output`.
    ///
    /// Returns `true` only when the encoder exited cleanly and `output` is a
    /// non-empty file. Failures are logged, never propagated.
    pub async fn render_video(
        &self,
        text: &str,
        output: &Path,
        background: &str,
        text_color: &str,
        duration_secs: u32,
    ) -> bool {
        match self
            .try_render(text, output, background, text_color, duration_secs)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                error!(kind = %e.kind(), "Error generating video: {e}");
                false
            }
        }
    }

    /// Render with the failure cause preserved.
    ///
    /// The frame directory is removed on every path out of this function.
    #[instrument(skip(self, text, output), fields(chars = text.chars().count(), output = %output.display()))]
    pub async fn try_render(
        &self,
        text: &str,
        output: &Path,
        background: &str,
        text_color: &str,
        duration_secs: u32,
    ) -> Result<RenderReport> {
        let start = Instant::now();

        let background: HexColor = background.parse()?;
        let text_color: HexColor = text_color.parse()?;
        if duration_secs == 0 {
            return Err(GenerationError::InvalidRequest(
                "duration must be positive".to_string(),
            ));
        }
        if text.trim().is_empty() {
            return Err(GenerationError::InvalidRequest("text is empty".to_string()));
        }

        info!("Starting video generation");

        let frames_dir = self.frames_dir()?;
        debug!("Frame directory {:?}", frames_dir.path());

        let spec = self.spec;
        let count = spec.frame_count(duration_secs);
        let fonts = self.fonts.clone();
        let owned_text = text.to_string();
        let dir = frames_dir.path().to_path_buf();

        let (sequence, font) = tokio::task::spawn_blocking(move || -> Result<(FrameSequence, String)> {
            let face = FontFace::resolve(&fonts, font_size_for(&owned_text));
            let layout = TextLayout::new(&owned_text, &face, &spec);
            let image = frame::compose_frame(
                &layout,
                &face,
                &spec,
                background.to_rgb(),
                text_color.to_rgb(),
            )?;
            let sequence = frame::write_sequence(&image, &dir, count)?;
            Ok((sequence, face.describe()))
        })
        .await
        .map_err(|e| {
            if e.is_panic() {
                GenerationError::Render("frame rasterization panicked".to_string())
            } else {
                GenerationError::Render(format!("frame task failed: {e}"))
            }
        })??;

        debug!("Wrote {} frames using {}", sequence.count, font);

        if let Err(e) = self
            .encoder
            .encode(&sequence, spec.fps, duration_secs, output)
            .await
        {
            // Never leave a partial video behind
            let _ = tokio::fs::remove_file(output).await;
            return Err(e);
        }

        let size_bytes = match tokio::fs::metadata(output).await {
            Ok(meta) if meta.len() > 0 => meta.len(),
            _ => {
                let _ = tokio::fs::remove_file(output).await;
                return Err(GenerationError::EmptyOutput(output.to_path_buf()));
            }
        };

        if let Err(e) = frames_dir.close() {
            warn!("Failed to remove frame directory: {e}");
        }

        let elapsed_secs = start.elapsed().as_secs_f64();
        info!("Video generation completed in {:.2}s", elapsed_secs);

        Ok(RenderReport {
            output: output.to_path_buf(),
            size_bytes,
            frames: sequence.count,
            font,
            elapsed_secs,
        })
    }

    fn frames_dir(&self) -> Result<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("textcast-frames-");
        let dir = match &self.work_dir {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        Ok(dir)
    }
}
