//! ffmpeg-based encoder turning a frame sequence into an H.264 MP4
//!
//! Any binary that accepts the same flags can stand in for ffmpeg.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use super::frame::FrameSequence;
use crate::config::VideoConfig;
use crate::error::{GenerationError, Result};

/// Configuration for the encoder
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Path to ffmpeg binary
    pub ffmpeg_path: String,
    /// Wall-clock limit for one run
    pub timeout: Duration,
    /// Video codec
    pub video_codec: String,
    /// x264 preset
    pub preset: String,
    /// Constant rate factor
    pub crf: u8,
    /// Output pixel format
    pub pixel_format: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::from(&VideoConfig::default())
    }
}

impl From<&VideoConfig> for EncoderConfig {
    fn from(video: &VideoConfig) -> Self {
        Self {
            ffmpeg_path: video.ffmpeg_path.clone(),
            timeout: video.encoder_timeout(),
            video_codec: "libx264".to_string(),
            preset: "fast".to_string(),
            crf: 28,
            pixel_format: "yuv420p".to_string(),
        }
    }
}

impl EncoderConfig {
    /// Override the binary
    #[must_use]
    pub fn with_ffmpeg_path(mut self, path: &str) -> Self {
        self.ffmpeg_path = path.to_string();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// ffmpeg wrapper
#[derive(Debug, Clone)]
pub struct Encoder {
    config: EncoderConfig,
}

impl Encoder {
    #[must_use]
    pub fn with_config(config: EncoderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Check if ffmpeg is available
    pub async fn check_available(&self) -> bool {
        Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Build ffmpeg arguments
    pub(crate) fn build_args(
        &self,
        pattern: &Path,
        fps: u32,
        duration_secs: u32,
        output: &Path,
    ) -> Vec<String> {
        let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error", "-y"]
            .iter()
            .map(std::string::ToString::to_string)
            .collect();

        // Input: numbered PNG sequence at a fixed rate
        args.push("-framerate".to_string());
        args.push(fps.to_string());
        args.push("-i".to_string());
        args.push(pattern.to_string_lossy().to_string());

        args.push("-c:v".to_string());
        args.push(self.config.video_codec.clone());
        args.push("-preset".to_string());
        args.push(self.config.preset.clone());
        args.push("-crf".to_string());
        args.push(self.config.crf.to_string());
        args.push("-pix_fmt".to_string());
        args.push(self.config.pixel_format.clone());

        args.push("-t".to_string());
        args.push(duration_secs.to_string());

        args.push(output.to_string_lossy().to_string());
        args
    }

    /// Encode `frames` into `output`, killing the process on timeout.
    pub async fn encode(
        &self,
        frames: &FrameSequence,
        fps: u32,
        duration_secs: u32,
        output: &Path,
    ) -> Result<()> {
        let args = self.build_args(&frames.pattern(), fps, duration_secs, output);
        debug!("ffmpeg args: {:?}", args);

        let child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GenerationError::EncoderUnavailable(format!("{}: {e}", self.config.ffmpeg_path))
            })?;

        // Dropping the future on timeout drops the child, which kills it.
        let output_result = tokio::time::timeout(self.config.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                warn!("ffmpeg exceeded {:?}, killed", self.config.timeout);
                GenerationError::EncoderTimeout(self.config.timeout.as_secs())
            })??;

        if !output_result.status.success() {
            let stderr = String::from_utf8_lossy(&output_result.stderr).trim().to_string();
            return Err(GenerationError::Encoder {
                status: output_result.status.to_string(),
                stderr,
            });
        }

        info!("Encoded {} frames to {:?}", frames.count, output);
        Ok(())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::with_config(EncoderConfig::default())
    }
}
