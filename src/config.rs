//! Configuration loaded from `~/.config/textcast/config.toml`.
//!
//! Every field has a default, so an absent file is not an error. A file that
//! exists but fails to parse is.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Font files tried in order before falling back to the built-in face.
pub const DEFAULT_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Arial.ttf",
    "/Windows/Fonts/arial.ttf",
];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory generated artifacts are written to
    pub output_dir: PathBuf,
    /// Parent for temporary frame directories (system temp dir when unset)
    pub work_dir: Option<PathBuf>,
    /// Upper bound on generations running at the same time
    pub max_concurrent_renders: usize,
    pub speech: SpeechConfig,
    pub video: VideoConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("generated"),
            work_dir: None,
            max_concurrent_renders: 1,
            speech: SpeechConfig::default(),
            video: VideoConfig::default(),
        }
    }
}

/// Hosted text-to-speech provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// `translate_tts` compatible endpoint
    pub endpoint: String,
    /// Language code passed as `tl`
    pub language: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Longest chunk the provider accepts in one request
    pub chunk_chars: usize,
    pub user_agent: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.google.com/translate_tts".to_string(),
            language: "en".to_string(),
            timeout_secs: 30,
            chunk_chars: 100,
            user_agent: concat!("Mozilla/5.0 (compatible; textcast/", env!("CARGO_PKG_VERSION"), ")")
                .to_string(),
        }
    }
}

impl SpeechConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Frame rendering and encoder settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Path to ffmpeg (or any binary honouring the same flags)
    pub ffmpeg_path: String,
    /// Wall-clock limit for one encoder run
    pub encoder_timeout_secs: u64,
    /// Ordered font file candidates
    pub fonts: Vec<PathBuf>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: which::which("ffmpeg").map_or_else(
                |_| "ffmpeg".to_string(),
                |p| p.to_string_lossy().to_string(),
            ),
            encoder_timeout_secs: 60,
            fonts: DEFAULT_FONTS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl VideoConfig {
    #[must_use]
    pub fn encoder_timeout(&self) -> Duration {
        Duration::from_secs(self.encoder_timeout_secs)
    }
}

impl Config {
    /// Load from an explicit path, or from the default location.
    ///
    /// An explicit path must exist. The default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = config_path();
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid TOML in {}", path.display()))?;

        if config.max_concurrent_renders == 0 {
            anyhow::bail!(
                "max_concurrent_renders must be at least 1 in {}",
                path.display()
            );
        }

        Ok(config)
    }
}

/// Return the path to the default config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("textcast")
        .join("config.toml")
}
