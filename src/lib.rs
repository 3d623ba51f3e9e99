//! `textcast` - Text to speech audio and text-on-background video clips
//!
//! # Features
//!
//! - **Speech**: hosted text-to-speech, chunked for long input
//! - **Video**: 640x360 15 fps H.264 clips with wrapped, centered text
//! - **Requests**: validated text limits, palette colors and clip durations
//! - **Artifacts**: uniquely named output files with size metadata
//!
//! # Example
//!
//! ```rust,no_run
//! use textcast::{Config, GenerationRequest, Generator, VideoStyle};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let generator = Generator::new(&Config::default())?;
//!     let style = VideoStyle::default().with_background("blue");
//!     let artifact = generator
//!         .generate(&GenerationRequest::video("Hello World", style))
//!         .await?;
//!     println!("{} ({} MB)", artifact.path.display(), artifact.size_mb());
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod config;
pub mod error;
pub mod generate;
pub mod request;
pub mod speech;
pub mod video;

pub use artifact::{Artifact, ArtifactKind};
pub use config::{Config, SpeechConfig, VideoConfig};
pub use error::{FailureKind, GenerationError};
pub use generate::{DependencyReport, Generator};
pub use request::{ClipDuration, GenerationRequest, VideoStyle};
pub use speech::{GoogleTts, SpeechSynthesizer, TextToSpeech};
pub use video::{HexColor, RenderReport, VideoRenderer};

/// Version of textcast
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
