//! Speech synthesis
//!
//! A [`TextToSpeech`] provider turns text into encoded audio bytes;
//! [`SpeechSynthesizer`] writes them to disk and verifies the result.
//! There is no local voice and no retry: a provider failure is a failed
//! synthesis.

pub mod chunk;
pub mod google;

use std::path::Path;

use async_trait::async_trait;
use tracing::{error, info, instrument};

pub use chunk::split_for_speech;
pub use google::GoogleTts;

use crate::config::SpeechConfig;
use crate::error::{GenerationError, Result};

/// Text-to-speech provider
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Convert text to encoded audio
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;

    /// Provider name for logs
    fn name(&self) -> &'static str;
}

/// Writes provider audio to a file.
pub struct SpeechSynthesizer {
    provider: Box<dyn TextToSpeech>,
}

impl std::fmt::Debug for SpeechSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechSynthesizer")
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl SpeechSynthesizer {
    #[must_use]
    pub fn new(provider: Box<dyn TextToSpeech>) -> Self {
        Self { provider }
    }

    /// Synthesizer backed by the hosted Google provider
    pub fn from_config(config: &SpeechConfig) -> Result<Self> {
        Ok(Self::new(Box::new(GoogleTts::new(config)?)))
    }

    /// Synthesize `text` into `output`.
    ///
    /// `true` only when `output` exists with a non-zero size afterwards.
    /// Errors are logged, never propagated.
    pub async fn synthesize(&self, text: &str, output: &Path) -> bool {
        match self.try_synthesize(text, output).await {
            Ok(_) => true,
            Err(e) => {
                error!(kind = %e.kind(), provider = self.provider.name(), "Error generating audio: {e}");
                false
            }
        }
    }

    /// Synthesize with the failure cause preserved; returns the byte size.
    #[instrument(skip(self, text, output), fields(chars = text.chars().count(), output = %output.display()))]
    pub async fn try_synthesize(&self, text: &str, output: &Path) -> Result<u64> {
        if text.trim().is_empty() {
            return Err(GenerationError::InvalidRequest("text is empty".to_string()));
        }

        let audio = self.provider.synthesize(text).await?;
        if let Err(e) = tokio::fs::write(output, &audio).await {
            // A failed write can leave a truncated file behind
            let _ = tokio::fs::remove_file(output).await;
            return Err(e.into());
        }

        match tokio::fs::metadata(output).await {
            Ok(meta) if meta.len() > 0 => {
                info!("Wrote {} bytes of audio via {}", meta.len(), self.provider.name());
                Ok(meta.len())
            }
            _ => {
                let _ = tokio::fs::remove_file(output).await;
                Err(GenerationError::EmptyOutput(output.to_path_buf()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProvider {
        audio: Vec<u8>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextToSpeech for FixedProvider {
        async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.audio.clone())
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl TextToSpeech for FailingProvider {
        async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
            Err(GenerationError::Provider("503 Service Unavailable".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_writes_audio() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("audio.mp3");
        let synth = SpeechSynthesizer::new(Box::new(FixedProvider {
            audio: vec![0xFF, 0xFB, 0x90, 0x00],
            calls: AtomicUsize::new(0),
        }));

        assert_eq!(synth.try_synthesize("Hello", &out).await.unwrap(), 4);
        assert!(synth.synthesize("Hello again", &out).await);
    }

    #[tokio::test]
    async fn test_empty_audio_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("audio.mp3");
        let synth = SpeechSynthesizer::new(Box::new(FixedProvider {
            audio: Vec::new(),
            calls: AtomicUsize::new(0),
        }));

        let err = synth.try_synthesize("Hello", &out).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyOutput(_)));
        assert!(!out.exists());
        assert!(!synth.synthesize("Hello", &out).await);
    }

    #[tokio::test]
    async fn test_provider_error_collapses_to_false() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("audio.mp3");
        let synth = SpeechSynthesizer::new(Box::new(FailingProvider));

        assert!(!synth.synthesize("Hello", &out).await);
        assert!(!out.exists());
        let err = synth.try_synthesize("Hello", &out).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::FailureKind::Upstream);
    }

    #[tokio::test]
    async fn test_write_failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing").join("audio.mp3");
        let synth = SpeechSynthesizer::new(Box::new(FixedProvider {
            audio: vec![0xFF, 0xFB, 0x90, 0x00],
            calls: AtomicUsize::new(0),
        }));

        let err = synth.try_synthesize("Hello", &out).await.unwrap_err();
        assert!(matches!(err, GenerationError::Io(_)));
        assert!(!out.exists());
        assert!(!synth.synthesize("Hello", &out).await);
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FixedProvider {
            audio: vec![1],
            calls: AtomicUsize::new(0),
        };
        let synth = SpeechSynthesizer::new(Box::new(provider));
        assert!(!synth.synthesize("  ", &dir.path().join("a.mp3")).await);
    }
}
