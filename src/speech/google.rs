//! Google Translate text-to-speech provider
//!
//! Uses the public `translate_tts` endpoint, which returns MP3 audio for up
//! to ~100 characters per request. Longer text is chunked and the MP3
//! streams are concatenated in order.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::chunk::split_for_speech;
use super::TextToSpeech;
use crate::config::SpeechConfig;
use crate::error::{GenerationError, Result};

/// Hosted TTS client
#[derive(Debug, Clone)]
pub struct GoogleTts {
    client: Client,
    endpoint: String,
    language: String,
    chunk_chars: usize,
}

impl GoogleTts {
    /// Create a provider from the `[speech]` config section
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            language: config.language.clone(),
            chunk_chars: config.chunk_chars,
        })
    }

    #[instrument(skip(self, chunk))]
    async fn fetch_chunk(&self, chunk: &str, idx: usize, total: usize) -> Result<Vec<u8>> {
        let textlen = chunk.chars().count().to_string();
        let idx_s = idx.to_string();
        let total_s = total.to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.language.as_str()),
                ("q", chunk),
                ("total", total_s.as_str()),
                ("idx", idx_s.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            return Err(GenerationError::Provider(format!(
                "chunk {}/{total} returned {status}: {snippet}",
                idx + 1
            )));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(GenerationError::Provider(format!(
                "chunk {}/{total} returned no audio",
                idx + 1
            )));
        }

        debug!("chunk {}/{} -> {} bytes", idx + 1, total, bytes.len());
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl TextToSpeech for GoogleTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let chunks = split_for_speech(text, self.chunk_chars);
        if chunks.is_empty() {
            return Err(GenerationError::Provider(
                "no speakable text after cleanup".to_string(),
            ));
        }

        let total = chunks.len();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            audio.extend(self.fetch_chunk(chunk, idx, total).await?);
        }
        Ok(audio)
    }

    fn name(&self) -> &'static str {
        "google-translate"
    }
}
