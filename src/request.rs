//! Generation requests and their validation
//!
//! Text limits, the duration choices and the color palette are enforced here
//! so that the renderer and synthesizer can assume validated input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};
use crate::video::HexColor;

/// Longest text accepted for speech synthesis (characters)
pub const MAX_AUDIO_TEXT_CHARS: usize = 5000;
/// Longest text accepted for a video clip (characters)
pub const MAX_VIDEO_TEXT_CHARS: usize = 1000;

/// Named colors offered for backgrounds and text.
pub const PALETTE: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("white", "#FFFFFF"),
    ("red", "#FF0000"),
    ("green", "#00FF00"),
    ("blue", "#0000FF"),
    ("yellow", "#FFFF00"),
    ("magenta", "#FF00FF"),
    ("cyan", "#00FFFF"),
];

/// Resolve a palette name (case-insensitive) or pass a hex string through.
#[must_use]
pub fn resolve_color(value: &str) -> String {
    PALETTE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value))
        .map_or_else(|| value.to_string(), |(_, hex)| (*hex).to_string())
}

/// Allowed clip lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ClipDuration {
    Five,
    #[default]
    Ten,
    Fifteen,
    Thirty,
}

impl ClipDuration {
    pub const ALL: [Self; 4] = [Self::Five, Self::Ten, Self::Fifteen, Self::Thirty];

    #[must_use]
    pub fn seconds(self) -> u32 {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
            Self::Fifteen => 15,
            Self::Thirty => 30,
        }
    }
}

impl TryFrom<u32> for ClipDuration {
    type Error = GenerationError;

    fn try_from(secs: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.seconds() == secs)
            .ok_or_else(|| {
                GenerationError::InvalidRequest(format!(
                    "duration must be one of 5, 10, 15 or 30 seconds, got {secs}"
                ))
            })
    }
}

impl From<ClipDuration> for u32 {
    fn from(d: ClipDuration) -> Self {
        d.seconds()
    }
}

impl FromStr for ClipDuration {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self> {
        let secs: u32 = s
            .trim()
            .trim_end_matches('s')
            .parse()
            .map_err(|_| GenerationError::InvalidRequest(format!("invalid duration {s:?}")))?;
        Self::try_from(secs)
    }
}

impl fmt::Display for ClipDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds())
    }
}

/// Styling for a video clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStyle {
    /// `#RRGGBB`
    pub background: String,
    /// `#RRGGBB`
    pub text_color: String,
    pub duration: ClipDuration,
}

impl Default for VideoStyle {
    fn default() -> Self {
        Self {
            background: "#000000".to_string(),
            text_color: "#FFFFFF".to_string(),
            duration: ClipDuration::default(),
        }
    }
}

impl VideoStyle {
    /// Set background from a palette name or hex string
    #[must_use]
    pub fn with_background(mut self, color: &str) -> Self {
        self.background = resolve_color(color);
        self
    }

    /// Set text color from a palette name or hex string
    #[must_use]
    pub fn with_text_color(mut self, color: &str) -> Self {
        self.text_color = resolve_color(color);
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: ClipDuration) -> Self {
        self.duration = duration;
        self
    }
}

/// One user submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GenerationRequest {
    Audio { text: String },
    Video { text: String, style: VideoStyle },
}

impl GenerationRequest {
    #[must_use]
    pub fn audio(text: impl Into<String>) -> Self {
        Self::Audio { text: text.into() }
    }

    #[must_use]
    pub fn video(text: impl Into<String>, style: VideoStyle) -> Self {
        Self::Video {
            text: text.into(),
            style,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Audio { text } | Self::Video { text, .. } => text,
        }
    }

    /// Check text length bounds and styling.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Audio { text } => check_text(text, MAX_AUDIO_TEXT_CHARS),
            Self::Video { text, style } => {
                check_text(text, MAX_VIDEO_TEXT_CHARS)?;
                style.background.parse::<HexColor>()?;
                style.text_color.parse::<HexColor>()?;
                Ok(())
            }
        }
    }
}

fn check_text(text: &str, max_chars: usize) -> Result<()> {
    if text.trim().is_empty() {
        return Err(GenerationError::InvalidRequest("text is empty".to_string()));
    }
    let len = text.chars().count();
    if len > max_chars {
        return Err(GenerationError::InvalidRequest(format!(
            "text must be between 1 and {max_chars} characters, got {len}"
        )));
    }
    Ok(())
}
