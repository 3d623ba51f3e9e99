//! Font resolution and measurement
//!
//! Configured font files are tried in order; the first one that loads wins.
//! When none does, the built-in bitmap face is used.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::{debug, warn};

use super::bitmap;

/// Base point size for short texts
pub const BASE_FONT_SIZE: u32 = 30;
/// Smallest size the shrink heuristic goes down to
pub const MIN_FONT_SIZE: u32 = 15;
/// Texts longer than this (characters) start shrinking
const SHRINK_AFTER_CHARS: usize = 100;

/// Point size for a text: 30pt, minus one point per 20 characters once the
/// text is longer than 100 characters, never below 15pt.
///
/// Long texts can still overflow the frame.
#[must_use]
pub fn font_size_for(text: &str) -> u32 {
    let len = text.chars().count();
    if len <= SHRINK_AFTER_CHARS {
        return BASE_FONT_SIZE;
    }
    let shrink = u32::try_from(len / 20).unwrap_or(u32::MAX);
    BASE_FONT_SIZE.saturating_sub(shrink).max(MIN_FONT_SIZE)
}

/// A loaded face at a fixed size.
pub enum FontFace {
    Outline {
        font: FontVec,
        scale: PxScale,
        source: PathBuf,
    },
    Builtin {
        /// Integer pixel multiplier for the 5x7 glyphs
        scale: u32,
    },
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outline { scale, source, .. } => f
                .debug_struct("Outline")
                .field("source", source)
                .field("px", &scale.y)
                .finish(),
            Self::Builtin { scale } => f.debug_struct("Builtin").field("scale", scale).finish(),
        }
    }
}

impl FontFace {
    /// First loadable font among `candidates`, else the built-in face.
    #[must_use]
    pub fn resolve(candidates: &[PathBuf], size: u32) -> Self {
        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load(path, size) {
                Ok(face) => {
                    debug!("Using font {}", path.display());
                    return face;
                }
                Err(e) => warn!("Skipping font {}: {e}", path.display()),
            }
        }

        debug!("No configured font loaded, using built-in face");
        Self::builtin(size)
    }

    /// Load a TrueType/OpenType file.
    pub fn load(path: &Path, size: u32) -> crate::error::Result<Self> {
        let data = std::fs::read(path)?;
        let font = FontVec::try_from_vec(data)
            .map_err(|e| crate::error::GenerationError::Font(format!("{}: {e}", path.display())))?;

        Ok(Self::Outline {
            font,
            scale: PxScale::from(size as f32),
            source: path.to_path_buf(),
        })
    }

    /// Built-in face scaled to roughly `size` pixels tall.
    #[must_use]
    pub fn builtin(size: u32) -> Self {
        Self::Builtin {
            scale: ((size + 4) / 8).max(1),
        }
    }

    /// Where this face came from, for diagnostics
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Outline { source, scale, .. } => format!("{} @ {}px", source.display(), scale.y),
            Self::Builtin { scale } => format!("built-in 5x7 x{scale}"),
        }
    }

    /// Width of a single line in pixels
    #[must_use]
    pub fn text_width(&self, text: &str) -> u32 {
        match self {
            Self::Outline { font, scale, .. } => text_size(*scale, font, text).0,
            Self::Builtin { scale } => bitmap::text_width(text, *scale),
        }
    }

    /// Height of one line in pixels
    #[must_use]
    pub fn line_height(&self) -> u32 {
        match self {
            Self::Outline { font, scale, .. } => font.as_scaled(*scale).height().ceil() as u32,
            Self::Builtin { scale } => bitmap::line_height(*scale),
        }
    }

    /// Draw one line with its top-left corner at `(x, y)`
    pub fn draw_line(&self, image: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) {
        match self {
            Self::Outline { font, scale, .. } => draw_text_mut(image, color, x, y, *scale, font, text),
            Self::Builtin { scale } => bitmap::draw_text(image, x, y, *scale, color, text),
        }
    }
}
