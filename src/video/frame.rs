//! Frame composition and the on-disk frame sequence
//!
//! Every frame of a clip shows the same text, so the image is laid out and
//! rasterized once, PNG-encoded once, then written to `frame_000000.png`,
//! `frame_000001.png`, ... in parallel. Names are derived from the index, so
//! write order does not affect sequence order.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use rayon::prelude::*;

use super::font::FontFace;
use super::wrap::wrap_text;
use crate::error::{GenerationError, Result};

/// Extra pixels between wrapped lines
const LINE_SPACING: u32 = 4;

/// Output geometry and timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSpec {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for FrameSpec {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            fps: 15,
        }
    }
}

impl FrameSpec {
    /// Number of frames for a clip of `duration_secs`
    #[must_use]
    pub fn frame_count(&self, duration_secs: u32) -> usize {
        (duration_secs as usize) * (self.fps as usize)
    }

    /// Text may use up to 80% of the frame width
    #[must_use]
    pub fn max_text_width(&self) -> u32 {
        self.width * 4 / 5
    }
}

/// Wrapped text with the position of every line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayout {
    pub lines: Vec<PlacedLine>,
    pub block_width: u32,
    pub block_height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

impl TextLayout {
    /// Wrap `text` and center the block on both axes, each line centered
    /// within the block.
    #[must_use]
    pub fn new(text: &str, face: &FontFace, spec: &FrameSpec) -> Self {
        let wrapped = wrap_text(text, spec.max_text_width(), |s| face.text_width(s));
        let line_height = face.line_height();

        let widths: Vec<u32> = wrapped.iter().map(|l| face.text_width(l)).collect();
        let block_width = widths.iter().copied().max().unwrap_or(0);
        let n = wrapped.len() as u32;
        let block_height = if n == 0 {
            0
        } else {
            n * line_height + (n - 1) * LINE_SPACING
        };

        // Negative when the block overflows the frame; drawing clips.
        let left = (i64::from(spec.width) - i64::from(block_width)) / 2;
        let top = (i64::from(spec.height) - i64::from(block_height)) / 2;

        let lines = wrapped
            .into_iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (text, width))| PlacedLine {
                text,
                x: (left + (i64::from(block_width) - i64::from(width)) / 2) as i32,
                y: (top + i as i64 * i64::from(line_height + LINE_SPACING)) as i32,
            })
            .collect();

        Self {
            lines,
            block_width,
            block_height,
        }
    }
}

/// Rasterize one frame.
///
/// The pixel buffer is reserved fallibly so an oversized frame surfaces as
/// `OutOfMemory` instead of aborting the process.
pub fn compose_frame(
    layout: &TextLayout,
    face: &FontFace,
    spec: &FrameSpec,
    background: Rgb<u8>,
    text_color: Rgb<u8>,
) -> Result<RgbImage> {
    let pixels = (spec.width as usize)
        .checked_mul(spec.height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| GenerationError::OutOfMemory("frame size overflows usize".to_string()))?;

    let mut buffer: Vec<u8> = Vec::new();
    buffer.try_reserve_exact(pixels).map_err(|e| {
        GenerationError::OutOfMemory(format!(
            "{}x{} frame buffer: {e}",
            spec.width, spec.height
        ))
    })?;
    buffer.extend(std::iter::repeat(background.0).take(pixels / 3).flatten());

    let mut image = RgbImage::from_raw(spec.width, spec.height, buffer)
        .ok_or_else(|| GenerationError::Render("frame buffer size mismatch".to_string()))?;

    for line in &layout.lines {
        face.draw_line(&mut image, line.x, line.y, text_color, &line.text);
    }

    Ok(image)
}

/// File name for frame `index`
#[must_use]
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{index:06}.png")
}

/// printf-style pattern the encoder reads the sequence with
#[must_use]
pub fn frame_pattern(dir: &Path) -> PathBuf {
    dir.join("frame_%06d.png")
}

/// Frames written for one clip.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    pub dir: PathBuf,
    pub count: usize,
}

impl FrameSequence {
    #[must_use]
    pub fn pattern(&self) -> PathBuf {
        frame_pattern(&self.dir)
    }
}

/// Write `count` copies of `frame` as a numbered PNG sequence into `dir`.
pub fn write_sequence(frame: &RgbImage, dir: &Path, count: usize) -> Result<FrameSequence> {
    let mut png = Cursor::new(Vec::new());
    frame.write_to(&mut png, ImageFormat::Png)?;
    let png = png.into_inner();

    (0..count)
        .into_par_iter()
        .try_for_each(|i| std::fs::write(dir.join(frame_file_name(i)), &png))?;

    Ok(FrameSequence {
        dir: dir.to_path_buf(),
        count,
    })
}
