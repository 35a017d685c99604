// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dense per-pixel companion maps produced by the detectors and consumed by the
// overlay and marker transforms.

use image::{GrayImage, ImageBuffer, Luma};
use pixmark_core::error::{PixmarkError, Result};

/// Single-channel `f32` buffer used for corner responses.
pub type ScoreImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Fail with `ShapeMismatch` unless a companion map has the image's size.
pub(crate) fn ensure_same_shape(image: (u32, u32), map: (u32, u32)) -> Result<()> {
    if image != map {
        return Err(PixmarkError::ShapeMismatch {
            expected: image,
            actual: map,
        });
    }
    Ok(())
}

/// Binary edge map: zero means no edge, anything else marks an edge pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMap(GrayImage);

impl EdgeMap {
    /// Wrap a detector output such as `imageproc::edges::canny`.
    pub fn from_luma(edges: GrayImage) -> Self {
        Self(edges)
    }

    /// Map with no edges.
    pub fn empty(width: u32, height: u32) -> Self {
        Self(GrayImage::new(width, height))
    }

    /// Map with exactly the given `(x, y)` pixels flagged. Points outside the
    /// map are ignored.
    pub fn from_points(width: u32, height: u32, points: &[(u32, u32)]) -> Self {
        let mut map = GrayImage::new(width, height);
        for &(x, y) in points {
            if x < width && y < height {
                map.put_pixel(x, y, Luma([255]));
            }
        }
        Self(map)
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    /// Whether `(x, y)` is flagged. Panics if out of bounds.
    #[inline]
    pub fn is_edge(&self, x: u32, y: u32) -> bool {
        self.0.get_pixel(x, y).0[0] != 0
    }

    /// Number of flagged pixels.
    pub fn edge_count(&self) -> usize {
        self.0.pixels().filter(|p| p.0[0] != 0).count()
    }

    /// Borrow the underlying buffer.
    pub fn as_luma(&self) -> &GrayImage {
        &self.0
    }
}

/// Dense corner response map.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMap(ScoreImage);

impl ScoreMap {
    pub fn from_buffer(scores: ScoreImage) -> Self {
        Self(scores)
    }

    /// Map with every score set to `value`.
    pub fn filled(width: u32, height: u32, value: f32) -> Self {
        Self(ImageBuffer::from_pixel(width, height, Luma([value])))
    }

    /// Build a map from a per-pixel function of `(x, y)`.
    pub fn from_fn(width: u32, height: u32, score: impl Fn(u32, u32) -> f32) -> Self {
        Self(ImageBuffer::from_fn(width, height, |x, y| Luma([score(x, y)])))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    #[inline]
    pub fn score(&self, x: u32, y: u32) -> f32 {
        self.0.get_pixel(x, y).0[0]
    }

    /// Every `(x, y)` whose score is strictly above `threshold`, row-major.
    pub fn centers_above(&self, threshold: f32) -> Vec<(u32, u32)> {
        self.0
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] > threshold)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    pub fn as_buffer(&self) -> &ScoreImage {
        &self.0
    }
}
