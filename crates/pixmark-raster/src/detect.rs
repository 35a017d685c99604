// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge and corner detectors feeding the overlay and marker transforms.
//
// The transforms only depend on the map shapes, so any detector can be
// plugged in through `EdgeDetector` / `CornerScorer`. Closures implement both
// traits, which keeps synthetic maps easy to inject in tests.

use image::GrayImage;
use imageproc::edges::canny;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use pixmark_core::PipelineConfig;
use tracing::debug;

use crate::maps::{EdgeMap, ScoreMap};

/// Produces a binary edge map the same size as its input.
pub trait EdgeDetector {
    fn detect_edges(&self, image: &GrayImage) -> EdgeMap;
}

impl<F> EdgeDetector for F
where
    F: Fn(&GrayImage) -> EdgeMap,
{
    fn detect_edges(&self, image: &GrayImage) -> EdgeMap {
        self(image)
    }
}

/// Produces a dense corner response map the same size as its input.
pub trait CornerScorer {
    fn corner_scores(&self, image: &GrayImage) -> ScoreMap;
}

impl<F> CornerScorer for F
where
    F: Fn(&GrayImage) -> ScoreMap,
{
    fn corner_scores(&self, image: &GrayImage) -> ScoreMap {
        self(image)
    }
}

/// Canny edge detector with hysteresis thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CannyEdgeDetector {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl CannyEdgeDetector {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            low_threshold: config.canny_low,
            high_threshold: config.canny_high,
        }
    }
}

impl Default for CannyEdgeDetector {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl EdgeDetector for CannyEdgeDetector {
    fn detect_edges(&self, image: &GrayImage) -> EdgeMap {
        let edges = EdgeMap::from_luma(canny(image, self.low_threshold, self.high_threshold));
        debug!(edge_pixels = edges.edge_count(), "Canny edge detection complete");
        edges
    }
}

/// Harris corner response, scaled to 0..=255.
///
/// For each pixel the structure tensor is averaged over a
/// `(2 * block_size + 1)` square window of Sobel gradients and scored as
/// `det(M) - k * trace(M)^2`. Negative responses (edges) are clamped to zero
/// before the map is min-max scaled, so flat regions score 0 and the
/// strongest corner scores 255.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarrisCornerScorer {
    pub block_size: u32,
    pub k: f32,
}

impl HarrisCornerScorer {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            block_size: config.harris_block_size,
            k: config.harris_k,
        }
    }

    /// Raw (unscaled) Harris response for every pixel, row-major.
    pub fn raw_response(&self, image: &GrayImage) -> Vec<f64> {
        let (width, height) = image.dimensions();
        let gx = horizontal_sobel(image);
        let gy = vertical_sobel(image);
        let grad = |x: u32, y: u32| {
            (
                gx.get_pixel(x, y).0[0] as f64,
                gy.get_pixel(x, y).0[0] as f64,
            )
        };

        let sxx = summed_area_table(width, height, |x, y| {
            let (dx, _) = grad(x, y);
            dx * dx
        });
        let syy = summed_area_table(width, height, |x, y| {
            let (_, dy) = grad(x, y);
            dy * dy
        });
        let sxy = summed_area_table(width, height, |x, y| {
            let (dx, dy) = grad(x, y);
            dx * dy
        });

        let k = self.k as f64;
        let mut response = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let a = window_mean(&sxx, width, height, x, y, self.block_size);
                let b = window_mean(&sxy, width, height, x, y, self.block_size);
                let c = window_mean(&syy, width, height, x, y, self.block_size);
                let det = a * c - b * b;
                let trace = a + c;
                response.push(det - k * trace * trace);
            }
        }
        response
    }
}

impl Default for HarrisCornerScorer {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl CornerScorer for HarrisCornerScorer {
    fn corner_scores(&self, image: &GrayImage) -> ScoreMap {
        let (width, height) = image.dimensions();
        let response = self.raw_response(image);
        let peak = response.iter().copied().fold(0.0f64, f64::max);
        debug!(peak, block_size = self.block_size, k = self.k, "Harris response computed");

        if peak <= 0.0 {
            return ScoreMap::filled(width, height, 0.0);
        }
        let scale = 255.0 / peak;
        ScoreMap::from_fn(width, height, |x, y| {
            let r = response[y as usize * width as usize + x as usize];
            (r.max(0.0) * scale) as f32
        })
    }
}

// -- Summed-area helpers ------------------------------------------------------

/// Summed-area table of `value(x, y)` with a zero-padded border.
///
/// `table[y * (width+1) + x]` holds the sum over `[0, x) x [0, y)`.
fn summed_area_table(width: u32, height: u32, value: impl Fn(u32, u32) -> f64) -> Vec<f64> {
    let stride = (width + 1) as usize;
    let mut table = vec![0.0f64; stride * (height + 1) as usize];

    for y in 0..height {
        let mut row_sum = 0.0;
        for x in 0..width {
            row_sum += value(x, y);
            let idx = (y + 1) as usize * stride + (x + 1) as usize;
            let above = y as usize * stride + (x + 1) as usize;
            table[idx] = row_sum + table[above];
        }
    }

    table
}

/// Mean over the square window of the given radius around `(cx, cy)`,
/// clamped to the image.
fn window_mean(table: &[f64], width: u32, height: u32, cx: u32, cy: u32, radius: u32) -> f64 {
    let stride = (width + 1) as usize;

    let x1 = cx.saturating_sub(radius) as usize;
    let y1 = cy.saturating_sub(radius) as usize;
    let reach = (radius as usize).saturating_add(1);
    let x2 = (cx as usize).saturating_add(reach).min(width as usize);
    let y2 = (cy as usize).saturating_add(reach).min(height as usize);

    let area = ((x2 - x1) * (y2 - y1)) as f64;
    let sum = table[y2 * stride + x2] - table[y1 * stride + x2] - table[y2 * stride + x1]
        + table[y1 * stride + x1];

    sum / area
}
