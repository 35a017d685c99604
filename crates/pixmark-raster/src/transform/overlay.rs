// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge overlay — blacken a square neighbourhood around every edge pixel.

use image::{DynamicImage, GrayImage, Luma};
use pixmark_core::error::Result;

use super::require_luma;
use crate::maps::{EdgeMap, ensure_same_shape};

/// Blacken a `size / 2` half-width square around every flagged edge pixel.
///
/// Only pixels at least `size / 2` away from the image border are considered
/// as centers, but a center's square may reach into that border band.
///
/// Fails with `ShapeMismatch` when the edge map is a different size and with
/// `ChannelMismatch` for colour input.
pub fn overlay_edges(image: &DynamicImage, edges: &EdgeMap, size: u32) -> Result<GrayImage> {
    ensure_same_shape((image.width(), image.height()), edges.dimensions())?;
    let gray = require_luma(image)?;
    overlay_luma(&gray, edges, size)
}

/// [`overlay_edges`] on an 8-bit luma buffer.
pub fn overlay_luma(gray: &GrayImage, edges: &EdgeMap, size: u32) -> Result<GrayImage> {
    ensure_same_shape(gray.dimensions(), edges.dimensions())?;

    let r = size / 2;
    let (width, height) = gray.dimensions();
    let mut out = gray.clone();

    // No interior left once the border band covers the whole image.
    if width <= 2 * r || height <= 2 * r {
        return Ok(out);
    }

    for cy in r..height - r {
        for cx in r..width - r {
            if !edges.is_edge(cx, cy) {
                continue;
            }
            for y in cy - r..=cy + r {
                for x in cx - r..=cx + r {
                    out.put_pixel(x, y, Luma([0]));
                }
            }
        }
    }
    Ok(out)
}
