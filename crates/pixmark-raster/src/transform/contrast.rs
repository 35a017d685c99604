// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Min-max contrast stretch for single-channel images.

use image::{DynamicImage, GrayImage, Luma};
use pixmark_core::error::{PixmarkError, Result};

use super::require_luma;

/// Smallest and largest pixel value, or `None` for an empty image.
pub fn value_range(gray: &GrayImage) -> Option<(u8, u8)> {
    gray.pixels().map(|p| p.0[0]).fold(None, |range, v| match range {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Stretch a single-channel image so its darkest pixel becomes 0 and its
/// brightest becomes 255.
///
/// Fails with `ChannelMismatch` for colour input and `DegenerateInput` when
/// every pixel has the same value.
pub fn stretch_contrast(image: &DynamicImage) -> Result<GrayImage> {
    let gray = require_luma(image)?;
    stretch_luma(&gray)
}

/// [`stretch_contrast`] on an 8-bit luma buffer.
pub fn stretch_luma(gray: &GrayImage) -> Result<GrayImage> {
    let (min, max) = match value_range(gray) {
        Some((min, max)) if min != max => (min, max),
        Some((value, _)) => return Err(PixmarkError::DegenerateInput { value }),
        None => return Err(PixmarkError::DegenerateInput { value: 0 }),
    };
    let k = 255.0 / f32::from(max - min);

    let mut out = GrayImage::new(gray.width(), gray.height());
    for (x, y, pixel) in gray.enumerate_pixels() {
        let stretched = f32::from(pixel.0[0] - min) * k;
        out.put_pixel(x, y, Luma([stretched.round().clamp(0.0, 255.0) as u8]));
    }
    Ok(out)
}
