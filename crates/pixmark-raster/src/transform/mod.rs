// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel transforms — grayscale conversion, contrast stretch, edge overlay, and
// feature marking. Every transform reads its inputs and returns a freshly
// allocated buffer; inputs are never modified.

pub mod contrast;
pub mod grayscale;
pub mod marker;
pub mod overlay;

pub use contrast::{stretch_contrast, stretch_luma, value_range};
pub use grayscale::{convert_rgb, to_grayscale};
pub use marker::mark_features;
pub use overlay::{overlay_edges, overlay_luma};

use image::{DynamicImage, GrayImage, RgbImage};
use pixmark_core::error::{PixmarkError, Result};

/// Borrow the input as single-channel luma, or fail with `ChannelMismatch`.
///
/// Luma+alpha inputs are accepted; the alpha channel is dropped.
pub(crate) fn require_luma(image: &DynamicImage) -> Result<GrayImage> {
    let color = image.color();
    if color.has_color() {
        return Err(PixmarkError::ChannelMismatch {
            expected: 1,
            actual: color.channel_count(),
        });
    }
    Ok(match image {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        other => other.to_luma8(),
    })
}

/// Borrow the input as 8-bit RGB, or fail with `ChannelMismatch`.
///
/// RGBA inputs are accepted; the alpha channel is dropped.
pub(crate) fn require_rgb(image: &DynamicImage) -> Result<RgbImage> {
    let color = image.color();
    if !color.has_color() {
        return Err(PixmarkError::ChannelMismatch {
            expected: 3,
            actual: color.channel_count(),
        });
    }
    Ok(match image {
        DynamicImage::ImageRgb8(rgb) => rgb.clone(),
        other => other.to_rgb8(),
    })
}
