// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colour to single-channel luminance.

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use pixmark_core::GrayscaleMode;
use pixmark_core::error::Result;

use super::require_rgb;

const WEIGHT_R: f32 = 0.2989;
const WEIGHT_G: f32 = 0.5870;
const WEIGHT_B: f32 = 0.1140;

/// Convert a colour image to grayscale with the given formula.
///
/// Fails with `ChannelMismatch` if the input is already single-channel.
pub fn to_grayscale(image: &DynamicImage, mode: GrayscaleMode) -> Result<GrayImage> {
    let rgb = require_rgb(image)?;
    Ok(convert_rgb(&rgb, mode))
}

/// Convert an 8-bit RGB buffer to grayscale. Output has the same size.
pub fn convert_rgb(rgb: &RgbImage, mode: GrayscaleMode) -> GrayImage {
    let (width, height) = rgb.dimensions();
    let mut gray = GrayImage::new(width, height);
    for (x, y, pixel) in rgb.enumerate_pixels() {
        gray.put_pixel(x, y, Luma([luminance(*pixel, mode)]));
    }
    gray
}

#[inline]
fn luminance(Rgb([r, g, b]): Rgb<u8>, mode: GrayscaleMode) -> u8 {
    match mode {
        GrayscaleMode::Weighted => {
            let value = WEIGHT_R * r as f32 + WEIGHT_G * g as f32 + WEIGHT_B * b as f32;
            value.round().clamp(0.0, 255.0) as u8
        }
        // Truncating integer mean.
        GrayscaleMode::Average => ((r as u16 + g as u16 + b as u16) / 3) as u8,
    }
}
