// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster I/O — decode images from files or bytes and encode annotated output,
// using the `image` crate's format detection.

use std::path::Path;

use image::{DynamicImage, ImageFormat};
use pixmark_core::error::{PixmarkError, Result};
use tracing::{debug, info, instrument};

/// Load an image from a file path.
///
/// The file is read whole and decoded by [`decode_image`], so the format is
/// sniffed from the content rather than trusted from the extension. A missing
/// or unreadable file is an `Io` error; undecodable content is `ImageError`.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let data = std::fs::read(path.as_ref())?;
    let img = decode_image(&data)?;
    info!(
        width = img.width(),
        height = img.height(),
        channels = img.color().channel_count(),
        "Image loaded"
    );
    Ok(img)
}

/// Decode an image from raw encoded bytes (JPEG, PNG, etc.).
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode_image(data: &[u8]) -> Result<DynamicImage> {
    let format = image::guess_format(data)
        .map_err(|err| image_error("unrecognised image format", err))?;
    let img = image::load_from_memory_with_format(data, format)
        .map_err(|err| image_error("failed to decode image", err))?;
    debug!(?format, color = ?img.color(), "Image decoded");
    Ok(img)
}

fn image_error(context: &str, err: image::ImageError) -> PixmarkError {
    PixmarkError::ImageError(format!("{context}: {err}"))
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| image_error("image encoding failed", err))?;
    Ok(buffer)
}

/// Write an image to a file. The format is inferred from the file extension.
#[instrument(skip(image), fields(path = %path.as_ref().display()))]
pub fn save_image(image: &DynamicImage, path: impl AsRef<Path>) -> Result<()> {
    let context = format!("failed to save image to {}", path.as_ref().display());
    image
        .save(path.as_ref())
        .map_err(|err| image_error(&context, err))?;
    info!("Image saved");
    Ok(())
}
