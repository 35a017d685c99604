// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Feature marker — draw a circle at every pixel whose score exceeds a
// threshold.

use image::{DynamicImage, Luma, Rgb};
use imageproc::drawing::{Canvas, draw_filled_circle_mut, draw_hollow_circle_mut};
use pixmark_core::error::Result;
use pixmark_core::{MarkerStyle, Thickness};

use crate::maps::{ScoreMap, ensure_same_shape};

/// Draw a circle centred on every `(x, y)` with `scores[y][x] > threshold`.
///
/// Grayscale inputs are marked with `Luma([color])`; colour inputs are
/// converted to RGB and marked with `Rgb([color; 3])`. Circles are clipped at
/// the image border. When nothing crosses the threshold the input is
/// returned as-is.
pub fn mark_features(
    image: &DynamicImage,
    scores: &ScoreMap,
    style: &MarkerStyle,
) -> Result<DynamicImage> {
    ensure_same_shape((image.width(), image.height()), scores.dimensions())?;
    style.validate()?;

    let centers = scores.centers_above(style.threshold);
    if centers.is_empty() {
        return Ok(image.clone());
    }

    let marked = if image.color().has_color() {
        let mut canvas = image.to_rgb8();
        draw_markers(&mut canvas, &centers, style, Rgb([style.color; 3]));
        DynamicImage::ImageRgb8(canvas)
    } else {
        let mut canvas = image.to_luma8();
        draw_markers(&mut canvas, &centers, style, Luma([style.color]));
        DynamicImage::ImageLuma8(canvas)
    };
    Ok(marked)
}

fn draw_markers<C: Canvas>(
    canvas: &mut C,
    centers: &[(u32, u32)],
    style: &MarkerStyle,
    color: C::Pixel,
) {
    // `MarkerStyle::validate` caps the radius at `i32::MAX`.
    let radius = i32::try_from(style.radius).unwrap_or(i32::MAX);
    for &(x, y) in centers {
        let center = (x as i32, y as i32);
        match style.thickness {
            Thickness::Filled => draw_filled_circle_mut(canvas, center, radius, color),
            Thickness::Outline(1) => draw_hollow_circle_mut(canvas, center, radius, color),
            Thickness::Outline(width) => draw_ring_mut(canvas, center, radius, width, color),
        }
    }
}

/// Paint a ring exactly `width` pixels wide: every pixel whose distance `d`
/// from `center` satisfies `radius - width / 2 <= d < radius - width / 2 + width`.
/// Out-of-bounds pixels are skipped.
fn draw_ring_mut<C: Canvas>(
    canvas: &mut C,
    center: (i32, i32),
    radius: i32,
    width: u32,
    color: C::Pixel,
) {
    let inner = i64::from(radius) - i64::from(width / 2);
    let outer = inner + i64::from(width);
    let (img_w, img_h) = canvas.dimensions();
    let (cx, cy) = (i64::from(center.0), i64::from(center.1));

    let y_range = (cy - outer).max(0)..=(cy + outer).min(i64::from(img_h) - 1);
    let x_range = (cx - outer).max(0)..=(cx + outer).min(i64::from(img_w) - 1);
    let (inner, outer) = (inner.max(0) as f64, outer as f64);

    for y in y_range {
        let dy = y - cy;
        for x in x_range.clone() {
            let dx = x - cx;
            let dist = ((dx * dx + dy * dy) as f64).sqrt();
            if dist >= inner && dist < outer {
                canvas.draw_pixel(x as u32, y as u32, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};
    use pixmark_core::PixmarkError;

    fn white(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([255])))
    }

    fn single_peak(width: u32, height: u32, at: (u32, u32)) -> ScoreMap {
        ScoreMap::from_fn(width, height, |x, y| if (x, y) == at { 200.0 } else { 0.0 })
    }

    fn count_black(image: &DynamicImage) -> usize {
        image.to_luma8().pixels().filter(|p| p.0[0] == 0).count()
    }

    fn style(thickness: i32) -> MarkerStyle {
        MarkerStyle::from_parts(None, Some(6), Some(thickness), None).unwrap()
    }

    #[test]
    fn below_threshold_scores_leave_image_unchanged() {
        let input = DynamicImage::ImageLuma8(GrayImage::from_fn(12, 9, |x, y| {
            Luma([(x * 10 + y) as u8])
        }));
        let scores = ScoreMap::filled(12, 9, 90.0);
        let out = mark_features(&input, &scores, &MarkerStyle::default()).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn filled_marker_covers_more_than_outline() {
        let scores = single_peak(31, 31, (15, 15));
        let outline = mark_features(&white(31, 31), &scores, &style(1)).unwrap();
        let filled = mark_features(&white(31, 31), &scores, &style(-1)).unwrap();

        let outline_count = count_black(&outline);
        let filled_count = count_black(&filled);
        assert!(outline_count > 0);
        assert!(filled_count > outline_count, "{filled_count} <= {outline_count}");
        // The center is only painted by the solid disk.
        assert_eq!(filled.to_luma8().get_pixel(15, 15), &Luma([0]));
        assert_eq!(outline.to_luma8().get_pixel(15, 15), &Luma([255]));
    }

    #[test]
    fn outline_passes_through_radius_points() {
        let scores = single_peak(31, 31, (15, 15));
        let out = mark_features(&white(31, 31), &scores, &style(1)).unwrap().to_luma8();
        for (x, y) in [(21, 15), (9, 15), (15, 21), (15, 9)] {
            assert_eq!(out.get_pixel(x, y), &Luma([0]), "({x}, {y})");
        }
    }

    #[test]
    fn thick_outline_is_wider_than_thin_outline() {
        let scores = single_peak(31, 31, (15, 15));
        let thin = mark_features(&white(31, 31), &scores, &style(1)).unwrap();
        let thick = mark_features(&white(31, 31), &scores, &style(3)).unwrap();
        assert!(count_black(&thick) > count_black(&thin));
        assert_eq!(thick.to_luma8().get_pixel(15, 15), &Luma([255]));
    }

    /// Length of the painted run along +x starting from the centre row.
    fn band_width_along_x(image: &DynamicImage, center: (u32, u32)) -> usize {
        let luma = image.to_luma8();
        (center.0..luma.width())
            .filter(|&x| luma.get_pixel(x, center.1).0[0] == 0)
            .count()
    }

    #[test]
    fn ring_band_is_exactly_thickness_wide() {
        let scores = single_peak(41, 41, (20, 20));
        for thickness in 2..=5 {
            let marker = MarkerStyle::from_parts(None, Some(10), Some(thickness), None).unwrap();
            let out = mark_features(&white(41, 41), &scores, &marker).unwrap();
            assert_eq!(
                band_width_along_x(&out, (20, 20)),
                thickness as usize,
                "thickness {thickness}"
            );
        }
    }

    #[test]
    fn even_and_odd_thickness_differ() {
        let scores = single_peak(41, 41, (20, 20));
        let two = MarkerStyle::from_parts(None, Some(10), Some(2), None).unwrap();
        let three = MarkerStyle::from_parts(None, Some(10), Some(3), None).unwrap();
        let two = mark_features(&white(41, 41), &scores, &two).unwrap();
        let three = mark_features(&white(41, 41), &scores, &three).unwrap();
        assert!(count_black(&three) > count_black(&two));
    }

    #[test]
    fn oversized_radius_is_rejected() {
        let scores = single_peak(8, 8, (4, 4));
        let mut marker = MarkerStyle::default();
        marker.radius = u32::MAX;
        let err = mark_features(&white(8, 8), &scores, &marker).unwrap_err();
        assert!(matches!(err, PixmarkError::InvalidArgument(_)));
    }

    #[test]
    fn score_map_axes_map_to_x_and_y() {
        // Row 2, column 7 in the score map is pixel (x = 7, y = 2).
        let scores = single_peak(20, 12, (7, 2));
        let marker = MarkerStyle::from_parts(None, Some(1), Some(-1), None).unwrap();
        let out = mark_features(&white(20, 12), &scores, &marker).unwrap().to_luma8();
        assert_eq!(out.get_pixel(7, 2), &Luma([0]));
        assert_eq!(out.get_pixel(2, 7), &Luma([255]));
    }

    #[test]
    fn markers_near_the_border_are_clipped() {
        let scores = single_peak(10, 10, (0, 0));
        let out = mark_features(&white(10, 10), &scores, &style(-1)).unwrap();
        let black = count_black(&out);
        assert!(black > 0);
        assert!(black < 100);
    }

    #[test]
    fn colour_image_keeps_colour_layout() {
        let input = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([10, 200, 30])));
        let scores = single_peak(16, 16, (8, 8));
        let marker = MarkerStyle::from_parts(None, Some(3), Some(-1), Some(250)).unwrap();
        let out = mark_features(&input, &scores, &marker).unwrap();

        let rgb = out.as_rgb8().expect("rgb output");
        assert_eq!(rgb.get_pixel(8, 8), &Rgb([250, 250, 250]));
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([10, 200, 30]));
    }

    #[test]
    fn mismatched_score_map_fails_fast() {
        let scores = ScoreMap::filled(8, 8, 255.0);
        let err = mark_features(&white(8, 9), &scores, &MarkerStyle::default()).unwrap_err();
        assert!(matches!(err, PixmarkError::ShapeMismatch { .. }));
    }
}
