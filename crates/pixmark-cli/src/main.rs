// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixmark — command-line image annotation.
//
// Entry point. Initialises logging, resolves the pipeline configuration from
// an optional JSON file plus flag overrides, runs the annotation stages, and
// writes the result.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use image::DynamicImage;
use pixmark_core::error::{PixmarkError, Result};
use pixmark_core::{GrayscaleMode, PipelineConfig};
use pixmark_raster::{Annotator, CannyEdgeDetector, HarrisCornerScorer, io};

/// Input used when `--input` is not given.
const DEFAULT_INPUT: &str = "tulips.jpg";

#[derive(Debug, Parser)]
#[command(name = "pixmark")]
#[command(about = "Annotate an image: grayscale, contrast stretch, edge overlay, and corner markers")]
#[command(version)]
struct Cli {
    /// Path to the input image (defaults to tulips.jpg in the working directory).
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path to write the annotated image; format follows the extension.
    #[arg(short, long, default_value = "annotated.png")]
    output: PathBuf,

    /// JSON pipeline configuration. Flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grayscale formula: weighted or average.
    #[arg(long)]
    mode: Option<String>,

    /// Edge overlay neighbourhood size (half-width is size / 2).
    #[arg(long)]
    edge_size: Option<u32>,

    /// Mark pixels whose corner score is above this value.
    #[arg(long)]
    threshold: Option<f32>,

    /// Marker circle radius in pixels.
    #[arg(long)]
    radius: Option<u32>,

    /// Marker outline width; -1 draws a filled disk.
    #[arg(long, allow_negative_numbers = true)]
    thickness: Option<i32>,

    /// Marker intensity (0 = black).
    #[arg(long)]
    color: Option<u8>,

    /// Stop after this stage and write its output.
    #[arg(long, value_enum, default_value_t = StopAfter::Marked)]
    stage: StopAfter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StopAfter {
    Gray,
    Contrast,
    Overlay,
    Marked,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "pixmark failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let input = resolve_input(cli.input.as_deref())?;
    tracing::info!(input = %input.display(), "Input file");

    let image = io::load_image(&input)?;
    let annotator = Annotator::new(config);
    let output = annotate(&annotator, &image, cli.stage)?;

    io::save_image(&output, &cli.output)?;
    tracing::info!(output = %cli.output.display(), stage = ?cli.stage, "Annotated image written");
    Ok(())
}

/// Start from the config file (or defaults) and apply each flag that was
/// given, leaving the others untouched.
fn resolve_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(mode) = &cli.mode {
        config.mode = mode.parse::<GrayscaleMode>()?;
    }
    if let Some(edge_size) = cli.edge_size {
        config.edge_size = edge_size;
    }
    config.marker = config
        .marker
        .with_overrides(cli.threshold, cli.radius, cli.thickness, cli.color)?;

    config.validate()?;
    Ok(config)
}

fn resolve_input(input: Option<&Path>) -> Result<PathBuf> {
    let path = match input {
        Some(path) => path.to_path_buf(),
        None => {
            tracing::warn!(default = DEFAULT_INPUT, "No input given; the default input file will be used");
            PathBuf::from(DEFAULT_INPUT)
        }
    };
    if !path.exists() {
        return Err(PixmarkError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input file {} does not exist", path.display()),
        )));
    }
    Ok(path)
}

fn annotate(annotator: &Annotator, image: &DynamicImage, stop: StopAfter) -> Result<DynamicImage> {
    let gray = annotator.grayscale(image)?;
    if stop == StopAfter::Gray {
        return Ok(gray);
    }

    let stretched = annotator.stretch_contrast(&gray)?;
    if stop == StopAfter::Contrast {
        return Ok(stretched);
    }

    let edge_detector = CannyEdgeDetector::from_config(annotator.config());
    let corner_scorer = HarrisCornerScorer::from_config(annotator.config());
    let (edges, scores) = annotator.detect(&stretched, &edge_detector, &corner_scorer);
    let overlaid = annotator.overlay_edges(&stretched, &edges)?;
    if stop == StopAfter::Overlay {
        return Ok(overlaid);
    }

    annotator.mark_features(&overlaid, &scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use pixmark_core::Thickness;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["pixmark"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("valid arguments")
    }

    fn square_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(32, 32, |x, y| {
            if (8..24).contains(&x) && (8..24).contains(&y) {
                Rgb([220, 210, 200])
            } else {
                Rgb([25, 30, 35])
            }
        }))
    }

    #[test]
    fn negative_thickness_parses_as_filled() {
        let cli = parse(&["--thickness", "-1"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.marker.thickness, Thickness::Filled);
    }

    #[test]
    fn flags_override_config_file_field_by_field() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"mode": "average", "edge_size": 5, "marker": {{"radius": 4, "color": 128}}}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_owned();

        let cli = parse(&["--config", path.as_str(), "--radius", "7", "--edge-size", "3"]);
        let config = resolve_config(&cli).unwrap();

        assert_eq!(config.mode, GrayscaleMode::Average);
        assert_eq!(config.edge_size, 3);
        assert_eq!(config.marker.radius, 7);
        assert_eq!(config.marker.color, 128);
        assert_eq!(config.marker.threshold, 90.0);
    }

    #[test]
    fn unknown_mode_is_invalid_argument() {
        let cli = parse(&["--mode", "sepia"]);
        let err = resolve_config(&cli).unwrap_err();
        assert!(matches!(err, PixmarkError::InvalidArgument(_)));
    }

    #[test]
    fn zero_edge_size_is_rejected() {
        let cli = parse(&["--edge-size", "0"]);
        assert!(matches!(
            resolve_config(&cli),
            Err(PixmarkError::InvalidArgument(_))
        ));
    }

    #[test]
    fn missing_input_is_an_error() {
        let err = resolve_input(Some(Path::new("/nonexistent/input.png"))).unwrap_err();
        assert!(matches!(err, PixmarkError::Io(_)));
    }

    #[test]
    fn stop_after_gray_returns_single_channel() {
        let annotator = Annotator::new(PipelineConfig::default());
        let out = annotate(&annotator, &square_image(), StopAfter::Gray).unwrap();
        assert_eq!(out.color().channel_count(), 1);
        assert_eq!(out.to_luma8().get_pixel(0, 0).0[0], 29);
    }

    #[test]
    fn stop_after_contrast_spans_full_range() {
        let annotator = Annotator::new(PipelineConfig::default());
        let out = annotate(&annotator, &square_image(), StopAfter::Contrast)
            .unwrap()
            .to_luma8();
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(16, 16).0[0], 255);
    }

    #[test]
    fn run_writes_annotated_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("square.png");
        let output = dir.path().join("annotated.png");
        io::save_image(&square_image(), &input).unwrap();

        let cli = parse(&[
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--thickness",
            "-1",
        ]);
        run(&cli).unwrap();

        let written = io::load_image(&output).unwrap();
        assert_eq!((written.width(), written.height()), (32, 32));
        assert_eq!(written.color().channel_count(), 1);
    }
}
