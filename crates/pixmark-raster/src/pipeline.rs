// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Annotation pipeline — grayscale, contrast stretch, detection, edge overlay,
// and feature marking, with per-stage telemetry and the pass-through policy
// for recoverable errors.

use std::sync::Arc;
use std::time::Instant;

use image::{DynamicImage, GrayImage};
use pixmark_core::PipelineConfig;
use pixmark_core::error::Result;
use tracing::{debug, info, instrument, warn};

use crate::detect::{CannyEdgeDetector, CornerScorer, EdgeDetector, HarrisCornerScorer};
use crate::maps::{EdgeMap, ScoreMap};
use crate::observer::{Stage, TracingObserver, TransformObserver, TransformReport};
use crate::transform;

/// Output of a full pipeline run.
#[derive(Debug, Clone)]
pub struct Annotation {
    /// The annotated image.
    pub image: DynamicImage,
    /// Edge map detected on the contrast-stretched image.
    pub edges: EdgeMap,
    /// Corner scores computed on the contrast-stretched image.
    pub scores: ScoreMap,
    /// Number of feature markers drawn.
    pub markers: usize,
}

/// Runs the annotation stages over a single image.
///
/// Each stage reads its input and returns a new image, so the caller's image
/// is never modified.
///
/// Recoverable errors (`ChannelMismatch`, `DegenerateInput`) are logged and
/// the stage passes its input through unchanged: feeding an already-gray
/// image skips the grayscale stage, and a flat image skips the contrast
/// stretch. All other errors abort the run.
///
/// ```ignore
/// let annotator = Annotator::new(PipelineConfig::default());
/// let annotation = annotator.run_with_defaults(&image::open("tulips.jpg")?)?;
/// annotation.image.save("annotated.png")?;
/// ```
pub struct Annotator {
    config: PipelineConfig,
    observer: Arc<dyn TransformObserver>,
}

impl Annotator {
    // -- Construction ---------------------------------------------------------

    /// Annotator that reports stages through `tracing`.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the stage observer.
    pub fn with_observer(mut self, observer: Arc<dyn TransformObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // -- Stages ---------------------------------------------------------------

    /// Reduce a colour image to one channel using the configured mode.
    #[instrument(skip_all, fields(mode = %self.config.mode))]
    pub fn grayscale(&self, image: &DynamicImage) -> Result<DynamicImage> {
        let mode = self.config.mode;
        self.run_stage(
            Stage::Grayscale,
            image,
            vec![("mode", mode.to_string())],
            |input| transform::to_grayscale(input, mode).map(DynamicImage::ImageLuma8),
        )
    }

    /// Stretch a single-channel image to the full 0..=255 range.
    #[instrument(skip_all)]
    pub fn stretch_contrast(&self, image: &DynamicImage) -> Result<DynamicImage> {
        let mut params = Vec::new();
        if !image.color().has_color() {
            if let Some((min, max)) = transform::value_range(&image.to_luma8()) {
                params.push(("min", min.to_string()));
                params.push(("max", max.to_string()));
                if max > min {
                    params.push(("k", format!("{:.4}", 255.0 / f32::from(max - min))));
                }
            }
        }
        self.run_stage(Stage::Contrast, image, params, |input| {
            transform::stretch_contrast(input).map(DynamicImage::ImageLuma8)
        })
    }

    /// Run both detectors over the (stretched) image.
    #[instrument(skip_all)]
    pub fn detect(
        &self,
        image: &DynamicImage,
        edge_detector: &dyn EdgeDetector,
        corner_scorer: &dyn CornerScorer,
    ) -> (EdgeMap, ScoreMap) {
        let gray: GrayImage = image.to_luma8();

        let start = Instant::now();
        let edges = edge_detector.detect_edges(&gray);
        self.report(
            Stage::EdgeDetection,
            edges.dimensions(),
            1,
            vec![("edge_pixels", edges.edge_count().to_string())],
            start,
            false,
        );

        let start = Instant::now();
        let scores = corner_scorer.corner_scores(&gray);
        let above = scores.centers_above(self.config.marker.threshold).len();
        self.report(
            Stage::CornerScoring,
            scores.dimensions(),
            1,
            vec![("above_threshold", above.to_string())],
            start,
            false,
        );

        (edges, scores)
    }

    /// Blacken the configured neighbourhood around every edge pixel.
    #[instrument(skip_all, fields(edge_size = self.config.edge_size))]
    pub fn overlay_edges(&self, image: &DynamicImage, edges: &EdgeMap) -> Result<DynamicImage> {
        let size = self.config.edge_size;
        self.run_stage(
            Stage::EdgeOverlay,
            image,
            vec![
                ("size", size.to_string()),
                ("edge_pixels", edges.edge_count().to_string()),
            ],
            |input| transform::overlay_edges(input, edges, size).map(DynamicImage::ImageLuma8),
        )
    }

    /// Draw the configured marker at every score above the threshold.
    #[instrument(skip_all, fields(threshold = self.config.marker.threshold))]
    pub fn mark_features(&self, image: &DynamicImage, scores: &ScoreMap) -> Result<DynamicImage> {
        let style = self.config.marker;
        self.run_stage(
            Stage::FeatureMarking,
            image,
            vec![
                ("threshold", style.threshold.to_string()),
                ("radius", style.radius.to_string()),
                ("thickness", style.thickness.to_raw().to_string()),
                ("color", style.color.to_string()),
            ],
            |input| transform::mark_features(input, scores, &style),
        )
    }

    // -- Full pipeline --------------------------------------------------------

    /// Run every stage with the given detectors.
    ///
    /// Detection runs on the contrast-stretched image, strictly before the
    /// overlay blackens anything.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn run(
        &self,
        image: &DynamicImage,
        edge_detector: &dyn EdgeDetector,
        corner_scorer: &dyn CornerScorer,
    ) -> Result<Annotation> {
        self.config.validate()?;
        info!("Running annotation pipeline");

        let gray = self.grayscale(image)?;
        let stretched = self.stretch_contrast(&gray)?;
        let (edges, scores) = self.detect(&stretched, edge_detector, corner_scorer);
        let overlaid = self.overlay_edges(&stretched, &edges)?;
        let marked = self.mark_features(&overlaid, &scores)?;
        let markers = scores.centers_above(self.config.marker.threshold).len();

        debug!(markers, "Annotation pipeline complete");
        Ok(Annotation {
            image: marked,
            edges,
            scores,
            markers,
        })
    }

    /// Run every stage with Canny edges and Harris scores built from the
    /// config.
    pub fn run_with_defaults(&self, image: &DynamicImage) -> Result<Annotation> {
        let edge_detector = CannyEdgeDetector::from_config(&self.config);
        let corner_scorer = HarrisCornerScorer::from_config(&self.config);
        self.run(image, &edge_detector, &corner_scorer)
    }

    // -- Internals ------------------------------------------------------------

    fn run_stage(
        &self,
        stage: Stage,
        input: &DynamicImage,
        params: Vec<(&'static str, String)>,
        apply: impl FnOnce(&DynamicImage) -> Result<DynamicImage>,
    ) -> Result<DynamicImage> {
        let start = Instant::now();
        let (output, passed_through) = match apply(input) {
            Ok(output) => (output, false),
            Err(err) if err.is_recoverable() => {
                warn!(stage = %stage, error = %err, "Stage not applied; returning input unchanged");
                (input.clone(), true)
            }
            Err(err) => return Err(err),
        };
        self.report(
            stage,
            (output.width(), output.height()),
            output.color().channel_count(),
            params,
            start,
            passed_through,
        );
        Ok(output)
    }

    fn report(
        &self,
        stage: Stage,
        (width, height): (u32, u32),
        channels: u8,
        params: Vec<(&'static str, String)>,
        start: Instant,
        passed_through: bool,
    ) {
        self.observer.on_transform(&TransformReport {
            stage,
            width,
            height,
            channels,
            params,
            elapsed: start.elapsed(),
            passed_through,
        });
    }
}
