// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pixmark-raster — Pixel-level annotation transforms for Pixmark.
//
// Provides grayscale conversion, min-max contrast stretch, edge overlay, and
// threshold-based feature marking, plus the Canny/Harris detectors that feed
// them, an annotation pipeline with per-stage telemetry, and raster I/O.

pub mod detect;
pub mod io;
pub mod maps;
pub mod observer;
pub mod pipeline;
pub mod transform;

// Re-export the primary types so callers can use `pixmark_raster::Annotator` etc.
pub use detect::{CannyEdgeDetector, CornerScorer, EdgeDetector, HarrisCornerScorer};
pub use maps::{EdgeMap, ScoreMap};
pub use observer::{NoopObserver, Stage, TracingObserver, TransformObserver, TransformReport};
pub use pipeline::{Annotation, Annotator};
