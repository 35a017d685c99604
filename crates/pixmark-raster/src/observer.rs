// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-stage telemetry. The transforms themselves never log; the pipeline
// reports each stage to an injected observer.

use std::time::Duration;

use tracing::info;

/// One step of the annotation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Grayscale,
    Contrast,
    EdgeDetection,
    CornerScoring,
    EdgeOverlay,
    FeatureMarking,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Contrast => "contrast",
            Self::EdgeDetection => "edge_detection",
            Self::CornerScoring => "corner_scoring",
            Self::EdgeOverlay => "edge_overlay",
            Self::FeatureMarking => "feature_marking",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a stage did, reported after it finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformReport {
    pub stage: Stage,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output channel count.
    pub channels: u8,
    /// Stage parameters and derived values, e.g. `("mode", "weighted")`.
    pub params: Vec<(&'static str, String)>,
    pub elapsed: Duration,
    /// The stage hit a recoverable error and returned its input unchanged.
    pub passed_through: bool,
}

impl TransformReport {
    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Receives a report for every completed stage.
pub trait TransformObserver: Send + Sync {
    fn on_transform(&self, report: &TransformReport);
}

/// Logs every report through `tracing` at INFO level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TransformObserver for TracingObserver {
    fn on_transform(&self, report: &TransformReport) {
        let params = report
            .params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(" ");
        info!(
            stage = %report.stage,
            width = report.width,
            height = report.height,
            channels = report.channels,
            elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
            passed_through = report.passed_through,
            params = %params,
            "Stage complete"
        );
    }
}

/// Discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TransformObserver for NoopObserver {
    fn on_transform(&self, _report: &TransformReport) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_lookup_by_name() {
        let report = TransformReport {
            stage: Stage::Contrast,
            width: 4,
            height: 4,
            channels: 1,
            params: vec![("min", "10".into()), ("max", "200".into())],
            elapsed: Duration::from_millis(1),
            passed_through: false,
        };
        assert_eq!(report.param("max"), Some("200"));
        assert_eq!(report.param("k"), None);
    }

    #[test]
    fn stage_names_are_snake_case() {
        assert_eq!(Stage::EdgeOverlay.to_string(), "edge_overlay");
        assert_eq!(Stage::Grayscale.as_str(), "grayscale");
    }
}
