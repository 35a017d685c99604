// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PixmarkError, Result};
use crate::types::{GrayscaleMode, MarkerStyle};

/// Settings for one run of the annotation pipeline.
///
/// Every field has a default, so a config file only needs to name what it
/// changes. Deserialization goes through a raw file form that applies the
/// same parsing and range checks as the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigFile")]
pub struct PipelineConfig {
    /// Luminance formula for the grayscale stage.
    pub mode: GrayscaleMode,
    /// Edge overlay neighbourhood size; the half-width is `edge_size / 2`.
    pub edge_size: u32,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Harris structure-tensor window half-width.
    pub harris_block_size: u32,
    /// Harris sensitivity constant.
    pub harris_k: f32,
    /// Feature marker styling.
    pub marker: MarkerStyle,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: GrayscaleMode::Weighted,
            edge_size: 1,
            canny_low: 50.0,
            canny_high: 150.0,
            harris_block_size: 2,
            harris_k: 0.04,
            marker: MarkerStyle::default(),
        }
    }
}

/// On-disk shape of [`PipelineConfig`]: every field optional, enum-like
/// values kept raw until `PipelineConfig::try_from` interprets them.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    mode: Option<String>,
    edge_size: Option<u32>,
    canny_low: Option<f32>,
    canny_high: Option<f32>,
    harris_block_size: Option<u32>,
    harris_k: Option<f32>,
    marker: Option<MarkerFile>,
}

#[derive(Debug, Default, Deserialize)]
struct MarkerFile {
    threshold: Option<f32>,
    radius: Option<u32>,
    thickness: Option<i32>,
    color: Option<u8>,
}

impl TryFrom<ConfigFile> for PipelineConfig {
    type Error = PixmarkError;

    fn try_from(file: ConfigFile) -> Result<Self> {
        let defaults = Self::default();
        let marker = file.marker.unwrap_or_default();
        let config = Self {
            mode: match file.mode {
                Some(name) => name.parse()?,
                None => defaults.mode,
            },
            edge_size: file.edge_size.unwrap_or(defaults.edge_size),
            canny_low: file.canny_low.unwrap_or(defaults.canny_low),
            canny_high: file.canny_high.unwrap_or(defaults.canny_high),
            harris_block_size: file.harris_block_size.unwrap_or(defaults.harris_block_size),
            harris_k: file.harris_k.unwrap_or(defaults.harris_k),
            marker: MarkerStyle::from_parts(
                marker.threshold,
                marker.radius,
                marker.thickness,
                marker.color,
            )?,
        };
        config.validate()?;
        Ok(config)
    }
}

impl PipelineConfig {
    /// Load and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON config document.
    ///
    /// Malformed JSON is a `Serialization` error; well-formed JSON with an
    /// unknown mode or out-of-range value is `InvalidArgument`.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(text)?;
        Self::try_from(file)
    }

    /// Range checks that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.edge_size == 0 {
            return Err(PixmarkError::InvalidArgument(
                "edge_size must be at least 1".into(),
            ));
        }
        if !(self.canny_low >= 0.0 && self.canny_low <= self.canny_high) {
            return Err(PixmarkError::InvalidArgument(format!(
                "canny thresholds must satisfy 0 <= low <= high, got low={} high={}",
                self.canny_low, self.canny_high
            )));
        }
        if self.harris_block_size == 0 {
            return Err(PixmarkError::InvalidArgument(
                "harris_block_size must be at least 1".into(),
            ));
        }
        if !(self.harris_k.is_finite() && self.harris_k > 0.0) {
            return Err(PixmarkError::InvalidArgument(format!(
                "harris_k must be a positive number, got {}",
                self.harris_k
            )));
        }
        self.marker.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Thickness;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.edge_size, 1);
        assert_eq!(config.mode, GrayscaleMode::Weighted);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config =
            PipelineConfig::from_json_str(r#"{"mode": "mid", "marker": {"radius": 3}}"#).unwrap();
        assert_eq!(config.mode, GrayscaleMode::Average);
        assert_eq!(config.edge_size, 1);
        assert_eq!(config.marker.radius, 3);
        assert_eq!(config.marker.threshold, 90.0);
        assert_eq!(config.marker.thickness, Thickness::Outline(1));
    }

    #[test]
    fn zero_edge_size_is_rejected() {
        let err = PipelineConfig::from_json_str(r#"{"edge_size": 0}"#).unwrap_err();
        assert!(matches!(err, PixmarkError::InvalidArgument(_)));
    }

    #[test]
    fn unknown_mode_is_invalid_argument() {
        let err = PipelineConfig::from_json_str(r#"{"mode": "sepia"}"#).unwrap_err();
        assert!(matches!(err, PixmarkError::InvalidArgument(_)));
    }

    #[test]
    fn mode_names_are_case_insensitive_in_json() {
        let config = PipelineConfig::from_json_str(r#"{"mode": "Weighted"}"#).unwrap();
        assert_eq!(config.mode, GrayscaleMode::Weighted);
        let config = PipelineConfig::from_json_str(r#"{"mode": "Average"}"#).unwrap();
        assert_eq!(config.mode, GrayscaleMode::Average);
    }

    #[test]
    fn bad_thickness_is_invalid_argument() {
        for raw in [0, -2] {
            let text = format!(r#"{{"marker": {{"thickness": {raw}}}}}"#);
            let err = PipelineConfig::from_json_str(&text).unwrap_err();
            assert!(matches!(err, PixmarkError::InvalidArgument(_)), "thickness {raw}");
        }
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let err = PipelineConfig::from_json_str(r#"{"edge_size": "#).unwrap_err();
        assert!(matches!(err, PixmarkError::Serialization(_)));
    }

    #[test]
    fn serialized_config_reads_back() {
        let config = PipelineConfig {
            mode: GrayscaleMode::Average,
            edge_size: 4,
            marker: MarkerStyle::from_parts(None, Some(5), Some(-1), Some(200)).unwrap(),
            ..PipelineConfig::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(PipelineConfig::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn inverted_canny_thresholds_are_rejected() {
        let config = PipelineConfig {
            canny_low: 200.0,
            canny_high: 100.0,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"edge_size": 5, "marker": {{"thickness": -1}}}}"#).unwrap();

        let config = PipelineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.edge_size, 5);
        assert_eq!(config.marker.thickness, Thickness::Filled);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PipelineConfig::from_json_file("/nonexistent/pixmark.json").unwrap_err();
        assert!(matches!(err, PixmarkError::Io(_)));
    }
}
