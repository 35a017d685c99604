// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Pixmark annotation pipeline.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PixmarkError;

/// Luminance formula used when reducing a colour image to one channel.
///
/// Config files and the CLI share the same [`FromStr`] parsing, so names are
/// case-insensitive everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GrayscaleMode {
    /// Perceptual luminance: `0.2989 R + 0.5870 G + 0.1140 B`.
    #[default]
    Weighted,
    /// Plain channel mean: `(R + G + B) / 3`.
    Average,
}

impl GrayscaleMode {
    /// Every accepted spelling, canonical names first.
    pub const NAMES: [&'static str; 4] = ["weighted", "average", "add", "mid"];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weighted => "weighted",
            Self::Average => "average",
        }
    }
}

impl FromStr for GrayscaleMode {
    type Err = PixmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weighted" | "add" => Ok(Self::Weighted),
            "average" | "mid" => Ok(Self::Average),
            other => Err(PixmarkError::InvalidArgument(format!(
                "unknown grayscale mode \"{other}\" (expected one of {:?})",
                Self::NAMES
            ))),
        }
    }
}

impl TryFrom<String> for GrayscaleMode {
    type Error = PixmarkError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<GrayscaleMode> for String {
    fn from(mode: GrayscaleMode) -> Self {
        mode.as_str().to_owned()
    }
}

impl std::fmt::Display for GrayscaleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stroke of a feature marker circle.
///
/// On the wire (config files, CLI) this is a plain integer where `-1` means a
/// solid disk and any positive value is an outline width in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Thickness {
    /// Outline of the given width (at least 1).
    Outline(u32),
    /// Solid disk.
    Filled,
}

impl Thickness {
    /// Raw value reserved for a solid disk.
    pub const FILLED_SENTINEL: i32 = -1;

    /// Interpret a raw integer thickness.
    pub fn from_raw(raw: i32) -> Result<Self, PixmarkError> {
        match raw {
            Self::FILLED_SENTINEL => Ok(Self::Filled),
            n if n >= 1 => Ok(Self::Outline(n as u32)),
            n => Err(PixmarkError::InvalidArgument(format!(
                "marker thickness must be -1 (filled) or a positive width, got {n}"
            ))),
        }
    }

    /// Inverse of [`Thickness::from_raw`].
    pub fn to_raw(self) -> i32 {
        match self {
            Self::Outline(width) => width as i32,
            Self::Filled => Self::FILLED_SENTINEL,
        }
    }
}

impl Default for Thickness {
    fn default() -> Self {
        Self::Outline(1)
    }
}

impl TryFrom<i32> for Thickness {
    type Error = PixmarkError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}

impl From<Thickness> for i32 {
    fn from(thickness: Thickness) -> Self {
        thickness.to_raw()
    }
}

/// Styling for threshold-based feature markers.
///
/// Missing fields in a config file fall back to their own default, so a file
/// that only sets `radius` still gets `threshold = 90`, `thickness = 1` and
/// `color = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    /// Scores strictly above this value get a marker.
    pub threshold: f32,
    /// Circle radius in pixels.
    pub radius: u32,
    /// Outline width, or filled.
    pub thickness: Thickness,
    /// Intensity written for the marker (applied to every channel).
    pub color: u8,
}

impl MarkerStyle {
    pub const DEFAULT_THRESHOLD: f32 = 90.0;
    pub const DEFAULT_RADIUS: u32 = 10;
    pub const DEFAULT_COLOR: u8 = 0;

    /// Build a style where each omitted parameter takes its own default.
    pub fn from_parts(
        threshold: Option<f32>,
        radius: Option<u32>,
        thickness: Option<i32>,
        color: Option<u8>,
    ) -> Result<Self, PixmarkError> {
        Self::default().with_overrides(threshold, radius, thickness, color)
    }

    /// Replace only the parameters that are present.
    pub fn with_overrides(
        self,
        threshold: Option<f32>,
        radius: Option<u32>,
        thickness: Option<i32>,
        color: Option<u8>,
    ) -> Result<Self, PixmarkError> {
        let style = Self {
            threshold: threshold.unwrap_or(self.threshold),
            radius: radius.unwrap_or(self.radius),
            thickness: match thickness {
                Some(raw) => Thickness::from_raw(raw)?,
                None => self.thickness,
            },
            color: color.unwrap_or(self.color),
        };
        style.validate()?;
        Ok(style)
    }

    /// Largest radius the drawing routines can address.
    pub const MAX_RADIUS: u32 = i32::MAX as u32;

    /// Reject thresholds that would make the comparison meaningless, and radii
    /// outside signed pixel coordinates.
    pub fn validate(&self) -> Result<(), PixmarkError> {
        if self.threshold.is_nan() {
            return Err(PixmarkError::InvalidArgument(
                "marker threshold must be a number".into(),
            ));
        }
        if self.radius > Self::MAX_RADIUS {
            return Err(PixmarkError::InvalidArgument(format!(
                "marker radius must be at most {}, got {}",
                Self::MAX_RADIUS,
                self.radius
            )));
        }
        Ok(())
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            radius: Self::DEFAULT_RADIUS,
            thickness: Thickness::default(),
            color: Self::DEFAULT_COLOR,
        }
    }
}
