// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pixmark.

use thiserror::Error;

/// Top-level error type for all Pixmark operations.
#[derive(Debug, Error)]
pub enum PixmarkError {
    // -- Parameter errors --
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // -- Transform preconditions --
    #[error("channel mismatch: expected {expected} channel(s), got {actual}")]
    ChannelMismatch { expected: u8, actual: u8 },

    #[error("shape mismatch: expected {expected:?} (width, height), got {actual:?}")]
    ShapeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("degenerate input: every pixel has value {value}")]
    DegenerateInput { value: u8 },

    // -- Raster I/O --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Configuration / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PixmarkError {
    /// Whether a pipeline stage may recover from this error by passing its
    /// input through unchanged.
    ///
    /// Only `ChannelMismatch` and `DegenerateInput` qualify. Shape mismatches
    /// and invalid arguments always abort the call.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ChannelMismatch { .. } | Self::DegenerateInput { .. }
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PixmarkError>;
