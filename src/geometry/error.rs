// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry errors

use thiserror::Error;

/// Errors raised while constructing solids
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Fillet radius does not fit the edges it rounds
    #[error("invalid fillet radius {radius} (must be > 0 and <= {max})")]
    InvalidFillet { radius: f64, max: f64 },

    /// Placement axis has zero length
    #[error("placement axis has zero length")]
    DegenerateAxis,
}
