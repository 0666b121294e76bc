//! Wrap configuration.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::primitives::Point;

/// Parameters for partitioning a source sequence into rows.
///
/// Hosts usually build this with the chained setters, or deserialize it from
/// their own settings file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WrapConfig {
    /// Target row width. Unbounded widths are written as `null`.
    #[serde(with = "unbounded_width")]
    pub width: f32,
    /// Horizontal gap between consecutive items of a row.
    pub gap: f32,
    /// Vertical gap between rows.
    pub line_spacing: f32,
    /// Top-left corner of the column.
    pub origin: Point,
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            width: f32::INFINITY,
            gap: 0.0,
            line_spacing: 0.0,
            origin: Point::ORIGIN,
        }
    }
}

impl WrapConfig {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    /// Set the target width.
    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Set the gap between items in a row.
    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    /// Set the vertical gap between rows.
    pub fn line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Set where the column is placed.
    pub fn origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Reject values the compositor cannot work with.
    ///
    /// An infinite width is allowed and puts everything on one row.
    pub fn validate(&self) -> Result<()> {
        if self.width.is_nan() || self.width < 0.0 {
            return Err(LayoutError::InvalidWidth(self.width));
        }
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(LayoutError::InvalidGap(self.gap));
        }
        if !self.line_spacing.is_finite() || self.line_spacing < 0.0 {
            return Err(LayoutError::InvalidGap(self.line_spacing));
        }
        Ok(())
    }
}

/// JSON has no infinity, so an unbounded width travels as `null`.
mod unbounded_width {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(width: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        if width.is_infinite() && width.is_sign_positive() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(width)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::INFINITY))
    }
}
