use crate::foundation::error::{DrawError, DrawResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Destination rectangle in surface pixel coordinates.
///
/// Independent of the source image size: a blit stretches the full source image into this
/// rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DestRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DestRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Integer center of the rectangle (`x + width / 2`, `y + height / 2`).
    ///
    /// Widened to `i64`, so rects near the ends of the `i32` range have an exact center.
    pub fn center(self) -> (i64, i64) {
        (
            i64::from(self.x) + i64::from(self.width) / 2,
            i64::from(self.y) + i64::from(self.height) / 2,
        )
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x) + f64::from(self.width),
            f64::from(self.y) + f64::from(self.height),
        )
    }

    /// Parse `x,y,w,h` (whitespace around components is ignored).
    pub fn parse(s: &str) -> DrawResult<Self> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DrawError::config(format!("invalid rect '{s}': {e}")))?;
        let [x, y, width, height] = parts[..] else {
            return Err(DrawError::config(format!(
                "rect '{s}' must have exactly 4 components"
            )));
        };
        Ok(Self::new(x, y, width, height))
    }
}

/// Resampling quality requested for a draw.
///
/// Backends map these onto the sampling qualities they support; several modes may share one
/// backend quality.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    NearestNeighbor,
    LowQuality,
    Bilinear,
    Bicubic,
    HighQualityBilinear,
    #[default]
    HighQualityBicubic,
}

impl InterpolationMode {
    pub const ALL: [Self; 6] = [
        Self::NearestNeighbor,
        Self::LowQuality,
        Self::Bilinear,
        Self::Bicubic,
        Self::HighQualityBilinear,
        Self::HighQualityBicubic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NearestNeighbor => "nearest_neighbor",
            Self::LowQuality => "low_quality",
            Self::Bilinear => "bilinear",
            Self::Bicubic => "bicubic",
            Self::HighQualityBilinear => "high_quality_bilinear",
            Self::HighQualityBicubic => "high_quality_bicubic",
        }
    }

    pub fn parse(s: &str) -> DrawResult<Self> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == norm)
            .ok_or_else(|| DrawError::config(format!("unknown interpolation mode '{s}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
