use crate::foundation::error::{PackshotError, PackshotResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Largest width or height the CPU rasterizer accepts.
pub const MAX_SURFACE_EXTENT: u32 = u16::MAX as u32;

/// Pixel dimensions of a surface or bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Construct a size without validation.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered.
    pub fn area(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Whether either extent is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check the size can back a raster surface and return it as `u16` extents.
    pub fn raster_extents(self) -> PackshotResult<(u16, u16)> {
        if self.is_empty() {
            return Err(PackshotError::validation(format!(
                "surface size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        let w: u16 = self.width.try_into().map_err(|_| {
            PackshotError::validation(format!(
                "surface width {} exceeds {MAX_SURFACE_EXTENT}",
                self.width
            ))
        })?;
        let h: u16 = self.height.try_into().map_err(|_| {
            PackshotError::validation(format!(
                "surface height {} exceeds {MAX_SURFACE_EXTENT}",
                self.height
            ))
        })?;
        Ok((w, h))
    }

    /// Multiply both extents by `factor`, rounding to the nearest pixel.
    pub fn scaled_round(self, factor: f64) -> PackshotResult<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(PackshotError::validation(format!(
                "scale factor must be finite and > 0, got {factor}"
            )));
        }
        let scale = |v: u32| -> PackshotResult<u32> {
            let out = (f64::from(v) * factor).round();
            if out > f64::from(MAX_SURFACE_EXTENT) {
                return Err(PackshotError::validation(format!(
                    "scaled extent {out} exceeds {MAX_SURFACE_EXTENT}"
                )));
            }
            Ok(out as u32)
        };
        Ok(Self {
            width: scale(self.width)?,
            height: scale(self.height)?,
        })
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
