use kurbo::Ellipse;

use crate::foundation::core::{Affine, Point, Size, Vec2};

/// Fraction of the canvas width the product may occupy before user scaling.
pub const PRODUCT_BOX_WIDTH: f64 = 0.8;
/// Fraction of the canvas height the product may occupy before user scaling.
pub const PRODUCT_BOX_HEIGHT: f64 = 0.7;
/// Vertical anchor of the product center, as a fraction of canvas height.
pub const PRODUCT_ANCHOR_Y: f64 = 0.55;
/// Vertical compression applied to the shadow ellipse.
pub const SHADOW_SQUASH: f64 = 0.15;

/// Where and how large the product bitmap is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProductPlacement {
    /// Canvas point the product is centered and rotated about.
    pub anchor: Point,
    /// Rotation in radians.
    pub rotation_rad: f64,
    /// Bitmap pixels to canvas pixels.
    pub scale: f64,
    /// Drawn width in canvas pixels.
    pub draw_width: f64,
    /// Drawn height in canvas pixels.
    pub draw_height: f64,
}

impl ProductPlacement {
    /// Fit `bitmap` into the product box of `canvas`, then apply `product_scale`.
    ///
    /// Zero-size bitmaps get a scale of 0.
    pub fn compute(canvas: Size, bitmap: Size, product_scale: f64, rotation_deg: f64) -> Self {
        let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
        let (bw, bh) = (f64::from(bitmap.width), f64::from(bitmap.height));

        let fit = if bitmap.is_empty() {
            0.0
        } else {
            (cw * PRODUCT_BOX_WIDTH / bw).min(ch * PRODUCT_BOX_HEIGHT / bh)
        };
        let scale = fit * product_scale;

        Self {
            anchor: Point::new(cw / 2.0, ch * PRODUCT_ANCHOR_Y),
            rotation_rad: rotation_deg.to_radians(),
            scale,
            draw_width: bw * scale,
            draw_height: bh * scale,
        }
    }

    /// Whether nothing would be visible (non-positive or non-finite extents).
    pub fn is_degenerate(&self) -> bool {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        !(ok(self.draw_width) && ok(self.draw_height) && self.rotation_rad.is_finite())
    }

    /// Rotated frame centered on the anchor.
    pub fn frame(&self) -> Affine {
        Affine::translate(self.anchor.to_vec2()) * Affine::rotate(self.rotation_rad)
    }

    /// Maps bitmap pixel space onto the canvas, centered on the anchor.
    pub fn image_transform(&self) -> Affine {
        self.frame()
            * Affine::translate(Vec2::new(-self.draw_width / 2.0, -self.draw_height / 2.0))
            * Affine::scale(self.scale)
    }

    /// Frame the shadow ellipse is filled in: below the product and squashed vertically.
    pub fn shadow_transform(&self) -> Affine {
        self.frame()
            * Affine::translate(Vec2::new(0.0, self.draw_height / 2.0))
            * Affine::scale_non_uniform(1.0, SHADOW_SQUASH)
    }

    /// Shadow ellipse in the shadow frame.
    pub fn shadow_ellipse(&self) -> Ellipse {
        Ellipse::new(
            Point::ORIGIN,
            Vec2::new(0.35 * self.draw_width, 0.18 * self.draw_height),
            0.0,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/placement.rs"]
mod tests;
