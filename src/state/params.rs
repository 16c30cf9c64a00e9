use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgba8;
use crate::foundation::core::Size;

/// Upper bound of the shadow opacity range.
pub const MAX_SHADOW_OPACITY: f64 = 0.6;

/// How the canvas behind the product is painted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    /// Rendered as the checker pattern that stands in for transparency.
    Transparent,
    /// Single fill color.
    #[default]
    Solid,
    /// Diagonal linear gradient, top-left to bottom-right.
    Gradient,
    /// Explicit checker pattern.
    Checker,
}

impl BackgroundKind {
    /// Whether this kind is drawn with the checker pattern.
    pub fn is_checker(self) -> bool {
        matches!(self, Self::Transparent | Self::Checker)
    }
}

/// CSS-style numeric font weight (100..=900).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextWeight(pub u16);

impl TextWeight {
    /// Regular weight.
    pub const NORMAL: Self = Self(400);
    /// Bold weight.
    pub const BOLD: Self = Self(700);

    fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "normal" | "regular" => Ok(Self::NORMAL),
            "bold" => Ok(Self::BOLD),
            other => other
                .parse::<u16>()
                .map(Self)
                .map_err(|_| format!("invalid text weight \"{s}\"")),
        }
    }
}

impl Default for TextWeight {
    fn default() -> Self {
        Self::BOLD
    }
}

impl Serialize for TextWeight {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.0)
    }
}

impl<'de> Deserialize<'de> for TextWeight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(u16),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Ok(Self(n)),
            Repr::Name(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// One immutable version of the composition parameters.
///
/// Values are replaced wholesale by [`crate::apply_patch`]; nothing mutates a published value.
/// Numeric fields are stored verbatim; clamping to the documented ranges happens where the value
/// is consumed (see the `effective_*` accessors).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompositionParams {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Background style.
    pub background: BackgroundKind,
    /// Fill color for [`BackgroundKind::Solid`].
    pub solid_color: Rgba8,
    /// Gradient color at the top-left corner.
    pub gradient_start: Rgba8,
    /// Gradient color at the bottom-right corner.
    pub gradient_end: Rgba8,
    /// Multiplier applied on top of the fit-to-box product scale.
    pub product_scale: f64,
    /// Product rotation in degrees, clockwise in image space.
    pub rotation_deg: f64,
    /// Whether the drop shadow is drawn under the product.
    pub shadow_enabled: bool,
    /// Shadow opacity, used clamped to `[0, 0.6]`.
    pub shadow_opacity: f64,
    /// Caption text; blank text draws nothing.
    pub overlay_text: String,
    /// Caption color.
    pub text_color: Rgba8,
    /// Caption font size in pixels.
    pub text_size_px: f32,
    /// Caption font weight.
    pub text_weight: TextWeight,
    /// Vertical caption center as a fraction of canvas height, used clamped to `[0, 1]`.
    pub text_position: f64,
}

impl Default for CompositionParams {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1080,
            background: BackgroundKind::Solid,
            solid_color: Rgba8::WHITE,
            gradient_start: Rgba8::rgb(0xf3, 0xf4, 0xf6),
            gradient_end: Rgba8::rgb(0xd1, 0xd5, 0xdb),
            product_scale: 1.0,
            rotation_deg: 0.0,
            shadow_enabled: true,
            shadow_opacity: 0.2,
            overlay_text: String::new(),
            text_color: Rgba8::rgb(0x11, 0x18, 0x27),
            text_size_px: 64.0,
            text_weight: TextWeight::BOLD,
            text_position: 0.85,
        }
    }
}

impl CompositionParams {
    /// Canvas dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Copy of these parameters with the canvas dimensions replaced.
    pub fn with_size(&self, size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            ..self.clone()
        }
    }

    /// Shadow opacity clamped to `[0, 0.6]`; non-finite values count as zero.
    pub fn effective_shadow_opacity(&self) -> f64 {
        if !self.shadow_opacity.is_finite() {
            return 0.0;
        }
        self.shadow_opacity.clamp(0.0, MAX_SHADOW_OPACITY)
    }

    /// Caption position clamped to `[0, 1]`; non-finite values fall back to the center.
    pub fn effective_text_position(&self) -> f64 {
        if !self.text_position.is_finite() {
            return 0.5;
        }
        self.text_position.clamp(0.0, 1.0)
    }

    /// The caption to draw, or `None` when it is empty or whitespace only.
    pub fn visible_text(&self) -> Option<&str> {
        if self.overlay_text.trim().is_empty() {
            None
        } else {
            Some(self.overlay_text.as_str())
        }
    }
}

/// Documented default parameters.
pub fn initialize() -> CompositionParams {
    CompositionParams::default()
}

#[cfg(test)]
#[path = "../../tests/unit/state/params.rs"]
mod tests;
