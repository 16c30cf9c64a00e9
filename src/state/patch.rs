use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgba8;
use crate::foundation::error::PackshotResult;
use crate::state::params::{BackgroundKind, CompositionParams, TextWeight};

/// Partial update of [`CompositionParams`].
///
/// Every field is optional; present fields override, absent fields keep their current value.
/// Values are taken verbatim, out-of-range numbers included.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParamsPatch {
    /// New canvas width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// New canvas height in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// New background kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundKind>,
    /// Fill used by the solid background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solid_color: Option<Rgba8>,
    /// Gradient color at the top-left corner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_start: Option<Rgba8>,
    /// Gradient color at the bottom-right corner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_end: Option<Rgba8>,
    /// Product size relative to its fitted size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_scale: Option<f64>,
    /// Product rotation in degrees, clockwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_deg: Option<f64>,
    /// Whether the drop shadow is drawn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_enabled: Option<bool>,
    /// Shadow opacity before clamping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_opacity: Option<f64>,
    /// Caption text; blank text hides the caption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_text: Option<String>,
    /// Caption color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Rgba8>,
    /// Caption size in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_size_px: Option<f32>,
    /// Caption font weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_weight: Option<TextWeight>,
    /// Caption center as a fraction of the canvas height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_position: Option<f64>,
}

impl ParamsPatch {
    /// Parse a patch from a JSON document.
    pub fn from_json(s: &str) -> PackshotResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Whether the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Combine two patches; fields present in `later` win.
    pub fn merged(&self, later: &ParamsPatch) -> ParamsPatch {
        ParamsPatch {
            width: later.width.or(self.width),
            height: later.height.or(self.height),
            background: later.background.or(self.background),
            solid_color: later.solid_color.or(self.solid_color),
            gradient_start: later.gradient_start.or(self.gradient_start),
            gradient_end: later.gradient_end.or(self.gradient_end),
            product_scale: later.product_scale.or(self.product_scale),
            rotation_deg: later.rotation_deg.or(self.rotation_deg),
            shadow_enabled: later.shadow_enabled.or(self.shadow_enabled),
            shadow_opacity: later.shadow_opacity.or(self.shadow_opacity),
            overlay_text: later
                .overlay_text
                .clone()
                .or_else(|| self.overlay_text.clone()),
            text_color: later.text_color.or(self.text_color),
            text_size_px: later.text_size_px.or(self.text_size_px),
            text_weight: later.text_weight.or(self.text_weight),
            text_position: later.text_position.or(self.text_position),
        }
    }
}

/// Shallow-merge `patch` over `current`, returning the new parameter version.
pub fn apply_patch(current: &CompositionParams, patch: &ParamsPatch) -> CompositionParams {
    let c = current;
    CompositionParams {
        width: patch.width.unwrap_or(c.width),
        height: patch.height.unwrap_or(c.height),
        background: patch.background.unwrap_or(c.background),
        solid_color: patch.solid_color.unwrap_or(c.solid_color),
        gradient_start: patch.gradient_start.unwrap_or(c.gradient_start),
        gradient_end: patch.gradient_end.unwrap_or(c.gradient_end),
        product_scale: patch.product_scale.unwrap_or(c.product_scale),
        rotation_deg: patch.rotation_deg.unwrap_or(c.rotation_deg),
        shadow_enabled: patch.shadow_enabled.unwrap_or(c.shadow_enabled),
        shadow_opacity: patch.shadow_opacity.unwrap_or(c.shadow_opacity),
        overlay_text: patch
            .overlay_text
            .clone()
            .unwrap_or_else(|| c.overlay_text.clone()),
        text_color: patch.text_color.unwrap_or(c.text_color),
        text_size_px: patch.text_size_px.unwrap_or(c.text_size_px),
        text_weight: patch.text_weight.unwrap_or(c.text_weight),
        text_position: patch.text_position.unwrap_or(c.text_position),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/patch.rs"]
mod tests;
