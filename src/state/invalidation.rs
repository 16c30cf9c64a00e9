use crate::state::params::{BackgroundKind, CompositionParams};

/// Render stages made stale by a parameter or bitmap change.
///
/// A redraw is needed iff at least one stage is dirty. Stages are tracked separately so callers
/// (and tests) can see exactly why a redraw happened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Invalidation {
    /// Canvas dimensions changed; the surface is reallocated.
    pub resize: bool,
    /// Background kind or its colors changed.
    pub background: bool,
    /// Product placement, rotation, shadow or the bitmap itself changed.
    pub product: bool,
    /// Caption content or styling changed while a caption is visible.
    pub text: bool,
}

impl Invalidation {
    /// Every stage dirty; used for the first render.
    pub fn full() -> Self {
        Self {
            resize: true,
            background: true,
            product: true,
            text: true,
        }
    }

    /// Whether anything needs to be redrawn.
    pub fn needs_redraw(self) -> bool {
        self.resize || self.background || self.product || self.text
    }

    /// Compute the stages invalidated going from `old` to `new`.
    ///
    /// `has_bitmap` tells whether a product image is present after the change and
    /// `bitmap_changed` whether the bitmap reference itself was replaced or cleared.
    pub fn between(
        old: &CompositionParams,
        new: &CompositionParams,
        has_bitmap: bool,
        bitmap_changed: bool,
    ) -> Self {
        Self {
            resize: old.width != new.width || old.height != new.height,
            background: background_changed(old, new),
            product: bitmap_changed || (has_bitmap && product_changed(old, new)),
            text: text_changed(old, new),
        }
    }
}

fn background_changed(old: &CompositionParams, new: &CompositionParams) -> bool {
    match (old.background, new.background) {
        (a, b) if a.is_checker() && b.is_checker() => false,
        (BackgroundKind::Solid, BackgroundKind::Solid) => old.solid_color != new.solid_color,
        (BackgroundKind::Gradient, BackgroundKind::Gradient) => {
            old.gradient_start != new.gradient_start || old.gradient_end != new.gradient_end
        }
        _ => true,
    }
}

fn product_changed(old: &CompositionParams, new: &CompositionParams) -> bool {
    if old.product_scale != new.product_scale || old.rotation_deg != new.rotation_deg {
        return true;
    }
    if old.shadow_enabled != new.shadow_enabled {
        return true;
    }
    new.shadow_enabled && old.effective_shadow_opacity() != new.effective_shadow_opacity()
}

fn text_changed(old: &CompositionParams, new: &CompositionParams) -> bool {
    let (before, after) = (old.visible_text(), new.visible_text());
    if before.is_none() && after.is_none() {
        return false;
    }
    before != after
        || old.text_color != new.text_color
        || old.text_size_px != new.text_size_px
        || old.text_weight != new.text_weight
        || old.effective_text_position() != new.effective_text_position()
}

#[cfg(test)]
#[path = "../../tests/unit/state/invalidation.rs"]
mod tests;
