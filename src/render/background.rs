use crate::foundation::color::Rgba8;
use crate::render::surface::Surface;
use crate::state::params::{BackgroundKind, CompositionParams};

/// Edge length of a checkerboard tile in device pixels.
pub const CHECKER_TILE_PX: u32 = 32;
/// Tile color where `(i + j)` is even.
pub const CHECKER_EVEN: Rgba8 = Rgba8::rgb(0xf3, 0xf4, 0xf6);
/// Tile color where `(i + j)` is odd.
pub const CHECKER_ODD: Rgba8 = Rgba8::rgb(0xe5, 0xe7, 0xeb);

/// Paint the background stage, overwriting every pixel.
pub fn paint_background(surface: &mut Surface, params: &CompositionParams) {
    match params.background {
        BackgroundKind::Transparent | BackgroundKind::Checker => paint_checker(surface),
        BackgroundKind::Solid => surface.fill(params.solid_color.to_premul()),
        BackgroundKind::Gradient => {
            paint_gradient(surface, params.gradient_start, params.gradient_end)
        }
    }
}

fn paint_checker(surface: &mut Surface) {
    let (even, odd) = (CHECKER_EVEN.to_premul(), CHECKER_ODD.to_premul());
    let width = surface.width() as usize;
    for (idx, px) in surface.data_mut().chunks_exact_mut(4).enumerate() {
        let i = (idx % width) as u32 / CHECKER_TILE_PX;
        let j = (idx / width) as u32 / CHECKER_TILE_PX;
        px.copy_from_slice(if (i + j) % 2 == 0 { &even } else { &odd });
    }
}

// Linear gradient along the top-left to bottom-right diagonal.
fn paint_gradient(surface: &mut Surface, start: Rgba8, end: Rgba8) {
    let (w, h) = (f64::from(surface.width()), f64::from(surface.height()));
    let len_sq = w * w + h * h;
    let (a, b) = (start.to_premul(), end.to_premul());
    let width = surface.width() as usize;

    for (idx, px) in surface.data_mut().chunks_exact_mut(4).enumerate() {
        let x = (idx % width) as f64 + 0.5;
        let y = (idx / width) as f64 + 0.5;
        let t = ((x * w + y * h) / len_sq).clamp(0.0, 1.0);
        px.copy_from_slice(&lerp_premul(a, b, t));
    }
}

fn lerp_premul(a: [u8; 4], b: [u8; 4], t: f64) -> [u8; 4] {
    use crate::foundation::math::lerp_u8;

    let mut out = [
        lerp_u8(a[0], b[0], t),
        lerp_u8(a[1], b[1], t),
        lerp_u8(a[2], b[2], t),
        lerp_u8(a[3], b[3], t),
    ];
    let alpha = out[3];
    for c in &mut out[..3] {
        *c = (*c).min(alpha);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
