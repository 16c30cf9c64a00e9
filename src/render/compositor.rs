use kurbo::Shape;

use crate::assets::decode::Bitmap;
use crate::assets::fonts::FontBook;
use crate::assets::text::{CaptionStyle, TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::{Affine, Size, Vec2};
use crate::foundation::error::PackshotResult;
use crate::render::background::paint_background;
use crate::render::placement::ProductPlacement;
use crate::render::surface::Surface;
use crate::state::params::CompositionParams;

/// Pure compositing function: parameters and an optional bitmap in, a drawn surface out.
///
/// Stages run in a fixed order: background, product (shadow first), caption. The background is
/// written straight into the surface; product and caption are rasterized with `vello_cpu` into
/// an overlay which is then composited source-over.
#[derive(Clone, Debug)]
pub struct Compositor {
    fonts: FontBook,
}

impl Compositor {
    /// Compositor drawing captions with faces from `fonts`.
    pub fn new(fonts: FontBook) -> Self {
        Self { fonts }
    }

    /// Font book used for captions.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Render at the canvas size held in `params`.
    pub fn render(
        &self,
        params: &CompositionParams,
        bitmap: Option<&Bitmap>,
    ) -> PackshotResult<Surface> {
        self.render_at(params, bitmap, params.size())
    }

    /// Render with the canvas size replaced by `size`; every other parameter is used as-is.
    #[tracing::instrument(level = "debug", skip(self, params, bitmap), fields(has_bitmap = bitmap.is_some()))]
    pub fn render_at(
        &self,
        params: &CompositionParams,
        bitmap: Option<&Bitmap>,
        size: Size,
    ) -> PackshotResult<Surface> {
        let mut surface = Surface::new(size)?;
        let (w, h) = size.raster_extents()?;

        paint_background(&mut surface, params);

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        let mut drew = false;
        if let Some(bitmap) = bitmap {
            drew |= draw_product(&mut ctx, params, bitmap, size);
        }
        if let Some(text) = params.visible_text() {
            drew |= self.draw_caption(&mut ctx, params, text, size);
        }

        if drew {
            ctx.flush();
            let mut overlay = vello_cpu::Pixmap::new(w, h);
            ctx.render_to_pixmap(&mut overlay);
            surface.premul_over_in_place(overlay.data_as_u8_slice())?;
        }
        Ok(surface)
    }

    fn draw_caption(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        params: &CompositionParams,
        text: &str,
        size: Size,
    ) -> bool {
        let Some(font) = self.fonts.resolve(params.text_weight.0) else {
            tracing::warn!("no font face available, caption skipped");
            return false;
        };

        let style = CaptionStyle {
            size_px: params.text_size_px,
            weight: params.text_weight.0,
            brush: TextBrushRgba8::from(params.text_color),
        };
        let layout = match TextLayoutEngine::new().layout_plain(text, &font, style) {
            Ok(layout) => layout,
            Err(e) => {
                tracing::warn!(error = %e, family = %font.family, "caption layout failed, skipped");
                return false;
            }
        };

        let (cw, ch) = (f64::from(size.width), f64::from(size.height));
        let origin = Vec2::new(
            cw / 2.0 - f64::from(layout.width()) / 2.0,
            params.effective_text_position() * ch - f64::from(layout.height()) / 2.0,
        );
        let cpu_font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::new(font.bytes), font.index);

        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(Affine::translate(origin)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&cpu_font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        true
    }
}

fn draw_product(
    ctx: &mut vello_cpu::RenderContext,
    params: &CompositionParams,
    bitmap: &Bitmap,
    size: Size,
) -> bool {
    let placement = ProductPlacement::compute(
        size,
        bitmap.size(),
        params.product_scale,
        params.rotation_deg,
    );
    if placement.is_degenerate() {
        tracing::debug!(?placement, "product placement degenerate, nothing drawn");
        return false;
    }

    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    let opacity = params.effective_shadow_opacity();
    if params.shadow_enabled && opacity > 0.0 {
        let alpha = (opacity * 255.0).round().clamp(0.0, 255.0) as u8;
        ctx.set_transform(affine_to_cpu(placement.shadow_transform()));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, alpha));
        let path = placement.shadow_ellipse().to_path(0.1);
        ctx.fill_path(&bezpath_to_cpu(&path));
    }

    ctx.set_transform(affine_to_cpu(placement.image_transform()));
    ctx.set_paint(bitmap.paint());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(bitmap.width()),
        f64::from(bitmap.height()),
    ));
    true
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
