use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Size;
use crate::foundation::error::{PackshotError, PackshotResult};
use crate::foundation::math::premul_channel;

/// Decoded product photo, ready to draw.
///
/// Pixels are premultiplied RGBA8. A bitmap is immutable once built and shared by `Arc`; loading
/// a new photo replaces it rather than editing it.
#[derive(Clone)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Bitmap {
    /// Build a bitmap from premultiplied RGBA8 bytes in row-major order.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: &[u8]) -> PackshotResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| PackshotError::decode(format!("bitmap width {width} exceeds u16")))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| PackshotError::decode(format!("bitmap height {height} exceeds u16")))?;
        if rgba8_premul.len() != (width as usize) * (height as usize) * 4 {
            return Err(PackshotError::decode("bitmap byte length mismatch"));
        }

        let mut may_have_opacities = false;
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
        for px in rgba8_premul.chunks_exact(4) {
            may_have_opacities |= px[3] != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
                px[0], px[1], px[2], px[3],
            ]));
        }

        Ok(Self {
            width,
            height,
            pixmap: Arc::new(vello_cpu::Pixmap::from_parts_with_opacity(
                pixels,
                w,
                h,
                may_have_opacities,
            )),
        })
    }

    /// Build a bitmap from straight-alpha RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, rgba8: &[u8]) -> PackshotResult<Self> {
        let mut premul = rgba8.to_vec();
        premultiply_rgba8_in_place(&mut premul);
        Self::from_premul_rgba8(width, height, &premul)
    }

    /// Intrinsic width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Intrinsic height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Intrinsic dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let data = self.pixmap.data_as_u8_slice();
        Some([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]])
    }

    pub(crate) fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(self.pixmap.clone()),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

/// Decode encoded image bytes (PNG, JPEG, WebP, GIF, BMP) into a [`Bitmap`].
pub fn decode_image(bytes: &[u8]) -> PackshotResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| PackshotError::decode(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    Bitmap::from_premul_rgba8(width, height, &rgba8_premul)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        if a == 255 {
            continue;
        }
        px[0] = premul_channel(px[0], a);
        px[1] = premul_channel(px[1], a);
        px[2] = premul_channel(px[2], a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
