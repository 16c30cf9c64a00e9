use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Size;
use crate::foundation::error::{PackshotError, PackshotResult};
use crate::render::surface::Surface;

/// MIME type of every exported image.
pub const PNG_MIME: &str = "image/png";

/// An encoded export, ready for delivery.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Arc<Vec<u8>>,
    size: Size,
    mime: &'static str,
    file_name: String,
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("size", &self.size)
            .field("mime", &self.mime)
            .field("file_name", &self.file_name)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

impl EncodedImage {
    /// Encode `surface` as PNG and check the written header matches the surface size.
    pub fn png(surface: &Surface) -> PackshotResult<Self> {
        let size = surface.size();
        let bytes = encode_png(surface)?;
        let written = read_dimensions(&bytes)?;
        if written != size {
            return Err(PackshotError::encode(format!(
                "encoded png is {written}, expected {size}"
            )));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
            size,
            mime: PNG_MIME,
            file_name: suggested_file_name(size),
        })
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared handle to the encoded bytes.
    pub fn shared_bytes(&self) -> Arc<Vec<u8>> {
        self.bytes.clone()
    }

    /// Pixel size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// MIME type (`image/png`).
    pub fn mime(&self) -> &'static str {
        self.mime
    }

    /// Suggested file name, `packshot-{W}x{H}.png`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Decode back into straight-alpha RGBA8.
    pub fn decode_rgba8(&self) -> PackshotResult<Vec<u8>> {
        let img = image::load_from_memory_with_format(&self.bytes, image::ImageFormat::Png)
            .context("decode exported png")
            .map_err(|e| PackshotError::decode(format!("{e:#}")))?;
        Ok(img.to_rgba8().into_raw())
    }
}

/// `packshot-{W}x{H}.png`.
pub fn suggested_file_name(size: Size) -> String {
    format!("packshot-{}x{}.png", size.width, size.height)
}

fn encode_png(surface: &Surface) -> PackshotResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(
        surface.width(),
        surface.height(),
        surface.to_straight_rgba8(),
    )
    .ok_or_else(|| PackshotError::encode("surface buffer does not match its size"))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")
        .map_err(|e| PackshotError::encode(format!("{e:#}")))?;
    Ok(buf)
}

/// Read width and height from an encoded image header without decoding pixels.
pub fn read_dimensions(bytes: &[u8]) -> PackshotResult<Size> {
    let (w, h) = image::ImageReader::with_format(Cursor::new(bytes), image::ImageFormat::Png)
        .into_dimensions()
        .context("read png header")
        .map_err(|e| PackshotError::encode(format!("{e:#}")))?;
    Ok(Size::new(w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/export/encode.rs"]
mod tests;
