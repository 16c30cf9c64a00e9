use std::sync::Arc;

use super::*;
use crate::assets::fonts::{FontBook, FontConfig};

fn style(size_px: f32) -> CaptionStyle {
    CaptionStyle {
        size_px,
        weight: 700,
        brush: TextBrushRgba8::from(Rgba8::BLACK),
    }
}

#[test]
fn brush_from_color_copies_channels() {
    let b = TextBrushRgba8::from(Rgba8::rgba(1, 2, 3, 4));
    assert_eq!(
        b,
        TextBrushRgba8 {
            r: 1,
            g: 2,
            b: 3,
            a: 4
        }
    );
}

fn font_from(bytes: &[u8]) -> ResolvedFont {
    ResolvedFont {
        bytes: Arc::new(bytes.to_vec()),
        index: 0,
        family: "Test".to_owned(),
    }
}

#[test]
fn layout_rejects_non_positive_size() {
    let mut engine = TextLayoutEngine::new();
    let font = font_from(&[]);
    let Err(err) = engine.layout_plain("Hi", &font, style(0.0)) else {
        panic!("zero size should be rejected");
    };
    assert!(matches!(err, PackshotError::Validation(_)));
    let Err(err) = engine.layout_plain("Hi", &font, style(f32::NAN)) else {
        panic!("NaN size should be rejected");
    };
    assert!(matches!(err, PackshotError::Validation(_)));
}

#[test]
fn layout_rejects_bytes_without_faces() {
    let mut engine = TextLayoutEngine::new();
    let Err(err) = engine.layout_plain("Hi", &font_from(b"not a font"), style(32.0)) else {
        panic!("garbage bytes should not shape");
    };
    assert!(matches!(err, PackshotError::Render(_)));
}

#[test]
fn layout_with_installed_font_has_extent() {
    let Some(font) = FontBook::system(&FontConfig::default()).resolve(700) else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let layout = engine
        .layout_plain("Packshot", &font, style(48.0))
        .unwrap();
    assert!(layout.width() > 0.0);
    assert!(layout.height() > 0.0);
}

#[test]
fn layout_shares_font_bytes_instead_of_copying() {
    let Some(font) = FontBook::system(&FontConfig::default()).resolve(400) else {
        return;
    };
    let before = Arc::strong_count(&font.bytes);
    let mut engine = TextLayoutEngine::new();
    let _layout = engine.layout_plain("Share", &font, style(24.0)).unwrap();
    assert!(Arc::strong_count(&font.bytes) > before);
}
