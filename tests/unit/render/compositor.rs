use super::*;
use crate::state::params::BackgroundKind;

fn compositor() -> Compositor {
    Compositor::new(FontBook::empty())
}

fn red_bitmap(w: u32, h: u32) -> Bitmap {
    let px = [220u8, 20, 20, 255];
    let bytes: Vec<u8> = px.iter().copied().cycle().take((w * h * 4) as usize).collect();
    Bitmap::from_rgba8(w, h, &bytes).unwrap()
}

fn near(px: [u8; 4], want: [u8; 4]) -> bool {
    px.iter()
        .zip(want.iter())
        .all(|(a, b)| (i16::from(*a) - i16::from(*b)).abs() <= 2)
}

fn params(w: u32, h: u32) -> CompositionParams {
    CompositionParams {
        width: w,
        height: h,
        ..CompositionParams::default()
    }
}

#[test]
fn background_only_without_bitmap_or_text() {
    let s = compositor().render(&params(40, 30), None).unwrap();
    assert_eq!(s.size(), Size::new(40, 30));
    assert!(s.data().chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn invalid_sizes_are_validation_errors() {
    let c = compositor();
    assert!(c.render(&params(0, 10), None).is_err());
    assert!(c.render(&params(10, 65_536), None).is_err());
}

#[test]
fn product_is_drawn_centered_on_anchor() {
    let p = CompositionParams {
        shadow_enabled: false,
        ..params(100, 100)
    };
    let s = compositor().render(&p, Some(&red_bitmap(8, 8))).unwrap();

    // Box is 80x70 so an 8x8 photo becomes 70x70 around (50, 55).
    assert!(near(s.pixel(50, 55).unwrap(), [220, 20, 20, 255]));
    assert!(near(s.pixel(50, 22).unwrap(), [220, 20, 20, 255]));
    assert_eq!(s.pixel(50, 18), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(10, 55), Some([255, 255, 255, 255]));
}

#[test]
fn shadow_darkens_below_product() {
    let with_shadow = CompositionParams {
        product_scale: 0.5,
        shadow_opacity: 0.6,
        ..params(200, 200)
    };
    let without = CompositionParams {
        shadow_enabled: false,
        ..with_shadow.clone()
    };
    let c = compositor();
    let bitmap = red_bitmap(10, 10);
    let a = c.render(&with_shadow, Some(&bitmap)).unwrap();
    let b = c.render(&without, Some(&bitmap)).unwrap();

    // Product spans 70x70 around (100, 110); the shadow is centered on its bottom edge.
    let below = a.pixel(100, 145).unwrap();
    assert!(below[0] < 200);
    assert_eq!(below[3], 255);
    assert_eq!(b.pixel(100, 145), Some([255, 255, 255, 255]));
    assert_eq!(a.pixel(100, 110), b.pixel(100, 110));
}

#[test]
fn degenerate_product_leaves_background() {
    let c = compositor();
    let bg = c.render(&params(50, 50), None).unwrap();

    let neg = CompositionParams {
        product_scale: -2.0,
        ..params(50, 50)
    };
    assert_eq!(c.render(&neg, Some(&red_bitmap(5, 5))).unwrap(), bg);

    let empty = Bitmap::from_rgba8(0, 0, &[]).unwrap();
    assert_eq!(c.render(&params(50, 50), Some(&empty)).unwrap(), bg);
}

#[test]
fn caption_without_fonts_is_skipped() {
    let c = compositor();
    let captioned = CompositionParams {
        overlay_text: "SALE".to_string(),
        ..params(60, 60)
    };
    assert_eq!(
        c.render(&captioned, None).unwrap(),
        c.render(&params(60, 60), None).unwrap()
    );
}

#[test]
fn render_at_overrides_canvas_size_only() {
    let p = CompositionParams {
        background: BackgroundKind::Checker,
        ..params(64, 64)
    };
    let s = compositor().render_at(&p, None, Size::new(96, 40)).unwrap();
    assert_eq!(s.size(), Size::new(96, 40));
    assert_eq!(s.pixel(33, 0), Some([0xe5, 0xe7, 0xeb, 0xff]));
}
