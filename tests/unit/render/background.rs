use super::*;
use crate::foundation::core::Size;

fn surface(w: u32, h: u32) -> Surface {
    Surface::new(Size::new(w, h)).unwrap()
}

#[test]
fn checker_tiles_alternate_every_32_pixels() {
    let mut s = surface(64, 64);
    let params = CompositionParams {
        background: BackgroundKind::Checker,
        ..CompositionParams::default()
    };
    paint_background(&mut s, &params);

    let even = [0xf3, 0xf4, 0xf6, 0xff];
    let odd = [0xe5, 0xe7, 0xeb, 0xff];
    assert_eq!(s.pixel(0, 0), Some(even));
    assert_eq!(s.pixel(31, 31), Some(even));
    assert_eq!(s.pixel(32, 0), Some(odd));
    assert_eq!(s.pixel(0, 32), Some(odd));
    assert_eq!(s.pixel(40, 40), Some(even));
    assert_eq!(s.pixel(63, 10), Some(odd));
}

#[test]
fn transparent_paints_the_same_checker() {
    let mut a = surface(70, 33);
    let mut b = surface(70, 33);
    paint_background(
        &mut a,
        &CompositionParams {
            background: BackgroundKind::Checker,
            ..CompositionParams::default()
        },
    );
    paint_background(
        &mut b,
        &CompositionParams {
            background: BackgroundKind::Transparent,
            ..CompositionParams::default()
        },
    );
    assert_eq!(a, b);
}

#[test]
fn solid_fills_premultiplied_color() {
    let mut s = surface(4, 4);
    let params = CompositionParams {
        background: BackgroundKind::Solid,
        solid_color: Rgba8::rgba(200, 100, 0, 128),
        ..CompositionParams::default()
    };
    paint_background(&mut s, &params);
    assert_eq!(s.pixel(3, 3), Some([100, 50, 0, 128]));
}

#[test]
fn gradient_runs_from_top_left_to_bottom_right() {
    let mut s = surface(100, 100);
    let params = CompositionParams {
        background: BackgroundKind::Gradient,
        gradient_start: Rgba8::rgb(0, 0, 0),
        gradient_end: Rgba8::rgb(255, 255, 255),
        ..CompositionParams::default()
    };
    paint_background(&mut s, &params);

    let tl = s.pixel(0, 0).unwrap();
    let br = s.pixel(99, 99).unwrap();
    let tr = s.pixel(99, 0).unwrap();
    let bl = s.pixel(0, 99).unwrap();
    assert!(tl[0] <= 2);
    assert!(br[0] >= 253);
    assert_eq!(tr, bl);
    assert!((i32::from(tr[0]) - 128).abs() <= 1);
    assert_eq!(tl[3], 255);
}

#[test]
fn gradient_interpolates_in_premultiplied_space() {
    let mut s = surface(2, 2);
    let params = CompositionParams {
        background: BackgroundKind::Gradient,
        gradient_start: Rgba8::rgba(255, 0, 0, 255),
        gradient_end: Rgba8::rgba(0, 0, 255, 0),
        ..CompositionParams::default()
    };
    paint_background(&mut s, &params);
    for y in 0..2 {
        for x in 0..2 {
            let px = s.pixel(x, y).unwrap();
            assert!(px[0] <= px[3]);
            assert_eq!(px[2], 0);
        }
    }
}

#[test]
fn gradient_keeps_color_within_alpha_for_translucent_ends() {
    let mut s = surface(16, 16);
    let params = CompositionParams {
        background: BackgroundKind::Gradient,
        gradient_start: Rgba8::rgba(255, 255, 255, 10),
        gradient_end: Rgba8::rgba(255, 255, 255, 200),
        ..CompositionParams::default()
    };
    paint_background(&mut s, &params);
    for px in s.data().chunks_exact(4) {
        assert!(px[0] <= px[3] && px[1] <= px[3] && px[2] <= px[3]);
    }
    assert!(s.pixel(0, 0).unwrap()[3] < s.pixel(15, 15).unwrap()[3]);
}
