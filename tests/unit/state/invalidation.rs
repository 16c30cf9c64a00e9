use super::*;
use crate::foundation::color::Rgba8;

fn base() -> CompositionParams {
    CompositionParams::default()
}

#[test]
fn identical_params_need_no_redraw() {
    let inv = Invalidation::between(&base(), &base(), true, false);
    assert_eq!(inv, Invalidation::default());
    assert!(!inv.needs_redraw());
    assert!(Invalidation::full().needs_redraw());
}

#[test]
fn resize_is_tracked_separately() {
    let new = CompositionParams {
        width: 540,
        ..base()
    };
    let inv = Invalidation::between(&base(), &new, false, false);
    assert!(inv.resize);
    assert!(!inv.background && !inv.product && !inv.text);
}

#[test]
fn inactive_background_colors_are_ignored() {
    let new = CompositionParams {
        gradient_start: Rgba8::rgb(1, 2, 3),
        ..base()
    };
    assert!(!Invalidation::between(&base(), &new, false, false).needs_redraw());

    let new = CompositionParams {
        solid_color: Rgba8::rgb(1, 2, 3),
        ..base()
    };
    assert!(Invalidation::between(&base(), &new, false, false).background);
}

#[test]
fn transparent_and_checker_draw_the_same_pixels() {
    let a = CompositionParams {
        background: BackgroundKind::Transparent,
        ..base()
    };
    let b = CompositionParams {
        background: BackgroundKind::Checker,
        ..base()
    };
    assert!(!Invalidation::between(&a, &b, false, false).background);
    assert!(Invalidation::between(&base(), &b, false, false).background);
}

#[test]
fn product_fields_matter_only_with_a_bitmap() {
    let new = CompositionParams {
        rotation_deg: 30.0,
        ..base()
    };
    assert!(!Invalidation::between(&base(), &new, false, false).needs_redraw());
    assert!(Invalidation::between(&base(), &new, true, false).product);
    assert!(Invalidation::between(&base(), &base(), false, true).product);
}

#[test]
fn clamped_shadow_opacity_changes_are_invisible() {
    let a = CompositionParams {
        shadow_opacity: 0.7,
        ..base()
    };
    let b = CompositionParams {
        shadow_opacity: 0.9,
        ..base()
    };
    assert!(!Invalidation::between(&a, &b, true, false).product);

    let off_a = CompositionParams {
        shadow_enabled: false,
        shadow_opacity: 0.1,
        ..base()
    };
    let off_b = CompositionParams {
        shadow_opacity: 0.3,
        ..off_a.clone()
    };
    assert!(!Invalidation::between(&off_a, &off_b, true, false).product);
}

#[test]
fn text_styling_matters_only_when_text_is_visible() {
    let blank = CompositionParams {
        overlay_text: "   ".to_owned(),
        text_color: Rgba8::rgb(200, 0, 0),
        ..base()
    };
    assert!(!Invalidation::between(&base(), &blank, false, false).needs_redraw());

    let shown = CompositionParams {
        overlay_text: "New".to_owned(),
        ..base()
    };
    assert!(Invalidation::between(&base(), &shown, false, false).text);

    let recolored = CompositionParams {
        text_color: Rgba8::rgb(200, 0, 0),
        ..shown.clone()
    };
    assert!(Invalidation::between(&shown, &recolored, false, false).text);
}
