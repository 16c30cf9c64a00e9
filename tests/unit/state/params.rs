use super::*;
use serde_json::json;

#[test]
fn defaults_match_documented_values() {
    let p = initialize();
    assert_eq!((p.width, p.height), (1080, 1080));
    assert_eq!(p.background, BackgroundKind::Solid);
    assert_eq!(p.solid_color, Rgba8::WHITE);
    assert_eq!(p.product_scale, 1.0);
    assert!(p.shadow_enabled);
    assert_eq!(p.shadow_opacity, 0.2);
    assert!(p.visible_text().is_none());
}

#[test]
fn clamps_apply_only_on_read() {
    let p = CompositionParams {
        shadow_opacity: 0.9,
        text_position: -3.0,
        ..CompositionParams::default()
    };
    assert_eq!(p.shadow_opacity, 0.9);
    assert_eq!(p.effective_shadow_opacity(), MAX_SHADOW_OPACITY);
    assert_eq!(p.effective_text_position(), 0.0);

    let p = CompositionParams {
        shadow_opacity: f64::NAN,
        text_position: f64::INFINITY,
        ..CompositionParams::default()
    };
    assert_eq!(p.effective_shadow_opacity(), 0.0);
    assert_eq!(p.effective_text_position(), 0.5);
}

#[test]
fn whitespace_text_is_not_visible() {
    let mut p = CompositionParams::default();
    p.overlay_text = " \t\n ".to_owned();
    assert!(p.visible_text().is_none());
    p.overlay_text = "  New  ".to_owned();
    assert_eq!(p.visible_text(), Some("  New  "));
}

#[test]
fn with_size_only_touches_dimensions() {
    let p = CompositionParams {
        rotation_deg: 12.0,
        ..CompositionParams::default()
    };
    let q = p.with_size(Size::new(2160, 540));
    assert_eq!(q.size(), Size::new(2160, 540));
    assert_eq!(q.rotation_deg, 12.0);
    assert_eq!(q.with_size(p.size()), p);
}

#[test]
fn text_weight_accepts_names_and_numbers() {
    let w: TextWeight = serde_json::from_value(json!("bold")).unwrap();
    assert_eq!(w, TextWeight::BOLD);
    let w: TextWeight = serde_json::from_value(json!("600")).unwrap();
    assert_eq!(w, TextWeight(600));
    let w: TextWeight = serde_json::from_value(json!(300)).unwrap();
    assert_eq!(w, TextWeight(300));
    assert!(serde_json::from_value::<TextWeight>(json!("heavy-ish")).is_err());
}

#[test]
fn params_json_uses_camel_case_and_hex_colors() {
    let v = serde_json::to_value(CompositionParams::default()).unwrap();
    assert_eq!(v["solidColor"], json!("#ffffff"));
    assert_eq!(v["background"], json!("solid"));
    assert_eq!(v["textWeight"], json!(700));

    let back: CompositionParams = serde_json::from_value(v).unwrap();
    assert_eq!(back, CompositionParams::default());
}
