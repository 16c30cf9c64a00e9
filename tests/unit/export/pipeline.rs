use super::*;
use crate::assets::fonts::FontBook;
use crate::assets::loader::{BitmapLoader, MemoryResolver};
use crate::foundation::core::Size;
use crate::foundation::error::PackshotError;
use crate::state::params::CompositionParams;
use crate::state::patch::ParamsPatch;
use crate::state::store::StateStore;

fn setup(width: u32, height: u32) -> (StateStore, BitmapLoader, LiveView, Exporter) {
    let compositor = Arc::new(Compositor::new(FontBook::empty()));
    let store = StateStore::with_params(CompositionParams {
        width,
        height,
        ..CompositionParams::default()
    });
    let loader = BitmapLoader::new(MemoryResolver::new());
    let view = LiveView::new(compositor.clone(), &store, &loader);
    (store, loader, view, Exporter::new(compositor))
}

#[test]
fn unavailable_before_first_render() {
    let (_s, _l, view, exporter) = setup(10, 10);
    assert_eq!(exporter.export(&view, 2.0).unwrap(), ExportOutcome::Unavailable);
}

#[test]
fn export_scales_and_rounds_dimensions() {
    let (_s, _l, mut view, exporter) = setup(101, 33);
    view.refresh().unwrap();
    let ExportOutcome::Exported(img) = exporter.export(&view, 1.5).unwrap() else {
        panic!("expected an export");
    };
    assert_eq!(img.size(), Size::new(152, 50));
    assert_eq!(img.file_name(), "packshot-152x50.png");
}

#[test]
fn export_leaves_live_view_untouched() {
    let (store, _l, mut view, exporter) = setup(40, 40);
    view.refresh().unwrap();
    let surface = view.frame().unwrap().surface.clone();

    exporter.export(&view, 3.0).unwrap();

    let frame = view.frame().unwrap();
    assert!(Arc::ptr_eq(&frame.surface, &surface));
    assert_eq!(frame.params.size(), Size::new(40, 40));
    assert_eq!(store.snapshot().width, 40);
    assert_eq!(view.stats().renders, 1);
}

#[test]
fn export_picks_up_edits_not_yet_displayed() {
    let (store, _l, mut view, exporter) = setup(20, 20);
    view.refresh().unwrap();
    store.apply(&ParamsPatch {
        width: Some(200),
        height: Some(100),
        ..ParamsPatch::default()
    });

    let ExportOutcome::Exported(img) = exporter.export(&view, 2.0).unwrap() else {
        panic!("expected an export");
    };
    assert_eq!(img.size(), Size::new(400, 200));
    assert_eq!(view.frame().unwrap().params.size(), Size::new(20, 20));
    assert!(matches!(
        view.refresh().unwrap(),
        crate::render::view::RefreshOutcome::Rendered(_)
    ));
}

#[test]
fn bad_scales_are_validation_errors() {
    let (_s, _l, mut view, exporter) = setup(20, 20);
    view.refresh().unwrap();
    for scale in [0.0, -1.0, f64::NAN, f64::INFINITY, 0.01, 10_000.0] {
        let err = exporter.export(&view, scale).unwrap_err();
        assert!(matches!(err, PackshotError::Validation(_)), "{scale}: {err}");
    }
}
