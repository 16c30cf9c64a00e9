use super::*;

#[test]
fn raster_extents_reject_empty_and_oversized() {
    assert!(Size::new(0, 10).raster_extents().is_err());
    assert!(Size::new(10, 70_000).raster_extents().is_err());
    assert_eq!(Size::new(1080, 720).raster_extents().unwrap(), (1080, 720));
}

#[test]
fn scaled_round_rounds_half_away_from_zero() {
    assert_eq!(
        Size::new(1080, 1080).scaled_round(2.0).unwrap(),
        Size::new(2160, 2160)
    );
    assert_eq!(Size::new(5, 3).scaled_round(0.5).unwrap(), Size::new(3, 2));
    assert!(Size::new(5, 3).scaled_round(0.0).is_err());
    assert!(Size::new(5, 3).scaled_round(f64::NAN).is_err());
}

#[test]
fn size_displays_as_width_by_height() {
    assert_eq!(Size::new(800, 600).to_string(), "800x600");
    assert_eq!(Size::new(3, 0).area(), 0);
    assert!(Size::new(3, 0).is_empty());
}
