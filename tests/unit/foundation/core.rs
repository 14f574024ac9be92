use super::*;

#[test]
fn new_rejects_wrong_length() {
    assert!(RgbaFrame::new(2, 2, vec![0; 15]).is_err());
    assert!(RgbaFrame::new(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn solid_fills_every_pixel() {
    let f = RgbaFrame::solid(3, 2, [1, 2, 3, 4]).unwrap();
    assert_eq!(f.pixel_count(), 6);
    assert_eq!(f.pixel(2, 1), [1, 2, 3, 4]);
    assert_eq!(f.offset(2, 1), 20);
}

#[test]
fn size_mismatch_is_reported() {
    let a = RgbaFrame::solid(2, 2, [0; 4]).unwrap();
    let b = RgbaFrame::solid(2, 3, [0; 4]).unwrap();
    assert!(a.ensure_same_size(&b).is_err());
    assert!(a.ensure_same_size(&a.clone()).is_ok());
}

#[test]
fn viewport_limits() {
    assert_eq!(ViewportClass::Narrow.max_working_dim(), 1200);
    assert_eq!(ViewportClass::Wide.max_working_dim(), 2400);
    assert!(ViewportClass::Narrow.frame_interval().is_some());
    assert!(ViewportClass::Wide.frame_interval().is_none());
    assert_eq!(ViewportClass::default(), ViewportClass::Wide);
}
