use super::*;
use crate::params::preset::{default_preset, find_preset};

#[test]
fn filename_uses_brand_and_name() {
    let p = find_preset("kodak-portra-400").unwrap();
    assert_eq!(export_filename(p), "retro-Kodak-Portra 400.jpg");
}

#[test]
fn transparency_flattens_over_black() {
    let frame = RgbaFrame::new(2, 1, vec![200, 100, 50, 255, 200, 100, 50, 0]).unwrap();
    let rgb = prepare_for_export(&frame, 1200).unwrap();
    assert_eq!(rgb.get_pixel(0, 0).0, [200, 100, 50]);
    assert_eq!(rgb.get_pixel(1, 0).0, [0, 0, 0]);
}

#[test]
fn large_frames_are_downscaled() {
    let frame = RgbaFrame::solid(2000, 500, [10, 20, 30, 255]).unwrap();
    let out = export_jpeg(&frame, default_preset(), 80, 1200).unwrap();
    assert_eq!((out.width, out.height), (1200, 300));
    let decoded = image::load_from_memory(&out.bytes).unwrap();
    assert_eq!(
        image::guess_format(&out.bytes).unwrap(),
        image::ImageFormat::Jpeg
    );
    assert_eq!((decoded.width(), decoded.height()), (1200, 300));
}

#[test]
fn bad_quality_is_rejected() {
    let frame = RgbaFrame::solid(4, 4, [0, 0, 0, 255]).unwrap();
    assert!(export_jpeg(&frame, default_preset(), 0, 1200).is_err());
    assert!(export_jpeg(&frame, default_preset(), 101, 1200).is_err());
}
