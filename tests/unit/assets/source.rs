use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn image_mime_detection() {
    assert!(is_image_mime("image/png"));
    assert!(is_image_mime("IMAGE/JPEG"));
    assert!(is_image_mime("image/webp; q=0.9"));
    assert!(!is_image_mime("image/"));
    assert!(!is_image_mime("text/plain"));
    assert!(!is_image_mime("application/pdf"));
    assert!(!is_image_mime(""));
}

#[test]
fn sniffing_recognises_png_only_by_content() {
    assert_eq!(
        sniff_format(&png_bytes(2, 2, [0, 0, 0, 255])),
        Some(image::ImageFormat::Png)
    );
    assert_eq!(sniff_format(b"hello, world"), None);
}

#[test]
fn decode_keeps_straight_alpha_rgba() {
    let src = SourceImage::decode(&png_bytes(3, 2, [100, 50, 200, 128])).unwrap();
    assert_eq!((src.width(), src.height()), (3, 2));
    assert_eq!(src.original().pixel(2, 1), [100, 50, 200, 128]);
}

#[test]
fn truncated_png_is_a_decode_error() {
    let mut bytes = png_bytes(8, 8, [1, 2, 3, 255]);
    bytes.truncate(bytes.len() / 2);
    let err = SourceImage::decode(&bytes).unwrap_err();
    assert!(matches!(err, RetroError::Decode(_)));
}

#[test]
fn working_copy_respects_viewport_limits() {
    let src = SourceImage::from_frame(RgbaFrame::solid(3000, 1500, [9, 9, 9, 255]).unwrap());
    let wide = src.working_copy(ViewportClass::Wide).unwrap();
    assert_eq!((wide.width, wide.height), (2400, 1200));
    let narrow = src.working_copy(ViewportClass::Narrow).unwrap();
    assert_eq!((narrow.width, narrow.height), (1200, 600));
    assert_eq!(narrow.pixel(600, 300), [9, 9, 9, 255]);
}

#[test]
fn small_images_are_never_upscaled() {
    let src = SourceImage::from_frame(RgbaFrame::solid(100, 40, [1, 1, 1, 255]).unwrap());
    let copy = src.working_copy(ViewportClass::Narrow).unwrap();
    assert_eq!(&copy, src.original());
}

#[test]
fn extreme_aspect_ratio_keeps_one_pixel() {
    let frame = RgbaFrame::solid(5000, 2, [0, 0, 0, 255]).unwrap();
    let out = fit_within(&frame, 1200).unwrap();
    assert_eq!((out.width, out.height), (1200, 1));
}

#[test]
fn zero_max_dim_is_rejected() {
    let frame = RgbaFrame::solid(4, 4, [0, 0, 0, 255]).unwrap();
    assert!(fit_within(&frame, 0).is_err());
}
