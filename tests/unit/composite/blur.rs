use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8(&src, 1, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn zero_sigma_returns_copy() {
    let f = RgbaFrame::solid(3, 3, [9, 8, 7, 255]).unwrap();
    assert_eq!(gaussian_blur(&f, 0.0).unwrap(), f);
    assert!(gaussian_blur(&f, f32::NAN).is_err());
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    let out = blur_rgba8(&src, w, h, 3, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((2 * w + 2) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8(&src, w, h, 2, 1.2).unwrap();

    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);

    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 4);
}

#[test]
fn mismatched_buffer_is_rejected() {
    assert!(blur_rgba8(&[0u8; 7], 1, 2, 1, 1.0).is_err());
}

#[test]
fn transparent_neighbours_do_not_darken_colour() {
    let mut data = Vec::new();
    for x in 0..16 {
        data.extend_from_slice(if x < 8 {
            &[0, 0, 0, 0]
        } else {
            &[255, 255, 255, 255]
        });
    }
    let src = RgbaFrame::new(16, 1, data).unwrap();
    let out = gaussian_blur(&src, 2.0).unwrap();
    for x in 0..16 {
        let px = out.pixel(x, 0);
        if px[3] > 0 {
            assert_eq!(&px[..3], &[255, 255, 255], "x = {x}");
        }
    }
    assert!(out.pixel(7, 0)[3] > 0);
    assert!(out.pixel(8, 0)[3] < 255);
}

#[test]
fn opaque_images_are_unaffected_by_premultiplication() {
    let mut data = Vec::new();
    for i in 0..25u8 {
        data.extend_from_slice(&[i * 10, 255 - i * 10, i, 255]);
    }
    let mut premul = data.clone();
    premultiply_in_place(&mut premul);
    assert_eq!(premul, data);
    unpremultiply_in_place(&mut premul);
    assert_eq!(premul, data);
}
