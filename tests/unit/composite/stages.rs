use super::*;

fn checker(w: u32, h: u32) -> RgbaFrame {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let v = if (x / 4 + y / 4) % 2 == 0 { 40 } else { 220 };
            data.extend_from_slice(&[v, v / 2, 255 - v, 255]);
        }
    }
    RgbaFrame::new(w, h, data).unwrap()
}

#[test]
fn zero_amounts_are_noops() {
    let original = checker(16, 12);
    let mut f = original.clone();
    apply_halation(&mut f, 0.0).unwrap();
    apply_vignette(&mut f, 0.0).unwrap();
    apply_light_leak(&mut f, 0.0).unwrap();
    apply_dispersion(&mut f, 0.0).unwrap();
    apply_shadow_tint(&mut f, 0.0);
    assert_eq!(f, original);
}

#[test]
fn halation_never_darkens() {
    let original = checker(16, 16);
    let mut f = original.clone();
    apply_halation(&mut f, 0.8).unwrap();
    assert_ne!(f, original);
    for (a, b) in original.data.iter().zip(f.data.iter()) {
        assert!(b >= a);
    }
}

#[test]
fn vignette_darkens_corners_but_not_centre() {
    let original = RgbaFrame::solid(40, 20, [200, 200, 200, 255]).unwrap();
    let mut f = original.clone();
    apply_vignette(&mut f, 1.0).unwrap();
    assert_eq!(f.pixel(20, 10), original.pixel(20, 10));
    // 9.5 px from the centre, inside half the 20 px radius.
    assert_eq!(f.pixel(10, 10), original.pixel(10, 10));
    let corner = f.pixel(0, 0);
    assert_eq!(corner[0], 0);
    assert_eq!(corner[3], 255);
}

#[test]
fn vignette_zero_keeps_corners() {
    let original = checker(10, 10);
    let mut f = original.clone();
    apply_vignette(&mut f, 0.0).unwrap();
    for (x, y) in [(0, 0), (9, 0), (0, 9), (9, 9)] {
        assert_eq!(f.pixel(x, y), original.pixel(x, y));
    }
}

#[test]
fn light_leak_is_warm_and_fades_to_the_corners() {
    let original = RgbaFrame::solid(50, 50, [0, 0, 0, 255]).unwrap();
    let mut f = original.clone();
    apply_light_leak(&mut f, 1.0).unwrap();
    let mid = f.pixel(25, 25);
    assert!(mid[0] > mid[1] && mid[1] > mid[2]);
    assert!(mid[0] >= 70 && mid[0] <= 80); // ~0.3 * 255
    assert!(f.pixel(0, 0)[0] < 5);
    assert!(f.pixel(49, 49)[0] < 5);
}

#[test]
fn dispersion_adds_red_and_blue_fringes() {
    let mut f = RgbaFrame::solid(9, 1, [0, 0, 0, 255]).unwrap();
    let i = f.offset(4, 0);
    f.data[i..i + 4].copy_from_slice(&[200, 200, 200, 255]);
    apply_dispersion(&mut f, 1.0).unwrap();
    let left = f.pixel(2, 0);
    let right = f.pixel(6, 0);
    assert!(left[0] > 0 && left[1] == 0 && left[2] == 0);
    assert!(right[2] > 0 && right[0] == 0 && right[1] == 0);
    assert_eq!(f.pixel(0, 0), [0, 0, 0, 255]);
}

#[test]
fn shadow_tint_only_lifts_blue_in_shadows() {
    let mut f = RgbaFrame::new(
        3,
        1,
        vec![10, 10, 10, 255, 200, 200, 200, 255, 20, 20, 250, 255],
    )
    .unwrap();
    apply_shadow_tint(&mut f, 0.5);
    assert_eq!(f.pixel(0, 0), [10, 10, 35, 255]);
    assert_eq!(f.pixel(1, 0), [200, 200, 200, 255]);
    // Average 96.7 < 128: blue lifts but saturates at 255.
    assert_eq!(f.pixel(2, 0), [20, 20, 255, 255]);
}

#[test]
fn shadow_tint_never_decreases_blue() {
    let original = checker(12, 12);
    for amount in [0.05f32, 0.3, 1.0, 2.5] {
        let mut f = original.clone();
        apply_shadow_tint(&mut f, amount);
        for (a, b) in original.data.chunks_exact(4).zip(f.data.chunks_exact(4)) {
            assert!(b[2] >= a[2]);
            assert_eq!(&a[..2], &b[..2]);
            assert_eq!(a[3], b[3]);
        }
    }
}

#[test]
fn stage_order_is_fixed() {
    assert_eq!(CompositeStage::ORDER[0], CompositeStage::Halation);
    assert_eq!(CompositeStage::ORDER[2], CompositeStage::Sparkle);
    assert_eq!(CompositeStage::ORDER[5], CompositeStage::ShadowTint);
}

#[test]
fn halation_glow_keeps_its_colour_over_transparency() {
    let mut data = Vec::new();
    for x in 0..16 {
        data.extend_from_slice(if x < 8 {
            &[0, 0, 0, 0]
        } else {
            &[255, 255, 255, 255]
        });
    }
    let mut f = RgbaFrame::new(16, 1, data).unwrap();
    apply_halation(&mut f, 0.5).unwrap();
    let edge = f.pixel(7, 0);
    assert!(edge[3] > 0);
    assert_eq!(&edge[..3], &[255, 255, 255]);
}
