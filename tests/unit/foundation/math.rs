use super::*;

#[test]
fn clamp_u8_rounds_half_to_even_and_saturates() {
    assert_eq!(clamp_u8(127.5), 128);
    assert_eq!(clamp_u8(126.5), 126);
    assert_eq!(clamp_u8(-3.0), 0);
    assert_eq!(clamp_u8(300.0), 255);
    assert_eq!(clamp_u8(f32::NAN), 0);
}

#[test]
fn mul_div255_endpoints() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(0, 255), 0);
    assert_eq!(mul_div255_u8(200, 0), 0);
}

#[test]
fn unit_conversion_endpoints() {
    assert_eq!(u8_to_unit(0), 0.0);
    assert_eq!(u8_to_unit(255), 1.0);
}

#[test]
fn smoothstep_is_bounded() {
    assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
    assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
    assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
}
