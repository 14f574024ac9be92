use super::*;

fn black(a: f32) -> UnitRgba {
    [0.0, 0.0, 0.0, a]
}

#[test]
fn stops_clamp_outside_range() {
    let stops = vec![ColorStop::new(0.2, black(0.1)), ColorStop::new(0.8, black(0.9))];
    assert_eq!(sample_stops(&stops, -1.0), black(0.1));
    assert_eq!(sample_stops(&stops, 0.0), black(0.1));
    assert_eq!(sample_stops(&stops, 1.0), black(0.9));
    assert!((sample_stops(&stops, 0.5)[3] - 0.5).abs() < 1e-6);
}

#[test]
fn empty_stops_are_transparent() {
    assert_eq!(sample_stops(&[], 0.5), [0.0; 4]);
}

#[test]
fn premultiplied_interpolation_keeps_colour_when_fading() {
    let orange = [1.0, 0.5, 0.0, 0.3];
    let stops = vec![
        ColorStop::new(0.0, [1.0, 0.5, 0.0, 0.0]),
        ColorStop::new(1.0, orange),
    ];
    let mid = sample_stops(&stops, 0.5);
    assert!((mid[0] - 1.0).abs() < 1e-6);
    assert!((mid[1] - 0.5).abs() < 1e-6);
    assert!((mid[3] - 0.15).abs() < 1e-6);
}

#[test]
fn radial_gradient_distance_maps_to_t() {
    let g = RadialGradient {
        center: Point::new(10.0, 10.0),
        radius: 10.0,
        stops: vec![ColorStop::new(0.0, black(0.0)), ColorStop::new(1.0, black(1.0))],
    };
    assert_eq!(g.sample(Point::new(10.0, 10.0))[3], 0.0);
    assert!((g.sample(Point::new(15.0, 10.0))[3] - 0.5).abs() < 1e-6);
    assert_eq!(g.sample(Point::new(40.0, 10.0))[3], 1.0);
}

#[test]
fn linear_gradient_projects_onto_axis() {
    let g = LinearGradient {
        start: Point::new(0.0, 0.0),
        end: Point::new(10.0, 10.0),
        stops: vec![ColorStop::new(0.0, black(0.0)), ColorStop::new(1.0, black(1.0))],
    };
    assert!((g.sample(Point::new(10.0, 0.0))[3] - 0.5).abs() < 1e-6);
    assert!((g.sample(Point::new(5.0, 5.0))[3] - 0.5).abs() < 1e-6);
    assert_eq!(g.sample(Point::new(20.0, 20.0))[3], 1.0);
}
