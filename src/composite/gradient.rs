use crate::composite::blend::UnitRgba;
use crate::foundation::core::Point;

/// One colour stop of a gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient in `[0, 1]`.
    pub offset: f32,
    /// Straight-alpha colour.
    pub rgba: UnitRgba,
}

impl ColorStop {
    /// Stop at `offset` with straight-alpha colour `rgba`.
    pub fn new(offset: f32, rgba: UnitRgba) -> Self {
        Self { offset, rgba }
    }
}

/// Gradient along the segment `start -> end`; pixels project onto it and clamp at both ends.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    /// Colour at `p`, from its projection onto `start -> end`.
    pub fn sample(&self, p: Point) -> UnitRgba {
        let axis = self.end - self.start;
        let len2 = axis.length_squared();
        if len2 <= 0.0 {
            return sample_stops(&self.stops, 0.0);
        }
        let t = (p - self.start).dot(axis) / len2;
        sample_stops(&self.stops, t as f32)
    }
}

/// Concentric radial gradient from `center` (t = 0) out to `radius` (t = 1).
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub radius: f64,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    /// Colour at `p`, from its distance to `center` over `radius`.
    pub fn sample(&self, p: Point) -> UnitRgba {
        if self.radius <= 0.0 {
            return sample_stops(&self.stops, 1.0);
        }
        let t = (p - self.center).length() / self.radius;
        sample_stops(&self.stops, t as f32)
    }
}

/// Evaluate sorted colour stops at `t`, interpolating in premultiplied space.
pub fn sample_stops(stops: &[ColorStop], t: f32) -> UnitRgba {
    let Some(first) = stops.first() else {
        return [0.0; 4];
    };
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    if t <= first.offset {
        return first.rgba;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let u = if span <= 0.0 {
                1.0
            } else {
                (t - a.offset) / span
            };
            return lerp_premul(a.rgba, b.rgba, u);
        }
    }
    stops[stops.len() - 1].rgba
}

fn lerp_premul(a: UnitRgba, b: UnitRgba, u: f32) -> UnitRgba {
    let alpha = a[3] + (b[3] - a[3]) * u;
    if alpha <= 0.0 {
        return [0.0; 4];
    }
    let mut out = [0.0; 4];
    for i in 0..3 {
        let pa = a[i] * a[3];
        let pb = b[i] * b[3];
        out[i] = (pa + (pb - pa) * u) / alpha;
    }
    out[3] = alpha;
    out
}

#[cfg(test)]
#[path = "../../tests/unit/composite/gradient.rs"]
mod tests;
