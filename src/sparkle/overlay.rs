use std::f64::consts::TAU;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::composite::blend::{BlendMode, BlendParams, blend_unit};
use crate::composite::gradient::{ColorStop, RadialGradient};
use crate::editor::timing::FramePacer;
use crate::foundation::core::{Affine, Point, RgbaFrame, Vec2};
use crate::foundation::math::smoothstep;

const PARTICLES_PER_UNIT: f32 = 20.0;
const MAX_PARTICLES: usize = 4096;
const SIZE_RANGE: (f64, f64) = (1.0, 3.0);
const ALPHA_RANGE: (f64, f64) = (0.5, 1.0);
const MAX_SPEED: f64 = 0.1;
const SPIN_PER_STEP: f64 = 0.02;
const FADE_PER_STEP: f64 = 0.005;

/// One animated star.
#[derive(Clone, Debug, PartialEq)]
pub struct SparkleParticle {
    pub position: Point,
    /// Gradient radius in px; arms reach twice this.
    pub size: f64,
    pub alpha: f64,
    /// Per-step displacement.
    pub velocity: Vec2,
    /// Radians.
    pub rotation: f64,
}

impl SparkleParticle {
    fn spawn(rng: &mut StdRng, width: f64, height: f64) -> Self {
        Self {
            position: Point::new(
                rng.random::<f64>() * width,
                rng.random::<f64>() * height,
            ),
            size: rng.random_range(SIZE_RANGE.0..SIZE_RANGE.1),
            alpha: rng.random_range(ALPHA_RANGE.0..ALPHA_RANGE.1),
            velocity: Vec2::new(
                rng.random_range(-MAX_SPEED..MAX_SPEED),
                rng.random_range(-MAX_SPEED..MAX_SPEED),
            ),
            rotation: rng.random::<f64>() * TAU,
        }
    }
}

/// Number of particles for a given intensity: `floor(20 * intensity)`.
pub fn particle_count(intensity: f32) -> usize {
    if !(intensity > 0.0) || !intensity.is_finite() {
        return 0;
    }
    ((intensity * PARTICLES_PER_UNIT).floor() as usize).min(MAX_PARTICLES)
}

/// Animated star field drawn on top of the composited image.
///
/// The overlay owns its particles and frame pacing; the caller owns the canvas and decides
/// what to draw the stars onto.
#[derive(Debug)]
pub struct SparkleOverlay {
    width: f64,
    height: f64,
    intensity: f32,
    particles: Vec<SparkleParticle>,
    rng: StdRng,
    pacer: FramePacer,
    running: bool,
}

impl SparkleOverlay {
    /// Overlay for a `width` x `height` canvas with `floor(20 * intensity)` particles spawned from
    /// `seed`. Starts stopped; `pacer` caps the animation frame rate.
    pub fn new(width: u32, height: u32, intensity: f32, seed: u64, pacer: FramePacer) -> Self {
        let mut overlay = Self {
            width: f64::from(width),
            height: f64::from(height),
            intensity,
            particles: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            pacer,
            running: false,
        };
        overlay.respawn_all();
        overlay
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn particles(&self) -> &[SparkleParticle] {
        &self.particles
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start the animation loop. Calling this while already running does nothing, so there is
    /// never more than one loop per overlay.
    pub fn start(&mut self) {
        if self.running || self.particles.is_empty() {
            return;
        }
        self.running = true;
        self.pacer.reset();
        tracing::debug!(particles = self.particles.len(), "sparkle started");
    }

    /// Cancel the animation loop; idempotent.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        tracing::debug!("sparkle stopped");
    }

    /// Replace the particle set for a new intensity. A running loop keeps running unless the
    /// new set is empty.
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity;
        self.respawn_all();
        if self.particles.is_empty() {
            self.stop();
        }
    }

    pub fn set_frame_interval(&mut self, interval: Option<std::time::Duration>) {
        self.pacer.set_interval(interval);
    }

    fn respawn_all(&mut self) {
        let n = particle_count(self.intensity);
        let (w, h) = (self.width, self.height);
        let rng = &mut self.rng;
        self.particles = (0..n).map(|_| SparkleParticle::spawn(rng, w, h)).collect();
    }

    /// Advance every particle by one animation step.
    pub fn step(&mut self) {
        let (w, h) = (self.width, self.height);
        for i in 0..self.particles.len() {
            let p = &mut self.particles[i];
            p.position += p.velocity;
            p.rotation += SPIN_PER_STEP;
            p.alpha = (p.alpha - FADE_PER_STEP).max(0.0);

            if p.position.x < 0.0 {
                p.position.x = w;
            } else if p.position.x > w {
                p.position.x = 0.0;
            }
            if p.position.y < 0.0 {
                p.position.y = h;
            } else if p.position.y > h {
                p.position.y = 0.0;
            }

            if p.alpha <= 0.0 {
                self.particles[i] = SparkleParticle::spawn(&mut self.rng, w, h);
            }
        }
    }

    /// Advance one frame if running and the pacer allows it. Returns whether a step happened
    /// (and so whether the caller should redraw).
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.running || !self.pacer.ready(now) {
            return false;
        }
        self.step();
        true
    }

    /// Draw every particle additively onto `frame`.
    pub fn render(&self, frame: &mut RgbaFrame) {
        for p in &self.particles {
            draw_star(frame, p);
        }
    }
}

/// Four-pointed star with tips at `2 * size` along the rotated axes, filled with a white radial
/// gradient fading out at `size`.
fn draw_star(frame: &mut RgbaFrame, p: &SparkleParticle) {
    if !(p.alpha > 0.0) || !(p.size > 0.0) {
        return;
    }
    let alpha = p.alpha.min(1.0) as f32;
    let gradient = RadialGradient {
        center: p.position,
        radius: p.size,
        stops: vec![
            ColorStop::new(0.0, [1.0, 1.0, 1.0, alpha]),
            ColorStop::new(1.0, [1.0, 1.0, 1.0, 0.0]),
        ],
    };
    // Star-local coordinates: origin at the centre, arms along the axes.
    let to_local = Affine::rotate(-p.rotation) * Affine::translate(-p.position.to_vec2());
    let arm = 2.0 * p.size;
    let limit = arm.sqrt() as f32;
    let params = BlendParams::new(BlendMode::Lighter, 1.0);

    let x0 = (p.position.x - p.size).floor().max(0.0) as u32;
    let y0 = (p.position.y - p.size).floor().max(0.0) as u32;
    let x1 = ((p.position.x + p.size).ceil().max(0.0) as u32).min(frame.width);
    let y1 = ((p.position.y + p.size).ceil().max(0.0) as u32).min(frame.height);

    for y in y0..y1 {
        for x in x0..x1 {
            let centre = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let mut src = gradient.sample(centre);
            if src[3] <= 0.0 {
                continue;
            }
            let local = to_local * centre;
            // |u|^0.5 + |v|^0.5 <= arm^0.5 bounds a concave four-point star.
            let s = (local.x.abs().sqrt() + local.y.abs().sqrt()) as f32;
            src[3] *= 1.0 - smoothstep(limit - 0.25, limit + 0.25, s);
            let i = frame.offset(x, y);
            let d = [
                frame.data[i],
                frame.data[i + 1],
                frame.data[i + 2],
                frame.data[i + 3],
            ];
            frame.data[i..i + 4].copy_from_slice(&blend_unit(d, src, params));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sparkle/overlay.rs"]
mod tests;
