//! Advancing particles by one tick.
//!
//! There is no delta-time scaling: one call is one frame's worth of motion,
//! so perceived speed follows the display's refresh rate.

use crate::config::Config;
use crate::particle::Particle;
use rand::Rng;
use vecmath::Vector2;

/// Scales the pointer's pull on a particle.
pub const POINTER_FORCE: f64 = 0.01;
/// Velocity is multiplied by this every tick.
pub const FRICTION: f64 = 0.99;
/// Largest nudge given on each axis to a particle that has slowed too much.
pub const MAX_PERTURBATION: f64 = 0.005;

/// The drawable area particles are kept inside.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Move every particle one tick. `pointer` is only `Some` while the pointer is
/// recently active.
pub fn step_all<R: Rng + ?Sized>(
    particles: &mut [Particle],
    bounds: Bounds,
    pointer: Option<Vector2<f64>>,
    config: &Config,
    rng: &mut R,
) {
    for particle in particles {
        step(particle, bounds, pointer, config, rng);
    }
}

/// Integrate, bounce, attract, damp, then keep alive. The order matters.
pub fn step<R: Rng + ?Sized>(
    particle: &mut Particle,
    bounds: Bounds,
    pointer: Option<Vector2<f64>>,
    config: &Config,
    rng: &mut R,
) {
    particle.pos = vecmath::vec2_add(particle.pos, particle.vel);

    reflect(&mut particle.pos[0], &mut particle.vel[0], bounds.width);
    reflect(&mut particle.pos[1], &mut particle.vel[1], bounds.height);

    if let Some(pointer) = pointer {
        attract(particle, pointer, config.mouse_influence);
    }

    particle.vel = vecmath::vec2_scale(particle.vel, FRICTION);

    if particle.speed() < config.speed * 0.5 {
        particle.vel[0] += (rng.gen::<f64>() - 0.5) * MAX_PERTURBATION * 2.0;
        particle.vel[1] += (rng.gen::<f64>() - 0.5) * MAX_PERTURBATION * 2.0;
    }
}

fn reflect(pos: &mut f64, vel: &mut f64, max: f64) {
    if *pos < 0.0 || *pos > max {
        *vel *= -1.0;
        *pos = pos.max(0.0).min(max.max(0.0));
    }
}

fn attract(particle: &mut Particle, pointer: Vector2<f64>, influence: f64) {
    if influence <= 0.0 {
        return;
    }
    let to_pointer = vecmath::vec2_sub(pointer, particle.pos);
    let distance = vecmath::vec2_len(to_pointer);
    // Sitting right on the pointer has no direction to pull in
    if distance <= 0.0 || distance >= influence {
        return;
    }
    let force = (influence - distance) / influence;
    let direction = vecmath::vec2_scale(to_pointer, 1.0 / distance);
    let impulse = vecmath::vec2_scale(direction, force * POINTER_FORCE);
    particle.vel = vecmath::vec2_add(particle.vel, impulse);
}
