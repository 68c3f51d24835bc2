// Particles and the store that holds them. The store is only ever rebuilt
// wholesale, there is no per-particle insert or remove.

use rand::Rng;
use vecmath::Vector2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub size: f64,
}

impl Particle {
    pub fn new(pos_x: f64, pos_y: f64, vel_x: f64, vel_y: f64, size: f64) -> Particle {
        Particle {
            pos: [pos_x, pos_y],
            vel: [vel_x, vel_y],
            size,
        }
    }

    pub fn speed(&self) -> f64 {
        vecmath::vec2_len(self.vel)
    }
}

#[derive(Debug, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new() -> ParticleStore {
        ParticleStore::default()
    }

    /// Throw away every particle and scatter `count` fresh ones over the
    /// `width` x `height` surface.
    pub fn create<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        width: f64,
        height: f64,
        size: f64,
        speed: f64,
        rng: &mut R,
    ) {
        let size = size.max(0.0);
        let speed = speed.max(0.0);
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let pos_x = rng.gen::<f64>() * width;
            let pos_y = rng.gen::<f64>() * height;
            let vel_x = (rng.gen::<f64>() - 0.5) * speed;
            let vel_y = (rng.gen::<f64>() - 0.5) * speed;
            let radius = rng.gen::<f64>() * size + 1.0;
            self.particles.push(Particle::new(pos_x, pos_y, vel_x, vel_y, radius));
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn replace(&mut self, particles: Vec<Particle>) {
        self.particles = particles;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn create_yields_exact_count_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut store = ParticleStore::new();
        for &(count, width, height) in &[(80, 1920.0, 1080.0), (3, 10.0, 5.0), (0, 800.0, 600.0)] {
            store.create(count, width, height, 2.0, 0.5, &mut rng);
            assert_eq!(store.len(), count);
            for p in store.particles() {
                assert!(p.pos[0] >= 0.0 && p.pos[0] <= width);
                assert!(p.pos[1] >= 0.0 && p.pos[1] <= height);
                assert!(p.vel[0].abs() <= 0.25 && p.vel[1].abs() <= 0.25);
                assert!(p.size >= 1.0 && p.size <= 3.0);
            }
        }
    }

    #[test]
    fn create_replaces_previous_particles() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut store = ParticleStore::new();
        store.create(60, 100.0, 100.0, 2.0, 0.5, &mut rng);
        store.create(5, 10.0, 10.0, 2.0, 0.5, &mut rng);
        assert_eq!(store.len(), 5);
        assert!(store.particles().iter().all(|p| p.pos[0] <= 10.0));
    }

    #[test]
    fn zero_speed_and_size_give_still_unit_particles() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut store = ParticleStore::new();
        store.create(10, 50.0, 50.0, 0.0, 0.0, &mut rng);
        for p in store.particles() {
            assert_eq!(p.vel, [0.0, 0.0]);
            assert_eq!(p.size, 1.0);
        }
    }
}
