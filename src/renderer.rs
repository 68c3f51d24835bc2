// Renderer struct that owns the drawing surface and paints the particle field:
// connection lines first, then the discs on top, then the lines to the pointer.

use crate::color::Color;
use crate::config::Config;
use crate::particle::Particle;
use crate::surface::Surface;
use rand::Rng;
use vecmath::Vector2;

pub const CONNECTION_LINE_WIDTH: f64 = 1.0;
pub const POINTER_LINE_WIDTH: f64 = 2.0;

/// How many discs the reduced-motion backdrop scatters.
pub const STATIC_DISC_COUNT: usize = 20;
pub const STATIC_DISC_COLOR: Color = Color::rgba(0, 212, 255, 0.3);

/// The opacity of a line spanning `distance`, fading linearly from
/// `base_opacity` at zero to nothing at `threshold`. `None` when no line
/// should be drawn at all.
pub fn connection_opacity(distance: f64, threshold: f64, base_opacity: f64) -> Option<f64> {
    if threshold <= 0.0 || distance >= threshold {
        return None;
    }
    Some(base_opacity * (1.0 - distance / threshold))
}

pub struct Renderer<S> {
    surface: S,
}

impl<S: Surface> Renderer<S> {
    pub fn new(surface: S) -> Self {
        Renderer { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[cfg(test)]
    pub(crate) fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.surface.resize(width, height);
    }

    pub fn clear(&mut self) {
        self.surface.clear();
    }

    /// One full frame in the fixed order.
    pub fn render(
        &mut self,
        particles: &[Particle],
        pointer: Option<Vector2<f64>>,
        config: &Config,
    ) {
        self.clear();
        self.draw_connections(particles, config);
        self.draw_particles(particles, config);
        if let Some(pointer) = pointer {
            self.draw_mouse_connections(particles, pointer, config);
        }
    }

    pub fn draw_particles(&mut self, particles: &[Particle], config: &Config) {
        for p in particles {
            self.surface.fill_disc(p.pos, p.size, config.colors.particle);
        }
    }

    // Every unordered pair, so quadratic in the particle count. Fine for the
    // counts the responsive tiers hand out.
    pub fn draw_connections(&mut self, particles: &[Particle], config: &Config) {
        let base = config.colors.connection;
        for (i, a) in particles.iter().enumerate() {
            for b in &particles[i + 1..] {
                let distance = vecmath::vec2_len(vecmath::vec2_sub(a.pos, b.pos));
                if let Some(opacity) =
                    connection_opacity(distance, config.connection_distance, base.opacity)
                {
                    self.surface.stroke_line(
                        a.pos,
                        b.pos,
                        Color { opacity, ..base },
                        CONNECTION_LINE_WIDTH,
                    );
                }
            }
        }
    }

    pub fn draw_mouse_connections(
        &mut self,
        particles: &[Particle],
        pointer: Vector2<f64>,
        config: &Config,
    ) {
        let base = config.colors.mouse_connection;
        for p in particles {
            let distance = vecmath::vec2_len(vecmath::vec2_sub(pointer, p.pos));
            let opacity = connection_opacity(distance, config.mouse_influence, base.opacity);
            if let Some(opacity) = opacity {
                self.surface
                    .stroke_line(p.pos, pointer, Color { opacity, ..base }, POINTER_LINE_WIDTH);
            }
        }
    }

    /// The single still frame shown instead of the animation when the user
    /// prefers reduced motion. Discs are independent of the particle store.
    pub fn draw_static_backdrop<R: Rng + ?Sized>(&mut self, width: f64, height: f64, rng: &mut R) {
        self.clear();
        for _ in 0..STATIC_DISC_COUNT {
            let x = rng.gen::<f64>() * width;
            let y = rng.gen::<f64>() * height;
            let size = rng.gen::<f64>() * 2.0 + 1.0;
            self.surface.fill_disc([x, y], size, STATIC_DISC_COLOR);
        }
    }
}
