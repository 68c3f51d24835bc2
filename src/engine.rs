//! The animation driver.
//!
//! Owns the particles, the pointer and the run state, and turns host events
//! (frames, resizes, pointer moves, visibility changes) into simulation steps
//! and draws. It never schedules anything itself: methods say whether the host
//! should request another animation frame, so the same driver runs under
//! `requestAnimationFrame` in the browser and a plain loop in tests.

use crate::config::{Config, ConfigUpdate};
use crate::particle::ParticleStore;
use crate::pointer::PointerState;
use crate::renderer::Renderer;
use crate::simulation::{self, Bounds};
use crate::surface::Surface;
use rand::{rngs::StdRng, Rng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
}

/// Whether the user asked for reduced motion when the engine was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Animated,
    Reduced,
}

/// What the host should do after handing the driver an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Schedule {
    /// Request an animation frame and call `frame()` from it.
    NextFrame,
    /// Don't request anything.
    Stop,
}

pub struct ParticleEngine<S, R = StdRng> {
    config: Config,
    store: ParticleStore,
    pointer: PointerState,
    renderer: Renderer<S>,
    rng: R,
    bounds: Bounds,
    state: RunState,
    motion: Motion,
    /// A frame has been requested from the host and not yet run.
    frame_pending: bool,
}

impl<S: Surface, R: Rng> ParticleEngine<S, R> {
    /// Size the surface and either fill the store ready to animate or, for
    /// reduced motion, draw the one static frame and stay inert. Returns the
    /// engine and whether the host should start the frame loop.
    pub fn start(
        surface: S,
        bounds: Bounds,
        config: Config,
        rng: R,
        motion: Motion,
    ) -> (Self, Schedule) {
        let mut renderer = Renderer::new(surface);
        renderer.resize(bounds.width, bounds.height);

        let mut engine = ParticleEngine {
            config,
            store: ParticleStore::new(),
            pointer: PointerState::default(),
            renderer,
            rng,
            bounds,
            state: RunState::Running,
            motion,
            frame_pending: false,
        };

        match motion {
            Motion::Reduced => {
                tracing::info!("Reduced motion preferred, drawing a static backdrop");
                engine
                    .renderer
                    .draw_static_backdrop(bounds.width, bounds.height, &mut engine.rng);
                (engine, Schedule::Stop)
            }
            Motion::Animated => {
                engine.regenerate();
                engine.frame_pending = true;
                (engine, Schedule::NextFrame)
            }
        }
    }

    /// Run one animation frame: step every particle, then draw.
    pub fn frame(&mut self, now: f64) -> Schedule {
        self.frame_pending = false;
        if self.state == RunState::Paused || self.motion == Motion::Reduced {
            return Schedule::Stop;
        }

        self.pointer.expire(now);
        let pointer = self.pointer.active_position();
        simulation::step_all(
            self.store.particles_mut(),
            self.bounds,
            pointer,
            &self.config,
            &mut self.rng,
        );
        self.renderer
            .render(self.store.particles(), pointer, &self.config);

        self.frame_pending = true;
        Schedule::NextFrame
    }

    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            tracing::debug!("Pausing particle animation");
        }
        self.state = RunState::Paused;
    }

    /// Resuming re-arms the frame loop, unless a frame is already in flight
    /// which will carry on by itself.
    pub fn resume(&mut self) -> Schedule {
        if self.motion == Motion::Reduced {
            return Schedule::Stop;
        }
        if self.state == RunState::Paused {
            tracing::debug!("Resuming particle animation");
        }
        self.state = RunState::Running;
        if self.frame_pending {
            return Schedule::Stop;
        }
        self.frame_pending = true;
        Schedule::NextFrame
    }

    /// The host couldn't request the frame it was asked for. Forget about it
    /// so the next resume starts the loop again.
    pub fn frame_dropped(&mut self) {
        self.frame_pending = false;
    }

    pub fn visibility_changed(&mut self, hidden: bool) -> Schedule {
        if hidden {
            self.pause();
            Schedule::Stop
        } else {
            self.resume()
        }
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64, now: f64) {
        self.pointer.moved(x, y, now);
    }

    /// The surface changed size: every particle is replaced at the new size.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.bounds = Bounds::new(width, height);
        if self.motion == Motion::Reduced {
            return;
        }
        self.renderer.resize(width, height);
        self.regenerate();
    }

    /// Merge the given keys into the config and rebuild the store.
    pub fn update_config(&mut self, update: &ConfigUpdate) {
        self.config.merge(update);
        tracing::debug!(?update, "Particle config updated");
        if self.motion == Motion::Animated {
            self.regenerate();
        }
    }

    fn regenerate(&mut self) {
        self.store.create(
            self.config.particle_count,
            self.bounds.width,
            self.bounds.height,
            self.config.particle_size,
            self.config.speed,
            &mut self.rng,
        );
        tracing::debug!(
            count = self.store.len(),
            width = self.bounds.width,
            height = self.bounds.height,
            "Regenerated particles"
        );
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn particle_count(&self) -> usize {
        self.store.len()
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn surface(&self) -> &S {
        self.renderer.surface()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;
    use crate::pointer::POINTER_ACTIVE_MS;
    use crate::renderer::{CONNECTION_LINE_WIDTH, POINTER_LINE_WIDTH, STATIC_DISC_COUNT};
    use crate::surface::recording::{DrawCall, RecordingSurface};
    use rand::SeedableRng;

    const BOUNDS: Bounds = Bounds::new(400.0, 300.0);

    fn start_with(config: Config, motion: Motion) -> (ParticleEngine<RecordingSurface>, Schedule) {
        ParticleEngine::start(
            RecordingSurface::default(),
            BOUNDS,
            config,
            StdRng::seed_from_u64(11),
            motion,
        )
    }

    fn animated() -> ParticleEngine<RecordingSurface> {
        let (engine, schedule) = start_with(Config::default(), Motion::Animated);
        assert_eq!(schedule, Schedule::NextFrame);
        engine
    }

    /// A config where particles don't drift on their own, so positions are
    /// exactly what the test puts there.
    fn still_config() -> Config {
        Config {
            speed: 0.0,
            ..Config::default()
        }
    }

    fn take_calls(engine: &mut ParticleEngine<RecordingSurface>) -> Vec<DrawCall> {
        std::mem::take(&mut engine.renderer.surface_mut().calls)
    }

    #[test]
    fn starts_running_with_a_full_store() {
        let engine = animated();
        assert_eq!(engine.run_state(), RunState::Running);
        assert_eq!(engine.particle_count(), 80);
        assert_eq!(engine.surface().calls[0], DrawCall::Resize(400.0, 300.0));
    }

    #[test]
    fn running_frames_keep_scheduling() {
        let mut engine = animated();
        for tick in 0..5 {
            assert_eq!(engine.frame(f64::from(tick) * 16.0), Schedule::NextFrame);
        }
        assert_eq!(engine.surface().clears(), 5);
    }

    #[test]
    fn paused_frames_stop_and_draw_nothing() {
        let mut engine = animated();
        engine.pause();
        take_calls(&mut engine);
        assert_eq!(engine.frame(0.0), Schedule::Stop);
        assert!(engine.surface().calls.is_empty());
    }

    #[test]
    fn resume_after_loop_stopped_rearms_once() {
        let mut engine = animated();
        assert_eq!(engine.frame(0.0), Schedule::NextFrame);
        engine.pause();
        assert_eq!(engine.frame(16.0), Schedule::Stop);
        assert_eq!(engine.resume(), Schedule::NextFrame);
        assert_eq!(engine.resume(), Schedule::Stop);
        assert_eq!(engine.run_state(), RunState::Running);
    }

    #[test]
    fn resume_with_frame_in_flight_does_not_double_the_loop() {
        let mut engine = animated();
        engine.pause();
        assert_eq!(engine.resume(), Schedule::Stop);
        assert_eq!(engine.frame(0.0), Schedule::NextFrame);
    }

    #[test]
    fn dropped_frame_lets_resume_restart_the_loop() {
        let (mut engine, schedule) = start_with(Config::default(), Motion::Animated);
        assert_eq!(schedule, Schedule::NextFrame);
        engine.frame_dropped();
        engine.pause();
        assert_eq!(engine.resume(), Schedule::NextFrame);

        engine.frame_dropped();
        assert_eq!(engine.visibility_changed(true), Schedule::Stop);
        assert_eq!(engine.visibility_changed(false), Schedule::NextFrame);
    }

    #[test]
    fn visibility_drives_pause_and_resume() {
        let mut engine = animated();
        assert_eq!(engine.visibility_changed(true), Schedule::Stop);
        assert_eq!(engine.run_state(), RunState::Paused);
        assert_eq!(engine.frame(0.0), Schedule::Stop);
        assert_eq!(engine.visibility_changed(false), Schedule::NextFrame);
        assert_eq!(engine.run_state(), RunState::Running);
    }

    #[test]
    fn resize_regenerates_at_new_dimensions_keeping_state() {
        let mut engine = animated();
        engine.pause();
        engine.resize(50.0, 40.0);
        assert_eq!(engine.run_state(), RunState::Paused);
        assert_eq!(engine.particle_count(), 80);
        assert!(engine
            .store()
            .particles()
            .iter()
            .all(|p| p.pos[0] <= 50.0 && p.pos[1] <= 40.0));
        assert!(engine.surface().calls.contains(&DrawCall::Resize(50.0, 40.0)));
    }

    #[test]
    fn config_update_merges_and_regenerates() {
        let mut engine = animated();
        engine.update_config(&ConfigUpdate::particle_count(40));
        assert_eq!(engine.particle_count(), 40);
        assert_eq!(engine.config().particle_count, 40);
        assert_eq!(engine.config().connection_distance, 150.0);
        assert_eq!(engine.run_state(), RunState::Running);

        engine.update_config(&ConfigUpdate::default());
        assert_eq!(engine.particle_count(), 40);
    }

    #[test]
    fn two_particles_ten_apart_draw_one_half_faded_connection() {
        let config = Config {
            particle_count: 2,
            connection_distance: 20.0,
            ..still_config()
        };
        let (mut engine, _) = start_with(config, Motion::Animated);
        engine.store.replace(vec![
            Particle::new(0.0, 0.0, 0.0, 0.0, 1.0),
            Particle::new(10.0, 0.0, 0.0, 0.0, 1.0),
        ]);
        take_calls(&mut engine);

        assert_eq!(engine.frame(0.0), Schedule::NextFrame);
        let lines = engine.surface().lines_of_width(CONNECTION_LINE_WIDTH);
        assert_eq!(lines.len(), 1);
        let base = engine.config().colors.connection.opacity;
        assert_eq!(lines[0].2.opacity, base * (1.0 - 10.0 / 20.0));
        assert_eq!(lines[0].2.opacity, 0.5 * base);
    }

    #[test]
    fn pointer_connection_drawn_only_while_recently_active() {
        let config = still_config();
        let influence = config.mouse_influence;
        let (mut engine, _) = start_with(config, Motion::Animated);
        engine.store.replace(vec![Particle::new(
            100.0,
            100.0 + influence - 1.0,
            0.0,
            0.0,
            1.0,
        )]);

        engine.pointer_moved(100.0, 100.0, 1_000.0);
        take_calls(&mut engine);
        assert_eq!(engine.frame(1_016.0), Schedule::NextFrame);
        let pointer_lines = engine.surface().lines_of_width(POINTER_LINE_WIDTH);
        assert_eq!(pointer_lines.len(), 1);
        assert_eq!(pointer_lines[0].1, [100.0, 100.0]);

        take_calls(&mut engine);
        assert_eq!(engine.frame(1_000.0 + POINTER_ACTIVE_MS), Schedule::NextFrame);
        assert!(engine.surface().lines_of_width(POINTER_LINE_WIDTH).is_empty());
    }

    #[test]
    fn reduced_motion_draws_once_and_never_simulates() {
        let (mut engine, schedule) = start_with(Config::default(), Motion::Reduced);
        assert_eq!(schedule, Schedule::Stop);
        assert!(engine.store().is_empty());
        assert_eq!(engine.surface().clears(), 1);
        assert_eq!(engine.surface().discs().len(), STATIC_DISC_COUNT);

        let before = engine.surface().calls.len();
        assert_eq!(engine.frame(0.0), Schedule::Stop);
        assert_eq!(engine.resume(), Schedule::Stop);
        assert_eq!(engine.visibility_changed(false), Schedule::Stop);
        engine.resize(10.0, 10.0);
        engine.update_config(&ConfigUpdate::particle_count(60));

        assert!(engine.store().is_empty());
        assert_eq!(engine.surface().calls.len(), before);
        assert_eq!(engine.config().particle_count, 60);
    }
}
