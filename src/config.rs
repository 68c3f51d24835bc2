//! All the tunable parameters of the particle background

use crate::color::Color;
use crate::errors::{ConfigParseSnafu, ConfigSerializeSnafu, ParticleError};
use snafu::ResultExt as _;

/// Viewports narrower than this get the smallest particle count.
pub const MOBILE_BREAKPOINT: f64 = 768.0;
/// Viewports narrower than this get the middle particle count.
pub const TABLET_BREAKPOINT: f64 = 1200.0;

/// The colours used for drawing. Each carries its own base opacity.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Colors {
    /// Fill of the particle discs
    pub particle: Color,
    /// Stroke of the lines between nearby particles
    pub connection: Color,
    /// Stroke of the lines between particles and the pointer
    pub mouse_connection: Color,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            particle: Color::rgba(0, 212, 255, 0.6),
            connection: Color::rgba(0, 212, 255, 0.2),
            mouse_connection: Color::rgba(255, 0, 110, 0.4),
        }
    }
}

/// All the config for the particle system
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// How many particles are created on every regeneration
    pub particle_count: usize,
    /// The largest extra radius on top of the 1px minimum
    pub particle_size: f64,
    /// Particles closer than this are joined by a line. Zero disables connections.
    pub connection_distance: f64,
    /// Radius around the pointer that attracts particles. Zero disables it.
    pub mouse_influence: f64,
    /// The spread of initial velocities, and twice the minimum speed
    pub speed: f64,
    /// Drawing colours
    pub colors: Colors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            particle_count: 80,
            particle_size: 2.0,
            connection_distance: 150.0,
            mouse_influence: 100.0,
            speed: 0.5,
            colors: Colors::default(),
        }
    }
}

impl Config {
    /// Merge only the keys present in `update`.
    pub fn merge(&mut self, update: &ConfigUpdate) {
        if let Some(particle_count) = update.particle_count {
            self.particle_count = particle_count;
        }
        if let Some(particle_size) = update.particle_size {
            self.particle_size = particle_size;
        }
        if let Some(connection_distance) = update.connection_distance {
            self.connection_distance = connection_distance;
        }
        if let Some(mouse_influence) = update.mouse_influence {
            self.mouse_influence = mouse_influence;
        }
        if let Some(speed) = update.speed {
            self.speed = speed;
        }
        if let Some(colors) = &update.colors {
            if let Some(particle) = colors.particle {
                self.colors.particle = particle;
            }
            if let Some(connection) = colors.connection {
                self.colors.connection = connection;
            }
            if let Some(mouse_connection) = colors.mouse_connection {
                self.colors.mouse_connection = mouse_connection;
            }
        }
    }

    pub fn to_json(&self) -> Result<String, ParticleError> {
        serde_json::to_string(self).context(ConfigSerializeSnafu)
    }
}

/// A partial colour group, only the given entries are replaced.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ColorsUpdate {
    pub particle: Option<Color>,
    pub connection: Option<Color>,
    pub mouse_connection: Option<Color>,
}

/// A partial config, as passed to `updateConfig()`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigUpdate {
    pub particle_count: Option<usize>,
    pub particle_size: Option<f64>,
    pub connection_distance: Option<f64>,
    pub mouse_influence: Option<f64>,
    pub speed: Option<f64>,
    pub colors: Option<ColorsUpdate>,
}

impl ConfigUpdate {
    pub fn from_json(json: &str) -> Result<Self, ParticleError> {
        serde_json::from_str(json).context(ConfigParseSnafu)
    }

    /// Just a new particle count, what the responsive tiers send.
    pub const fn particle_count(count: usize) -> Self {
        Self {
            particle_count: Some(count),
            particle_size: None,
            connection_distance: None,
            mouse_influence: None,
            speed: None,
            colors: None,
        }
    }
}

/// Fewer particles on smaller screens.
pub fn particle_count_for_width(width: f64) -> usize {
    if width < MOBILE_BREAKPOINT {
        40
    } else if width < TABLET_BREAKPOINT {
        60
    } else {
        80
    }
}
