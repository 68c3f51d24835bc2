//! The animated background of connected particles behind the portfolio page.
//!
//! The engine (store, simulation, renderer, driver) knows nothing about the
//! browser: it draws on a [`surface::Surface`] and is told when frames, resizes
//! and pointer moves happen. [`web::ParticleSystem`] is the `wasm-bindgen`
//! binding that wires it to a canvas.

mod utils;

pub mod color;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod particle;
pub mod pointer;
pub mod renderer;
pub mod simulation;
pub mod surface;
pub mod web;

pub use color::Color;
pub use config::{Config, ConfigUpdate};
pub use engine::{Motion, ParticleEngine, RunState, Schedule};
pub use errors::ParticleError;
pub use web::ParticleSystem;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Call once from the page before building a `ParticleSystem`: installs the
/// panic hook and console logging.
#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
    let level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    logging::init(level);
}
