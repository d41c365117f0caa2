//! # wavelab-lattice
//!
//! Finite-difference time-domain (FDTD) solver for 2D scalar wave fields,
//! built for interactive physics-education scenes (water ripples, sound,
//! light).
//!
//! ## Architecture
//!
//! ```text
//! wall-clock dt -> FixedRateClock -> LatticeWaveEngine::step()
//!                                        |
//!                      GridBuffer (previous/current/next, absorbing border)
//!                                        |
//!                  IntensitySampler / interpolated readback (renderers)
//! ```
//!
//! - [`GridBuffer`]: triple-buffered field with absorbing borders and a
//!   visited bitmap.
//! - [`LatticeWaveEngine`]: owns one grid, injects sources, fires a changed
//!   signal per step.
//! - [`FixedRateClock`]: fixed-timestep accumulator, so solver behavior is
//!   identical across machines regardless of frame rate.
//! - [`SceneCalibration`]: immutable physical-unit mapping per domain; the
//!   solver never branches on domain identity.
//! - [`IntensitySampler`]: time-averaged intensity profile at the screen
//!   edge.
//! - [`WaveScene`]: per-frame glue for host applications.
//!
//! Purely in-process and synchronous: no rendering, input, audio or
//! persistence lives here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod driver;
pub mod engine;
pub mod error;
pub mod lattice;
pub mod sampler;
pub mod scene;
pub mod source;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::clock::{FixedRateClock, SimulationSpeed};
    pub use crate::driver::WaveScene;
    pub use crate::engine::LatticeWaveEngine;
    pub use crate::error::{LatticeError, Result};
    pub use crate::lattice::{GridBuffer, COURANT_SQUARED, LATTICE_WAVE_SPEED};
    pub use crate::sampler::IntensitySampler;
    pub use crate::scene::{SceneCalibration, WaveMedium};
    pub use crate::source::{SourceGeometry, SourceMode, WaveSource};
}

pub use clock::{FixedRateClock, SimulationSpeed};
pub use driver::WaveScene;
pub use engine::LatticeWaveEngine;
pub use error::{LatticeError, Result};
pub use lattice::{GridBuffer, COURANT_SQUARED, LATTICE_WAVE_SPEED};
pub use sampler::IntensitySampler;
pub use scene::{SceneCalibration, WaveMedium};
pub use source::{SourceGeometry, SourceMode, WaveSource};
