//! Per-domain physical calibration.
//!
//! One immutable record per physical domain (water, sound, light) mapping
//! physical units onto lattice cells and solver steps. The solver never
//! branches on domain identity: calibration parameterizes it, nothing more.
//!
//! The constants are tuned so the on-lattice wavelength at each domain's
//! maximum frequency spans roughly 8-20 cells, which resolves the wave
//! cleanly on a ~100-cell visible region.

use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, Result};
use crate::lattice::LATTICE_WAVE_SPEED;

/// Physical domain a scene visualizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveMedium {
    /// Surface waves in a ripple tank.
    Water,
    /// Acoustic pressure waves in air.
    Sound,
    /// Electromagnetic waves (visible light).
    Light,
}

/// Immutable unit-conversion record for one scene.
///
/// All lengths are in the domain's physical unit (meters); frequencies in
/// hertz. Never mutated after construction; scenes sharing a solver
/// implementation never share one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneCalibration {
    /// The physical domain.
    pub medium: WaveMedium,
    /// Physical wave propagation speed, units per second.
    pub wave_speed: f32,
    /// Physical length spanned by one lattice cell.
    pub spatial_scale: f32,
    /// Lowest selectable source frequency, Hz.
    pub min_frequency: f32,
    /// Highest selectable source frequency, Hz.
    pub max_frequency: f32,
    /// Largest selectable source amplitude (field units).
    pub max_amplitude: f32,
    /// Absorbing border width, cells, on every side.
    pub damp_margin: usize,
    /// Nominal solver step rate driven by the fixed-rate clock.
    pub steps_per_second: f64,
}

impl SceneCalibration {
    /// Ripple-tank water scene: a 10 cm tank, slow gravity-capillary waves.
    pub fn water() -> Self {
        Self {
            medium: WaveMedium::Water,
            wave_speed: 0.02,
            spatial_scale: 1.0e-3,
            min_frequency: 0.25,
            max_frequency: 1.0,
            max_amplitude: 1.0,
            damp_margin: 20,
            steps_per_second: 20.0,
        }
    }

    /// Sound scene: a 5 m room, audible tones around the A octave.
    pub fn sound() -> Self {
        Self {
            medium: WaveMedium::Sound,
            wave_speed: 343.0,
            spatial_scale: 0.05,
            min_frequency: 110.0,
            max_frequency: 440.0,
            max_amplitude: 1.0,
            damp_margin: 20,
            steps_per_second: 20.0,
        }
    }

    /// Light scene: a few-micron window, visible spectrum.
    pub fn light() -> Self {
        Self {
            medium: WaveMedium::Light,
            wave_speed: 2.998e8,
            spatial_scale: 42.0e-9,
            min_frequency: 4.3e14,
            max_frequency: 7.5e14,
            max_amplitude: 1.0,
            damp_margin: 20,
            steps_per_second: 20.0,
        }
    }

    /// Validate a hand-built calibration.
    ///
    /// The stock constructors are valid by construction; this is for host
    /// applications supplying their own constants.
    pub fn validate(&self) -> Result<()> {
        if self.wave_speed <= 0.0 || self.spatial_scale <= 0.0 {
            return Err(LatticeError::construction(
                "wave speed and spatial scale must be positive",
            ));
        }
        if self.min_frequency <= 0.0 || self.max_frequency < self.min_frequency {
            return Err(LatticeError::construction(
                "frequency range must be positive and ordered",
            ));
        }
        if self.damp_margin == 0 {
            return Err(LatticeError::construction(
                "absorbing border must be at least 1 cell wide",
            ));
        }
        Ok(())
    }

    /// Convert a physical length to lattice cells.
    pub fn length_to_cells(&self, length: f32) -> f32 {
        length / self.spatial_scale
    }

    /// Convert lattice cells to a physical length.
    pub fn cells_to_length(&self, cells: f32) -> f32 {
        cells * self.spatial_scale
    }

    /// Convert a physical frequency to oscillation cycles per solver step.
    ///
    /// Derived from the lattice propagation speed: a wave of physical
    /// wavelength v/f must span (v/f)/scale cells, and the lattice carries
    /// waves at [`LATTICE_WAVE_SPEED`] cells per step.
    pub fn frequency_to_cycles_per_step(&self, frequency: f32) -> f32 {
        LATTICE_WAVE_SPEED * self.spatial_scale * frequency / self.wave_speed
    }

    /// On-lattice wavelength in cells for a physical frequency.
    pub fn wavelength_in_cells(&self, frequency: f32) -> f32 {
        LATTICE_WAVE_SPEED / self.frequency_to_cycles_per_step(frequency)
    }

    /// Simulated seconds that elapse per solver step.
    ///
    /// Frequency-independent: it is fixed by the lattice speed, the spatial
    /// scale and the physical wave speed.
    pub fn sim_seconds_per_step(&self) -> f32 {
        LATTICE_WAVE_SPEED * self.spatial_scale / self.wave_speed
    }

    /// Convert a simulated duration to solver steps.
    pub fn time_to_steps(&self, sim_seconds: f32) -> f32 {
        sim_seconds / self.sim_seconds_per_step()
    }

    /// Simulated seconds per real second at the nominal step rate.
    pub fn time_scale(&self) -> f32 {
        self.sim_seconds_per_step() * self.steps_per_second as f32
    }

    /// Clamp a requested frequency into the scene's documented range.
    ///
    /// Parameters are clamped here, before they reach the solver; the
    /// per-cell update assumes pre-validated input.
    pub fn clamp_frequency(&self, frequency: f32) -> f32 {
        frequency.clamp(self.min_frequency, self.max_frequency)
    }

    /// Clamp a requested amplitude into `[0, max_amplitude]`.
    pub fn clamp_amplitude(&self, amplitude: f32) -> f32 {
        amplitude.clamp(0.0, self.max_amplitude)
    }
}
