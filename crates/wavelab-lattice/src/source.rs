//! Oscillating wave sources.
//!
//! A source overwrites its cell (or column of cells, for plane waves) with
//! a sinusoid each step. Sources are configured once, then toggled and
//! retuned while the simulation runs; they are disabled, never destroyed.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::lattice::GridBuffer;

/// Where a source injects energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceGeometry {
    /// Single cell, radiating circular wavefronts.
    Point {
        /// Column of the source cell.
        x: usize,
        /// Row of the source cell.
        y: usize,
    },
    /// A full visible column, radiating plane wavefronts.
    Line {
        /// Column the plane source occupies.
        x: usize,
    },
}

/// Continuous oscillation versus a single pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceMode {
    /// Oscillates until turned off.
    #[default]
    Continuous,
    /// Emits exactly one full period, then disables itself.
    Pulse,
}

/// An oscillating source feeding the lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveSource {
    geometry: SourceGeometry,
    mode: SourceMode,
    amplitude: f32,
    /// Oscillation frequency in cycles per solver step.
    cycles_per_step: f32,
    /// Current oscillation phase in radians.
    phase: f32,
    enabled: bool,
}

impl WaveSource {
    /// Create a source. It starts enabled with phase zero.
    pub fn new(geometry: SourceGeometry, mode: SourceMode, amplitude: f32, cycles_per_step: f32) -> Self {
        Self {
            geometry,
            mode,
            amplitude,
            cycles_per_step,
            phase: 0.0,
            enabled: true,
        }
    }

    /// The source's injection geometry.
    pub fn geometry(&self) -> SourceGeometry {
        self.geometry
    }

    /// Continuous or pulse mode.
    pub fn mode(&self) -> SourceMode {
        self.mode
    }

    /// Peak oscillation amplitude.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Set the peak oscillation amplitude.
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    /// Oscillation frequency in cycles per solver step.
    pub fn cycles_per_step(&self) -> f32 {
        self.cycles_per_step
    }

    /// Retune the source. Takes effect on the next step; phase is preserved
    /// so there is no discontinuity in the injected waveform.
    pub fn set_cycles_per_step(&mut self, cycles_per_step: f32) {
        self.cycles_per_step = cycles_per_step;
    }

    /// Whether the source is currently injecting.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable the source. A pulse source restarts its single period.
    pub fn turn_on(&mut self) {
        if self.mode == SourceMode::Pulse {
            self.phase = 0.0;
        }
        self.enabled = true;
    }

    /// Disable the source without destroying it.
    pub fn turn_off(&mut self) {
        self.enabled = false;
    }

    /// Reset phase to zero and re-enable. Used on simulation reset.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.enabled = true;
    }

    /// Inject one tick of oscillation into the grid.
    ///
    /// Geometry is validated against the grid when the source is added to
    /// an engine, so the writes here use the pre-validated fast path.
    pub(crate) fn inject(&mut self, grid: &mut GridBuffer) {
        if !self.enabled {
            return;
        }

        let value = self.amplitude * self.phase.sin();
        match self.geometry {
            SourceGeometry::Point { x, y } => grid.write_current(x, y, value),
            SourceGeometry::Line { x } => {
                for y in grid.visible_y_range() {
                    grid.write_current(x, y, value);
                }
            }
        }

        self.phase += TAU * self.cycles_per_step;
        if self.mode == SourceMode::Pulse && self.phase >= TAU {
            self.enabled = false;
        }
    }
}
