//! Per-frame scene driver.
//!
//! Ties one calibration, engine, clock and sampler together the way a host
//! application consumes them: feed wall-clock frame time in, read the field
//! and intensity profile out. Scenes never share state.

use crate::clock::{FixedRateClock, SimulationSpeed};
use crate::engine::LatticeWaveEngine;
use crate::error::Result;
use crate::sampler::IntensitySampler;
use crate::scene::SceneCalibration;
use crate::source::{SourceGeometry, SourceMode, WaveSource};

/// One running wave scene: engine + clock + calibration + sampler.
pub struct WaveScene {
    calibration: SceneCalibration,
    engine: LatticeWaveEngine,
    clock: FixedRateClock,
    sampler: IntensitySampler,
}

impl WaveScene {
    /// Create a scene on a `width` x `height` grid.
    ///
    /// The absorbing border width comes from the calibration; grid
    /// constraints are those of the engine.
    pub fn new(calibration: SceneCalibration, width: usize, height: usize) -> Result<Self> {
        calibration.validate()?;
        let engine = LatticeWaveEngine::new(
            width,
            height,
            calibration.damp_margin,
            calibration.damp_margin,
        )?;
        let clock = FixedRateClock::new(calibration.steps_per_second)?;
        let sampler = IntensitySampler::for_engine(&engine);

        tracing::info!(medium = ?calibration.medium, width, height, "created wave scene");
        Ok(Self {
            calibration,
            engine,
            clock,
            sampler,
        })
    }

    /// Add a source at the visible-region center.
    ///
    /// Frequency and amplitude are clamped into the calibration's ranges
    /// before reaching the solver. Returns the source index.
    pub fn add_center_source(
        &mut self,
        mode: SourceMode,
        frequency_hz: f32,
        amplitude: f32,
    ) -> Result<usize> {
        let (cx, cy) = self.engine.grid().center();
        let geometry = SourceGeometry::Point { x: cx, y: cy };
        self.add_source(geometry, mode, frequency_hz, amplitude)
    }

    /// Add a plane source spanning the visible rows at the left edge of the
    /// visible region.
    pub fn add_plane_source(
        &mut self,
        mode: SourceMode,
        frequency_hz: f32,
        amplitude: f32,
    ) -> Result<usize> {
        let x = self.engine.grid().damp_x();
        self.add_source(SourceGeometry::Line { x }, mode, frequency_hz, amplitude)
    }

    fn add_source(
        &mut self,
        geometry: SourceGeometry,
        mode: SourceMode,
        frequency_hz: f32,
        amplitude: f32,
    ) -> Result<usize> {
        let cycles = self
            .calibration
            .frequency_to_cycles_per_step(self.calibration.clamp_frequency(frequency_hz));
        let amplitude = self.calibration.clamp_amplitude(amplitude);
        self.engine
            .add_source(WaveSource::new(geometry, mode, amplitude, cycles))
    }

    /// Consume one frame's wall-clock time, firing whole solver steps and
    /// updating the sampler and interpolation ratio. Returns the number of
    /// steps fired.
    pub fn advance(&mut self, real_dt: f64) -> u32 {
        let engine = &mut self.engine;
        let sampler = &mut self.sampler;
        let steps = self.clock.advance(real_dt, || {
            engine.step();
            sampler.record(engine);
        });
        engine.set_interpolation_ratio(self.clock.interpolation_ratio());
        steps
    }

    /// Fire exactly one step regardless of elapsed wall time.
    pub fn manual_step(&mut self) {
        let engine = &mut self.engine;
        let sampler = &mut self.sampler;
        self.clock.manual_step(|| {
            engine.step();
            sampler.record(engine);
        });
    }

    /// Reset field, sources, clock debt and intensity profile.
    pub fn reset(&mut self) {
        self.engine.clear();
        self.clock.reset();
        self.sampler.reset();
    }

    /// Change playback speed.
    pub fn set_speed(&mut self, speed: SimulationSpeed) {
        self.clock.set_speed(speed);
    }

    /// Retune a source to a physical frequency (clamped).
    pub fn set_source_frequency(&mut self, index: usize, frequency_hz: f32) {
        let cycles = self
            .calibration
            .frequency_to_cycles_per_step(self.calibration.clamp_frequency(frequency_hz));
        if let Some(source) = self.engine.source_mut(index) {
            source.set_cycles_per_step(cycles);
        }
    }

    /// Set a source's amplitude (clamped).
    pub fn set_source_amplitude(&mut self, index: usize, amplitude: f32) {
        let amplitude = self.calibration.clamp_amplitude(amplitude);
        if let Some(source) = self.engine.source_mut(index) {
            source.set_amplitude(amplitude);
        }
    }

    /// The scene's calibration record.
    pub fn calibration(&self) -> &SceneCalibration {
        &self.calibration
    }

    /// The wave engine (read-only queries and subscriptions live here).
    pub fn engine(&self) -> &LatticeWaveEngine {
        &self.engine
    }

    /// Mutable engine access, for hosts poking cells or subscribing.
    pub fn engine_mut(&mut self) -> &mut LatticeWaveEngine {
        &mut self.engine
    }

    /// The intensity profile at the screen edge.
    pub fn intensity_profile(&self) -> &[f32] {
        self.sampler.profile()
    }
}
