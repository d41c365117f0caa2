//! The lattice wave engine: one grid buffer plus its sources.
//!
//! The engine is the only mutator of its grid. External readers (intensity
//! sampler, renderers) go through the read-only queries and the
//! interpolated lookup; the "changed" signal fires once per completed step.

use wavelab_core::ChangeNotifier;

use crate::error::{LatticeError, Result};
use crate::lattice::GridBuffer;
use crate::source::{SourceGeometry, WaveSource};

/// Finite-difference time-domain engine for one 2D scalar wave field.
pub struct LatticeWaveEngine {
    grid: GridBuffer,
    sources: Vec<WaveSource>,
    /// Fractional progress between the previous and current step, set by
    /// the simulation clock. Read-side smoothing only.
    interpolation_ratio: f32,
    notifier: ChangeNotifier,
}

impl LatticeWaveEngine {
    /// Create an engine with no sources and no potential barrier.
    ///
    /// Dimension and border constraints are those of [`GridBuffer::new`].
    pub fn new(width: usize, height: usize, damp_x: usize, damp_y: usize) -> Result<Self> {
        Self::with_potential(width, height, damp_x, damp_y, |_, _| false)
    }

    /// Create an engine whose grid carries a potential barrier.
    ///
    /// `potential` marks barrier cells (see [`GridBuffer::with_potential`]):
    /// the field is pinned to zero there, so waves reflect off walls and
    /// pass only through the openings cut into them.
    pub fn with_potential(
        width: usize,
        height: usize,
        damp_x: usize,
        damp_y: usize,
        potential: impl Fn(usize, usize) -> bool,
    ) -> Result<Self> {
        Ok(Self {
            grid: GridBuffer::with_potential(width, height, damp_x, damp_y, potential)?,
            sources: Vec::new(),
            interpolation_ratio: 0.0,
            notifier: ChangeNotifier::new(),
        })
    }

    /// Add a source, validating its geometry against the grid.
    ///
    /// Returns the source's index. Point sources must lie inside the grid
    /// and outside the potential barrier; plane sources must occupy an
    /// in-range column.
    pub fn add_source(&mut self, source: WaveSource) -> Result<usize> {
        match source.geometry() {
            SourceGeometry::Point { x, y } => {
                // Validate the bounds once; injection skips the check afterwards.
                self.grid.current_value(x, y)?;
                if self.grid.is_cell_blocked(x, y) {
                    return Err(LatticeError::construction(format!(
                        "source cell ({x}, {y}) lies inside the potential barrier"
                    )));
                }
            }
            SourceGeometry::Line { x } => {
                if x >= self.grid.width() {
                    return Err(LatticeError::OutOfBounds {
                        x,
                        y: 0,
                        width: self.grid.width(),
                        height: self.grid.height(),
                    });
                }
            }
        }
        self.sources.push(source);
        Ok(self.sources.len() - 1)
    }

    /// Advance the simulation by one discrete step.
    ///
    /// Order: enabled sources overwrite their cells, the stencil update
    /// runs, then the changed signal fires.
    pub fn step(&mut self) {
        for source in &mut self.sources {
            source.inject(&mut self.grid);
        }
        self.grid.step();
        self.notifier.notify();
    }

    /// The grid buffer (read-only).
    pub fn grid(&self) -> &GridBuffer {
        &self.grid
    }

    /// Overwrite a cell's current value and mark it visited.
    pub fn set_current_value(&mut self, x: usize, y: usize, value: f32) -> Result<()> {
        self.grid.set_current_value(x, y, value)
    }

    /// Read a cell's current value.
    pub fn current_value(&self, x: usize, y: usize) -> Result<f32> {
        self.grid.current_value(x, y)
    }

    /// Read a cell blended at the stored interpolation ratio.
    pub fn interpolated_value(&self, x: usize, y: usize) -> Result<f32> {
        self.grid.interpolated_value(x, y, self.interpolation_ratio)
    }

    /// Whether a cell has ever received nonzero energy.
    pub fn has_cell_been_visited(&self, x: usize, y: usize) -> bool {
        self.grid.has_cell_been_visited(x, y)
    }

    /// Whether a cell lies inside the potential barrier.
    pub fn is_cell_blocked(&self, x: usize, y: usize) -> bool {
        self.grid.is_cell_blocked(x, y)
    }

    /// Reset the field, visited bitmap and source phases, and notify.
    pub fn clear(&mut self) {
        self.grid.clear();
        for source in &mut self.sources {
            source.reset();
        }
        self.interpolation_ratio = 0.0;
        self.notifier.notify();
    }

    /// Set the read-side interpolation ratio (clamped to `[0, 1]`).
    pub fn set_interpolation_ratio(&mut self, ratio: f32) {
        self.interpolation_ratio = ratio.clamp(0.0, 1.0);
    }

    /// The stored interpolation ratio.
    pub fn interpolation_ratio(&self) -> f32 {
        self.interpolation_ratio
    }

    /// Source at `index`, if present.
    pub fn source(&self, index: usize) -> Option<&WaveSource> {
        self.sources.get(index)
    }

    /// Mutable source at `index`, if present.
    pub fn source_mut(&mut self, index: usize) -> Option<&mut WaveSource> {
        self.sources.get_mut(index)
    }

    /// Number of configured sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Subscribe to the per-step changed signal.
    pub fn subscribe<F: FnMut() + Send + 'static>(&mut self, listener: F) {
        self.notifier.subscribe(listener);
    }

    /// Revision counter: increments once per completed step or clear.
    pub fn revision(&self) -> u64 {
        self.notifier.revision()
    }
}
