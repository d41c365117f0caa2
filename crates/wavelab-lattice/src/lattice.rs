//! Grid buffer for the 2D scalar wave field.
//!
//! Flat row-major storage with three rotating buffers (`previous`,
//! `current`, `next`) for leapfrog time-stepping, a visited bitmap for
//! distinguishing "never disturbed" from "disturbed and now quiescent"
//! cells, and a precomputed per-cell damping table implementing the
//! absorbing border.

use rayon::prelude::*;

use crate::error::{LatticeError, Result};

/// Courant number squared for the leapfrog stencil.
///
/// The 2D CFL bound is c <= 1/sqrt(2), i.e. c^2 <= 0.5. Running exactly at
/// the bound keeps numerical dispersion low while remaining stable.
pub const COURANT_SQUARED: f32 = 0.5;

/// Wave propagation speed on the lattice, in cells per step (sqrt of
/// [`COURANT_SQUARED`]).
pub const LATTICE_WAVE_SPEED: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Magnitude above which a cell counts as having received wave energy.
const VISITED_THRESHOLD: f32 = 1e-6;

/// Grid sizes at or above this use the parallel row update.
///
/// Below it the rayon dispatch overhead outweighs the per-row work.
const PARALLEL_THRESHOLD: usize = 256;

/// Double-buffered 2D scalar field with absorbing borders.
///
/// Indices run `[0, width) x [0, height)` in row-major order. The visible
/// sub-rectangle excludes an absorbing border of `damp_x` cells on the left
/// and right and `damp_y` cells on the top and bottom; cells inside the
/// border attenuate the field progressively to suppress edge reflections.
/// An optional potential barrier pins chosen cells to zero, forming walls
/// and slits the wave cannot cross.
pub struct GridBuffer {
    width: usize,
    height: usize,
    damp_x: usize,
    damp_y: usize,

    /// Field at step n-1.
    previous: Vec<f32>,
    /// Field at step n.
    current: Vec<f32>,
    /// Scratch buffer written during `step()`, rotated in afterwards.
    next: Vec<f32>,

    /// True for cells that have ever carried nonzero energy.
    visited: Vec<bool>,
    /// Per-cell damping coefficient: 1.0 in the interior, ramping down
    /// toward the outer edge of the absorbing border.
    damp_coeff: Vec<f32>,
    /// True for cells inside the potential barrier; the field is pinned to
    /// zero there.
    blocked: Vec<bool>,
}

impl GridBuffer {
    /// Create a new grid with no potential barrier.
    ///
    /// `width` and `height` must be odd so a unique center cell exists;
    /// `damp_x`/`damp_y` must be at least 1 and must leave a non-empty
    /// visible interior. Violations are construction errors.
    pub fn new(width: usize, height: usize, damp_x: usize, damp_y: usize) -> Result<Self> {
        Self::with_potential(width, height, damp_x, damp_y, |_, _| false)
    }

    /// Create a grid with a potential barrier.
    ///
    /// `potential` is sampled once per cell at construction; cells where it
    /// returns true become barrier cells. The field is pinned to zero on
    /// barrier cells, so waves reflect off walls and transmit only through
    /// the openings cut into them. Other constraints are those of
    /// [`GridBuffer::new`].
    pub fn with_potential(
        width: usize,
        height: usize,
        damp_x: usize,
        damp_y: usize,
        potential: impl Fn(usize, usize) -> bool,
    ) -> Result<Self> {
        if width % 2 == 0 || height % 2 == 0 {
            return Err(LatticeError::construction(format!(
                "grid dimensions must be odd, got {}x{}",
                width, height
            )));
        }
        if damp_x == 0 || damp_y == 0 {
            return Err(LatticeError::construction(
                "absorbing border must be at least 1 cell wide",
            ));
        }
        if width <= 2 * damp_x || height <= 2 * damp_y {
            return Err(LatticeError::construction(format!(
                "absorbing borders ({damp_x}, {damp_y}) leave no visible interior in a {width}x{height} grid"
            )));
        }

        let size = width * height;
        let mut blocked = vec![false; size];
        for y in 0..height {
            for x in 0..width {
                blocked[y * width + x] = potential(x, y);
            }
        }

        let mut grid = Self {
            width,
            height,
            damp_x,
            damp_y,
            previous: vec![0.0; size],
            current: vec![0.0; size],
            next: vec![0.0; size],
            visited: vec![false; size],
            damp_coeff: vec![1.0; size],
            blocked,
        };
        grid.initialize_damping();

        tracing::info!(width, height, damp_x, damp_y, "created grid buffer");
        Ok(grid)
    }

    /// Precompute the damping coefficient table.
    ///
    /// The ramp is a smoothstep of penetration depth into the border,
    /// separable in x and y: 1.0 at the inner edge, small (~0.07 for a
    /// 5-cell border) at the outermost ring. Monotone by construction.
    fn initialize_damping(&mut self) {
        fn ramp(depth: usize, border: usize) -> f32 {
            if depth >= border {
                return 1.0;
            }
            let s = (depth as f32 + 1.0) / (border as f32 + 1.0);
            s * s * (3.0 - 2.0 * s)
        }

        for y in 0..self.height {
            let ry = ramp(y.min(self.height - 1 - y), self.damp_y);
            for x in 0..self.width {
                let rx = ramp(x.min(self.width - 1 - x), self.damp_x);
                self.damp_coeff[y * self.width + x] = rx * ry;
            }
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Width of the absorbing border on the left and right edges.
    pub fn damp_x(&self) -> usize {
        self.damp_x
    }

    /// Height of the absorbing border on the top and bottom edges.
    pub fn damp_y(&self) -> usize {
        self.damp_y
    }

    /// Column range of the visible sub-rectangle.
    pub fn visible_x_range(&self) -> std::ops::Range<usize> {
        self.damp_x..self.width - self.damp_x
    }

    /// Row range of the visible sub-rectangle.
    pub fn visible_y_range(&self) -> std::ops::Range<usize> {
        self.damp_y..self.height - self.damp_y
    }

    /// Width of the visible sub-rectangle (odd, like the full grid).
    pub fn visible_width(&self) -> usize {
        self.width - 2 * self.damp_x
    }

    /// Height of the visible sub-rectangle (odd, like the full grid).
    pub fn visible_height(&self) -> usize {
        self.height - 2 * self.damp_y
    }

    /// Center cell of the grid (unique because dimensions are odd).
    pub fn center(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    #[inline(always)]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline(always)]
    fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn out_of_bounds(&self, x: usize, y: usize) -> LatticeError {
        LatticeError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// Advance the field by one discrete time unit.
    ///
    /// Leapfrog update of the 2D scalar wave equation:
    /// `next = (2*current - previous + c^2 * laplacian(current)) * damp`,
    /// with a 5-point Laplacian. The outermost ring is pinned to zero; it
    /// sits at the bottom of the damping ramp, so the hard edge contributes
    /// no observable reflection. Buffers rotate afterwards. O(width*height),
    /// no allocation.
    pub fn step(&mut self) {
        if self.width >= PARALLEL_THRESHOLD || self.height >= PARALLEL_THRESHOLD {
            self.step_rows_parallel();
        } else {
            self.step_rows_sequential();
        }

        // Pin the outermost ring.
        self.next[..self.width].fill(0.0);
        let last_row = (self.height - 1) * self.width;
        self.next[last_row..].fill(0.0);

        // Rotate: previous <- current, current <- next, next recycles the
        // old previous buffer as scratch.
        std::mem::swap(&mut self.previous, &mut self.next);
        std::mem::swap(&mut self.previous, &mut self.current);
    }

    fn step_rows_sequential(&mut self) {
        let width = self.width;
        for y in 1..self.height - 1 {
            let row = y * width;
            Self::step_row(
                &self.current,
                &self.previous,
                &self.damp_coeff[row..row + width],
                &self.blocked[row..row + width],
                &mut self.next[row..row + width],
                &mut self.visited[row..row + width],
                row,
                width,
            );
        }
    }

    fn step_rows_parallel(&mut self) {
        let width = self.width;
        let interior = width..(self.height - 1) * width;
        let current = &self.current;
        let previous = &self.previous;
        let damp = &self.damp_coeff;
        let blocked = &self.blocked;

        self.next[interior.clone()]
            .par_chunks_mut(width)
            .zip(self.visited[interior].par_chunks_mut(width))
            .enumerate()
            .for_each(|(row_offset, (next_row, visited_row))| {
                let row = (row_offset + 1) * width;
                Self::step_row(
                    current,
                    previous,
                    &damp[row..row + width],
                    &blocked[row..row + width],
                    next_row,
                    visited_row,
                    row,
                    width,
                );
            });
    }

    /// Stencil update for one interior row. `row` is the row's base index
    /// into the full buffers; the slice arguments are that row only.
    #[inline]
    fn step_row(
        current: &[f32],
        previous: &[f32],
        damp_row: &[f32],
        blocked_row: &[bool],
        next_row: &mut [f32],
        visited_row: &mut [bool],
        row: usize,
        width: usize,
    ) {
        next_row[0] = 0.0;
        next_row[width - 1] = 0.0;

        for x in 1..width - 1 {
            if blocked_row[x] {
                next_row[x] = 0.0;
                continue;
            }
            let idx = row + x;
            let center = current[idx];
            let laplacian =
                current[idx - width] + current[idx + width] + current[idx - 1] + current[idx + 1]
                    - 4.0 * center;
            let value =
                (2.0 * center - previous[idx] + COURANT_SQUARED * laplacian) * damp_row[x];

            next_row[x] = value;
            if value.abs() > VISITED_THRESHOLD {
                visited_row[x] = true;
            }
        }
    }

    /// Overwrite a cell's current value and mark it visited.
    ///
    /// Used to inject source oscillation each tick. Out-of-range indices
    /// consistently raise [`LatticeError::OutOfBounds`]; the backing array
    /// is never written outside its bounds. Writes into the potential
    /// barrier are ignored; barrier cells stay at zero.
    pub fn set_current_value(&mut self, x: usize, y: usize, value: f32) -> Result<()> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_bounds(x, y));
        }
        let idx = self.idx(x, y);
        if self.blocked[idx] {
            return Ok(());
        }
        self.current[idx] = value;
        self.visited[idx] = true;
        Ok(())
    }

    /// Write a cell without the public bounds check.
    ///
    /// Callers must have validated `(x, y)` at configuration time; this is
    /// the hot path used by source injection every step.
    pub(crate) fn write_current(&mut self, x: usize, y: usize, value: f32) {
        debug_assert!(self.in_bounds(x, y));
        let idx = self.idx(x, y);
        if self.blocked[idx] {
            return;
        }
        self.current[idx] = value;
        self.visited[idx] = true;
    }

    /// Read a cell's current value.
    pub fn current_value(&self, x: usize, y: usize) -> Result<f32> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_bounds(x, y));
        }
        Ok(self.current[self.idx(x, y)])
    }

    /// Read a cell blended between the previous and current steps.
    ///
    /// `ratio` = 0 yields the previous value, 1 the current value. Pure
    /// read-side smoothing; never affects solver state.
    pub fn interpolated_value(&self, x: usize, y: usize, ratio: f32) -> Result<f32> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_bounds(x, y));
        }
        let idx = self.idx(x, y);
        let prev = self.previous[idx];
        Ok(prev + (self.current[idx] - prev) * ratio)
    }

    /// Whether a cell has ever received nonzero energy.
    ///
    /// Distinguishes "never disturbed" (vacuum) from "disturbed and now
    /// zero" cells; reset only by [`GridBuffer::clear`]. Out-of-range
    /// indices report false.
    pub fn has_cell_been_visited(&self, x: usize, y: usize) -> bool {
        self.in_bounds(x, y) && self.visited[self.idx(x, y)]
    }

    /// Whether a cell lies inside the potential barrier. Out-of-range
    /// indices report false.
    pub fn is_cell_blocked(&self, x: usize, y: usize) -> bool {
        self.in_bounds(x, y) && self.blocked[self.idx(x, y)]
    }

    /// Zero all buffers and the visited bitmap. Idempotent. The potential
    /// barrier is structure, not state; it survives a clear.
    pub fn clear(&mut self) {
        self.previous.fill(0.0);
        self.current.fill(0.0);
        self.next.fill(0.0);
        self.visited.fill(false);
        tracing::debug!("cleared grid buffer");
    }

    /// Current field as a flat slice (row-major order).
    pub fn current_slice(&self) -> &[f32] {
        &self.current
    }

    /// Previous field as a flat slice (row-major order).
    pub fn previous_slice(&self) -> &[f32] {
        &self.previous
    }

    /// Sum of squared current values over the visible sub-rectangle.
    pub fn visible_energy(&self) -> f32 {
        let mut energy = 0.0;
        for y in self.visible_y_range() {
            let row = y * self.width;
            for x in self.visible_x_range() {
                let v = self.current[row + x];
                energy += v * v;
            }
        }
        energy
    }
}
