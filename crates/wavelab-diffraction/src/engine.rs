//! The diffraction pattern engine.
//!
//! Runs the full pipeline on every parameter change: rasterize the aperture,
//! 2D FFT, center the spectrum, then log-compress the magnitudes into a
//! displayable `[0, 1]` matrix (the far-field pattern under the Fraunhofer
//! approximation). Nothing intermediate is cached across recomputes; both
//! output matrices are replaced wholesale.

use num_complex::Complex;
use wavelab_core::ChangeNotifier;

use crate::aperture::ApertureGeometry;
use crate::error::Result;
use crate::fft2d::{fft_shift, Fft2d};

/// Nominal matrix resolution.
pub const DEFAULT_MATRIX_SIZE: usize = 256;

/// Contrast constant for log compression.
///
/// The magnitude spectrum spans several orders of magnitude; a linear scale
/// would show a single bright dot. `ln(C*mag + 1) / ln(C*max + 1)` expands
/// the low-magnitude fringes into visibility.
pub const CONTRAST: f32 = 1000.0;

/// Aperture-to-diffraction-pattern pipeline.
pub struct DiffractionEngine {
    n: usize,
    fft: Fft2d,
    geometry: Option<ApertureGeometry>,
    aperture: Vec<f32>,
    diffraction: Vec<f32>,
    /// Spectrum scratch, reused across recomputes.
    spectrum: Vec<Complex<f32>>,
    dirty: bool,
    notifier: ChangeNotifier,
}

impl DiffractionEngine {
    /// Create an engine producing `n x n` matrices.
    ///
    /// `n` must be a power of two and at least 2 (FFT constraint).
    pub fn new(n: usize) -> Result<Self> {
        let fft = Fft2d::new(n)?;
        tracing::info!(n, "created diffraction engine");
        Ok(Self {
            n,
            fft,
            geometry: None,
            aperture: vec![0.0; n * n],
            diffraction: vec![0.0; n * n],
            spectrum: vec![Complex::default(); n * n],
            dirty: false,
            notifier: ChangeNotifier::new(),
        })
    }

    /// Matrix side length.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Replace the aperture geometry and mark the pipeline dirty.
    pub fn set_geometry(&mut self, geometry: ApertureGeometry) {
        self.geometry = Some(geometry);
        self.dirty = true;
    }

    /// Remove the aperture entirely (fully opaque mask).
    pub fn clear_geometry(&mut self) {
        self.geometry = None;
        self.dirty = true;
    }

    /// Whether a recompute is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Run the rasterize -> transform -> compress pipeline if parameters
    /// changed since the last run. No-op when clean.
    pub fn recompute(&mut self) {
        if !self.dirty {
            return;
        }

        match &self.geometry {
            Some(geometry) => {
                self.aperture = geometry.rasterize(self.n);
            }
            None => {
                self.aperture.fill(0.0);
            }
        }

        for (slot, &t) in self.spectrum.iter_mut().zip(&self.aperture) {
            *slot = Complex::new(t, 0.0);
        }
        self.fft.forward(&mut self.spectrum);

        for (slot, value) in self.diffraction.iter_mut().zip(&self.spectrum) {
            *slot = value.norm();
        }
        fft_shift(&mut self.diffraction, self.n);

        self.compress();

        self.dirty = false;
        self.notifier.notify();
    }

    /// Log-compress the magnitude matrix in place, normalizing to `[0, 1]`.
    ///
    /// An all-zero spectrum (degenerate, fully opaque aperture) maps to an
    /// all-zero pattern; `ln(0)` and the zero division are never evaluated.
    fn compress(&mut self) {
        let max_mag = self.diffraction.iter().cloned().fold(0.0f32, f32::max);
        if max_mag <= 0.0 {
            tracing::debug!("degenerate spectrum, emitting all-zero pattern");
            self.diffraction.fill(0.0);
            return;
        }

        let norm = (CONTRAST * max_mag + 1.0).ln();
        for value in self.diffraction.iter_mut() {
            *value = (CONTRAST * *value + 1.0).ln() / norm;
        }
        tracing::debug!(max_mag, "compressed diffraction pattern");
    }

    /// The rasterized aperture transmittance matrix (row-major).
    pub fn aperture_matrix(&self) -> &[f32] {
        &self.aperture
    }

    /// The normalized log-magnitude diffraction pattern (row-major).
    pub fn diffraction_matrix(&self) -> &[f32] {
        &self.diffraction
    }

    /// Subscribe to the per-recompute changed signal.
    pub fn subscribe<F: FnMut() + Send + 'static>(&mut self, listener: F) {
        self.notifier.subscribe(listener);
    }

    /// Revision counter: increments once per completed recompute.
    pub fn revision(&self) -> u64 {
        self.notifier.revision()
    }
}
