//! # wavelab-diffraction
//!
//! Far-field diffraction patterns from configurable apertures.
//!
//! ## Pipeline
//!
//! ```text
//! ApertureGeometry -> rasterize -> Aperture Matrix (transmittance, [0,1])
//!                  -> 2D FFT -> FFT shift -> |.| -> log compression
//!                  -> Diffraction Matrix ([0,1], DC centered)
//! ```
//!
//! Under the Fraunhofer approximation the far-field pattern is the Fourier
//! transform of the aperture's transmittance function; the quadrant swap
//! puts the zero-frequency term at the matrix center and the log
//! compression makes the faint outer fringes visible next to the bright
//! central peak.
//!
//! The whole pipeline reruns on every parameter change; nothing is cached
//! between recomputes. A "changed" signal fires once per completed
//! recompute. Independent of the lattice wave solver.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aperture;
pub mod engine;
pub mod error;
pub mod fft2d;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::aperture::ApertureGeometry;
    pub use crate::engine::{DiffractionEngine, CONTRAST, DEFAULT_MATRIX_SIZE};
    pub use crate::error::{DiffractionError, Result};
    pub use crate::fft2d::{fft_shift, Fft2d};
}

pub use aperture::ApertureGeometry;
pub use engine::{DiffractionEngine, CONTRAST, DEFAULT_MATRIX_SIZE};
pub use error::{DiffractionError, Result};
pub use fft2d::{fft_shift, Fft2d};
