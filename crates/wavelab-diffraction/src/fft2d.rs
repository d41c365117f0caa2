//! 2D discrete Fourier transform on square matrices.
//!
//! Built on rustfft: the 2D transform is a row pass followed by a column
//! pass with one planned FFT each way. Also provides the quadrant swap
//! ("FFT shift") that moves the zero-frequency term to the matrix center.

use std::sync::Arc;

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::{DiffractionError, Result};

/// Planned forward/inverse 2D FFT for `n x n` matrices.
pub struct Fft2d {
    n: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// Column staging buffer: rustfft transforms contiguous slices.
    column: Vec<Complex<f32>>,
}

impl Fft2d {
    /// Plan transforms for `n x n` matrices. `n` must be a power of two
    /// and at least 2.
    pub fn new(n: usize) -> Result<Self> {
        if n < 2 || !n.is_power_of_two() {
            return Err(DiffractionError::config(format!(
                "matrix size must be a power of 2 and >= 2, got {n}"
            )));
        }

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(n);
        let inverse = planner.plan_fft_inverse(n);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Ok(Self {
            n,
            forward,
            inverse,
            scratch: vec![Complex::default(); scratch_len],
            column: vec![Complex::default(); n],
        })
    }

    /// Matrix side length.
    pub fn size(&self) -> usize {
        self.n
    }

    /// In-place forward 2D DFT of a row-major `n x n` matrix.
    ///
    /// `data.len()` must be `n * n`; this is a programming error, not a
    /// runtime condition, so it is asserted.
    pub fn forward(&mut self, data: &mut [Complex<f32>]) {
        assert_eq!(data.len(), self.n * self.n, "matrix size mismatch");
        let fft = Arc::clone(&self.forward);
        self.pass_rows(&fft, data);
        self.pass_columns(&fft, data);
    }

    /// In-place inverse 2D DFT, normalized so that
    /// `inverse(forward(m)) == m` within floating-point tolerance.
    pub fn inverse(&mut self, data: &mut [Complex<f32>]) {
        assert_eq!(data.len(), self.n * self.n, "matrix size mismatch");
        let fft = Arc::clone(&self.inverse);
        self.pass_rows(&fft, data);
        self.pass_columns(&fft, data);

        // rustfft leaves inverse transforms unnormalized.
        let norm = 1.0 / (self.n * self.n) as f32;
        for value in data.iter_mut() {
            *value *= norm;
        }
    }

    fn pass_rows(&mut self, fft: &Arc<dyn Fft<f32>>, data: &mut [Complex<f32>]) {
        for row in data.chunks_exact_mut(self.n) {
            fft.process_with_scratch(row, &mut self.scratch);
        }
    }

    fn pass_columns(&mut self, fft: &Arc<dyn Fft<f32>>, data: &mut [Complex<f32>]) {
        for x in 0..self.n {
            for y in 0..self.n {
                self.column[y] = data[y * self.n + x];
            }
            fft.process_with_scratch(&mut self.column, &mut self.scratch);
            for y in 0..self.n {
                data[y * self.n + x] = self.column[y];
            }
        }
    }
}

/// Swap quadrants of a row-major `n x n` matrix so the zero-frequency term
/// lands at `(n/2, n/2)`. `n` must be even (guaranteed for power-of-two
/// transforms).
pub fn fft_shift<T: Copy>(data: &mut [T], n: usize) {
    assert_eq!(data.len(), n * n, "matrix size mismatch");
    debug_assert!(n % 2 == 0);

    let half = n / 2;
    for y in 0..half {
        for x in 0..half {
            let a = y * n + x;
            let b = (y + half) * n + (x + half);
            data.swap(a, b);

            let c = y * n + (x + half);
            let d = (y + half) * n + x;
            data.swap(c, d);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_validation() {
        assert!(Fft2d::new(0).is_err());
        assert!(Fft2d::new(1).is_err());
        assert!(Fft2d::new(100).is_err());
        assert!(Fft2d::new(64).is_ok());
    }

    #[test]
    fn test_dc_term_is_matrix_sum() {
        let n = 8;
        let mut fft = Fft2d::new(n).unwrap();
        let mut data = vec![Complex::new(1.0f32, 0.0); n * n];
        fft.forward(&mut data);

        // DC term of an all-ones matrix is n^2; everything else is zero.
        assert!((data[0].re - (n * n) as f32).abs() < 1e-3);
        assert!(data[1].norm() < 1e-3);
        assert!(data[n].norm() < 1e-3);
    }

    #[test]
    fn test_round_trip() {
        let n = 16;
        let mut fft = Fft2d::new(n).unwrap();

        let original: Vec<Complex<f32>> = (0..n * n)
            .map(|i| Complex::new((i % 7) as f32 * 0.3 - 1.0, 0.0))
            .collect();
        let mut data = original.clone();

        fft.forward(&mut data);
        fft.inverse(&mut data);

        for (got, want) in data.iter().zip(&original) {
            assert!((got - want).norm() < 1e-4, "round trip drifted: {got} vs {want}");
        }
    }

    #[test]
    fn test_fft_shift_centers_dc() {
        let n = 4;
        let mut data = vec![0.0f32; n * n];
        data[0] = 42.0;

        fft_shift(&mut data, n);
        assert_eq!(data[(n / 2) * n + n / 2], 42.0);
        assert_eq!(data[0], 0.0);
    }

    #[test]
    fn test_fft_shift_involution() {
        let n = 8;
        let original: Vec<f32> = (0..n * n).map(|i| i as f32).collect();
        let mut data = original.clone();

        fft_shift(&mut data, n);
        assert_ne!(data, original);
        fft_shift(&mut data, n);
        assert_eq!(data, original);
    }
}
