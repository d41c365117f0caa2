//! Aperture geometry and rasterization.
//!
//! Geometry parameters arrive verbatim from the scene (matrix-pixel units,
//! centered on the matrix) and are painted into an `n x n` transmittance
//! matrix in `[0, 1]`, anti-aliased by 2x2 supersampling. A degenerate
//! geometry simply rasterizes to an all-zero (opaque) matrix; the engine's
//! compression stage handles that case.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Sub-pixel sample offsets for 2x2 supersampling.
const SAMPLE_OFFSETS: [(f32, f32); 4] = [(-0.25, -0.25), (0.25, -0.25), (-0.25, 0.25), (0.25, 0.25)];

/// Aperture shapes selectable in the diffraction scene.
///
/// All dimensions are in matrix pixels; every shape is centered on the
/// matrix center. Rotations are in radians, counter-clockwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApertureGeometry {
    /// Axis-aligned ellipse, optionally rotated.
    Ellipse {
        /// Semi-axis along x before rotation.
        radius_x: f32,
        /// Semi-axis along y before rotation.
        radius_y: f32,
        /// Rotation in radians.
        rotation: f32,
    },
    /// Rectangle, optionally rotated.
    Rectangle {
        /// Half-extent along x before rotation.
        half_width: f32,
        /// Half-extent along y before rotation.
        half_height: f32,
        /// Rotation in radians.
        rotation: f32,
    },
    /// An array of parallel full-height slits (two for the classic
    /// double-slit experiment).
    Slits {
        /// Number of slits.
        count: usize,
        /// Width of each slit.
        slit_width: f32,
        /// Center-to-center spacing between adjacent slits.
        spacing: f32,
        /// Rotation of the whole array in radians.
        rotation: f32,
    },
    /// A rows x cols lattice of circular holes with positional disorder.
    DisorderedLattice {
        /// Lattice rows.
        rows: usize,
        /// Lattice columns.
        cols: usize,
        /// Radius of each hole.
        hole_radius: f32,
        /// Lattice pitch.
        spacing: f32,
        /// Maximum per-axis positional jitter.
        jitter: f32,
        /// Seed for the jitter; equal seeds give identical masks.
        seed: u64,
    },
    /// An arbitrary grayscale silhouette sampled onto the matrix.
    Silhouette {
        /// Image width in pixels.
        width: usize,
        /// Image height in pixels.
        height: usize,
        /// Row-major transmittance samples in `[0, 1]`, `width * height`
        /// entries.
        pixels: Vec<f32>,
        /// Matrix pixels per image pixel.
        scale: f32,
    },
}

impl ApertureGeometry {
    /// Paint this geometry into an `n x n` row-major transmittance matrix.
    pub fn rasterize(&self, n: usize) -> Vec<f32> {
        // Hole centers are computed once; everything else is a pure
        // point-in-shape query per supersample.
        let holes = match self {
            Self::DisorderedLattice {
                rows,
                cols,
                spacing,
                jitter,
                seed,
                ..
            } => jittered_centers(*rows, *cols, *spacing, *jitter, *seed),
            _ => Vec::new(),
        };

        let center = n as f32 / 2.0;
        let mut matrix = vec![0.0f32; n * n];

        for row in 0..n {
            let y = row as f32 + 0.5 - center;
            for col in 0..n {
                let x = col as f32 + 0.5 - center;
                let mut coverage = 0.0;
                for (dx, dy) in SAMPLE_OFFSETS {
                    coverage += self.sample(x + dx, y + dy, &holes);
                }
                matrix[row * n + col] = coverage / SAMPLE_OFFSETS.len() as f32;
            }
        }
        matrix
    }

    /// Transmittance at one continuous point (matrix-centered coordinates).
    fn sample(&self, x: f32, y: f32, holes: &[(f32, f32)]) -> f32 {
        match *self {
            Self::Ellipse {
                radius_x,
                radius_y,
                rotation,
            } => {
                if radius_x <= 0.0 || radius_y <= 0.0 {
                    return 0.0;
                }
                let (xr, yr) = rotate(x, y, -rotation);
                let u = xr / radius_x;
                let v = yr / radius_y;
                if u * u + v * v <= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Rectangle {
                half_width,
                half_height,
                rotation,
            } => {
                let (xr, yr) = rotate(x, y, -rotation);
                if xr.abs() <= half_width && yr.abs() <= half_height {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Slits {
                count,
                slit_width,
                spacing,
                rotation,
            } => {
                if count == 0 || slit_width <= 0.0 {
                    return 0.0;
                }
                let (xr, _) = rotate(x, y, -rotation);
                let half = slit_width / 2.0;
                let offset = (count as f32 - 1.0) / 2.0;
                for k in 0..count {
                    let slit_center = (k as f32 - offset) * spacing;
                    if (xr - slit_center).abs() <= half {
                        return 1.0;
                    }
                }
                0.0
            }
            Self::DisorderedLattice { hole_radius, .. } => {
                if hole_radius <= 0.0 {
                    return 0.0;
                }
                let r2 = hole_radius * hole_radius;
                for &(cx, cy) in holes {
                    let dx = x - cx;
                    let dy = y - cy;
                    if dx * dx + dy * dy <= r2 {
                        return 1.0;
                    }
                }
                0.0
            }
            Self::Silhouette {
                width,
                height,
                ref pixels,
                scale,
            } => {
                if scale <= 0.0 || width == 0 || height == 0 {
                    return 0.0;
                }
                let u = x / scale + width as f32 / 2.0 - 0.5;
                let v = y / scale + height as f32 / 2.0 - 0.5;
                bilinear(pixels, width, height, u, v)
            }
        }
    }
}

/// Rotate a point counter-clockwise by `angle` radians.
#[inline]
fn rotate(x: f32, y: f32, angle: f32) -> (f32, f32) {
    if angle == 0.0 {
        return (x, y);
    }
    let (sin, cos) = angle.sin_cos();
    (x * cos - y * sin, x * sin + y * cos)
}

/// Hole centers for the disordered lattice, jittered by a seeded RNG so a
/// given seed always rasterizes the same mask.
fn jittered_centers(rows: usize, cols: usize, spacing: f32, jitter: f32, seed: u64) -> Vec<(f32, f32)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let row_offset = (rows as f32 - 1.0) / 2.0;
    let col_offset = (cols as f32 - 1.0) / 2.0;

    let mut centers = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let mut cx = (col as f32 - col_offset) * spacing;
            let mut cy = (row as f32 - row_offset) * spacing;
            if jitter > 0.0 {
                cx += rng.gen_range(-jitter..=jitter);
                cy += rng.gen_range(-jitter..=jitter);
            }
            centers.push((cx, cy));
        }
    }
    centers
}

/// Bilinear sample of a row-major grayscale image; outside the image the
/// silhouette is opaque (0).
fn bilinear(pixels: &[f32], width: usize, height: usize, u: f32, v: f32) -> f32 {
    let fetch = |ix: i64, iy: i64| -> f32 {
        if ix < 0 || iy < 0 || ix >= width as i64 || iy >= height as i64 {
            0.0
        } else {
            pixels[iy as usize * width + ix as usize]
        }
    };

    let x0 = u.floor();
    let y0 = v.floor();
    let tx = u - x0;
    let ty = v - y0;
    let ix = x0 as i64;
    let iy = y0 as i64;

    let top = fetch(ix, iy) * (1.0 - tx) + fetch(ix + 1, iy) * tx;
    let bottom = fetch(ix, iy + 1) * (1.0 - tx) + fetch(ix + 1, iy + 1) * tx;
    top * (1.0 - ty) + bottom * ty
}
