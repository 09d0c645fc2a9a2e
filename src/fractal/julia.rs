//! Escape-time kernels for the Julia set
//!
//! Each point iterates `z = z*z + c` until `|z|` reaches the escape radius
//! or the iteration cap is hit. Kernels differ only in how the magnitude
//! test is computed and whether points are spread across threads; for a
//! given input they all produce counts in input order.

use crate::error::{PerfLabError, Result};
use clap::ValueEnum;
use num_complex::Complex64;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Magnitude at which an orbit counts as escaped
pub const ESCAPE_RADIUS: f64 = 2.0;

/// Constant used by the regression fixture
pub const DEFAULT_C: Complex64 = Complex64::new(-0.62772, -0.42193);

/// Pixel width of the regression fixture
pub const DEFAULT_WIDTH: usize = 1000;

/// Iteration cap of the regression fixture
pub const DEFAULT_MAX_ITER: i64 = 300;

/// Sum of all counts for the regression fixture
pub const EXPECTED_SUM: u64 = 33_219_980;

/// Escape-time kernel implementation
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum JuliaKernel {
    /// Straightforward loop using the true modulus
    #[default]
    #[value(name = "baseline")]
    Baseline,
    /// Compares the squared modulus, skipping the square root
    #[value(name = "norm-squared")]
    NormSquared,
    /// Baseline predicate spread over a work-stealing pool
    #[value(name = "parallel")]
    Parallel,
}

impl JuliaKernel {
    /// Every kernel, baseline first
    pub const ALL: [JuliaKernel; 3] = [Self::Baseline, Self::NormSquared, Self::Parallel];

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::NormSquared => "norm-squared",
            Self::Parallel => "parallel",
        }
    }
}

impl std::fmt::Display for JuliaKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Validate an iteration cap and narrow it to a count
pub fn checked_max_iter(maxiter: i64) -> Result<u32> {
    if maxiter < 0 {
        return Err(PerfLabError::NegativeMaxIter(maxiter));
    }
    u32::try_from(maxiter).map_err(|_| PerfLabError::MaxIterOutOfRange(maxiter))
}

/// Iterations needed for a single orbit to escape
#[inline]
pub fn escape_time(z0: Complex64, c: Complex64, maxiter: u32) -> u32 {
    let mut z = z0;
    let mut n = 0;
    while z.norm() < ESCAPE_RADIUS && n < maxiter {
        z = z * z + c;
        n += 1;
    }
    n
}

#[inline]
fn escape_time_norm_sqr(z0: Complex64, c: Complex64, maxiter: u32) -> u32 {
    const RADIUS_SQR: f64 = ESCAPE_RADIUS * ESCAPE_RADIUS;

    let mut z = z0;
    let mut n = 0;
    while z.norm_sqr() < RADIUS_SQR && n < maxiter {
        z = z * z + c;
        n += 1;
    }
    n
}

/// Compute escape counts with the baseline kernel
///
/// `zs[i]` is paired with `cs[i]`; the result has one count per pair, each
/// in `[0, maxiter]`.
pub fn escape_counts(maxiter: i64, zs: &[Complex64], cs: &[Complex64]) -> Result<Vec<u32>> {
    escape_counts_with(JuliaKernel::Baseline, maxiter, zs, cs)
}

/// Compute escape counts with an explicit kernel
pub fn escape_counts_with(
    kernel: JuliaKernel,
    maxiter: i64,
    zs: &[Complex64],
    cs: &[Complex64],
) -> Result<Vec<u32>> {
    if zs.len() != cs.len() {
        return Err(PerfLabError::LengthMismatch {
            zs: zs.len(),
            cs: cs.len(),
        });
    }
    let maxiter = checked_max_iter(maxiter)?;

    tracing::debug!("Running {} kernel over {} points (maxiter {})", kernel, zs.len(), maxiter);

    let counts: Vec<u32> = match kernel {
        JuliaKernel::Baseline => zs
            .iter()
            .zip(cs)
            .map(|(&z, &c)| escape_time(z, c, maxiter))
            .collect(),
        JuliaKernel::NormSquared => zs
            .iter()
            .zip(cs)
            .map(|(&z, &c)| escape_time_norm_sqr(z, c, maxiter))
            .collect(),
        JuliaKernel::Parallel => zs
            .par_iter()
            .zip(cs.par_iter())
            .map(|(&z, &c)| escape_time(z, c, maxiter))
            .collect(),
    };

    Ok(counts)
}

/// Rectangular area of the complex plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Left edge (real axis)
    pub x1: f64,
    /// Right edge (real axis)
    pub x2: f64,
    /// Bottom edge (imaginary axis)
    pub y1: f64,
    /// Top edge (imaginary axis)
    pub y2: f64,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            x1: -1.8,
            x2: 1.8,
            y1: -1.8,
            y2: 1.8,
        }
    }
}

impl Region {
    /// Check that the region is finite and non-empty
    pub fn validate(&self) -> Result<()> {
        let edges = [self.x1, self.x2, self.y1, self.y2];
        if edges.iter().any(|v| !v.is_finite()) {
            return Err(PerfLabError::InvalidRegion(format!("non-finite bounds {:?}", self)));
        }
        if self.x1 >= self.x2 || self.y1 >= self.y2 {
            return Err(PerfLabError::InvalidRegion(format!(
                "empty area x=[{}, {}] y=[{}, {}]",
                self.x1, self.x2, self.y1, self.y2
            )));
        }
        Ok(())
    }
}

/// Index-aligned starting values and constants for a rectangular grid
#[derive(Debug, Clone)]
pub struct JuliaGrid {
    /// Starting values, row by row from the top edge
    pub zs: Vec<Complex64>,
    /// Per-point constants (all equal for a Julia set)
    pub cs: Vec<Complex64>,
    /// Points per row
    pub width: usize,
    /// Number of rows
    pub height: usize,
}

impl JuliaGrid {
    /// Expand a region into grid coordinates
    ///
    /// Coordinates are accumulated step by step from the edges rather than
    /// computed by multiplication, so the point set (and therefore the
    /// regression sum) matches the reference run bit for bit.
    pub fn generate(region: &Region, desired_width: usize, c: Complex64) -> Result<Self> {
        region.validate()?;
        if desired_width == 0 {
            return Err(PerfLabError::InvalidRegion("width must be at least 1".to_string()));
        }
        if !c.re.is_finite() || !c.im.is_finite() {
            return Err(PerfLabError::InvalidRegion(format!("non-finite constant {}", c)));
        }

        let x_step = (region.x2 - region.x1) / desired_width as f64;
        let y_step = (region.y1 - region.y2) / desired_width as f64;

        // Bound each axis; a step below the coordinate ulp would never advance
        let max_points = desired_width + 1;

        let mut ys = Vec::with_capacity(max_points);
        let mut ycoord = region.y2;
        while ycoord > region.y1 && ys.len() < max_points {
            ys.push(ycoord);
            ycoord += y_step;
        }

        let mut xs = Vec::with_capacity(max_points);
        let mut xcoord = region.x1;
        while xcoord < region.x2 && xs.len() < max_points {
            xs.push(xcoord);
            xcoord += x_step;
        }

        let len = xs.len() * ys.len();
        let mut zs = Vec::with_capacity(len);
        for &y in &ys {
            for &x in &xs {
                zs.push(Complex64::new(x, y));
            }
        }

        tracing::debug!("Generated {}x{} grid ({} points)", xs.len(), ys.len(), len);

        Ok(Self {
            zs,
            cs: vec![c; len],
            width: xs.len(),
            height: ys.len(),
        })
    }

    /// Regression fixture grid
    pub fn regression() -> Result<Self> {
        Self::generate(&Region::default(), DEFAULT_WIDTH, DEFAULT_C)
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.zs.len()
    }

    /// Check if the grid has no points
    pub fn is_empty(&self) -> bool {
        self.zs.is_empty()
    }

    /// Run a kernel over the whole grid
    pub fn escape_counts(&self, kernel: JuliaKernel, maxiter: i64) -> Result<Vec<u32>> {
        escape_counts_with(kernel, maxiter, &self.zs, &self.cs)
    }
}

/// Sum of all escape counts
pub fn checksum(counts: &[u32]) -> u64 {
    counts.iter().map(|&n| n as u64).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn origin() -> Complex64 {
        Complex64::new(0.0, 0.0)
    }

    #[test]
    fn test_bounded_orbit_hits_cap() {
        for kernel in JuliaKernel::ALL {
            let counts = escape_counts_with(kernel, 10, &[origin()], &[origin()]).unwrap();
            assert_eq!(counts, vec![10], "{}", kernel);
        }
    }

    #[test]
    fn test_already_escaped_point() {
        let z = Complex64::new(3.0, 0.0);
        for kernel in JuliaKernel::ALL {
            let counts = escape_counts_with(kernel, 10, &[z], &[origin()]).unwrap();
            assert_eq!(counts, vec![0], "{}", kernel);
        }
    }

    #[test]
    fn test_boundary_point_counts_as_escaped() {
        // |z| == 2 exactly is not inside the disc
        let z = Complex64::new(2.0, 0.0);
        assert_eq!(escape_counts(5, &[z], &[origin()]).unwrap(), vec![0]);
    }

    #[test]
    fn test_zero_maxiter() {
        let grid = JuliaGrid::generate(&Region::default(), 20, DEFAULT_C).unwrap();
        let counts = grid.escape_counts(JuliaKernel::Baseline, 0).unwrap();
        assert_eq!(counts.len(), grid.len());
        assert!(counts.iter().all(|&n| n == 0));
    }

    #[test]
    fn test_empty_input() {
        assert!(escape_counts(10, &[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_domain_errors() {
        let zs = [origin(), origin()];
        let cs = [origin()];

        assert!(matches!(
            escape_counts(10, &zs, &cs),
            Err(PerfLabError::LengthMismatch { zs: 2, cs: 1 })
        ));
        assert!(matches!(
            escape_counts(-1, &cs, &cs),
            Err(PerfLabError::NegativeMaxIter(-1))
        ));
        assert!(matches!(
            escape_counts(i64::from(u32::MAX) + 1, &cs, &cs),
            Err(PerfLabError::MaxIterOutOfRange(_))
        ));
    }

    #[test]
    fn test_grid_layout() {
        let region = Region { x1: -1.0, x2: 1.0, y1: -1.0, y2: 1.0 };
        let grid = JuliaGrid::generate(&region, 4, DEFAULT_C).unwrap();

        assert_eq!(grid.width, 4);
        assert_eq!(grid.height, 4);
        assert_eq!(grid.len(), 16);
        assert_eq!(grid.zs[0], Complex64::new(-1.0, 1.0));
        assert_eq!(grid.zs[1], Complex64::new(-0.5, 1.0));
        assert_eq!(grid.zs[4], Complex64::new(-1.0, 0.5));
        assert!(grid.cs.iter().all(|&c| c == DEFAULT_C));
    }

    #[test]
    fn test_invalid_regions() {
        let flipped = Region { x1: 1.0, x2: -1.0, ..Region::default() };
        assert!(JuliaGrid::generate(&flipped, 10, DEFAULT_C).is_err());

        let nan = Region { y1: f64::NAN, ..Region::default() };
        assert!(JuliaGrid::generate(&nan, 10, DEFAULT_C).is_err());

        assert!(JuliaGrid::generate(&Region::default(), 0, DEFAULT_C).is_err());
    }

    #[test]
    fn test_parallel_matches_baseline() {
        let grid = JuliaGrid::generate(&Region::default(), 100, DEFAULT_C).unwrap();
        let serial = grid.escape_counts(JuliaKernel::Baseline, 300).unwrap();
        let parallel = grid.escape_counts(JuliaKernel::Parallel, 300).unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_regression_sum() {
        let grid = JuliaGrid::regression().unwrap();
        assert_eq!(grid.width, DEFAULT_WIDTH);
        assert_eq!(grid.height, DEFAULT_WIDTH);

        for kernel in [JuliaKernel::Baseline, JuliaKernel::Parallel] {
            let counts = grid.escape_counts(kernel, DEFAULT_MAX_ITER).unwrap();
            assert_eq!(counts.len(), grid.len());
            assert_eq!(checksum(&counts), EXPECTED_SUM, "{}", kernel);
        }
    }

    proptest! {
        #[test]
        fn prop_counts_within_bounds(
            points in prop::collection::vec((-3.0f64..3.0, -3.0f64..3.0), 0..64),
            maxiter in 0i64..200,
        ) {
            let zs: Vec<Complex64> = points.iter().map(|&(re, im)| Complex64::new(re, im)).collect();
            let cs = vec![DEFAULT_C; zs.len()];

            let counts = escape_counts(maxiter, &zs, &cs).unwrap();
            prop_assert_eq!(counts.len(), zs.len());
            prop_assert!(counts.iter().all(|&n| i64::from(n) <= maxiter));
        }
    }
}
