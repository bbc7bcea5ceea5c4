//! Newton-Raphson solution of Kepler's equation `E - e·sin(E) = M`.

use num_traits::{Float, FloatConst};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PRECISION_DIGITS: u32 = 5;
pub const DEFAULT_MAX_ITERATIONS: u32 = 20;

/// At or above this eccentricity the iteration is seeded with π instead of M.
pub const HIGH_ECCENTRICITY: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Convergence tolerance is `10^-precision_digits`.
    pub precision_digits: u32,
    /// Hard cap on Newton steps. Reaching it is not an error.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            precision_digits: DEFAULT_PRECISION_DIGITS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    pub fn new(precision_digits: u32, max_iterations: u32) -> Self {
        Self {
            precision_digits,
            max_iterations,
        }
    }

    #[inline]
    pub fn tolerance<T: Float>(&self) -> T {
        let digits = i32::try_from(self.precision_digits).unwrap_or(i32::MAX);
        lit(10f64.powi(-digits))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeplerSolution<T> {
    pub eccentric_anomaly: T,
    /// `E - e·sin(E) - M` at the returned `E`.
    pub residual: T,
    pub iterations: u32,
    pub converged: bool,
}

#[inline]
fn lit<T: Float>(v: f64) -> T {
    T::from(v).unwrap_or_else(T::nan)
}

#[inline]
pub fn initial_guess<T: Float + FloatConst>(mean_anomaly: T, eccentricity: T) -> T {
    if eccentricity < lit(HIGH_ECCENTRICITY) {
        mean_anomaly
    } else {
        T::PI()
    }
}

/// Solves for the eccentric anomaly, reporting how the iteration ended.
///
/// `mean_anomaly` is in radians and need not be reduced to `[0, 2π)`.
/// `eccentricity` must be in `[0, 1)`; callers validate that before getting
/// here. The result is always a value: when the iteration cap is hit the last
/// estimate is returned with `converged == false`.
pub fn solve<T: Float + FloatConst>(
    mean_anomaly: T,
    eccentricity: T,
    config: &SolverConfig,
) -> KeplerSolution<T> {
    let tolerance = config.tolerance::<T>();
    let residual_at = |ea: T| ea - eccentricity * ea.sin() - mean_anomaly;

    let mut eccentric_anomaly = initial_guess(mean_anomaly, eccentricity);
    let mut residual = residual_at(eccentric_anomaly);
    let mut iterations = 0;

    while residual.abs() > tolerance && iterations < config.max_iterations {
        let f_prime = T::one() - eccentricity * eccentric_anomaly.cos();
        eccentric_anomaly = eccentric_anomaly - residual / f_prime;
        residual = residual_at(eccentric_anomaly);
        iterations += 1;
    }

    let converged = residual.abs() <= tolerance;
    if !converged {
        log::trace!(
            "kepler solver stopped after {} iterations (M = {:?}, e = {:?}, residual = {:?})",
            iterations,
            mean_anomaly.to_f64(),
            eccentricity.to_f64(),
            residual.to_f64(),
        );
    }

    KeplerSolution {
        eccentric_anomaly,
        residual,
        iterations,
        converged,
    }
}

#[inline]
pub fn eccentric_anomaly<T: Float + FloatConst>(
    mean_anomaly: T,
    eccentricity: T,
    config: &SolverConfig,
) -> T {
    solve(mean_anomaly, eccentricity, config).eccentric_anomaly
}
