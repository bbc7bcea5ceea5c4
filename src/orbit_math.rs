// Modified from https://github.com/atbentley/bevy_mod_orbits
// MIT licensed by atbentley <Andrew Bentley>

//! Orbital elements + mean anomaly -> Cartesian position.

use std::f64::consts::TAU;

use num_traits::{Float, FloatConst};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::elements::OrbitalElements;
use crate::kepler::{self, SolverConfig};
use crate::vec3::Vec3;

/// Samples in a traced orbit path, one per degree of mean anomaly.
pub const PATH_SAMPLES: usize = 360;

#[inline]
pub fn calculate_mean_anomaly(
    degrees_per_unit: f64,
    elapsed: f64,
    initial_mean_anomaly: f64,
) -> f64 {
    (initial_mean_anomaly + (degrees_per_unit * elapsed).to_radians()).rem_euclid(TAU)
}

#[inline]
pub fn calculate_true_anomaly<T: Float>(eccentricity: T, eccentric_anomaly: T) -> T {
    let e = eccentricity;
    let numerator = (T::one() - e * e).sqrt() * eccentric_anomaly.sin();
    let denominator = eccentric_anomaly.cos() - e;
    numerator.atan2(denominator)
}

#[inline]
pub fn calculate_focal_radius<T: Float>(semi_major_axis: T, eccentricity: T, true_anomaly: T) -> T {
    let semilatus_rectum = semi_major_axis * (T::one() - eccentricity * eccentricity);
    semilatus_rectum / (T::one() + eccentricity * true_anomaly.cos())
}

/// All angles in radians.
#[inline]
pub fn calculate_position<T: Float>(
    true_anomaly: T,
    focal_radius: T,
    ascending_longitude: T,
    perihelion_longitude: T,
    inclination: T,
    scale: T,
) -> Vec3<T> {
    let (sin_n, cos_n) = ascending_longitude.sin_cos();
    let (sin_u, cos_u) = (true_anomaly + perihelion_longitude).sin_cos();
    let (sin_i, cos_i) = inclination.sin_cos();
    let r = scale * focal_radius;

    Vec3::new(
        r * (cos_n * cos_u - sin_n * sin_u) * cos_i,
        r * sin_u * sin_i,
        r * (sin_n * cos_u + cos_n * sin_u) * cos_i,
    )
}

/// Every intermediate of one evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitSample {
    pub mean_anomaly: f64,
    pub eccentric_anomaly: f64,
    pub true_anomaly: f64,
    pub focal_radius: f64,
    pub position: Vec3<f64>,
}

/// Stateless element -> position mapping.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitEvaluator {
    pub solver: SolverConfig,
    /// Applied uniformly to every position.
    pub scale: f64,
}

impl Default for OrbitEvaluator {
    fn default() -> Self {
        Self::new(SolverConfig::default(), 1.0)
    }
}

impl OrbitEvaluator {
    pub fn new(solver: SolverConfig, scale: f64) -> Self {
        Self { solver, scale }
    }

    pub fn with_scale(self, scale: f64) -> Self {
        Self { scale, ..self }
    }

    pub fn evaluate(&self, elements: &OrbitalElements, mean_anomaly: f64) -> OrbitSample {
        self.evaluate_scaled(elements, mean_anomaly, self.scale)
    }

    fn evaluate_scaled(&self, elements: &OrbitalElements, mean_anomaly: f64, scale: f64) -> OrbitSample {
        let e = elements.eccentricity();
        let eccentric_anomaly = kepler::eccentric_anomaly(mean_anomaly, e, &self.solver);
        let true_anomaly = calculate_true_anomaly(e, eccentric_anomaly);
        let focal_radius = calculate_focal_radius(elements.semi_major_axis(), e, true_anomaly);
        let position = calculate_position(
            true_anomaly,
            focal_radius,
            elements.ascending_longitude_rad(),
            elements.perihelion_longitude_rad(),
            elements.inclination_rad(),
            scale,
        );

        OrbitSample {
            mean_anomaly,
            eccentric_anomaly,
            true_anomaly,
            focal_radius,
            position,
        }
    }

    /// Position in the orbit's parent frame, `mean_anomaly` in radians.
    #[inline]
    pub fn position(&self, elements: &OrbitalElements, mean_anomaly: f64) -> Vec3<f64> {
        self.evaluate(elements, mean_anomaly).position
    }

    #[inline]
    pub fn position_with_scale(
        &self,
        elements: &OrbitalElements,
        mean_anomaly: f64,
        scale: f64,
    ) -> Vec3<f64> {
        self.evaluate_scaled(elements, mean_anomaly, scale).position
    }

    /// One point per degree of mean anomaly over a full revolution, 360°
    /// itself excluded. Render as a closed loop.
    pub fn sample_path(&self, elements: &OrbitalElements) -> Vec<Vec3<f64>> {
        (0..PATH_SAMPLES)
            .map(|degree| self.position(elements, (degree as f64).to_radians()))
            .collect()
    }

    /// Same points as [`Self::sample_path`], computed across the rayon pool.
    pub fn sample_path_par(&self, elements: &OrbitalElements) -> Vec<Vec3<f64>> {
        (0..PATH_SAMPLES)
            .into_par_iter()
            .map(|degree| self.position(elements, (degree as f64).to_radians()))
            .collect()
    }
}

/// Fixed orientation of an orbit's frame: inclination about the forward (+Z)
/// axis, then ascending-node longitude about the frame's own, already tilted,
/// up axis. That is `Rz(i)·Ry(Ω)`.
///
/// Built once per body at setup. The viewer uses it to orient a body's proxy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitFrame {
    /// Row-major.
    rows: [[f64; 3]; 3],
}

impl Default for OrbitFrame {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl OrbitFrame {
    pub const IDENTITY: Self = Self {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    pub fn from_elements(elements: &OrbitalElements) -> Self {
        Self::from_angles(elements.inclination_rad(), elements.ascending_longitude_rad())
    }

    pub fn from_angles(inclination: f64, ascending_longitude: f64) -> Self {
        let (si, ci) = inclination.sin_cos();
        let (sn, cn) = ascending_longitude.sin_cos();

        let about_forward = [[ci, -si, 0.0], [si, ci, 0.0], [0.0, 0.0, 1.0]];
        let about_up = [[cn, 0.0, sn], [0.0, 1.0, 0.0], [-sn, 0.0, cn]];

        Self {
            rows: mat_mul(&about_forward, &about_up),
        }
    }

    pub fn rotate(&self, v: Vec3<f64>) -> Vec3<f64> {
        let [a, b, c] = self.rows;
        let v_arr = v.to_array();
        Vec3::new(dot(&a, &v_arr), dot(&b, &v_arr), dot(&c, &v_arr))
    }

    pub fn rows(&self) -> [[f64; 3]; 3] {
        self.rows
    }

    /// Column-major, the layout glam's `from_cols_array_2d` expects.
    pub fn to_cols_array_2d(&self) -> [[f64; 3]; 3] {
        std::array::from_fn(|col| std::array::from_fn(|row| self.rows[row][col]))
    }
}

#[inline]
fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn mat_mul(lhs: &[[f64; 3]; 3], rhs: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    std::array::from_fn(|row| {
        std::array::from_fn(|col| (0..3).map(|k| lhs[row][k] * rhs[k][col]).sum::<f64>())
    })
}

/// [`OrbitEvaluator::position`] over raw element values of any float type,
/// angles in radians.
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn position_from_mean_anomaly<T: Float + FloatConst>(
    semi_major_axis: T,
    eccentricity: T,
    ascending_longitude: T,
    perihelion_longitude: T,
    inclination: T,
    mean_anomaly: T,
    scale: T,
    solver: &SolverConfig,
) -> Vec3<T> {
    let eccentric_anomaly = kepler::eccentric_anomaly(mean_anomaly, eccentricity, solver);
    let true_anomaly = calculate_true_anomaly(eccentricity, eccentric_anomaly);
    let focal_radius = calculate_focal_radius(semi_major_axis, eccentricity, true_anomaly);
    calculate_position(
        true_anomaly,
        focal_radius,
        ascending_longitude,
        perihelion_longitude,
        inclination,
        scale,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn flat_earth() -> OrbitalElements {
        OrbitalElements::new("Earth", 1.0, 0.0167, 0.0, 0.0, 0.0, 0.0).unwrap()
    }

    #[test]
    fn earth_perihelion_and_aphelion_distances() {
        let evaluator = OrbitEvaluator::default();
        let earth = flat_earth();

        let perihelion = evaluator.position(&earth, 0.0);
        assert_relative_eq!(perihelion.length(), 0.9833, epsilon = 1e-9);
        // Zero true anomaly lies along +X.
        assert_relative_eq!(perihelion.x, 0.9833, epsilon = 1e-9);

        let aphelion = evaluator.position(&earth, PI);
        assert_relative_eq!(aphelion.length(), 1.0167, epsilon = 1e-9);
        assert_relative_eq!(aphelion.x, -1.0167, epsilon = 1e-9);
    }

    #[test]
    fn focal_radius_at_apsides() {
        for (a, e) in [(1.0, 0.0), (1.0, 0.0167), (5.2, 0.048), (39.5, 0.25), (2.0, 0.9)] {
            assert_relative_eq!(calculate_focal_radius(a, e, 0.0), a * (1.0 - e), epsilon = 1e-12);
            assert_relative_eq!(calculate_focal_radius(a, e, PI), a * (1.0 + e), epsilon = 1e-9);
        }
    }

    #[test]
    fn circular_orbit_keeps_constant_radius() {
        let evaluator = OrbitEvaluator::default();
        let flat = OrbitalElements::new("flat", 3.0, 0.0, 0.0, 20.0, 75.0, 0.0).unwrap();
        let tilted = OrbitalElements::new("tilted", 3.0, 0.0, 30.0, 20.0, 75.0, 0.0).unwrap();

        for step in 0..36 {
            let m = (step as f64 * 10.0).to_radians();
            assert_relative_eq!(evaluator.position(&flat, m).length(), 3.0, epsilon = 1e-12);
            assert_relative_eq!(evaluator.evaluate(&tilted, m).focal_radius, 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn true_anomaly_keeps_its_quadrant() {
        let e = 0.5;
        for step in 1..36 {
            let ea = step as f64 * 10.0_f64.to_radians();
            let ta = calculate_true_anomaly(e, ea);
            // Both anomalies sit on the same side of the apsidal line.
            assert_eq!(ta.sin().signum(), ea.sin().signum(), "E = {ea}");
        }
        assert_relative_eq!(calculate_true_anomaly(e, PI), PI, epsilon = 1e-12);
        assert_relative_eq!(calculate_true_anomaly(0.0, FRAC_PI_2), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn inclination_moves_the_orbit_out_of_plane() {
        let evaluator = OrbitEvaluator::default();
        let polar = OrbitalElements::new("polar", 1.0, 0.0, 90.0, 0.0, 0.0, 0.0).unwrap();

        let quarter = evaluator.position(&polar, FRAC_PI_2);
        assert_relative_eq!(quarter.y, 1.0, epsilon = 1e-12);
        assert!(quarter.x.abs() < 1e-12 && quarter.z.abs() < 1e-12);
    }

    #[test]
    fn scale_multiplies_every_component() {
        let evaluator = OrbitEvaluator::default();
        let orbit = OrbitalElements::new("x", 1.52, 0.093, 1.85, 49.56, 336.04, 355.45).unwrap();

        let unit = evaluator.position(&orbit, 1.0);
        let scaled = evaluator.with_scale(10.0).position(&orbit, 1.0);
        assert_relative_eq!(scaled.x, unit.x * 10.0, epsilon = 1e-12);
        assert_relative_eq!(scaled.y, unit.y * 10.0, epsilon = 1e-12);
        assert_relative_eq!(scaled.z, unit.z * 10.0, epsilon = 1e-12);
        assert_eq!(evaluator.position_with_scale(&orbit, 1.0, 10.0), scaled);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let evaluator = OrbitEvaluator::default();
        let orbit = OrbitalElements::new("x", 30.1, 0.0086, 1.77, 131.78, 44.97, 304.88).unwrap();
        assert_eq!(evaluator.evaluate(&orbit, 2.5), evaluator.evaluate(&orbit, 2.5));
    }

    #[test]
    fn path_has_360_distinct_neighbours() {
        let evaluator = OrbitEvaluator::default();
        for orbit in [
            flat_earth(),
            OrbitalElements::new("x", 0.387, 0.2056, 7.0, 48.33, 77.45, 252.25).unwrap(),
            OrbitalElements::new("y", 17.8, 0.967, 162.3, 58.4, 111.3, 0.0).unwrap(),
        ] {
            let path = evaluator.sample_path(&orbit);
            assert_eq!(path.len(), PATH_SAMPLES);
            for (i, point) in path.iter().enumerate() {
                let next = path[(i + 1) % path.len()];
                assert!(point.distance(next) > 0.0, "{}: samples {i} and next coincide", orbit.name());
                assert!(point.is_finite());
            }
            assert_eq!(path[0], evaluator.position(&orbit, 0.0));
        }
    }

    #[test]
    fn parallel_path_matches_sequential() {
        let evaluator = OrbitEvaluator::default().with_scale(2.0);
        let orbit = OrbitalElements::new("x", 5.2, 0.048, 1.3, 100.5, 14.75, 34.4).unwrap();
        assert_eq!(evaluator.sample_path(&orbit), evaluator.sample_path_par(&orbit));
    }

    #[test]
    fn generic_position_matches_evaluator() {
        let orbit = OrbitalElements::new("x", 9.5, 0.054, 2.49, 113.7, 92.6, 49.9).unwrap();
        let evaluator = OrbitEvaluator::default();
        let generic = position_from_mean_anomaly(
            orbit.semi_major_axis(),
            orbit.eccentricity(),
            orbit.ascending_longitude_rad(),
            orbit.perihelion_longitude_rad(),
            orbit.inclination_rad(),
            0.7,
            1.0,
            &evaluator.solver,
        );
        assert_eq!(generic, evaluator.position(&orbit, 0.7));

        let single = position_from_mean_anomaly(9.5_f32, 0.054, 1.98, 1.62, 0.0435, 0.7, 1.0, &evaluator.solver);
        assert!((single.length() - generic.length() as f32).abs() < 1e-2);
    }

    #[test]
    fn mean_anomaly_from_elapsed_time() {
        assert_relative_eq!(calculate_mean_anomaly(50.0, 1.8, 0.0), FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(calculate_mean_anomaly(50.0, 3.6, 0.0), PI, epsilon = 1e-12);
        assert_relative_eq!(calculate_mean_anomaly(90.0, 1.0, PI), 1.5 * PI, epsilon = 1e-12);
        let wrapped = calculate_mean_anomaly(360.0, 3.25, 0.0);
        assert!((0.0..TAU).contains(&wrapped));
    }

    #[test]
    fn frame_rotation() {
        let identity = OrbitFrame::from_angles(0.0, 0.0);
        let v = Vec3::new(0.3, -1.2, 4.0);
        assert_eq!(identity.rotate(v), v);

        let tilted = OrbitFrame::from_angles(FRAC_PI_2, 0.0);
        let x = tilted.rotate(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(x.y, 1.0, epsilon = 1e-12);

        let turned = OrbitFrame::from_angles(0.0, FRAC_PI_2);
        let x = turned.rotate(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(x.z, -1.0, epsilon = 1e-12);

        let frame = OrbitFrame::from_angles(0.4, 2.1);
        assert_relative_eq!(frame.rotate(v).length(), v.length(), epsilon = 1e-12);

        let cols = frame.to_cols_array_2d();
        let rows = frame.rows();
        assert_eq!(cols[0][1], rows[1][0]);
        assert_eq!(cols[2][0], rows[0][2]);
    }

    #[test]
    fn node_turns_about_the_tilted_up_axis() {
        let frame = OrbitFrame::from_angles(FRAC_PI_2, FRAC_PI_2);

        // Turning about local up first sends +X to -Z, which the tilt leaves alone.
        let x = frame.rotate(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(x.z, -1.0, epsilon = 1e-12);
        assert!(x.x.abs() < 1e-12 && x.y.abs() < 1e-12);

        // Local up ends up along world -X after the tilt.
        let up = frame.rotate(Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(up.x, -1.0, epsilon = 1e-12);

        let frame = OrbitFrame::from_angles(0.3, 1.1);
        let (si, ci) = 0.3_f64.sin_cos();
        let (sn, cn) = 1.1_f64.sin_cos();
        let rotated = frame.rotate(Vec3::new(1.0, 0.0, 0.0));
        // Rz(i)·(cos Ω, 0, -sin Ω)
        assert_relative_eq!(rotated.x, ci * cn, epsilon = 1e-12);
        assert_relative_eq!(rotated.y, si * cn, epsilon = 1e-12);
        assert_relative_eq!(rotated.z, -sn, epsilon = 1e-12);
    }
}
