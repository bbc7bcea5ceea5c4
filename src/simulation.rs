//! Time bookkeeping around the stateless evaluator.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::OrbitCatalog;
use crate::elements::OrbitalElements;
use crate::orbit_math::{calculate_mean_anomaly, OrbitEvaluator};
use crate::vec3::Vec3;

pub const DEFAULT_DEGREES_PER_UNIT: f64 = 50.0;

/// How fast each body sweeps mean anomaly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum SpeedModel {
    /// Every body moves at the same angular rate.
    Uniform { degrees_per_unit: f64 },
    /// `degrees_per_unit` is the rate at `a = 1`; other bodies scale with `a^-1.5`.
    Kepler { degrees_per_unit: f64 },
}

impl Default for SpeedModel {
    fn default() -> Self {
        SpeedModel::Uniform {
            degrees_per_unit: DEFAULT_DEGREES_PER_UNIT,
        }
    }
}

impl SpeedModel {
    /// Degrees of mean anomaly per unit of simulated time.
    pub fn speed_for(&self, elements: &OrbitalElements) -> f64 {
        match *self {
            SpeedModel::Uniform { degrees_per_unit } => degrees_per_unit,
            SpeedModel::Kepler { degrees_per_unit } => degrees_per_unit / elements.period_years(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub speed: SpeedModel,
    /// Start each body at `L - ϖ` instead of perihelion.
    pub use_epoch_phase: bool,
}

/// Per-body runtime state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrbitState {
    pub elapsed: f64,
    /// Degrees per unit time.
    pub speed: f64,
    /// Radians.
    pub initial_mean_anomaly: f64,
}

impl OrbitState {
    /// Radians, in `[0, 2π)`.
    #[inline]
    pub fn mean_anomaly(&self) -> f64 {
        calculate_mean_anomaly(self.speed, self.elapsed, self.initial_mean_anomaly)
    }
}

pub struct Simulation {
    catalog: OrbitCatalog,
    evaluator: OrbitEvaluator,
    states: Vec<OrbitState>,
    elapsed: f64,
}

impl Simulation {
    pub fn new(catalog: OrbitCatalog, evaluator: OrbitEvaluator, config: &SimulationConfig) -> Self {
        let states = catalog
            .iter()
            .map(|elements| OrbitState {
                elapsed: 0.0,
                speed: config.speed.speed_for(elements),
                initial_mean_anomaly: if config.use_epoch_phase {
                    elements.mean_anomaly_at_epoch()
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            catalog,
            evaluator,
            states,
            elapsed: 0.0,
        }
    }

    pub fn catalog(&self) -> &OrbitCatalog {
        &self.catalog
    }

    pub fn evaluator(&self) -> &OrbitEvaluator {
        &self.evaluator
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.evaluator.scale = scale;
    }

    pub fn states(&self) -> &[OrbitState] {
        &self.states
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn advance(&mut self, dt: f64) {
        self.set_elapsed(self.elapsed + dt);
    }

    pub fn set_elapsed(&mut self, elapsed: f64) {
        self.elapsed = elapsed;
        for state in &mut self.states {
            state.elapsed = elapsed;
        }
    }

    /// Current position of every body, in catalog order.
    pub fn positions(&self) -> Vec<Vec3<f64>> {
        self.catalog
            .as_slice()
            .par_iter()
            .zip(self.states.par_iter())
            .map(|(elements, state)| self.evaluator.position(elements, state.mean_anomaly()))
            .collect()
    }

    pub fn position_of(&self, name: &str) -> Option<Vec3<f64>> {
        let index = self.catalog.index_of(name)?;
        let state = &self.states[index];
        Some(self.evaluator.position(&self.catalog.as_slice()[index], state.mean_anomaly()))
    }

    /// Path samples for every body, in catalog order.
    pub fn paths(&self) -> Vec<Vec<Vec3<f64>>> {
        self.catalog
            .as_slice()
            .par_iter()
            .map(|elements| self.evaluator.sample_path(elements))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbit_math::PATH_SAMPLES;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn catalog() -> OrbitCatalog {
        OrbitCatalog::new(vec![
            OrbitalElements::new("Ring", 1.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap(),
            OrbitalElements::new("Mars", 1.523, 0.0934, 1.85, 49.56, 336.04, 355.45).unwrap(),
            OrbitalElements::new("Far", 4.0, 0.0, 0.0, 0.0, 10.0, 100.0).unwrap(),
        ])
    }

    #[test]
    fn uniform_speed_sweeps_fifty_degrees_per_unit() {
        let mut sim = Simulation::new(catalog(), OrbitEvaluator::default(), &SimulationConfig::default());
        sim.set_elapsed(1.8);

        assert_relative_eq!(sim.states()[0].mean_anomaly(), FRAC_PI_2, epsilon = 1e-12);
        let ring = sim.position_of("Ring").unwrap();
        assert_relative_eq!(ring.z, 1.0, epsilon = 1e-9);
        assert!(ring.x.abs() < 1e-9);
    }

    #[test]
    fn kepler_speed_slows_outer_bodies() {
        let config = SimulationConfig {
            speed: SpeedModel::Kepler { degrees_per_unit: 40.0 },
            use_epoch_phase: false,
        };
        let sim = Simulation::new(catalog(), OrbitEvaluator::default(), &config);

        assert_relative_eq!(sim.states()[0].speed, 40.0, epsilon = 1e-12);
        // a = 4 gives an 8 year period.
        assert_relative_eq!(sim.states()[2].speed, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn epoch_phase_starts_at_mean_longitude_minus_perihelion() {
        let config = SimulationConfig {
            use_epoch_phase: true,
            ..Default::default()
        };
        let sim = Simulation::new(catalog(), OrbitEvaluator::default(), &config);
        assert_relative_eq!(sim.states()[2].mean_anomaly(), FRAC_PI_2, epsilon = 1e-12);
        assert_eq!(sim.states()[0].initial_mean_anomaly, 0.0);
    }

    #[test]
    fn advancing_accumulates_time() {
        let mut stepped = Simulation::new(catalog(), OrbitEvaluator::default(), &SimulationConfig::default());
        stepped.advance(0.5);
        stepped.advance(0.25);

        let mut jumped = Simulation::new(catalog(), OrbitEvaluator::default(), &SimulationConfig::default());
        jumped.set_elapsed(0.75);

        assert_eq!(stepped.elapsed(), 0.75);
        assert_eq!(stepped.positions(), jumped.positions());
    }

    #[test]
    fn positions_keep_catalog_order() {
        let mut sim = Simulation::new(catalog(), OrbitEvaluator::default(), &SimulationConfig::default());
        sim.set_elapsed(3.3);

        let positions = sim.positions();
        assert_eq!(positions.len(), 3);
        for (elements, (state, position)) in sim.catalog().iter().zip(sim.states().iter().zip(&positions)) {
            assert_eq!(*position, sim.evaluator().position(elements, state.mean_anomaly()));
        }
        assert_eq!(sim.position_of("Mars"), Some(positions[1]));
        assert_eq!(sim.position_of("Pluto"), None);
    }

    #[test]
    fn scale_applies_to_later_evaluations() {
        let mut sim = Simulation::new(catalog(), OrbitEvaluator::default(), &SimulationConfig::default());
        let before = sim.position_of("Far").unwrap();
        sim.set_scale(0.5);
        let after = sim.position_of("Far").unwrap();
        assert_relative_eq!(after.length(), before.length() * 0.5, epsilon = 1e-12);
    }

    #[test]
    fn every_body_gets_a_path() {
        let sim = Simulation::new(catalog(), OrbitEvaluator::default(), &SimulationConfig::default());
        let paths = sim.paths();
        assert_eq!(paths.len(), 3);
        assert!(paths.iter().all(|path| path.len() == PATH_SAMPLES));
    }

    #[test]
    fn speed_model_from_toml() {
        let config: SimulationConfig = toml::from_str(
            r#"
            use_epoch_phase = true
            [speed]
            model = "kepler"
            degrees_per_unit = 12.5
            "#,
        )
        .unwrap();
        assert_eq!(config.speed, SpeedModel::Kepler { degrees_per_unit: 12.5 });
        assert!(config.use_epoch_phase);
    }
}
