use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::kepler::SolverConfig;
use crate::loader::LoaderOptions;
use crate::orbit_math::OrbitEvaluator;
use crate::simulation::SimulationConfig;

/// Everything tunable, read from a TOML file. Missing keys fall back to the
/// defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub solver: SolverConfig,
    /// Global distance scale applied to every position.
    pub scale: f64,
    pub simulation: SimulationConfig,
    pub loader: LoaderOptions,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            scale: 1.0,
            simulation: SimulationConfig::default(),
            loader: LoaderOptions::default(),
        }
    }
}

impl OrbitConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    pub fn evaluator(&self) -> OrbitEvaluator {
        OrbitEvaluator::new(self.solver, self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SpeedModel;
    use std::io::Write;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = OrbitConfig::from_toml_str("").unwrap();
        assert_eq!(config, OrbitConfig::default());
        assert_eq!(config.solver.precision_digits, 5);
        assert_eq!(config.solver.max_iterations, 20);
        assert_eq!(config.loader.lines_per_batch, 100);
        assert!(config.loader.skip_header);
        assert_eq!(config.simulation.speed, SpeedModel::Uniform { degrees_per_unit: 50.0 });
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = OrbitConfig::from_toml_str(
            r#"
            scale = 20.0

            [solver]
            max_iterations = 50

            [loader]
            lines_per_batch = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.scale, 20.0);
        assert_eq!(config.solver, SolverConfig::new(5, 50));
        assert_eq!(config.loader.lines_per_batch, 10);
        assert!(config.loader.skip_header);

        let evaluator = config.evaluator();
        assert_eq!(evaluator.scale, 20.0);
        assert_eq!(evaluator.solver.max_iterations, 50);
    }

    #[test]
    fn bad_types_are_rejected() {
        let err = OrbitConfig::from_toml_str("scale = \"big\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[solver]\nprecision_digits = 8").unwrap();

        let config = OrbitConfig::load(file.path()).unwrap();
        assert_eq!(config.solver.precision_digits, 8);

        let err = OrbitConfig::load(file.path().with_extension("missing")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
