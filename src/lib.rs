//! Keplerian orbit evaluation: orbital elements plus a mean anomaly in,
//! Cartesian position out.
//!
//! [`kepler`] solves Kepler's equation, [`orbit_math`] maps the solution into
//! space, and [`simulation`] drives both over time for a loaded
//! [`OrbitCatalog`].

pub mod appearance;
pub mod catalog;
pub mod config;
pub mod elements;
pub mod error;
pub mod kepler;
pub mod loader;
pub mod orbit_math;
pub mod simulation;
pub mod vec3;

pub use appearance::{match_appearances, AppearanceSet, MatchReport, PlanetAppearance};
pub use catalog::OrbitCatalog;
pub use config::OrbitConfig;
pub use elements::OrbitalElements;
pub use error::{ConfigError, ElementsError, LoadError};
pub use kepler::{KeplerSolution, SolverConfig};
pub use loader::{load_appearances, load_elements, BatchedReader, LoaderOptions};
pub use orbit_math::{OrbitEvaluator, OrbitFrame, OrbitSample, PATH_SAMPLES};
pub use simulation::{OrbitState, Simulation, SimulationConfig, SpeedModel};
pub use vec3::Vec3;
