use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use orrery::kepler::{self, SolverConfig};
use orrery::{load_elements, OrbitConfig, Simulation};

/// Keplerian orbit positions from CSV element tables
#[derive(Parser, Debug)]
#[command(name = "orrery")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every body's position at a simulated time
    Positions {
        /// Element table: name, a, e, i, Ω, ϖ, L
        elements: PathBuf,

        /// Simulated time
        #[arg(short, long, default_value = "0")]
        time: f64,

        /// Distance scale, overrides the config
        #[arg(short, long)]
        scale: Option<f64>,
    },

    /// Print the 360 path samples of one body as CSV
    Path {
        elements: PathBuf,

        /// Body name
        name: String,
    },

    /// Solve Kepler's equation for one (M, e) pair
    Solve {
        /// Mean anomaly in radians
        #[arg(allow_negative_numbers = true)]
        mean_anomaly: f64,

        eccentricity: f64,

        /// Decimal digits of tolerance, overrides the config
        #[arg(short, long)]
        precision: Option<u32>,

        /// Newton step cap, overrides the config
        #[arg(short, long)]
        max_iterations: Option<u32>,
    },
}

/// Flags win over the config file.
fn solver_config(base: &SolverConfig, precision: Option<u32>, max_iterations: Option<u32>) -> SolverConfig {
    SolverConfig::new(
        precision.unwrap_or(base.precision_digits),
        max_iterations.unwrap_or(base.max_iterations),
    )
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => OrbitConfig::load(path)?,
        None => OrbitConfig::default(),
    };

    match args.command {
        Command::Positions { elements, time, scale } => {
            let catalog = load_elements(&elements, &config.loader)
                .with_context(|| format!("loading {}", elements.display()))?;

            let mut evaluator = config.evaluator();
            if let Some(scale) = scale {
                evaluator = evaluator.with_scale(scale);
            }

            let mut sim = Simulation::new(catalog, evaluator, &config.simulation);
            sim.set_elapsed(time);

            println!("name,x,y,z,distance");
            for (body, position) in sim.catalog().iter().zip(sim.positions()) {
                println!(
                    "{},{:.6},{:.6},{:.6},{:.6}",
                    body.name(),
                    position.x,
                    position.y,
                    position.z,
                    position.length()
                );
            }
        }
        Command::Path { elements, name } => {
            let catalog = load_elements(&elements, &config.loader)
                .with_context(|| format!("loading {}", elements.display()))?;
            let body = catalog
                .get(&name)
                .with_context(|| format!("no body named {name:?} in {}", elements.display()))?;

            println!("degree,x,y,z");
            for (degree, point) in config.evaluator().sample_path_par(body).iter().enumerate() {
                println!("{degree},{:.6},{:.6},{:.6}", point.x, point.y, point.z);
            }
        }
        Command::Solve {
            mean_anomaly,
            eccentricity,
            precision,
            max_iterations,
        } => {
            if !(0.0..1.0).contains(&eccentricity) {
                anyhow::bail!("eccentricity must lie in [0, 1), got {eccentricity}");
            }

            let solver = solver_config(&config.solver, precision, max_iterations);
            let solution = kepler::solve(mean_anomaly, eccentricity, &solver);
            println!("E = {}", solution.eccentric_anomaly);
            println!("residual = {:e}", solution.residual);
            println!(
                "iterations = {}{}",
                solution.iterations,
                if solution.converged { "" } else { " (cap reached)" }
            );
        }
    }

    Ok(())
}
