use std::path::{Path, PathBuf};

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::{DMat3, DVec3};
use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, egui};
use bevy_polyline::prelude::*;
use clap::Parser;
use orrery::{ConfigError, OrbitConfig};

mod controls;
mod orbit;
mod rendering_prep;
mod setup;
mod ui;

use controls::*;
use orbit::*;
use rendering_prep::*;
use setup::*;
use ui::*;

/// Interactive Keplerian orbit viewer
#[derive(Parser, Debug, Clone, Resource)]
#[command(version)]
struct Args {
    /// Element table: name, a, e, i, Ω, ϖ, L
    #[arg(default_value = "assets/orbital_elements.csv")]
    elements: PathBuf,

    /// Appearance table: name, diameter, texture
    #[arg(short, long)]
    appearances: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Resource)]
struct ViewerConfig(OrbitConfig);

/// Scene units per unit of semi-major axis.
#[derive(Resource)]
struct DistanceScale(f64);

#[derive(Resource, Default)]
struct FollowedBody(Option<usize>);

#[derive(Component)]
struct BodyRadius(f64);

#[derive(Component)]
struct SystemStar;

#[derive(Resource)]
struct UniversalCamera {
    center: DVec3,
    position: DVec3,
    distance: f64,
    pitch: f64,
    yaw: f64,
}

impl UniversalCamera {
    fn view_dir(&self) -> DVec3 {
        DVec3::new(
            self.pitch.sin() * self.yaw.sin(),
            self.pitch.cos(),
            self.pitch.sin() * self.yaw.cos(),
        )
    }

    fn compute_position(&mut self) {
        self.position = self.center + self.view_dir() * self.distance;
    }

    fn rotate_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        self.pitch = (self.pitch + pitch as f64 / 100.0).clamp(0.01, std::f64::consts::PI - 0.01);
        self.yaw += yaw as f64 / 100.0;
    }
}

fn convert_vec(vec: orrery::Vec3<f64>) -> DVec3 {
    DVec3::new(vec.x, vec.y, vec.z)
}

fn load_config(path: Option<&Path>) -> Result<OrbitConfig, ConfigError> {
    match path {
        Some(path) => OrbitConfig::load(path),
        None => Ok(OrbitConfig::default()),
    }
}

fn main() -> Result<(), ConfigError> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    App::new()
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(UniversalCamera {
            center: DVec3::ZERO,
            position: DVec3::ZERO,
            distance: 3.0 * config.scale,
            pitch: 45.0_f64.to_radians(),
            yaw: 0.0,
        })
        .insert_resource(DistanceScale(config.scale))
        .insert_resource(ViewerConfig(config))
        .insert_resource(args)
        .init_resource::<FollowedBody>()
        .init_resource::<LoadStatus>()
        .add_plugins(DefaultPlugins)
        .add_plugins(PolylinePlugin)
        .add_plugins(EguiPlugin)
        .add_plugins(OrbitPlugin)
        .add_systems(Startup, (setup, start_loading))
        .add_systems(
            Update,
            (
                receive_loaded_system.before(advance_simulation),
                handle_mouse_scroll.before(compute_camera_position),
                handle_mouse_drags.before(compute_camera_position),
                pick_body.before(compute_camera_position),
                compute_camera_position
                    .after(calculate_orbits)
                    .before(update_camera),
                update_camera,
                set_body_positions.after(compute_camera_position),
                set_body_path_positions
                    .after(compute_camera_position)
                    .after(resample_paths),
                set_star_positions.after(compute_camera_position),
                update_ui,
            ),
        )
        .run();

    Ok(())
}
