use std::path::Path;

use super::*;

use orrery::{
    AppearanceSet, LoadError, LoaderOptions, OrbitCatalog, OrbitFrame, Simulation, load_appearances, load_elements,
    match_appearances,
};

/// Body radius, in units of semi-major axis, of the largest body in the
/// appearance set.
const MAX_BODY_RADIUS: f64 = 0.05;
const MIN_BODY_RADIUS: f64 = 0.005;
const UNMATCHED_BODY_RADIUS: f64 = 0.01;
const SUN_RADIUS: f64 = 0.08;

pub struct LoadedSystem {
    catalog: OrbitCatalog,
    appearances: AppearanceSet,
}

#[derive(Resource)]
pub struct LoadReceiver(async_channel::Receiver<Result<LoadedSystem, LoadError>>);

#[derive(Resource, Default)]
pub enum LoadStatus {
    #[default]
    Loading,
    Loaded {
        bodies: usize,
        unmatched: usize,
    },
    Failed(String),
}

#[derive(Resource)]
pub struct SphereMesh(Handle<Mesh>);

pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let sphere_mesh = meshes.add(Sphere::new(1.0).mesh().uv(32, 18));
    commands.insert_resource(SphereMesh(sphere_mesh.clone()));

    commands.spawn((
        Mesh3d(sphere_mesh),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.85, 0.4),
            unlit: true,
            ..Default::default()
        })),
        Transform::IDENTITY,
        Name::new("Sun"),
        BodyRadius(SUN_RADIUS),
        SystemStar,
    ));

    commands.spawn((Camera3d::default(),));
}

fn load_system(
    elements: &Path,
    appearances: Option<&Path>,
    options: &LoaderOptions,
) -> Result<LoadedSystem, LoadError> {
    let catalog = load_elements(elements, options)?;
    let appearances = match appearances {
        Some(path) => load_appearances(path, options)?,
        None => AppearanceSet::default(),
    };
    Ok(LoadedSystem { catalog, appearances })
}

/// Reads the data sets off the main thread; the result arrives through
/// [`LoadReceiver`].
pub fn start_loading(mut commands: Commands, args: Res<Args>, config: Res<ViewerConfig>) {
    let (tx, rx) = async_channel::bounded(1);
    let elements = args.elements.clone();
    let appearances = args.appearances.clone();
    let options = config.0.loader.clone();

    std::thread::spawn(move || {
        let result = load_system(&elements, appearances.as_deref(), &options);
        let _ = tx.send_blocking(result);
    });

    commands.insert_resource(LoadReceiver(rx));
}

#[allow(clippy::too_many_arguments)]
pub fn receive_loaded_system(
    mut commands: Commands,
    receiver: Option<Res<LoadReceiver>>,
    config: Res<ViewerConfig>,
    scale: Res<DistanceScale>,
    sphere_mesh: Res<SphereMesh>,
    asset_server: Res<AssetServer>,
    mut status: ResMut<LoadStatus>,
    mut camera: ResMut<UniversalCamera>,
    mut polyline_materials: ResMut<Assets<PolylineMaterial>>,
    mut polylines: ResMut<Assets<Polyline>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(receiver) = receiver else {
        return;
    };

    let result = match receiver.0.try_recv() {
        Ok(result) => result,
        Err(async_channel::TryRecvError::Empty) => return,
        Err(async_channel::TryRecvError::Closed) => {
            error!("orbit loader exited without a result");
            *status = LoadStatus::Failed("loader exited without a result".to_owned());
            commands.remove_resource::<LoadReceiver>();
            return;
        }
    };
    commands.remove_resource::<LoadReceiver>();

    let LoadedSystem { catalog, appearances } = match result {
        Ok(loaded) => loaded,
        Err(err) => {
            error!("failed to load orbit data: {err}");
            *status = LoadStatus::Failed(err.to_string());
            return;
        }
    };

    let report = match_appearances(&catalog, &appearances);
    let simulation = Simulation::new(
        catalog,
        config.0.evaluator().with_scale(scale.0),
        &config.0.simulation,
    );

    let colour = Color::hsl(55.0, 0.75, 1.5).to_linear();

    for (index, (body, path)) in simulation.catalog().iter().zip(simulation.paths()).enumerate() {
        let appearance = report
            .appearance_for(index)
            .and_then(|i| appearances.as_slice().get(i));

        let radius = appearance
            .and_then(|appearance| appearances.relative_size(&appearance.name))
            .map_or(UNMATCHED_BODY_RADIUS, |size| (size * MAX_BODY_RADIUS).max(MIN_BODY_RADIUS));

        let frame = OrbitFrame::from_elements(body);
        let orientation = Quat::from_mat3(&DMat3::from_cols_array_2d(&frame.to_cols_array_2d()).as_mat3());

        commands.spawn((
            OrbitPath {
                index,
                points: path.into_iter().map(convert_vec).collect(),
            },
            PolylineBundle {
                polyline: PolylineHandle(polylines.add(Polyline::default())),
                material: PolylineMaterialHandle(polyline_materials.add(PolylineMaterial {
                    width: 1.0,
                    color: colour,
                    perspective: false,
                    ..Default::default()
                })),
                ..Default::default()
            },
        ));

        commands.spawn((
            Mesh3d(sphere_mesh.0.clone()),
            MeshMaterial3d(materials.add(StandardMaterial {
                perceptual_roughness: 1.0,
                base_color_texture: appearance.map(|appearance| asset_server.load(appearance.texture_path.clone())),
                unlit: true,
                ..Default::default()
            })),
            Transform::from_rotation(orientation),
            Orbit { index },
            WorldPosition::default(),
            OrbitOrientation(orientation),
            Name::new(body.name().to_owned()),
            BodyRadius(radius),
        ));
    }

    let framing = simulation.catalog().max_semi_major_axis() * scale.0 * 2.5;
    if framing > 0.0 {
        camera.distance = framing;
    }

    info!(
        "spawned {} bodies ({} unmatched appearance records)",
        simulation.catalog().len(),
        report.unmatched_count()
    );
    *status = LoadStatus::Loaded {
        bodies: simulation.catalog().len(),
        unmatched: report.unmatched_count(),
    };
    commands.insert_resource(Orrery::new(simulation, report));
}
