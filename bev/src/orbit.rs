use super::*;

use orrery::{MatchReport, Simulation};

/// Index of the body in the loaded catalog.
#[derive(Component, Clone, Copy, Debug)]
pub struct Orbit {
    pub index: usize,
}

/// Heliocentric position, already scaled.
#[derive(Component, Default)]
pub struct WorldPosition(pub DVec3);

#[derive(Component)]
pub struct OrbitOrientation(pub Quat);

#[derive(Component)]
pub struct OrbitPath {
    pub index: usize,
    pub points: Vec<DVec3>,
}

#[derive(Resource)]
pub struct SimulationClock {
    pub paused: bool,
    pub time_scale: f64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            paused: false,
            time_scale: 1.0,
        }
    }
}

/// The loaded system. Only present once loading succeeded.
#[derive(Resource)]
pub struct Orrery {
    pub simulation: Simulation,
    pub report: MatchReport,
    pub positions: Vec<DVec3>,
}

impl Orrery {
    pub fn new(simulation: Simulation, report: MatchReport) -> Self {
        let positions = simulation.positions().into_iter().map(convert_vec).collect();
        Self {
            simulation,
            report,
            positions,
        }
    }
}

pub fn advance_simulation(
    time: Res<Time>,
    clock: Res<SimulationClock>,
    scale: Res<DistanceScale>,
    orrery: Option<ResMut<Orrery>>,
) {
    let Some(mut orrery) = orrery else {
        return;
    };

    if scale.is_changed() {
        orrery.simulation.set_scale(scale.0);
    }
    if !clock.paused {
        orrery.simulation.advance(time.delta_secs_f64() * clock.time_scale);
    }

    let positions = orrery.simulation.positions();
    orrery.positions = positions.into_iter().map(convert_vec).collect();
}

pub fn calculate_orbits(orrery: Option<Res<Orrery>>, mut orbits: Query<(&Orbit, &mut WorldPosition)>) {
    let Some(orrery) = orrery else {
        return;
    };

    for (orbit, mut position) in orbits.iter_mut() {
        let Some(&pos) = orrery.positions.get(orbit.index) else {
            warn!("orbit index {} is outside the loaded catalog", orbit.index);
            continue;
        };
        position.0 = pos;
    }
}

pub fn resample_paths(
    scale: Res<DistanceScale>,
    orrery: Option<Res<Orrery>>,
    mut paths: Query<&mut OrbitPath>,
) {
    let Some(orrery) = orrery else {
        return;
    };
    if !scale.is_changed() {
        return;
    }

    let mut sampled = orrery.simulation.paths();
    for mut path in paths.iter_mut() {
        if let Some(points) = sampled.get_mut(path.index) {
            path.points = std::mem::take(points).into_iter().map(convert_vec).collect();
        }
    }
}

pub struct OrbitPlugin;

impl Plugin for OrbitPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationClock>().add_systems(
            Update,
            (
                advance_simulation,
                calculate_orbits.after(advance_simulation),
                resample_paths.after(advance_simulation),
            ),
        );
    }
}
