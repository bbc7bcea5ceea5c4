use super::*;

fn create_transform(pos: DVec3, camera: &UniversalCamera, scale: impl Fn(f64) -> f64) -> Transform {
    // Relative to the camera so f32 precision is spent near the viewer.
    let pos = (pos - camera.position) / camera.distance;
    let distance = pos.length();
    Transform::from_translation(pos.as_vec3()).with_scale(Vec3::splat(scale(distance) as f32))
}

pub fn compute_camera_position(
    mut camera: ResMut<UniversalCamera>,
    followed: Res<FollowedBody>,
    bodies: Query<(&Orbit, &WorldPosition)>,
) {
    if let Some(index) = followed.0 {
        if let Some((_, position)) = bodies.iter().find(|(orbit, _)| orbit.index == index) {
            camera.center = position.0;
        }
    }

    camera.compute_position();
}

pub fn update_camera(mut trans: Query<&mut Transform, With<Camera3d>>, camera: Res<UniversalCamera>) {
    let Ok(mut t) = trans.get_single_mut() else {
        return;
    };
    *t = Transform::from_translation(Vec3::ZERO).looking_at(-camera.view_dir().as_vec3(), Vec3::Y);
}

pub fn set_body_positions(
    camera: Res<UniversalCamera>,
    scale: Res<DistanceScale>,
    mut query: Query<(&WorldPosition, &OrbitOrientation, &BodyRadius, &mut Transform)>,
) {
    for (position, orientation, radius, mut transform) in query.iter_mut() {
        *transform = create_transform(position.0, &camera, |distance| {
            (radius.0 * scale.0 / camera.distance).max(distance / 200.0)
        })
        .with_rotation(orientation.0);
    }
}

pub fn set_star_positions(
    camera: Res<UniversalCamera>,
    scale: Res<DistanceScale>,
    mut query: Query<(&mut Transform, &BodyRadius), With<SystemStar>>,
) {
    for (mut transform, radius) in query.iter_mut() {
        *transform = create_transform(DVec3::ZERO, &camera, |distance| {
            (radius.0 * scale.0 / camera.distance).max(distance / 75.0)
        });
    }
}

/// Paths are drawn as closed loops: the first sample is repeated at the end.
pub fn set_body_path_positions(
    camera: Res<UniversalCamera>,
    mut polylines: ResMut<Assets<Polyline>>,
    query: Query<(&OrbitPath, &PolylineHandle)>,
) {
    for (path, handle) in query.iter() {
        let Some(line) = polylines.get_mut(&handle.0) else {
            continue;
        };
        line.vertices.clear();

        for point in path.points.iter().chain(path.points.first()) {
            let pos = (*point - camera.position) / camera.distance;
            line.vertices.push(pos.as_vec3());
        }
    }
}
