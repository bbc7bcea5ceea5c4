use super::*;

use ordered_float::OrderedFloat;

pub fn handle_mouse_drags(
    mut mouse_motion_events: EventReader<MouseMotion>,
    mut camera: ResMut<UniversalCamera>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut contexts: EguiContexts,
) {
    let mut delta = Vec2::ZERO;
    for event in mouse_motion_events.read() {
        delta += event.delta;
    }

    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    if ctx.is_using_pointer() {
        return;
    }

    let sensitivity = Vec2::splat(2.0);

    if buttons.pressed(MouseButton::Left) || buttons.pressed(MouseButton::Right) {
        camera.rotate_yaw_pitch(
            -0.1 * delta.x * sensitivity.x,
            -0.1 * delta.y * sensitivity.y,
        );
    }
}

pub fn handle_mouse_scroll(
    mut mouse_wheel_events: EventReader<MouseWheel>,
    mut camera: ResMut<UniversalCamera>,
    mut contexts: EguiContexts,
) {
    let over_ui = contexts
        .try_ctx_mut()
        .is_some_and(|ctx| ctx.is_pointer_over_area());

    for mouse_wheel_event in mouse_wheel_events.read() {
        if over_ui {
            continue;
        }
        let factor = match mouse_wheel_event.unit {
            MouseScrollUnit::Line => 1.0,
            MouseScrollUnit::Pixel => 0.005,
        };
        camera.distance *= 1.0 + mouse_wheel_event.y as f64 * -0.1 * factor;
    }
}

/// Clicking close to a body makes the camera follow it.
pub fn pick_body(
    mut contexts: EguiContexts,
    render_cam: Single<(&Camera, &GlobalTransform)>,
    primary_window: Option<Single<&Window>>,
    buttons: Res<ButtonInput<MouseButton>>,
    bodies: Query<(&Orbit, &Transform)>,
    mut followed: ResMut<FollowedBody>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    if contexts
        .try_ctx_mut()
        .is_none_or(|ctx| ctx.is_pointer_over_area())
    {
        return;
    }

    let Some(cursor_position) = primary_window.and_then(|window| window.cursor_position()) else {
        return;
    };

    let (render_cam, render_cam_transform) = *render_cam;
    let Ok(ray) = render_cam.viewport_to_world(render_cam_transform, cursor_position) else {
        return;
    };
    let cone_dir = ray.direction.as_vec3();

    let picked = bodies
        .iter()
        .map(|(orbit, transform)| {
            let closeness = transform.translation.normalize_or_zero().dot(cone_dir);
            (orbit.index, closeness)
        })
        .max_by_key(|&(_, closeness)| OrderedFloat(closeness))
        .filter(|&(_, closeness)| closeness > 0.9995);

    if let Some((index, _)) = picked {
        followed.0 = Some(index);
    }
}
