use super::*;

#[allow(clippy::too_many_arguments)]
pub fn update_ui(
    mut contexts: EguiContexts,
    mut clock: ResMut<SimulationClock>,
    mut scale: ResMut<DistanceScale>,
    mut followed: ResMut<FollowedBody>,
    mut camera: ResMut<UniversalCamera>,
    status: Res<LoadStatus>,
    orrery: Option<Res<Orrery>>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    egui::Window::new("Orbits").show(ctx, |ui| {
        match &*status {
            LoadStatus::Loading => {
                ui.label("loading orbit data");
            }
            LoadStatus::Loaded { bodies, unmatched } => {
                ui.label(format!("{bodies} bodies, {unmatched} unmatched appearance records"));
            }
            LoadStatus::Failed(err) => {
                ui.colored_label(egui::Color32::RED, format!("load failed: {err}"));
            }
        }

        ui.horizontal(|ui| {
            if ui.button(if clock.paused { "resume" } else { "pause" }).clicked() {
                clock.paused = !clock.paused;
            }
            if ui.button("follow none").clicked() {
                followed.0 = None;
                camera.center = DVec3::ZERO;
            }
        });

        ui.add(
            egui::Slider::new(&mut clock.time_scale, 0.0..=100.0)
                .logarithmic(true)
                .text("time scale"),
        );

        // Only touch the resource on edits; paths are resampled when it changes.
        let mut distance_scale = scale.0;
        if ui
            .add(
                egui::Slider::new(&mut distance_scale, 0.1..=1000.0)
                    .logarithmic(true)
                    .text("distance scale"),
            )
            .changed()
        {
            scale.0 = distance_scale;
        }

        let Some(orrery) = &orrery else {
            return;
        };

        ui.label(format!("t = {:.2}", orrery.simulation.elapsed()));
        ui.separator();

        egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
            for (index, (body, pos)) in orrery
                .simulation
                .catalog()
                .iter()
                .zip(&orrery.positions)
                .enumerate()
            {
                ui.horizontal(|ui| {
                    if ui.button(body.name()).clicked() {
                        followed.0 = Some(index);
                    }
                    ui.label(format!("({:.3}, {:.3}, {:.3})", pos.x, pos.y, pos.z));
                });
            }
        });

        if !orrery.report.unmatched_bodies.is_empty() {
            ui.separator();
            ui.label(format!(
                "no appearance: {}",
                orrery.report.unmatched_bodies.join(", ")
            ));
        }
    });
}
