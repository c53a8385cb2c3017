use crate::prelude::*;
use bevy::color::ColorToPacked;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

pub struct ConfigEguiPlugin;

impl Plugin for ConfigEguiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(FrameTimeDiagnosticsPlugin::default())
            .add_systems(Startup, configure_visuals_system)
            .add_systems(Update, ui_system);
    }
}

fn configure_visuals_system(mut contexts: EguiContexts) {
    contexts.ctx_mut().set_visuals(egui::Visuals {
        window_corner_radius: 0.0.into(),
        ..Default::default()
    });
}

/// Decides when a run of edits is over.
///
/// An edit finishes once the pointer is released and no text field holds focus,
/// so dragging a slider or a color only regenerates after letting go.
#[derive(Default)]
struct EditTracker {
    pending: bool,
}

impl EditTracker {
    fn observe(&mut self, changed: bool, pointer_down: bool, typing: bool) -> bool {
        self.pending |= changed;
        if self.pending && !pointer_down && !typing {
            self.pending = false;
            return true;
        }
        false
    }
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut Srgba) -> bool {
    ui.horizontal(|ui| {
        let mut rgb = color.to_u8_array_no_alpha();
        let response = egui::color_picker::color_edit_button_srgb(ui, &mut rgb);
        ui.label(format!("{label} {}", color.to_hex()));
        if response.changed() {
            *color = Srgba::from_u8_array_no_alpha(rgb);
        }
        response.changed()
    })
    .inner
}

fn parameter_sliders(ui: &mut egui::Ui, params: &mut GalaxyParameters) -> bool {
    let (min, max, step) = (
        &GalaxyParameters::MIN,
        &GalaxyParameters::MAX,
        &GalaxyParameters::STEP,
    );

    let responses = [
        ui.add(
            egui::Slider::new(&mut params.count, min.count..=max.count)
                .step_by(step.count as f64)
                .text("Count"),
        ),
        ui.add(
            egui::Slider::new(&mut params.size, min.size..=max.size)
                .step_by(step.size as f64)
                .text("Size"),
        ),
        ui.add(
            egui::Slider::new(&mut params.radius, min.radius..=max.radius)
                .step_by(step.radius as f64)
                .text("Radius"),
        ),
        ui.add(
            egui::Slider::new(&mut params.branches, min.branches..=max.branches)
                .step_by(step.branches as f64)
                .text("Branches"),
        ),
        ui.add(
            egui::Slider::new(&mut params.spin, min.spin..=max.spin)
                .step_by(step.spin as f64)
                .text("Spin"),
        ),
        ui.add(
            egui::Slider::new(&mut params.randomness, min.randomness..=max.randomness)
                .step_by(step.randomness as f64)
                .text("Randomness"),
        ),
        ui.add(
            egui::Slider::new(
                &mut params.randomness_power,
                min.randomness_power..=max.randomness_power,
            )
            .step_by(step.randomness_power as f64)
            .text("Randomness Power"),
        ),
        ui.checkbox(&mut params.size_attenuation, "Size Attenuation"),
    ];

    let mut changed = responses.iter().any(|r| r.changed());
    changed |= color_row(ui, "Inside", &mut params.inside_color);
    changed |= color_row(ui, "Outside", &mut params.outside_color);
    changed
}

fn ui_system(
    mut contexts: EguiContexts,
    mut draft: ResMut<GalaxyConfigUi>,
    mut galaxy_config: ResMut<GalaxyConfig>,
    active: Res<ActiveGalaxy>,
    diagnostics: Res<DiagnosticsStore>,
    mut tracker: Local<EditTracker>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0);

    let mut changed = false;
    let mut reroll = false;

    egui::SidePanel::right("galaxy_panel")
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Galaxy");
            changed = parameter_sliders(ui, &mut draft.0);

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Reset").clicked() {
                    draft.0 = GalaxyParameters::default();
                    changed = true;
                }
                reroll = ui.button("Regenerate").clicked();
            });

            ui.separator();
            ui.label(format!("Particles: {}", active.particle_count));
            ui.label(format!("FPS: {fps:.1}"));
        });

    let pointer_down = ctx.input(|i| i.pointer.any_down());
    let typing = ctx.wants_keyboard_input();
    if tracker.observe(changed, pointer_down, typing) {
        let committed = draft.clamped();
        if committed != galaxy_config.params {
            galaxy_config.params = committed;
        }
    }
    if reroll {
        // same parameters, fresh random draw
        galaxy_config.generation += 1;
    }
}
