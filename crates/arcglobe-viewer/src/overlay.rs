//! Hover overlay and the destinations panel.
//!
//! The overlay follows the pointer with the hovered destination's flag and
//! name. The panel lists every destination with a button that focuses it, and
//! shows FPS, the focus/reveal status and the coordinate facing the camera.

use arcglobe::OverlayCommand;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};
use egui_extras::{Column, TableBuilder};

use crate::camera::OrbitCamera;
use crate::globe::GlobeState;
use crate::picking::OverlayState;

/// Flag image size in points.
const FLAG_SIZE: egui::Vec2 = egui::vec2(50.0, 30.0);

/// Plugin for the egui overlay and panel.
pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default())
            .add_plugins(FrameTimeDiagnosticsPlugin::default())
            .add_systems(
                EguiPrimaryContextPass,
                (hover_overlay_system, destinations_panel_system),
            );
    }
}

/// Draw the flag and name next to the pointer.
#[allow(clippy::needless_pass_by_value)]
fn hover_overlay_system(
    mut contexts: EguiContexts,
    overlay: Res<OverlayState>,
    mut loaders_installed: Local<bool>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    // Flags are remote SVGs; the loaders fetch and rasterize them on demand.
    if !*loaders_installed {
        egui_extras::install_image_loaders(ctx);
        *loaders_installed = true;
    }

    let OverlayCommand::Show {
        name, flag, anchor, ..
    } = &overlay.0
    else {
        return Ok(());
    };

    egui::Area::new(egui::Id::new("destination_overlay"))
        .fixed_pos(egui::pos2(anchor.x, anchor.y))
        .order(egui::Order::Tooltip)
        .interactable(false)
        .show(ctx, |ui| {
            ui.add(egui::Image::new(flag.as_str()).fit_to_exact_size(FLAG_SIZE));
            ui.label(
                egui::RichText::new(name)
                    .color(egui::Color32::WHITE)
                    .size(14.0),
            );
        });

    Ok(())
}

/// Render the destinations panel.
#[allow(clippy::needless_pass_by_value)]
fn destinations_panel_system(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
    mut state: ResMut<GlobeState>,
    camera: Single<&GlobalTransform, With<OrbitCamera>>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(bevy::diagnostic::Diagnostic::smoothed)
        .unwrap_or(0.0);

    let controller = &state.0;
    let focus_status = match controller.focus().angle_to_target() {
        Some(angle) => format!("turning, {:.1}° left", angle.to_degrees()),
        None => "idle".to_string(),
    };
    let reveal_status = controller
        .reveal()
        .and_then(|reveal| {
            let destination = controller.registry().get(reveal.destination())?;
            Some(format!(
                "{} {:.0}%",
                destination.name,
                reveal.progress() * 100.0
            ))
        })
        .unwrap_or_else(|| "none".to_string());
    let viewer = camera.translation().as_dvec3();
    let facing = controller.geo_facing(viewer);

    let mut clicked = None;
    egui::Window::new("Destinations")
        .default_pos([10.0, 10.0])
        .show(ctx, |ui| {
            ui.label(format!("FPS: {fps:.0}"));
            ui.label(format!("Focus: {focus_status}"));
            ui.label(format!("Reveal: {reveal_status}"));
            ui.label(format!(
                "Facing: {:.2}, {:.2}",
                facing.latitude, facing.longitude
            ));
            ui.separator();

            TableBuilder::new(ui)
                .column(Column::exact(100.0))
                .column(Column::exact(110.0))
                .column(Column::exact(50.0))
                .body(|mut body| {
                    for (id, destination) in controller.registry().iter() {
                        body.row(20.0, |mut row| {
                            row.col(|ui| {
                                ui.label(&destination.name);
                            });
                            row.col(|ui| {
                                ui.label(format!(
                                    "{:.2}, {:.2}",
                                    destination.geo.latitude, destination.geo.longitude
                                ));
                            });
                            row.col(|ui| {
                                if ui.small_button("Focus").clicked() {
                                    clicked = Some(id);
                                }
                            });
                        });
                    }
                });

            ui.separator();
            ui.label("Controls:");
            ui.label("  Drag - Orbit");
            ui.label("  Hover - Show arc");
            ui.label("  Click - Focus");
        });

    if let Some(id) = clicked {
        state.0.on_click(Some(id), viewer);
    }

    Ok(())
}
