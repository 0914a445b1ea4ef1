//! Interactive globe viewer using Bevy.
//!
//! Arcs rise from a fixed origin to each destination. Hovering a marker
//! reveals its arc and shows its flag; clicking turns the globe until the
//! marker faces the camera.

mod camera;
mod globe;
mod launch_params;
mod overlay;
mod picking;

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use camera::{OrbitCamera, OrbitCameraPlugin};
use globe::{GlobePlugin, GlobeState};
use overlay::OverlayPlugin;
use picking::PickingPlugin;

/// Plugin for the main application.
pub struct AppPlugin {
    /// Globe texture asset path.
    pub texture: String,
}

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            GlobePlugin {
                texture: self.texture.clone(),
            },
            OrbitCameraPlugin,
            PickingPlugin,
            OverlayPlugin,
        ))
        .add_systems(Startup, setup_scene);
    }
}

/// Spawn the camera looking at the globe from `+Z`.
fn setup_scene(mut commands: Commands) {
    let orbit = OrbitCamera::default();
    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: bevy::camera::ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        orbit.transform(),
        Projection::Perspective(PerspectiveProjection {
            fov: 50_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..Default::default()
        }),
        // Everything is unlit.
        Tonemapping::None,
        orbit,
    ));

    tracing::info!("Scene setup complete - drag to orbit, hover and click destinations");
}

fn main() {
    // Initialize tracing for native platforms.
    #[cfg(not(target_family = "wasm"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    // Initialize tracing for WASM (logs to browser console).
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    let params = launch_params::parse();
    let controller = match params.build_controller() {
        Ok(controller) => controller,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    let mut app = App::new();

    #[allow(unused_mut)]
    let mut window = Window {
        title: "arcglobe".to_string(),
        resolution: (1280, 720).into(),
        ..Default::default()
    };

    // WASM: Fit canvas to parent element and prevent browser event handling.
    #[cfg(target_family = "wasm")]
    {
        window.fit_canvas_to_parent = true;
        window.prevent_default_event_handling = true;
    }

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(window),
        ..Default::default()
    }))
    .insert_resource(GlobeState(controller))
    .add_plugins(AppPlugin {
        texture: params.texture,
    })
    .run();
}
