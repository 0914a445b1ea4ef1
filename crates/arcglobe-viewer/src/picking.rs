//! Pointer picking of destination markers.
//!
//! Cursor moves are resolved to a marker (or none) and fed to the controller
//! as hovers; a left press released without dragging is a click.

use arcglobe::{DestinationId, OverlayCommand};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;
use glam::DVec3;

use crate::camera::OrbitCamera;
use crate::globe::{GlobeSet, GlobeState, MARKER_RADIUS};

/// Pixels the pointer may travel between press and release for a click.
const CLICK_SLOP: f32 = 4.0;

/// Slack when comparing a marker hit against the globe surface.
const OCCLUSION_EPSILON: f64 = 1e-6;

/// Plugin for hover and click picking.
pub struct PickingPlugin;

impl Plugin for PickingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerState>()
            .init_resource::<OverlayState>()
            .add_systems(Update, handle_pointer.in_set(GlobeSet::Input));
    }
}

/// Left-button press tracking, shared with the orbit camera.
#[derive(Resource, Debug, Default)]
pub struct PointerState {
    pressed_at: Option<Vec2>,
    dragging: bool,
    last_cursor: Option<Vec2>,
}

impl PointerState {
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn press(&mut self, at: Vec2) {
        self.pressed_at = Some(at);
        self.dragging = false;
    }

    fn moved_to(&mut self, at: Vec2) {
        if let Some(start) = self.pressed_at
            && start.distance(at) > CLICK_SLOP
        {
            self.dragging = true;
        }
    }

    /// Returns `true` if the press ended as a click.
    fn release(&mut self) -> bool {
        let click = self.pressed_at.is_some() && !self.dragging;
        self.pressed_at = None;
        self.dragging = false;
        click
    }
}

/// The overlay to draw this frame.
#[derive(Resource, Debug)]
pub struct OverlayState(pub OverlayCommand);

impl Default for OverlayState {
    fn default() -> Self {
        Self(OverlayCommand::Hide)
    }
}

/// A ray in globe space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub dir: DVec3,
}

/// Nearest non-negative distance along `ray` to a sphere, if it is hit.
pub fn ray_sphere(ray: Ray, center: DVec3, radius: f64) -> Option<f64> {
    let dir = ray.dir.try_normalize()?;
    let offset = ray.origin - center;
    let b = offset.dot(dir);
    let c = offset.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let near = -b - root;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + root;
    (far >= 0.0).then_some(far)
}

/// Closest marker hit by `ray` that is not behind the globe.
///
/// `markers` yields each marker's world-space centre and pick radius. Ties
/// go to the lower id.
pub fn pick(
    ray: Ray,
    globe_radius: f64,
    markers: impl IntoIterator<Item = (DestinationId, DVec3, f64)>,
) -> Option<DestinationId> {
    let surface = ray_sphere(ray, DVec3::ZERO, globe_radius).unwrap_or(f64::INFINITY);

    let mut best: Option<(f64, DestinationId)> = None;
    for (id, center, radius) in markers {
        let Some(t) = ray_sphere(ray, center, radius) else {
            continue;
        };
        // Markers sit on the surface, so anything past it is on the far side.
        if t > surface + OCCLUSION_EPSILON {
            continue;
        }
        best = match best {
            Some((bt, bid)) if bt.total_cmp(&t).then(bid.0.cmp(&id.0)).is_le() => Some((bt, bid)),
            _ => Some((t, id)),
        };
    }
    best.map(|(_, id)| id)
}

/// Resolve the pointer against the markers and forward hovers and clicks.
#[allow(clippy::needless_pass_by_value)]
fn handle_pointer(
    mouse: Res<ButtonInput<MouseButton>>,
    window: Single<&Window, With<PrimaryWindow>>,
    camera: Single<(&Camera, &GlobalTransform), With<OrbitCamera>>,
    mut contexts: EguiContexts,
    mut pointer: ResMut<PointerState>,
    mut overlay: ResMut<OverlayState>,
    mut state: ResMut<GlobeState>,
) {
    let egui_wants_pointer = contexts
        .ctx_mut()
        .ok()
        .is_some_and(|ctx| ctx.is_pointer_over_area());
    let cursor = window.cursor_position();
    let (camera, camera_transform) = *camera;

    let hit = |state: &GlobeState, cursor: Vec2| -> Option<DestinationId> {
        let ray = camera.viewport_to_world(camera_transform, cursor).ok()?;
        let ray = Ray {
            origin: ray.origin.as_dvec3(),
            dir: ray.direction.as_dvec3(),
        };
        let controller = &state.0;
        let orientation = controller.orientation();
        let markers = controller.registry().iter().map(|(id, destination)| {
            let radius = f64::from(MARKER_RADIUS) * controller.marker_scale(id);
            (id, orientation * destination.marker, radius)
        });
        pick(ray, controller.config().radius, markers)
    };

    if let Some(cursor) = cursor {
        if mouse.just_pressed(MouseButton::Left) && !egui_wants_pointer {
            pointer.press(cursor);
        }
        pointer.moved_to(cursor);

        if pointer.last_cursor != Some(cursor) {
            let target = if egui_wants_pointer {
                None
            } else {
                hit(&*state, cursor)
            };
            overlay.0 = state.0.on_hover(target, cursor);
        }
    }
    pointer.last_cursor = cursor;

    if mouse.just_released(MouseButton::Left) && pointer.release() {
        let target = cursor.and_then(|cursor| hit(&*state, cursor));
        let viewer = camera_transform.translation().as_dvec3();
        state.0.on_click(target, viewer);
    }
}
