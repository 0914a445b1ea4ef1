//! Orbit camera around the globe.
//!
//! Left-drag spins the camera around the globe's centre at a fixed distance;
//! the spin carries on briefly after release and is damped each frame. Pan
//! and zoom are disabled.

use std::f32::consts::FRAC_PI_2;

use bevy::ecs::message::MessageReader;
use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;

use crate::globe::GlobeSet;
use crate::picking::PointerState;

/// Distance from the globe's centre.
pub const ORBIT_DISTANCE: f32 = 2.5;

/// Keeps the camera off the poles so `looking_at` stays well-defined.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Plugin for the orbit camera.
pub struct OrbitCameraPlugin;

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitSettings>().add_systems(
            Update,
            (orbit_drag, apply_orbit).chain().in_set(GlobeSet::Input),
        );
    }
}

/// Settings for orbit movement.
#[derive(Resource)]
pub struct OrbitSettings {
    /// Radians of spin per pixel dragged.
    pub sensitivity: f32,
    /// Fraction of spin velocity lost per frame.
    pub damping: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.005,
            damping: 0.1,
        }
    }
}

/// Spherical position of the camera around the globe.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    /// Pending spin as (yaw, pitch) per frame.
    pub velocity: Vec2,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: ORBIT_DISTANCE,
            velocity: Vec2::ZERO,
        }
    }
}

impl OrbitCamera {
    /// Camera position; yaw 0, pitch 0 is on `+Z`.
    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    /// Apply one frame of spin and damp it.
    pub fn advance(&mut self, damping: f32) {
        self.yaw += self.velocity.x;
        self.pitch = (self.pitch + self.velocity.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.velocity *= 1.0 - damping;
        if self.velocity.length_squared() < 1e-12 {
            self.velocity = Vec2::ZERO;
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position()).looking_at(Vec3::ZERO, Vec3::Y)
    }
}

/// Accumulate drag motion into spin velocity.
#[allow(clippy::needless_pass_by_value)]
fn orbit_drag(
    mut motion: MessageReader<MouseMotion>,
    pointer: Res<PointerState>,
    settings: Res<OrbitSettings>,
    mut camera: Single<&mut OrbitCamera>,
) {
    let delta: Vec2 = motion.read().map(|m| m.delta).sum();
    if !pointer.is_dragging() || delta == Vec2::ZERO {
        return;
    }
    // Dragging right turns the globe right, i.e. moves the camera left.
    camera.velocity += Vec2::new(-delta.x, delta.y) * settings.sensitivity * settings.damping;
}

#[allow(clippy::needless_pass_by_value)]
fn apply_orbit(
    settings: Res<OrbitSettings>,
    mut query: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    for (mut orbit, mut transform) in &mut query {
        if orbit.velocity == Vec2::ZERO {
            continue;
        }
        orbit.advance(settings.damping);
        *transform = orbit.transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_position_on_z() {
        let orbit = OrbitCamera::default();
        assert!((orbit.position() - Vec3::new(0.0, 0.0, ORBIT_DISTANCE)).length() < 1e-6);
    }

    #[test]
    fn test_distance_is_fixed() {
        let mut orbit = OrbitCamera {
            velocity: Vec2::new(0.3, 0.2),
            ..OrbitCamera::default()
        };
        for _ in 0..50 {
            orbit.advance(0.1);
            assert!((orbit.position().length() - ORBIT_DISTANCE).abs() < 1e-4);
        }
    }

    #[test]
    fn test_spin_decays_to_rest() {
        let mut orbit = OrbitCamera {
            velocity: Vec2::new(0.05, 0.0),
            ..OrbitCamera::default()
        };
        for _ in 0..1_000 {
            orbit.advance(0.1);
        }
        assert_eq!(orbit.velocity, Vec2::ZERO);
        // Total spin converges to v / damping.
        assert!((orbit.yaw - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut orbit = OrbitCamera {
            velocity: Vec2::new(0.0, 10.0),
            ..OrbitCamera::default()
        };
        orbit.advance(0.1);
        assert!((orbit.pitch - PITCH_LIMIT).abs() < 1e-6);
        assert!(orbit.transform().translation.is_finite());
    }
}
