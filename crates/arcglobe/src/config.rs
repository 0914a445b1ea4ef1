//! Globe-wide configuration.

use glam::{DQuat, EulerRot};

use crate::arc::DEFAULT_SAMPLE_COUNT;
use crate::error::{Error, Result};
use crate::focus::FocusSettings;
use crate::projection::GeoPoint;

/// Where every arc starts (lat 13.5, lon 101).
pub const DEFAULT_ORIGIN: GeoPoint = GeoPoint::new(13.5, 101.0);

/// Orientation the globe is given before any point is placed, as XYZ Euler
/// angles in degrees.
pub const DEFAULT_INITIAL_ROTATION_DEG: [f64; 3] = [35.77, 70.88, 0.0];

/// Marker scale while hovered.
pub const DEFAULT_HIGHLIGHT_SCALE: f64 = 1.5;

/// Offset of the hover overlay from the pointer, in pixels.
pub const DEFAULT_OVERLAY_OFFSET: [f32; 2] = [10.0, 10.0];

/// Configuration shared by the registry and the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeConfig {
    /// Globe radius in scene units.
    pub radius: f64,
    /// Common start point of all arcs.
    pub origin: GeoPoint,
    /// Initial XYZ Euler rotation of the globe, in degrees.
    pub initial_rotation_deg: [f64; 3],
    /// Samples per arc.
    pub sample_count: usize,
    pub focus: FocusSettings,
    pub highlight_scale: f64,
    pub overlay_offset: [f32; 2],
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            origin: DEFAULT_ORIGIN,
            initial_rotation_deg: DEFAULT_INITIAL_ROTATION_DEG,
            sample_count: DEFAULT_SAMPLE_COUNT,
            focus: FocusSettings::default(),
            highlight_scale: DEFAULT_HIGHLIGHT_SCALE,
            overlay_offset: DEFAULT_OVERLAY_OFFSET,
        }
    }
}

impl GlobeConfig {
    /// The globe's orientation at startup.
    pub fn initial_orientation(&self) -> DQuat {
        let [x, y, z] = self.initial_rotation_deg;
        DQuat::from_euler(EulerRot::XYZ, x.to_radians(), y.to_radians(), z.to_radians())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(Error::InvalidSetting {
                field: "radius",
                detail: format!("must be positive, got {}", self.radius),
            });
        }
        if !(self.origin.latitude.is_finite() && self.origin.longitude.is_finite()) {
            return Err(Error::InvalidOrigin {
                detail: "coordinates must be finite".to_string(),
            });
        }
        if !(-90.0..=90.0).contains(&self.origin.latitude) {
            return Err(Error::InvalidOrigin {
                detail: format!("latitude {} outside [-90, 90]", self.origin.latitude),
            });
        }
        if self.initial_rotation_deg.iter().any(|a| !a.is_finite()) {
            return Err(Error::InvalidSetting {
                field: "initial rotation",
                detail: "angles must be finite".to_string(),
            });
        }
        let step = self.focus.step_factor;
        if !(step > 0.0 && step <= 1.0) {
            return Err(Error::InvalidSetting {
                field: "focus step factor",
                detail: format!("{step} outside (0, 1]"),
            });
        }
        if !(self.focus.epsilon.is_finite() && self.focus.epsilon > 0.0) {
            return Err(Error::InvalidSetting {
                field: "focus epsilon",
                detail: format!("must be positive, got {}", self.focus.epsilon),
            });
        }
        if self.sample_count < 2 {
            return Err(Error::InvalidSampleCount {
                count: self.sample_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(GlobeConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_initial_orientation_is_x_then_y() {
        let config = GlobeConfig::default();
        let expected = DQuat::from_rotation_x(35.77_f64.to_radians())
            * DQuat::from_rotation_y(70.88_f64.to_radians());
        let q = config.initial_orientation();
        assert!((q * DVec3::Z - expected * DVec3::Z).length() < 1e-12);
        assert!((q * DVec3::X - expected * DVec3::X).length() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_sample_count() {
        let config = GlobeConfig {
            sample_count: 1,
            ..GlobeConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(Error::InvalidSampleCount { count: 1 })
        );
    }

    #[test]
    fn test_rejects_bad_origin() {
        let config = GlobeConfig {
            origin: GeoPoint::new(91.0, 0.0),
            ..GlobeConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidOrigin { .. })));
    }

    #[test]
    fn test_rejects_bad_settings() {
        let config = GlobeConfig {
            radius: 0.0,
            ..GlobeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidSetting { field: "radius", .. })
        ));

        let config = GlobeConfig {
            focus: FocusSettings {
                step_factor: 0.0,
                ..FocusSettings::default()
            },
            ..GlobeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidSetting {
                field: "focus step factor",
                ..
            })
        ));
    }
}
