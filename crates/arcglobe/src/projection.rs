//! Latitude/longitude to sphere-surface conversion.
//!
//! The globe is polar-axis aligned on `+Y`: latitude 90 is the north pole at
//! `(0, r, 0)`. On the equator, longitude 0 lands on `+X` and longitude 90 on
//! `+Z`. This matches the texture mapping of the globe mesh; callers wanting a
//! different seam must pre-rotate.

use glam::DVec3;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Project onto a sphere of the given radius.
    #[must_use]
    pub fn to_surface(self, radius: f64) -> DVec3 {
        project(self.latitude, self.longitude, radius)
    }
}

/// Convert latitude, longitude (degrees) and radius to a point on the sphere.
///
/// Uses colatitude `phi = 90 - lat` and azimuth `theta = lon`:
///
/// ```text
/// x = r sin(phi) cos(theta)
/// y = r cos(phi)
/// z = r sin(phi) sin(theta)
/// ```
///
/// The poles are well-defined: at `lat = ±90`, `sin(phi) = 0` and the
/// longitude drops out.
#[must_use]
pub fn project(lat_deg: f64, lon_deg: f64, radius: f64) -> DVec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = lon_deg.to_radians();
    DVec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Recover the geographic coordinate of a point, ignoring its radius.
///
/// Longitude is returned in `(-180, 180]`. The origin maps to `(0, 0)`.
#[must_use]
pub fn unproject(point: DVec3) -> GeoPoint {
    let radius = point.length();
    if radius == 0.0 {
        return GeoPoint::new(0.0, 0.0);
    }
    let phi = (point.y / radius).clamp(-1.0, 1.0).acos();
    let theta = point.z.atan2(point.x);
    GeoPoint::new(90.0 - phi.to_degrees(), theta.to_degrees())
}
