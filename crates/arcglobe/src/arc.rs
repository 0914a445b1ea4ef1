//! Raised arcs between two surface points.
//!
//! An arc is a quadratic Bézier curve whose control point is the chord
//! midpoint pushed out to `height_factor` times the unit radius. Arcs are
//! sampled once and revealed progressively by slicing a prefix.

use glam::DVec3;

/// Default number of samples per arc (100 segments).
pub const DEFAULT_SAMPLE_COUNT: usize = 101;

/// Chords shorter than this are treated as passing through the centre.
const DEGENERATE_MIDPOINT: f64 = 1e-12;

/// A sampled arc from `start` to `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcCurve {
    pub start: DVec3,
    pub end: DVec3,
    /// Points along the curve, `start` first and `end` last.
    pub points: Vec<DVec3>,
}

impl ArcCurve {
    /// Build and sample an arc. See [`build_arc`].
    #[must_use]
    pub fn new(start: DVec3, end: DVec3, height_factor: f64, sample_count: usize) -> Self {
        Self {
            start,
            end,
            points: build_arc(start, end, height_factor, sample_count),
        }
    }

    /// Number of sampled points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The points shown at the given reveal progress.
    ///
    /// Returns `points[..floor(progress * len)]`, with `progress` clamped to
    /// `[0, 1]` so that a finished reveal shows the whole arc.
    #[must_use]
    pub fn visible_prefix(&self, progress: f64) -> &[DVec3] {
        &self.points[..visible_count(progress, self.points.len())]
    }

    /// Transform every point, e.g. from world space into the globe's frame.
    #[must_use]
    pub fn map_points(&self, f: impl Fn(DVec3) -> DVec3) -> Self {
        Self {
            start: f(self.start),
            end: f(self.end),
            points: self.points.iter().copied().map(f).collect(),
        }
    }
}

/// Number of points visible at `progress` for an arc of `len` points.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn visible_count(progress: f64, len: usize) -> usize {
    if progress.is_nan() {
        return 0;
    }
    let count = (progress.clamp(0.0, 1.0) * len as f64).floor() as usize;
    count.min(len)
}

/// The raised control point of an arc.
///
/// The chord midpoint is re-projected to radius `height_factor`. When the
/// endpoints are antipodal the chord passes through the centre and any
/// direction orthogonal to `start` is a valid great circle; a fixed one is
/// chosen so the result is deterministic.
#[must_use]
pub fn raised_midpoint(start: DVec3, end: DVec3, height_factor: f64) -> DVec3 {
    let chord_mid = start.lerp(end, 0.5);
    let scale = start.length().max(end.length());
    let direction = if chord_mid.length() > DEGENERATE_MIDPOINT * scale.max(1.0) {
        chord_mid.normalize()
    } else {
        start
            .try_normalize()
            .map_or(DVec3::Y, |d| d.any_orthonormal_vector())
    };
    direction * height_factor
}

/// Sample the quadratic Bézier `(start, mid, end)` at `sample_count` evenly
/// spaced parameters, both endpoints included.
///
/// Never fails: coincident endpoints produce `sample_count` copies of the
/// point, `sample_count == 1` yields `[start]` and zero yields nothing.
/// `height_factor <= 1` flattens or inverts the arc but is not rejected.
///
/// The curve at `t = 0.5` is `(chord_mid + mid) / 2`, which has length
/// `(|chord_mid| + height_factor) / 2`. For unit-radius endpoints it therefore
/// rises above the surface only when `height_factor > 2 - |chord_mid|`;
/// distant endpoints (short `chord_mid`) need a taller arc than close ones.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn build_arc(start: DVec3, end: DVec3, height_factor: f64, sample_count: usize) -> Vec<DVec3> {
    match sample_count {
        0 => return Vec::new(),
        1 => return vec![start],
        _ => {}
    }
    if start == end {
        return vec![start; sample_count];
    }

    let mid = raised_midpoint(start, end, height_factor);
    let last = (sample_count - 1) as f64;
    (0..sample_count)
        .map(|i| quadratic_bezier(start, mid, end, i as f64 / last))
        .collect()
}

fn quadratic_bezier(p0: DVec3, p1: DVec3, p2: DVec3, t: f64) -> DVec3 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}
