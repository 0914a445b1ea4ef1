//! Bringing a selected surface point round to face the viewer.
//!
//! A click produces a target orientation for the globe; every frame the
//! current orientation slerps a fixed fraction of the way towards it until
//! the remaining angle drops below a threshold, at which point it snaps.

use glam::{DQuat, DVec3};

/// Fraction of the remaining rotation covered per frame.
pub const DEFAULT_STEP_FACTOR: f64 = 0.05;
/// Remaining angle (radians) below which convergence snaps to the target.
pub const DEFAULT_EPSILON: f64 = 0.001;

/// Rotation that carries `selected` onto `viewer_direction`, applied on top
/// of `current`.
///
/// `selected` is the clicked point in world space (i.e. already rotated by
/// `current`). The shortest-arc rotation `q` between the two directions is
/// composed as `q * current`, so the globe keeps its existing orientation and
/// additionally turns the point towards the viewer.
///
/// Antiparallel inputs have no unique shortest arc; a half turn about an
/// axis orthogonal to `selected` is used. Zero-length inputs leave the
/// orientation unchanged.
#[must_use]
pub fn compute_focus_rotation(selected: DVec3, viewer_direction: DVec3, current: DQuat) -> DQuat {
    let (Some(from), Some(to)) = (selected.try_normalize(), viewer_direction.try_normalize())
    else {
        return current;
    };
    let q = DQuat::from_rotation_arc(from, to);
    (q * current).normalize()
}

/// Tuning for focus convergence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusSettings {
    /// Slerp fraction applied each frame, in `(0, 1]`.
    pub step_factor: f64,
    /// Snap threshold in radians.
    pub epsilon: f64,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            step_factor: DEFAULT_STEP_FACTOR,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Orientation of the globe and the rotation it is converging towards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusState {
    current: DQuat,
    target: Option<DQuat>,
}

impl Default for FocusState {
    fn default() -> Self {
        Self::new(DQuat::IDENTITY)
    }
}

impl FocusState {
    pub fn new(orientation: DQuat) -> Self {
        Self {
            current: orientation.normalize(),
            target: None,
        }
    }

    pub fn current(&self) -> DQuat {
        self.current
    }

    pub fn target(&self) -> Option<DQuat> {
        self.target
    }

    pub fn is_converging(&self) -> bool {
        self.target.is_some()
    }

    /// Remaining angle to the target, if any.
    pub fn angle_to_target(&self) -> Option<f64> {
        self.target.map(|target| self.current.angle_between(target))
    }

    /// Start converging towards `target`, replacing any previous target.
    pub fn begin(&mut self, target: DQuat) {
        self.target = Some(target.normalize());
    }

    /// Start converging so that the world-space point `selected` ends up
    /// facing `viewer_direction`.
    pub fn focus_on(&mut self, selected: DVec3, viewer_direction: DVec3) {
        self.begin(compute_focus_rotation(
            selected,
            viewer_direction,
            self.current,
        ));
    }

    /// Drop the target and stay at the current orientation.
    pub fn cancel(&mut self) {
        self.target = None;
    }

    /// Advance one frame. Returns `true` while still converging.
    pub fn step(&mut self, settings: &FocusSettings) -> bool {
        let Some(target) = self.target else {
            return false;
        };

        self.current = self
            .current
            .slerp(target, settings.step_factor)
            .normalize();

        if self.current.angle_between(target) < settings.epsilon {
            self.current = target;
            self.target = None;
            tracing::debug!("focus converged");
            return false;
        }
        true
    }
}
