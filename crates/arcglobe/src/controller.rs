//! Hover/click handling and the per-frame update.
//!
//! [`GlobeController`] owns every piece of mutable interaction state. The host
//! resolves pointer events to a destination (or none) with its own picking,
//! feeds them to [`GlobeController::on_hover`] and
//! [`GlobeController::on_click`], calls [`GlobeController::tick`] once per
//! frame, and draws from [`GlobeController::frame`].

use glam::{DQuat, DVec3, Vec2};

use crate::config::GlobeConfig;
use crate::focus::FocusState;
use crate::projection::{GeoPoint, unproject};
use crate::registry::{Destination, DestinationId, Registry};
use crate::reveal::RevealState;

/// What the overlay should show after a hover event.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCommand {
    /// Show the destination's flag and name at `anchor` (screen pixels).
    Show {
        destination: DestinationId,
        name: String,
        flag: String,
        anchor: Vec2,
    },
    Hide,
}

/// Result of a click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusTransition {
    /// The globe started turning towards `destination`.
    Started {
        destination: DestinationId,
        target: DQuat,
    },
    /// The click missed; any pending rotation was dropped.
    Cleared,
}

/// Per-destination render state for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerView<'a> {
    pub id: DestinationId,
    pub destination: &'a Destination,
    /// Revealed prefix of the arc, in the globe's local frame.
    pub visible_points: &'a [DVec3],
    pub scale: f64,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView<'a> {
    pub orientation: DQuat,
    pub markers: Vec<MarkerView<'a>>,
}

/// Owner of the registry and all interaction state.
#[derive(Debug, Clone)]
pub struct GlobeController {
    registry: Registry,
    config: GlobeConfig,
    focus: FocusState,
    reveal: Option<RevealState>,
    hovered: Option<DestinationId>,
}

impl GlobeController {
    /// Start with the globe at its configured initial orientation.
    pub fn new(registry: Registry, config: GlobeConfig) -> Self {
        let focus = FocusState::new(config.initial_orientation());
        Self {
            registry,
            config,
            focus,
            reveal: None,
            hovered: None,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    pub fn reveal(&self) -> Option<&RevealState> {
        self.reveal.as_ref()
    }

    pub fn hovered(&self) -> Option<DestinationId> {
        self.hovered
    }

    pub fn orientation(&self) -> DQuat {
        self.focus.current()
    }

    /// Geographic coordinate of the surface point facing `viewer_direction`.
    ///
    /// Undoes the current orientation to get back into the globe's frame,
    /// then the initial orientation to get back to the projection's frame.
    pub fn geo_facing(&self, viewer_direction: DVec3) -> GeoPoint {
        let local = self.focus.current().inverse() * viewer_direction;
        unproject(self.config.initial_orientation() * local)
    }

    /// Look up a destination by display name.
    pub fn destination_by_name(&self, name: &str) -> Option<DestinationId> {
        self.registry.find(name)
    }

    /// Ids outside the registry are treated as a miss.
    fn resolve(&self, hit: Option<DestinationId>) -> Option<DestinationId> {
        hit.filter(|id| self.registry.contains(*id))
    }

    /// Select the destination whose arc is revealed.
    ///
    /// Selecting the current destination again keeps its progress. Any other
    /// change drops the previous reveal, hiding its arc, and starts the new
    /// one from zero. Returns `true` if the selection changed.
    pub fn select(&mut self, selection: Option<DestinationId>) -> bool {
        let selection = self.resolve(selection);
        let current = self.reveal.map(|r| r.destination());
        if current == selection {
            return false;
        }
        tracing::debug!(from = ?current, to = ?selection, "selection changed");
        self.reveal = selection.map(RevealState::new);
        true
    }

    /// Handle a pointer move resolved to `hit`.
    ///
    /// Hovering a destination highlights its marker and reveals its arc; a
    /// miss clears both and hides the overlay.
    pub fn on_hover(&mut self, hit: Option<DestinationId>, pointer: Vec2) -> OverlayCommand {
        let hit = self.resolve(hit);
        self.hovered = hit;
        self.select(hit);

        let Some((id, destination)) = hit.and_then(|id| Some((id, self.registry.get(id)?)))
        else {
            return OverlayCommand::Hide;
        };
        OverlayCommand::Show {
            destination: id,
            name: destination.name.clone(),
            flag: destination.flag.clone(),
            anchor: pointer + Vec2::from(self.config.overlay_offset),
        }
    }

    /// Handle a click resolved to `hit`.
    ///
    /// `viewer_direction` points from the globe's centre towards the camera.
    /// The marker's current world position is rotated onto it.
    pub fn on_click(
        &mut self,
        hit: Option<DestinationId>,
        viewer_direction: DVec3,
    ) -> FocusTransition {
        let Some((id, destination)) = self
            .resolve(hit)
            .and_then(|id| Some((id, self.registry.get(id)?)))
        else {
            if self.focus.is_converging() {
                tracing::debug!("focus cancelled");
            }
            self.focus.cancel();
            return FocusTransition::Cleared;
        };

        let world = self.focus.current() * destination.marker;
        self.focus.focus_on(world, viewer_direction);
        let target = self.focus.target().unwrap_or_else(|| self.focus.current());
        tracing::debug!(destination = %destination.name, "focusing");
        FocusTransition::Started {
            destination: id,
            target,
        }
    }

    /// Advance focus convergence and the active reveal by one frame.
    pub fn tick(&mut self) {
        self.focus.step(&self.config.focus);
        if let Some(reveal) = self.reveal.as_mut()
            && let Some(destination) = self.registry.get(reveal.destination())
        {
            reveal.advance(destination.reveal_speed);
        }
    }

    /// Revealed arc points of `id`; empty unless it is the selection.
    pub fn visible_points(&self, id: DestinationId) -> &[DVec3] {
        match (self.reveal, self.registry.get(id)) {
            (Some(reveal), Some(destination)) if reveal.destination() == id => {
                destination.arc.visible_prefix(reveal.progress())
            }
            _ => &[],
        }
    }

    /// Marker scale: enlarged while hovered.
    pub fn marker_scale(&self, id: DestinationId) -> f64 {
        if self.hovered == Some(id) {
            self.config.highlight_scale
        } else {
            1.0
        }
    }

    pub fn frame(&self) -> FrameView<'_> {
        FrameView {
            orientation: self.focus.current(),
            markers: self
                .registry
                .iter()
                .map(|(id, destination)| MarkerView {
                    id,
                    destination,
                    visible_points: self.visible_points(id),
                    scale: self.marker_scale(id),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> GlobeController {
        let config = GlobeConfig::default();
        let registry = Registry::with_defaults(&config).unwrap();
        GlobeController::new(registry, config)
    }

    fn id(controller: &GlobeController, name: &str) -> DestinationId {
        controller.destination_by_name(name).unwrap()
    }

    #[test]
    fn test_switching_selection_resets_reveal() {
        let mut controller = controller();
        let maroc = id(&controller, "Maroc");
        let kenya = id(&controller, "Kenya");

        controller.on_hover(Some(maroc), Vec2::ZERO);
        for _ in 0..10 {
            controller.tick();
        }
        let reveal = controller.reveal().unwrap();
        assert_eq!(reveal.destination(), maroc);
        assert!(reveal.progress() > 0.0 && !reveal.is_complete());
        assert!(!controller.visible_points(maroc).is_empty());

        controller.on_hover(Some(kenya), Vec2::ZERO);
        assert!(controller.visible_points(maroc).is_empty());
        let reveal = controller.reveal().unwrap();
        assert_eq!(reveal.destination(), kenya);
        assert!(reveal.progress().abs() < f64::EPSILON);

        controller.tick();
        assert!(controller.visible_points(maroc).is_empty());
        assert_eq!(controller.visible_points(kenya).len(), 3);
    }

    #[test]
    fn test_reveal_monotonic_while_selected() {
        let mut controller = controller();
        let kenya = id(&controller, "Kenya");
        controller.on_hover(Some(kenya), Vec2::ZERO);

        let mut previous = 0;
        for _ in 0..60 {
            controller.tick();
            // Hovering the same marker again must not restart the reveal.
            controller.on_hover(Some(kenya), Vec2::new(5.0, 5.0));
            let visible = controller.visible_points(kenya).len();
            assert!(visible >= previous);
            previous = visible;
        }
        assert_eq!(previous, 101);
        assert!(controller.reveal().unwrap().is_complete());
    }

    #[test]
    fn test_select_drives_reveal() {
        let mut controller = controller();
        let maroc = id(&controller, "Maroc");
        let kenya = id(&controller, "Kenya");

        assert!(controller.select(Some(maroc)));
        for _ in 0..10 {
            controller.tick();
        }
        let progress = controller.reveal().unwrap().progress();
        assert_eq!(controller.visible_points(maroc).len(), 30);

        // Selecting the same destination again keeps its progress.
        assert!(!controller.select(Some(maroc)));
        assert!((controller.reveal().unwrap().progress() - progress).abs() < f64::EPSILON);

        assert!(controller.select(Some(kenya)));
        assert!(controller.visible_points(maroc).is_empty());
        assert!(controller.reveal().unwrap().progress().abs() < f64::EPSILON);
        controller.tick();
        assert_eq!(controller.visible_points(kenya).len(), 3);

        // Selection alone does not highlight.
        assert!(controller.hovered().is_none());
        assert!(controller.select(None));
        assert!(controller.reveal().is_none());
        assert!(!controller.select(Some(DestinationId(99))));
    }

    #[test]
    fn test_geo_facing() {
        let mut controller = controller();
        let origin = controller.config().origin;

        // Before any focus the origin's projected direction faces itself.
        let geo = controller.geo_facing(origin.to_surface(1.0));
        assert!((geo.latitude - origin.latitude).abs() < 1e-9);
        assert!((geo.longitude - origin.longitude).abs() < 1e-9);

        let madagascar = id(&controller, "Madagascar");
        controller.on_click(Some(madagascar), DVec3::Z);
        while controller.focus().is_converging() {
            controller.tick();
        }
        let geo = controller.geo_facing(DVec3::new(0.0, 0.0, 2.5));
        assert!((geo.latitude - -47.7669).abs() < 1e-6);
        assert!((geo.longitude - 48.8691).abs() < 1e-6);
    }

    #[test]
    fn test_hover_miss_clears_state() {
        let mut controller = controller();
        let maroc = id(&controller, "Maroc");
        controller.on_hover(Some(maroc), Vec2::ZERO);
        controller.tick();
        assert!((controller.marker_scale(maroc) - 1.5).abs() < f64::EPSILON);

        assert_eq!(controller.on_hover(None, Vec2::ZERO), OverlayCommand::Hide);
        assert!(controller.reveal().is_none());
        assert!(controller.hovered().is_none());
        assert!(controller.visible_points(maroc).is_empty());
        assert!((controller.marker_scale(maroc) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hover_overlay() {
        let mut controller = controller();
        let kenya = id(&controller, "Kenya");
        let command = controller.on_hover(Some(kenya), Vec2::new(100.0, 40.0));
        match command {
            OverlayCommand::Show {
                destination,
                name,
                flag,
                anchor,
            } => {
                assert_eq!(destination, kenya);
                assert_eq!(name, "Kenya");
                assert!(flag.ends_with("Flag_of_Kenya.svg"));
                assert_eq!(anchor, Vec2::new(110.0, 50.0));
            }
            OverlayCommand::Hide => panic!("expected overlay"),
        }
    }

    #[test]
    fn test_unknown_id_is_a_miss() {
        let mut controller = controller();
        let command = controller.on_hover(Some(DestinationId(99)), Vec2::ZERO);
        assert_eq!(command, OverlayCommand::Hide);
        assert!(controller.reveal().is_none());
        assert_eq!(
            controller.on_click(Some(DestinationId(99)), DVec3::Z),
            FocusTransition::Cleared
        );
    }

    #[test]
    fn test_click_turns_marker_to_viewer() {
        let mut controller = controller();
        let madagascar = id(&controller, "Madagascar");
        let viewer = DVec3::new(0.0, 0.0, 2.5);

        let transition = controller.on_click(Some(madagascar), viewer);
        assert!(matches!(
            transition,
            FocusTransition::Started { destination, .. } if destination == madagascar
        ));
        assert!(controller.focus().is_converging());

        let mut frames = 0;
        while controller.focus().is_converging() {
            controller.tick();
            frames += 1;
            assert!(frames < 1_000);
        }

        let marker = controller.registry().get(madagascar).unwrap().marker;
        let world = controller.orientation() * marker;
        assert!((world - DVec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_click_miss_cancels_focus() {
        let mut controller = controller();
        let maroc = id(&controller, "Maroc");
        controller.on_click(Some(maroc), DVec3::Z);
        controller.tick();
        let orientation = controller.orientation();

        assert_eq!(controller.on_click(None, DVec3::Z), FocusTransition::Cleared);
        assert!(!controller.focus().is_converging());
        controller.tick();
        assert_eq!(controller.orientation(), orientation);
    }

    #[test]
    fn test_frame_view() {
        let mut controller = controller();
        let tanzanie = id(&controller, "Tanzanie");
        controller.on_hover(Some(tanzanie), Vec2::ZERO);
        for _ in 0..5 {
            controller.tick();
        }

        let frame = controller.frame();
        assert_eq!(frame.orientation, controller.orientation());
        assert_eq!(frame.markers.len(), 5);
        for marker in &frame.markers {
            if marker.id == tanzanie {
                assert_eq!(marker.visible_points.len(), 15);
                assert!((marker.scale - 1.5).abs() < f64::EPSILON);
            } else {
                assert!(marker.visible_points.is_empty());
                assert!((marker.scale - 1.0).abs() < f64::EPSILON);
            }
        }
    }
}
