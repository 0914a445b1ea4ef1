//! Geometry and interaction state for an interactive destination globe.
//!
//! A fixed origin on a unit globe is connected to a handful of destinations
//! by raised arcs. Hovering a destination reveals its arc progressively;
//! clicking it turns the globe until the destination faces the viewer.
//!
//! This crate has no renderer. It produces points, orientations and overlay
//! commands; the viewer application does the drawing and the picking.
//!
//! # Example
//!
//! ```
//! use arcglobe::{GlobeConfig, GlobeController, Registry};
//! use glam::{DVec3, Vec2};
//!
//! let config = GlobeConfig::default();
//! let registry = Registry::with_defaults(&config)?;
//! let mut controller = GlobeController::new(registry, config);
//!
//! let kenya = controller.destination_by_name("Kenya");
//! controller.on_hover(kenya, Vec2::new(320.0, 200.0));
//! controller.on_click(kenya, DVec3::Z);
//! controller.tick();
//!
//! let frame = controller.frame();
//! assert_eq!(frame.markers.len(), 5);
//! # Ok::<(), arcglobe::Error>(())
//! ```

pub mod arc;
pub mod config;
pub mod controller;
mod error;
pub mod focus;
pub mod projection;
pub mod registry;
pub mod reveal;

pub use arc::{ArcCurve, build_arc};
pub use config::GlobeConfig;
pub use controller::{FocusTransition, FrameView, GlobeController, MarkerView, OverlayCommand};
pub use error::{Error, Result};
pub use focus::{FocusSettings, FocusState, compute_focus_rotation};
pub use projection::{GeoPoint, project, unproject};
pub use registry::{
    Destination, DestinationEntry, DestinationId, Registry, Rgb, default_destinations,
};
pub use reveal::RevealState;
