//! The destination table and the arcs cached for it.
//!
//! Destinations are validated once at startup. Marker positions and arcs are
//! computed in world space against the globe's initial orientation and then
//! stored in the globe's local frame, so they stay attached to the surface
//! however the globe is rotated afterwards.

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::arc::ArcCurve;
use crate::config::GlobeConfig;
use crate::error::{Error, Result};
use crate::projection::GeoPoint;

/// Index of a destination in its [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DestinationId(pub usize);

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An sRGB colour, written as `"#RRGGBB"` in destination tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u32);

impl Rgb {
    pub fn r(self) -> u8 {
        self.0.to_be_bytes()[1]
    }

    pub fn g(self) -> u8 {
        self.0.to_be_bytes()[2]
    }

    pub fn b(self) -> u8 {
        self.0.to_be_bytes()[3]
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("expected #RRGGBB, got {s:?}"));
        }
        u32::from_str_radix(hex, 16)
            .map(Rgb)
            .map_err(|e| format!("invalid colour {s:?}: {e}"))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// One row of the destination table, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationEntry {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Peak radius of the arc relative to the globe radius. Must exceed 1.
    pub arc_height: f64,
    /// Reveal progress added per frame, in `(0, 1]`.
    pub reveal_speed: f64,
    pub color: Rgb,
    /// Flag image reference (usually a URL).
    pub flag: String,
}

impl DestinationEntry {
    fn invalid(&self, field: &'static str, detail: String) -> Error {
        Error::InvalidDestination {
            name: self.name.clone(),
            field,
            detail,
        }
    }

    /// Check ranges. Longitude only needs to be finite.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("name", "must not be empty".to_string()));
        }
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(self.invalid("lat", format!("{} outside [-90, 90]", self.lat)));
        }
        if !self.lon.is_finite() {
            return Err(self.invalid("lon", format!("{} is not finite", self.lon)));
        }
        if !self.arc_height.is_finite() || self.arc_height <= 1.0 {
            return Err(self.invalid(
                "arc_height",
                format!("{} must be greater than 1", self.arc_height),
            ));
        }
        if !(self.reveal_speed > 0.0 && self.reveal_speed <= 1.0) {
            return Err(self.invalid(
                "reveal_speed",
                format!("{} outside (0, 1]", self.reveal_speed),
            ));
        }
        Ok(())
    }
}

/// The built-in destination table.
pub fn default_destinations() -> Vec<DestinationEntry> {
    let row = |name: &str, lat, lon, arc_height, color, flag: &str| DestinationEntry {
        name: name.to_string(),
        lat,
        lon,
        arc_height,
        reveal_speed: 0.03,
        color: Rgb(color),
        flag: format!("https://upload.wikimedia.org/wikipedia/commons/{flag}"),
    };
    vec![
        row("Algérie", -1.2289, 104.0, 1.1, 0x00_9639, "7/77/Flag_of_Algeria.svg"),
        row("Maroc", 0.0, 110.8, 1.1, 0xC1_272D, "2/2c/Flag_of_Morocco.svg"),
        row("Tanzanie", -39.7669, 69.8691, 1.3, 0x1E_B53A, "3/38/Flag_of_Tanzania.svg"),
        row("Kenya", -32.7669, 68.5, 1.3, 0x00_0000, "4/49/Flag_of_Kenya.svg"),
        row("Madagascar", -47.7669, 48.8691, 1.4, 0x00_7E3A, "b/bc/Flag_of_Madagascar.svg"),
    ]
}

/// A validated destination with its marker and cached arc.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub name: String,
    pub geo: GeoPoint,
    pub arc_height: f64,
    pub reveal_speed: f64,
    pub color: Rgb,
    pub flag: String,
    /// Marker position in the globe's local frame.
    pub marker: DVec3,
    /// Arc from the origin to the marker, in the globe's local frame.
    pub arc: ArcCurve,
}

/// All destinations, owned for the lifetime of the program.
#[derive(Debug, Clone)]
pub struct Registry {
    destinations: Vec<Destination>,
    /// Arc start in the globe's local frame.
    origin: DVec3,
}

impl Registry {
    /// Validate `entries` and build every marker and arc.
    pub fn new(entries: Vec<DestinationEntry>, config: &GlobeConfig) -> Result<Self> {
        config.validate()?;
        if entries.is_empty() {
            return Err(Error::EmptyRegistry);
        }
        for (i, entry) in entries.iter().enumerate() {
            entry.validate()?;
            if entries[..i].iter().any(|other| other.name == entry.name) {
                return Err(Error::DuplicateDestination {
                    name: entry.name.clone(),
                });
            }
        }

        let to_local = config.initial_orientation().inverse();
        let start = config.origin.to_surface(config.radius);

        let destinations: Vec<Destination> = entries
            .into_iter()
            .map(|entry| {
                let geo = GeoPoint::new(entry.lat, entry.lon);
                let end = geo.to_surface(config.radius);
                let arc = ArcCurve::new(
                    start,
                    end,
                    entry.arc_height * config.radius,
                    config.sample_count,
                )
                .map_points(|p| to_local * p);
                Destination {
                    name: entry.name,
                    geo,
                    arc_height: entry.arc_height,
                    reveal_speed: entry.reveal_speed,
                    color: entry.color,
                    flag: entry.flag,
                    marker: to_local * end,
                    arc,
                }
            })
            .collect();

        tracing::info!(
            destinations = destinations.len(),
            samples = config.sample_count,
            "destination registry built"
        );

        Ok(Self {
            destinations,
            origin: to_local * start,
        })
    }

    /// Parse a JSON array of [`DestinationEntry`] and build the registry.
    pub fn from_json(json: &str, config: &GlobeConfig) -> Result<Self> {
        let entries: Vec<DestinationEntry> = serde_json::from_str(json)?;
        Self::new(entries, config)
    }

    /// Registry over [`default_destinations`].
    pub fn with_defaults(config: &GlobeConfig) -> Result<Self> {
        Self::new(default_destinations(), config)
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    pub fn get(&self, id: DestinationId) -> Option<&Destination> {
        self.destinations.get(id.0)
    }

    pub fn contains(&self, id: DestinationId) -> bool {
        id.0 < self.destinations.len()
    }

    pub fn find(&self, name: &str) -> Option<DestinationId> {
        self.destinations
            .iter()
            .position(|d| d.name == name)
            .map(DestinationId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DestinationId, &Destination)> {
        self.destinations
            .iter()
            .enumerate()
            .map(|(i, d)| (DestinationId(i), d))
    }

    /// Arc start point in the globe's local frame.
    pub fn origin(&self) -> DVec3 {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> DestinationEntry {
        DestinationEntry {
            name: name.to_string(),
            lat: 0.0,
            lon: 110.8,
            arc_height: 1.1,
            reveal_speed: 0.03,
            color: Rgb(0xC1_272D),
            flag: String::new(),
        }
    }

    fn expect_field(entry: DestinationEntry, expected: &str) {
        match Registry::new(vec![entry], &GlobeConfig::default()) {
            Err(Error::InvalidDestination { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected invalid {expected}, got {other:?}"),
        }
    }

    #[test]
    fn test_default_registry() {
        let registry = Registry::with_defaults(&GlobeConfig::default()).unwrap();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.find("Kenya"), Some(DestinationId(3)));
        assert_eq!(registry.find("Atlantis"), None);

        for (_, destination) in registry.iter() {
            assert_eq!(destination.arc.len(), 101);
            assert!((destination.marker.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_arcs_are_in_local_frame() {
        let config = GlobeConfig::default();
        let registry = Registry::with_defaults(&config).unwrap();
        let orientation = config.initial_orientation();
        let maroc = registry.get(registry.find("Maroc").unwrap()).unwrap();

        // Rotating back by the initial orientation recovers world positions.
        let world_end = orientation * maroc.marker;
        assert!((world_end - GeoPoint::new(0.0, 110.8).to_surface(1.0)).length() < 1e-9);
        let world_start = orientation * maroc.arc.points[0];
        assert!((world_start - config.origin.to_surface(1.0)).length() < 1e-9);
        assert!((registry.origin() - maroc.arc.points[0]).length() < 1e-12);
        assert!((maroc.arc.points[100] - maroc.marker).length() < 1e-9);
    }

    #[test]
    fn test_rejects_empty_table() {
        assert!(matches!(
            Registry::new(Vec::new(), &GlobeConfig::default()),
            Err(Error::EmptyRegistry)
        ));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = Registry::new(vec![entry("Maroc"), entry("Maroc")], &GlobeConfig::default());
        assert_eq!(
            result.err(),
            Some(Error::DuplicateDestination {
                name: "Maroc".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_invalid_fields() {
        expect_field(entry("  "), "name");
        expect_field(DestinationEntry { lat: 90.5, ..entry("a") }, "lat");
        expect_field(DestinationEntry { lat: f64::NAN, ..entry("a") }, "lat");
        expect_field(DestinationEntry { lon: f64::INFINITY, ..entry("a") }, "lon");
        expect_field(DestinationEntry { arc_height: 1.0, ..entry("a") }, "arc_height");
        expect_field(DestinationEntry { arc_height: -2.0, ..entry("a") }, "arc_height");
        expect_field(DestinationEntry { reveal_speed: 0.0, ..entry("a") }, "reveal_speed");
        expect_field(DestinationEntry { reveal_speed: 1.5, ..entry("a") }, "reveal_speed");
        expect_field(
            DestinationEntry {
                reveal_speed: f64::NAN,
                ..entry("a")
            },
            "reveal_speed",
        );
    }

    #[test]
    fn test_accepts_wide_longitudes() {
        let table = vec![DestinationEntry { lon: 350.0, ..entry("a") }];
        assert!(Registry::new(table, &GlobeConfig::default()).is_ok());
    }

    #[test]
    fn test_from_json() {
        let json = r##"[
            {"name": "Maroc", "lat": 0, "lon": 110.8, "arc_height": 1.1,
             "reveal_speed": 0.03, "color": "#C1272D", "flag": "maroc.svg"}
        ]"##;
        let registry = Registry::from_json(json, &GlobeConfig::default()).unwrap();
        let maroc = registry.get(DestinationId(0)).unwrap();
        assert_eq!(maroc.color, Rgb(0xC1_272D));
        assert_eq!(maroc.flag, "maroc.svg");
    }

    #[test]
    fn test_from_json_rejects_bad_colour() {
        let json = r#"[{"name": "a", "lat": 0, "lon": 0, "arc_height": 1.1,
                        "reveal_speed": 0.03, "color": "red", "flag": ""}]"#;
        assert!(matches!(
            Registry::from_json(json, &GlobeConfig::default()),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_rgb() {
        let rgb: Rgb = "#1EB53A".parse().unwrap();
        assert_eq!((rgb.r(), rgb.g(), rgb.b()), (0x1E, 0xB5, 0x3A));
        assert_eq!(rgb.to_string(), "#1EB53A");
        assert!("#12345".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_default_table_round_trips_through_json() {
        let json = serde_json::to_string(&default_destinations()).unwrap();
        let registry = Registry::from_json(&json, &GlobeConfig::default()).unwrap();
        assert_eq!(registry.len(), 5);
    }
}
