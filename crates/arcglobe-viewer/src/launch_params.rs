//! Launch parameter parsing for the viewer.
//!
//! On native, parameters are parsed from command-line arguments using clap.
//! On WASM, defaults are used (CLI argument parsing is not available).

use std::fmt;
use std::path::PathBuf;

use arcglobe::{GeoPoint, GlobeConfig, GlobeController, Registry};

/// Default globe texture, relative to the asset directory.
const DEFAULT_TEXTURE: &str = "textures/earth.jpg";

/// Launch parameters for the viewer.
#[derive(Debug, Clone)]
pub struct LaunchParams {
    /// JSON destination table; the built-in table when `None`.
    pub destinations: Option<PathBuf>,
    /// Common start point of every arc.
    pub origin: GeoPoint,
    /// Samples per arc.
    pub samples: usize,
    /// Globe texture asset path.
    pub texture: String,
}

impl Default for LaunchParams {
    fn default() -> Self {
        let config = GlobeConfig::default();
        Self {
            destinations: None,
            origin: config.origin,
            samples: config.sample_count,
            texture: DEFAULT_TEXTURE.to_string(),
        }
    }
}

/// Errors that stop the viewer before a window is opened.
#[derive(Debug)]
pub enum LaunchError {
    /// The destination table could not be read.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The configuration or destination table is invalid.
    Config(arcglobe::Error),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            LaunchError::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaunchError::Read { source, .. } => Some(source),
            LaunchError::Config(e) => Some(e),
        }
    }
}

impl From<arcglobe::Error> for LaunchError {
    fn from(e: arcglobe::Error) -> Self {
        LaunchError::Config(e)
    }
}

impl LaunchParams {
    pub fn globe_config(&self) -> GlobeConfig {
        GlobeConfig {
            origin: self.origin,
            sample_count: self.samples,
            ..GlobeConfig::default()
        }
    }

    /// Load and validate the destination table.
    pub fn build_controller(&self) -> Result<GlobeController, LaunchError> {
        let config = self.globe_config();
        let registry = match &self.destinations {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| LaunchError::Read {
                    path: path.clone(),
                    source,
                })?;
                tracing::info!(path = %path.display(), "loading destination table");
                Registry::from_json(&json, &config)?
            }
            None => Registry::with_defaults(&config)?,
        };
        Ok(GlobeController::new(registry, config))
    }
}

#[cfg(not(target_family = "wasm"))]
mod native {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    #[command(about = "Interactive globe with arcs to each destination")]
    struct CliArgs {
        /// JSON file with the destination table.
        #[arg(long)]
        destinations: Option<PathBuf>,

        /// Latitude of the arc origin in degrees.
        #[arg(long, default_value_t = arcglobe::config::DEFAULT_ORIGIN.latitude)]
        origin_lat: f64,

        /// Longitude of the arc origin in degrees.
        #[arg(long, default_value_t = arcglobe::config::DEFAULT_ORIGIN.longitude)]
        origin_lon: f64,

        /// Number of points sampled along each arc.
        #[arg(long, default_value_t = arcglobe::arc::DEFAULT_SAMPLE_COUNT)]
        samples: usize,

        /// Globe texture, relative to the asset directory.
        #[arg(long, default_value = DEFAULT_TEXTURE)]
        texture: String,
    }

    pub fn parse() -> LaunchParams {
        let args = CliArgs::parse();
        LaunchParams {
            destinations: args.destinations,
            origin: GeoPoint::new(args.origin_lat, args.origin_lon),
            samples: args.samples,
            texture: args.texture,
        }
    }
}

/// Parse launch parameters from CLI args (native) or use defaults (WASM).
pub fn parse() -> LaunchParams {
    #[cfg(not(target_family = "wasm"))]
    {
        native::parse()
    }
    #[cfg(target_family = "wasm")]
    {
        LaunchParams::default()
    }
}
