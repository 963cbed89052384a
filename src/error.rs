//! Error types surfaced while building levels, missions and tuning.
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when configuration cannot produce a runnable mission.
///
/// Every variant is detected at construction time; the frame step itself is
/// infallible.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A mission was configured without any stops.
    #[error("mission `{mission}` has no stops")]
    EmptyRoute {
        /// Display name of the offending mission.
        mission: String,
    },
    /// A zone or obstacle has non-positive or non-finite extents.
    #[error("{what} has a degenerate rectangle ({width}x{height})")]
    DegenerateRect {
        /// Human-readable location of the rectangle.
        what: String,
        /// Offending width.
        width: f32,
        /// Offending height.
        height: f32,
    },
    /// A zone extends beyond the map.
    #[error("{what} lies outside the {map_width}x{map_height} map")]
    OutOfBounds {
        /// Human-readable location of the rectangle or point.
        what: String,
        /// Map width.
        map_width: f32,
        /// Map height.
        map_height: f32,
    },
    /// The map itself has no area.
    #[error("map size {width}x{height} must be positive")]
    InvalidMapSize {
        /// Map width.
        width: f32,
        /// Map height.
        height: f32,
    },
    /// The requested level key is not part of the catalog.
    #[error("unknown level `{0}`")]
    UnknownLevel(String),
    /// The requested archetype name is not recognised.
    #[error("unknown mission archetype `{0}`")]
    UnknownArchetype(String),
    /// A tuning value is outside its meaningful range.
    #[error("invalid tuning value `{field}`: {reason}")]
    InvalidTuning {
        /// Dotted path of the field.
        field: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// A TOML tuning document failed to parse.
    #[error("failed to parse tuning: {0}")]
    Toml(#[from] toml::de::Error),
    /// A JSON level descriptor failed to parse.
    #[error("failed to parse level descriptor: {0}")]
    Json(#[from] serde_json::Error),
    /// A configuration file could not be read.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn degenerate(what: impl Into<String>, width: f32, height: f32) -> Self {
        Self::DegenerateRect {
            what: what.into(),
            width,
            height,
        }
    }

    pub(crate) fn out_of_bounds(what: impl Into<String>, map_width: f32, map_height: f32) -> Self {
        Self::OutOfBounds {
            what: what.into(),
            map_width,
            map_height,
        }
    }
}
