//! Level descriptors and the built-in level catalog.
//!
//! A descriptor is read-only input: map size, spawn pose, mission zones,
//! obstacle footprints and optionally an explicit encounter population.
//! Descriptors can be authored as JSON or taken from [`catalog`].
use std::fs;
use std::path::Path;

use glam::Vec2;
use log::debug;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::Rect;
use crate::numeric::floor_to_i64;
use crate::tuning::EncounterTuning;

/// Fixed zones used by the time-trial and multi-stop routes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteZones {
    /// Time-trial start and first multi-stop pickup.
    pub a: Rect,
    /// Time-trial finish and last multi-stop drop.
    pub b: Rect,
    /// First multi-stop drop.
    pub c: Rect,
    /// Second multi-stop pickup.
    pub d: Rect,
}

impl Default for RouteZones {
    fn default() -> Self {
        Self {
            a: Rect::new(200.0, 200.0, 80.0, 80.0),
            b: Rect::new(1200.0, 600.0, 100.0, 100.0),
            c: Rect::new(800.0, 150.0, 90.0, 90.0),
            d: Rect::new(400.0, 700.0, 85.0, 85.0),
        }
    }
}

impl RouteZones {
    fn named(&self) -> [(&'static str, Rect); 4] {
        [
            ("route zone A", self.a),
            ("route zone B", self.b),
            ("route zone C", self.c),
            ("route zone D", self.d),
        ]
    }
}

/// Number of encounter actors of each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Population {
    /// Traffic vehicles.
    pub traffic: u32,
    /// Pedestrians of every kind.
    pub pedestrians: u32,
    /// Animals.
    pub wildlife: u32,
}

/// Static description of one playable level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// Catalog key, e.g. `LEVEL_1`.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Free-form difficulty label.
    #[serde(default)]
    pub difficulty: String,
    /// Map extent along x.
    pub map_width: f32,
    /// Map extent along y.
    pub map_height: f32,
    /// Truck start position.
    pub spawn: Vec2,
    /// Truck start heading in radians.
    #[serde(default)]
    pub spawn_rotation: f32,
    /// Pickup zone for standard and careful missions.
    pub pickup_zone: Rect,
    /// Delivery zone, also the parking target.
    pub delivery_zone: Rect,
    /// Zones for the time trial and multi-stop routes.
    #[serde(default)]
    pub route_zones: RouteZones,
    /// Obstacle footprints, top-left anchored.
    #[serde(default)]
    pub obstacles: Vec<Rect>,
    /// Explicit actor counts; derived from map area when absent.
    #[serde(default)]
    pub population: Option<Population>,
}

impl LevelDescriptor {
    /// Parses and validates a JSON descriptor.
    ///
    /// # Errors
    /// Returns [`ConfigError::Json`] for malformed input and any validation
    /// error from [`LevelDescriptor::validate`].
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let level: Self = serde_json::from_str(source)?;
        level.validate()?;
        Ok(level)
    }

    /// Reads a JSON descriptor from disk.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`LevelDescriptor::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let source = fs::read_to_string(file).map_err(|source| ConfigError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&source)
    }

    /// Checks the descriptor can host a mission.
    ///
    /// # Errors
    /// Returns the first problem found: a non-positive map, a degenerate zone
    /// or obstacle, a zone outside the map or a spawn point outside the map.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.map_width.is_finite()
            && self.map_height.is_finite()
            && self.map_width > 0.0
            && self.map_height > 0.0)
        {
            return Err(ConfigError::InvalidMapSize {
                width: self.map_width,
                height: self.map_height,
            });
        }
        let map = self.bounds();

        let zones = [
            ("pickup zone", self.pickup_zone),
            ("delivery zone", self.delivery_zone),
        ];
        for (what, zone) in zones.into_iter().chain(self.route_zones.named()) {
            if zone.is_degenerate() {
                return Err(ConfigError::degenerate(
                    format!("{} {what}", self.key),
                    zone.width,
                    zone.height,
                ));
            }
            if !map.contains_rect(&zone) {
                return Err(ConfigError::out_of_bounds(
                    format!("{} {what}", self.key),
                    self.map_width,
                    self.map_height,
                ));
            }
        }

        if let Some((index, obstacle)) = self
            .obstacles
            .iter()
            .enumerate()
            .find(|(_, obstacle)| obstacle.is_degenerate())
        {
            return Err(ConfigError::degenerate(
                format!("{} obstacle #{index}", self.key),
                obstacle.width,
                obstacle.height,
            ));
        }

        if !map.contains_point(self.spawn) {
            return Err(ConfigError::out_of_bounds(
                format!("{} spawn point", self.key),
                self.map_width,
                self.map_height,
            ));
        }
        Ok(())
    }

    /// The playable rectangle.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.map_width, self.map_height)
    }

    /// Encounter counts: the explicit override, or densities per million
    /// square units scaled by map area.
    #[must_use]
    pub fn population_for(&self, tuning: &EncounterTuning) -> Population {
        if let Some(population) = self.population {
            return population;
        }
        let area = self.map_width * self.map_height / 1_000_000.0;
        let population = Population {
            traffic: scaled_count(area, tuning.traffic_density),
            pedestrians: scaled_count(area, tuning.pedestrian_density),
            wildlife: scaled_count(area, tuning.wildlife_density),
        };
        debug!("{} population from area: {population:?}", self.key);
        population
    }
}

fn scaled_count(area: f32, density: f32) -> u32 {
    u32::try_from(floor_to_i64((area * density).round())).unwrap_or(0)
}

struct LevelSeed {
    key: &'static str,
    name: &'static str,
    difficulty: &'static str,
    size: (f32, f32),
    pickup: Rect,
    delivery: Rect,
    spawn: (f32, f32),
    /// Centre x, centre y, width, height.
    obstacles: &'static [(f32, f32, f32, f32)],
}

impl LevelSeed {
    fn build(&self) -> LevelDescriptor {
        LevelDescriptor {
            key: self.key.to_owned(),
            name: self.name.to_owned(),
            difficulty: self.difficulty.to_owned(),
            map_width: self.size.0,
            map_height: self.size.1,
            spawn: Vec2::new(self.spawn.0, self.spawn.1),
            spawn_rotation: 0.0,
            pickup_zone: self.pickup,
            delivery_zone: self.delivery,
            route_zones: RouteZones::default(),
            obstacles: self
                .obstacles
                .iter()
                .map(|&(x, y, w, h)| Rect::from_center(Vec2::new(x, y), w, h))
                .collect(),
            population: None,
        }
    }
}

const SEEDS: [LevelSeed; 5] = [
    LevelSeed {
        key: "LEVEL_1",
        name: "Level 1: City Streets",
        difficulty: "Easy",
        size: (1600.0, 900.0),
        pickup: Rect::new(200.0, 200.0, 80.0, 80.0),
        delivery: Rect::new(1200.0, 600.0, 100.0, 100.0),
        spawn: (150.0, 150.0),
        obstacles: &[
            (400.0, 400.0, 80.0, 80.0),
            (600.0, 150.0, 60.0, 60.0),
            (700.0, 300.0, 40.0, 80.0),
            (300.0, 500.0, 80.0, 40.0),
            (900.0, 200.0, 50.0, 50.0),
            (800.0, 650.0, 60.0, 60.0),
            (1100.0, 400.0, 70.0, 50.0),
            (1300.0, 250.0, 50.0, 70.0),
            (200.0, 700.0, 60.0, 40.0),
            (1400.0, 750.0, 80.0, 60.0),
        ],
    },
    LevelSeed {
        key: "LEVEL_2",
        name: "Level 2: Industrial Zone",
        difficulty: "Medium",
        size: (1800.0, 1000.0),
        pickup: Rect::new(1500.0, 150.0, 90.0, 90.0),
        delivery: Rect::new(300.0, 800.0, 110.0, 110.0),
        spawn: (100.0, 100.0),
        obstacles: &[
            (500.0, 200.0, 100.0, 60.0),
            (700.0, 400.0, 80.0, 80.0),
            (900.0, 250.0, 70.0, 100.0),
            (1100.0, 500.0, 90.0, 70.0),
            (400.0, 600.0, 60.0, 90.0),
            (800.0, 700.0, 100.0, 50.0),
            (1300.0, 600.0, 80.0, 80.0),
            (600.0, 100.0, 70.0, 70.0),
            (200.0, 400.0, 60.0, 100.0),
            (1000.0, 800.0, 90.0, 60.0),
            (1500.0, 450.0, 70.0, 90.0),
            (300.0, 200.0, 80.0, 60.0),
            (1200.0, 150.0, 60.0, 70.0),
        ],
    },
    LevelSeed {
        key: "LEVEL_3",
        name: "Mission 3: Port Terminal",
        difficulty: "Medium+",
        size: (2000.0, 1100.0),
        pickup: Rect::new(250.0, 880.0, 100.0, 100.0),
        delivery: Rect::new(1650.0, 180.0, 120.0, 120.0),
        spawn: (180.0, 930.0),
        obstacles: &[
            (450.0, 760.0, 100.0, 80.0),
            (700.0, 860.0, 130.0, 60.0),
            (980.0, 710.0, 90.0, 90.0),
            (1240.0, 820.0, 120.0, 70.0),
            (1470.0, 620.0, 80.0, 130.0),
            (300.0, 470.0, 80.0, 110.0),
            (640.0, 520.0, 140.0, 70.0),
            (920.0, 470.0, 110.0, 60.0),
            (1500.0, 400.0, 140.0, 80.0),
            (1720.0, 540.0, 70.0, 100.0),
            (360.0, 170.0, 90.0, 90.0),
            (760.0, 210.0, 110.0, 80.0),
            (1150.0, 150.0, 130.0, 70.0),
        ],
    },
    LevelSeed {
        key: "LEVEL_4",
        name: "Mission 4: Mountain Road",
        difficulty: "Hard",
        size: (2100.0, 1200.0),
        pickup: Rect::new(1760.0, 930.0, 100.0, 100.0),
        delivery: Rect::new(240.0, 180.0, 120.0, 120.0),
        spawn: (1860.0, 980.0),
        obstacles: &[
            (1680.0, 760.0, 110.0, 80.0),
            (1400.0, 900.0, 90.0, 120.0),
            (1160.0, 760.0, 120.0, 70.0),
            (980.0, 930.0, 130.0, 80.0),
            (760.0, 760.0, 90.0, 140.0),
            (540.0, 920.0, 120.0, 90.0),
            (360.0, 720.0, 80.0, 120.0),
            (440.0, 500.0, 150.0, 80.0),
            (700.0, 360.0, 120.0, 80.0),
            (960.0, 500.0, 90.0, 120.0),
            (1210.0, 360.0, 120.0, 70.0),
            (1460.0, 470.0, 100.0, 90.0),
            (1740.0, 350.0, 100.0, 110.0),
            (900.0, 170.0, 130.0, 70.0),
        ],
    },
    LevelSeed {
        key: "LEVEL_5",
        name: "Mission 5: Night Logistics",
        difficulty: "Expert",
        size: (2300.0, 1300.0),
        pickup: Rect::new(260.0, 1020.0, 110.0, 110.0),
        delivery: Rect::new(1970.0, 240.0, 130.0, 130.0),
        spawn: (180.0, 1100.0),
        obstacles: &[
            (420.0, 860.0, 140.0, 70.0),
            (620.0, 1040.0, 100.0, 120.0),
            (880.0, 900.0, 130.0, 80.0),
            (1110.0, 1090.0, 80.0, 110.0),
            (1340.0, 930.0, 140.0, 90.0),
            (1570.0, 1080.0, 100.0, 90.0),
            (1790.0, 860.0, 120.0, 120.0),
            (1980.0, 1030.0, 90.0, 120.0),
            (580.0, 640.0, 130.0, 90.0),
            (840.0, 530.0, 100.0, 100.0),
            (1090.0, 650.0, 120.0, 80.0),
            (1370.0, 510.0, 90.0, 120.0),
            (1620.0, 630.0, 130.0, 70.0),
            (1880.0, 500.0, 90.0, 110.0),
            (430.0, 320.0, 110.0, 80.0),
            (760.0, 240.0, 130.0, 70.0),
            (1160.0, 200.0, 110.0, 90.0),
            (1470.0, 180.0, 130.0, 70.0),
        ],
    },
];

static CATALOG: Lazy<Vec<LevelDescriptor>> =
    Lazy::new(|| SEEDS.iter().map(LevelSeed::build).collect());

/// The built-in levels in play order.
#[must_use]
pub fn catalog() -> &'static [LevelDescriptor] {
    &CATALOG
}

/// Looks up a built-in level by key, e.g. `"LEVEL_3"`.
///
/// # Errors
/// Returns [`ConfigError::UnknownLevel`] for keys not in the catalog.
pub fn builtin(key: &str) -> Result<LevelDescriptor, ConfigError> {
    let wanted = key.trim().to_ascii_uppercase();
    CATALOG
        .iter()
        .find(|level| level.key == wanted)
        .cloned()
        .ok_or_else(|| ConfigError::UnknownLevel(key.to_owned()))
}
