#![cfg_attr(docsrs, feature(doc_cfg))]
//! Simulation core for an arcade truck-and-trailer delivery game.
//!
//! The crate owns the truck controller, the articulated trailer, encounter
//! actors, the mission state machine and scoring. Rendering and physics stay
//! outside: callers feed a [`FrameInput`] and a [`ContactProbe`] into
//! [`Simulation::step`] and read back plain data and [`Effect`]s.
pub mod constants;
pub mod encounter;
pub mod error;
pub mod geometry;
pub mod input;
pub mod leaderboard;
pub mod level;
pub mod logging;
pub mod math;
pub mod mission;
pub mod numeric;
pub mod plugin;
pub mod simulation;
pub mod tuning;
pub mod vehicle;
pub use constants::*;

// Re-export commonly used items
pub use encounter::{Category, CrushTally, EncounterActor};
pub use error::ConfigError;
pub use geometry::Rect;
pub use input::{EdgeDetector, FrameInput};
pub use leaderboard::{Leaderboard, ScoreStore, StoreError};
pub use level::LevelDescriptor;
pub use logging::init as init_logging;
pub use mission::{Archetype, Mission, MissionResult};
pub use plugin::{ActiveRun, HaulagePlugin, MissionNotice, PendingInput};
pub use simulation::{AabbProbe, Contact, ContactProbe, Effect, HudSnapshot, Simulation, WorldView};
pub use tuning::Tuning;
pub use vehicle::{Pose, Trailer, Truck};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use haulage::prelude::*;
    //! ```

    pub use crate::level::builtin;
    pub use crate::Archetype;
    pub use crate::Effect;
    pub use crate::FrameInput;
    pub use crate::Simulation;
    pub use crate::Tuning;
    pub use glam::Vec2;
}
