//! Player vehicle: the kinematic truck and its articulated trailer.
//!
//! The truck is the only body driven by input. The trailer never owns an
//! authoritative position; it re-derives a smoothed pose from the truck on
//! every step.
pub mod trailer;
pub mod truck;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use trailer::Trailer;
pub use truck::{JumpState, Truck};

/// Position plus heading in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// Centre of the body in world units.
    pub position: Vec2,
    /// Heading in radians; `0` faces +x.
    pub rotation: f32,
}

impl Pose {
    /// Pose at `position` facing `rotation`.
    #[must_use]
    pub const fn new(position: Vec2, rotation: f32) -> Self {
        Self { position, rotation }
    }

    /// Point `distance` units behind this pose along its heading.
    #[must_use]
    pub fn behind(&self, distance: f32) -> Vec2 {
        self.position - crate::math::heading(self.rotation) * distance
    }
}
