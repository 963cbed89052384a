//! Articulated trailer follower.
//!
//! Each step the trailer chases a point behind the truck's hitch with a
//! frame-rate aware smoothing factor, then swings its heading toward the
//! hitch. The relative angle to the truck never exceeds the articulation
//! limit, even under violent steering.
use glam::Vec2;
use log::trace;

use crate::geometry::Rect;
use crate::math::{
    angle_between, angle_difference_rad, clamp, deg_to_rad, heading, lerp_angle,
    normalize_angle_rad, rad_to_deg,
};
use crate::tuning::TrailerTuning;

use super::{Pose, Truck};

/// Trailer state derived from the truck every frame.
#[derive(Debug, Clone)]
pub struct Trailer {
    position: Vec2,
    rotation: f32,
    anchor_rotation: f32,
    flip_angle_deg: f32,
    flip_remaining_deg: f32,
    truck_was_jumping: bool,
    tuning: TrailerTuning,
}

impl Trailer {
    /// Places the trailer at rest directly behind `truck`.
    #[must_use]
    pub fn new(truck: &Truck, tuning: TrailerTuning) -> Self {
        let mut trailer = Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            anchor_rotation: 0.0,
            flip_angle_deg: 0.0,
            flip_remaining_deg: 0.0,
            truck_was_jumping: false,
            tuning,
        };
        trailer.reset(truck);
        trailer
    }

    fn hitch(&self, truck: Pose) -> Vec2 {
        truck.behind(self.tuning.hitch_offset)
    }

    /// Rest position for the current truck pose.
    fn target(&self, truck: Pose) -> Vec2 {
        self.hitch(truck) - heading(truck.rotation) * self.tuning.connection_distance
    }

    /// Follows `truck` for `dt` seconds.
    pub fn update(&mut self, truck: &Truck, dt: f32) {
        let pose = truck.pose();
        let t = &self.tuning;
        let smooth = (t.follow_smoothness + dt * t.smoothness_gain).min(t.smoothness_cap);
        let max_angle = deg_to_rad(t.max_angle_deg);

        let hitch = self.hitch(pose);
        self.position = self.position.lerp(self.target(pose), smooth);

        let toward_hitch = angle_between(self.position, hitch);
        let desired = pose.rotation
            + clamp(
                angle_difference_rad(pose.rotation, toward_hitch),
                -max_angle,
                max_angle,
            );
        let swung = lerp_angle(
            self.rotation,
            desired,
            (smooth * self.tuning.rotation_factor).min(1.0),
        );
        let relative = clamp(
            angle_difference_rad(pose.rotation, swung),
            -max_angle,
            max_angle,
        );
        self.rotation = normalize_angle_rad(pose.rotation + relative);
        self.anchor_rotation = pose.rotation;

        self.update_flip(truck.is_jumping(), dt);
    }

    fn update_flip(&mut self, truck_jumping: bool, dt: f32) {
        if truck_jumping && !self.truck_was_jumping {
            self.flip_remaining_deg = self.tuning.flip_budget_deg;
            trace!("trailer flip started");
        }
        self.truck_was_jumping = truck_jumping;

        if self.flip_remaining_deg <= 0.0 {
            return;
        }
        let step = (self.tuning.flip_rate_deg * dt).min(self.flip_remaining_deg);
        self.flip_angle_deg += step;
        self.flip_remaining_deg -= step;
        if self.flip_remaining_deg <= 0.0 {
            self.flip_remaining_deg = 0.0;
            self.flip_angle_deg = 0.0;
        }
    }

    /// Snaps behind `truck` and cancels any flip in progress.
    pub fn reset(&mut self, truck: &Truck) {
        let pose = truck.pose();
        self.position = self.target(pose);
        self.rotation = pose.rotation;
        self.anchor_rotation = pose.rotation;
        self.flip_angle_deg = 0.0;
        self.flip_remaining_deg = 0.0;
        self.truck_was_jumping = truck.is_jumping();
    }

    /// Trailer centre.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Physical heading in radians, used for collision footprints.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Centre and physical heading.
    #[must_use]
    pub const fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }

    /// Heading to draw the sprite at: physical heading plus texture offset
    /// plus any flip in progress.
    #[must_use]
    pub fn sprite_rotation(&self) -> f32 {
        self.rotation + deg_to_rad(self.tuning.texture_offset_deg + self.flip_angle_deg)
    }

    /// Signed trailer-minus-truck heading in degrees, as of the last update.
    #[must_use]
    pub fn articulation_deg(&self) -> f32 {
        rad_to_deg(angle_difference_rad(self.anchor_rotation, self.rotation))
    }

    /// Cosmetic spin accumulated by the current flip.
    #[must_use]
    pub const fn flip_angle_deg(&self) -> f32 {
        self.flip_angle_deg
    }

    /// `true` while a jump flip is still spinning.
    #[must_use]
    pub fn is_flipping(&self) -> bool {
        self.flip_remaining_deg > 0.0
    }

    /// Axis-aligned bounds of the rotated footprint.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::rotated_bounds(
            self.position,
            self.tuning.width,
            self.tuning.height,
            self.rotation,
        )
    }
}
