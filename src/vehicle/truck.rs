//! Arcade truck controller.
//!
//! Converts discrete input into a heading-aligned velocity. There is no slip
//! model: velocity is always `heading(rotation) * speed`.
use glam::Vec2;
use log::debug;
use std::f32::consts::FRAC_PI_2;

use crate::geometry::Rect;
use crate::input::FrameInput;
use crate::math::{deg_to_rad, heading, lerp, normalize_angle_rad};
use crate::tuning::TruckTuning;

use super::Pose;

/// Countdown state for the jump ability.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpState {
    /// Airborne: obstacle collisions are suppressed.
    pub is_jumping: bool,
    /// Seconds of airtime left.
    pub timer: f32,
    /// Seconds before another jump is allowed.
    pub cooldown: f32,
    /// Seconds since the most recent jump began; drives the scale pulse.
    pub elapsed: f32,
}

/// The player-controlled truck.
#[derive(Debug, Clone)]
pub struct Truck {
    position: Vec2,
    rotation: f32,
    speed: f32,
    velocity: Vec2,
    turn_angle_deg: f32,
    spawn: Pose,
    jump: JumpState,
    dirt: f32,
    blood: f32,
    alpha: f32,
    scale: f32,
    tuning: TruckTuning,
}

impl Truck {
    /// Creates a stationary truck at `spawn`.
    #[must_use]
    pub fn new(spawn: Pose, tuning: TruckTuning) -> Self {
        Self {
            position: spawn.position,
            rotation: spawn.rotation,
            speed: 0.0,
            velocity: Vec2::ZERO,
            turn_angle_deg: 0.0,
            spawn,
            jump: JumpState::default(),
            dirt: 0.0,
            blood: 0.0,
            alpha: 1.0,
            scale: 1.0,
            tuning,
        }
    }

    /// Advances the controller by `dt` seconds of `input`.
    ///
    /// Updates speed, heading and velocity, then ticks the jump timers and
    /// contamination. Position is integrated separately by
    /// [`Truck::integrate`].
    pub fn update(&mut self, input: &FrameInput, dt: f32) {
        if input.jump {
            self.start_jump();
        }

        self.update_speed(input, dt);
        self.update_heading(input, dt);
        self.velocity = heading(self.rotation) * self.speed;

        self.update_jump(dt);
        self.update_contamination(dt);
    }

    fn update_speed(&mut self, input: &FrameInput, dt: f32) {
        let t = &self.tuning;
        let next = if input.forward {
            (self.speed + t.acceleration * dt).min(t.max_speed)
        } else if input.backward {
            if self.speed > 0.0 {
                (self.speed - t.acceleration * t.brake_factor * dt).max(0.0)
            } else {
                (self.speed - t.acceleration * dt).max(t.reverse_speed)
            }
        } else {
            let coasting = self.speed * t.friction;
            if coasting.abs() < t.stop_epsilon {
                0.0
            } else {
                coasting
            }
        };
        self.set_speed(next);

        if input.handbrake {
            self.set_speed(self.speed * self.tuning.handbrake_factor);
        }
    }

    fn update_heading(&mut self, input: &FrameInput, dt: f32) {
        let speed_factor = self.speed_factor();
        if speed_factor <= self.tuning.min_turn_speed {
            return;
        }

        self.turn_angle_deg = if input.left {
            -self.tuning.turn_speed_deg * speed_factor
        } else if input.right {
            self.tuning.turn_speed_deg * speed_factor
        } else {
            0.0
        };

        let delta = deg_to_rad(self.turn_angle_deg * dt);
        // Steering inverts in reverse so the truck swings the way the wheels point.
        let signed = if self.speed < 0.0 { -delta } else { delta };
        self.rotation = normalize_angle_rad(self.rotation + signed);
    }

    /// Begins a jump unless one is running or the cooldown has not elapsed.
    ///
    /// Returns `true` when a jump actually started.
    pub fn start_jump(&mut self) -> bool {
        if self.jump.is_jumping || self.jump.cooldown > 0.0 {
            return false;
        }
        self.jump = JumpState {
            is_jumping: true,
            timer: self.tuning.jump_duration,
            cooldown: self.tuning.jump_cooldown,
            elapsed: 0.0,
        };
        debug!("truck jump started at {:?}", self.position);
        true
    }

    fn update_jump(&mut self, dt: f32) {
        if self.jump.cooldown > 0.0 {
            self.jump.cooldown = (self.jump.cooldown - dt).max(0.0);
        }

        if self.jump.is_jumping {
            self.jump.timer -= dt;
            self.jump.elapsed += dt;
            self.alpha = self.tuning.jump_alpha;
            if self.jump.timer <= 0.0 {
                self.jump.is_jumping = false;
                self.jump.timer = 0.0;
                self.alpha = 1.0;
            }
        }
        self.scale = self.pulse_scale();
    }

    /// Sine-eased yoyo: up to the peak over `jump_scale_rise`, back over the
    /// same span.
    fn pulse_scale(&self) -> f32 {
        let rise = self.tuning.jump_scale_rise;
        let elapsed = self.jump.elapsed;
        if rise <= 0.0 || (!self.jump.is_jumping && elapsed <= 0.0) || elapsed >= 2.0 * rise {
            return 1.0;
        }
        let phase = if elapsed <= rise {
            elapsed / rise
        } else {
            2.0 - elapsed / rise
        };
        lerp(1.0, self.tuning.jump_scale_peak, (phase * FRAC_PI_2).sin())
    }

    fn update_contamination(&mut self, dt: f32) {
        let gain = self.speed_factor().min(1.0) * self.tuning.dirt_gain_rate * dt;
        self.add_dirt(gain);
        self.blood = (self.blood - self.tuning.blood_decay_rate * dt).max(0.0);
    }

    /// Moves the truck along its velocity and keeps it inside `bounds`.
    pub fn integrate(&mut self, dt: f32, bounds: &Rect) {
        self.position = bounds.clamp_point(self.position + self.velocity * dt);
    }

    /// Shifts the truck without touching its kinematic state; used to resolve
    /// obstacle penetration.
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    /// Sole writer of speed. Clamps into `[reverse_speed, max_speed]`.
    pub fn set_speed(&mut self, speed: f32) {
        let t = &self.tuning;
        self.speed = if speed.is_finite() {
            speed.clamp(t.reverse_speed.min(0.0), t.max_speed)
        } else {
            0.0
        };
    }

    /// Obstacle impact: scrubs momentum and splashes mud.
    pub fn handle_collision(&mut self) {
        let scrub = self.tuning.collision_scrub;
        self.set_speed(self.speed * scrub);
        self.velocity *= scrub;
        self.add_dirt(self.tuning.collision_dirt);
    }

    /// Adds dirt, saturating at `1`.
    pub fn add_dirt(&mut self, amount: f32) {
        self.dirt = (self.dirt + amount).clamp(0.0, 1.0);
    }

    /// Adds blood, saturating at `1`.
    pub fn add_blood(&mut self, amount: f32) {
        self.blood = (self.blood + amount).clamp(0.0, 1.0);
    }

    /// Back to spawn, stationary, grounded, with visuals restored.
    ///
    /// Contamination is kept: the truck does not get washed by a reset.
    pub fn reset(&mut self) {
        self.position = self.spawn.position;
        self.rotation = self.spawn.rotation;
        self.speed = 0.0;
        self.velocity = Vec2::ZERO;
        self.turn_angle_deg = 0.0;
        self.jump = JumpState::default();
        self.alpha = 1.0;
        self.scale = 1.0;
    }

    /// Moves the pose used by [`Truck::reset`].
    pub fn set_spawn(&mut self, spawn: Pose) {
        self.spawn = spawn;
    }

    /// `|speed| / max_speed`.
    #[must_use]
    pub fn speed_factor(&self) -> f32 {
        self.speed.abs() / self.tuning.max_speed
    }

    /// Centre and heading.
    #[must_use]
    pub const fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }

    /// Centre in world units.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Heading in radians.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Signed speed along the heading.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Velocity derived from speed and heading.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Jump timers.
    #[must_use]
    pub const fn jump(&self) -> JumpState {
        self.jump
    }

    /// `true` while airborne.
    #[must_use]
    pub const fn is_jumping(&self) -> bool {
        self.jump.is_jumping
    }

    /// Dirt level in `[0, 1]`.
    #[must_use]
    pub const fn dirt(&self) -> f32 {
        self.dirt
    }

    /// Blood level in `[0, 1]`.
    #[must_use]
    pub const fn blood(&self) -> f32 {
        self.blood
    }

    /// Draw opacity.
    #[must_use]
    pub const fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Draw scale, pulsing during a jump.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Pose restored by a reset.
    #[must_use]
    pub const fn spawn(&self) -> Pose {
        self.spawn
    }

    /// Tuning in effect.
    #[must_use]
    pub const fn tuning(&self) -> &TruckTuning {
        &self.tuning
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

    /// Body tint for presentation: white fading to mud brown with dirt, then
    /// toward dark red with blood.
    #[must_use]
    pub fn tint_rgb(&self) -> [u8; 3] {
        const CLEAN: [f32; 3] = [255.0, 255.0, 255.0];
        const MUD: [f32; 3] = [132.0, 110.0, 86.0];
        const GORE: [f32; 3] = [150.0, 24.0, 24.0];
        let mut out = [0_u8; 3];
        for (channel, ((clean, mud), gore)) in out
            .iter_mut()
            .zip(CLEAN.iter().zip(MUD.iter()).zip(GORE.iter()))
        {
            let dirty = lerp(*clean, *mud, self.dirt);
            *channel = to_channel(lerp(dirty, *gore, self.blood * 0.6));
        }
        out
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is clamped into 0..=255 before casting."
)]
fn to_channel(value: f32) -> u8 {
    value.floor().clamp(0.0, 255.0) as u8
}
