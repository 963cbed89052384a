//! Runtime-tunable simulation parameters.
//!
//! [`Tuning`] defaults to the values in [`crate::constants`]. A TOML document
//! may override any subset of fields:
//!
//! ```toml
//! [truck]
//! max_speed = 320.0
//!
//! [mission]
//! time_limit = 100.0
//! ```
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// Truck kinematics and visual response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TruckTuning {
    /// Forward acceleration, units per second squared.
    pub acceleration: f32,
    /// Top forward speed.
    pub max_speed: f32,
    /// Negative top speed in reverse.
    pub reverse_speed: f32,
    /// Per-frame speed multiplier while coasting.
    pub friction: f32,
    /// Turn rate at full speed, degrees per second.
    pub turn_speed_deg: f32,
    /// Normalised speed required before steering takes effect.
    pub min_turn_speed: f32,
    /// Acceleration multiplier when braking against forward motion.
    pub brake_factor: f32,
    /// Per-frame speed multiplier under the handbrake.
    pub handbrake_factor: f32,
    /// Coasting speeds below this snap to zero.
    pub stop_epsilon: f32,
    /// Footprint along the heading.
    pub width: f32,
    /// Footprint across the heading.
    pub height: f32,
    /// Fraction of speed kept after an obstacle hit.
    pub collision_scrub: f32,
    /// Dirt added per obstacle hit.
    pub collision_dirt: f32,
    /// Dirt gained per second at full speed.
    pub dirt_gain_rate: f32,
    /// Blood washed off per second.
    pub blood_decay_rate: f32,
    /// Airborne time.
    pub jump_duration: f32,
    /// Time from takeoff until the next jump.
    pub jump_cooldown: f32,
    /// Draw scale at the top of the jump.
    pub jump_scale_peak: f32,
    /// Seconds to reach the peak scale.
    pub jump_scale_rise: f32,
    /// Opacity while airborne.
    pub jump_alpha: f32,
}

impl Default for TruckTuning {
    fn default() -> Self {
        Self {
            acceleration: TRUCK_ACCELERATION,
            max_speed: TRUCK_MAX_SPEED,
            reverse_speed: TRUCK_REVERSE_SPEED,
            friction: TRUCK_FRICTION,
            turn_speed_deg: TRUCK_TURN_SPEED,
            min_turn_speed: TRUCK_MIN_TURN_SPEED,
            brake_factor: TRUCK_BRAKE_FACTOR,
            handbrake_factor: TRUCK_HANDBRAKE_FACTOR,
            stop_epsilon: TRUCK_STOP_EPSILON,
            width: TRUCK_WIDTH,
            height: TRUCK_HEIGHT,
            collision_scrub: COLLISION_SPEED_SCRUB,
            collision_dirt: COLLISION_DIRT,
            dirt_gain_rate: DIRT_GAIN_RATE,
            blood_decay_rate: BLOOD_DECAY_RATE,
            jump_duration: JUMP_DURATION,
            jump_cooldown: JUMP_COOLDOWN,
            jump_scale_peak: JUMP_SCALE_PEAK,
            jump_scale_rise: JUMP_SCALE_RISE,
            jump_alpha: JUMP_ALPHA,
        }
    }
}

impl TruckTuning {
    /// Largest speed magnitude the controller will ever hold.
    #[must_use]
    pub fn speed_bound(&self) -> f32 {
        self.max_speed.max(self.reverse_speed.abs())
    }
}

/// Hitch geometry and smoothing for the trailer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailerTuning {
    /// Truck pivot to hitch distance.
    pub hitch_offset: f32,
    /// Hitch to trailer pivot distance.
    pub connection_distance: f32,
    /// Base per-frame blend toward the target pose.
    pub follow_smoothness: f32,
    /// Blend added per second of frame time.
    pub smoothness_gain: f32,
    /// Upper bound on the blend.
    pub smoothness_cap: f32,
    /// Rotation blend relative to the position blend.
    pub rotation_factor: f32,
    /// Articulation limit in degrees.
    pub max_angle_deg: f32,
    /// Added to the reported sprite rotation only.
    pub texture_offset_deg: f32,
    /// Spin granted per jump.
    pub flip_budget_deg: f32,
    /// Spin speed, degrees per second.
    pub flip_rate_deg: f32,
    /// Footprint along the heading.
    pub width: f32,
    /// Footprint across the heading.
    pub height: f32,
}

impl Default for TrailerTuning {
    fn default() -> Self {
        Self {
            hitch_offset: TRAILER_HITCH_OFFSET,
            connection_distance: TRAILER_CONNECTION_DISTANCE,
            follow_smoothness: TRAILER_FOLLOW_SMOOTHNESS,
            smoothness_gain: TRAILER_SMOOTHNESS_GAIN,
            smoothness_cap: TRAILER_SMOOTHNESS_CAP,
            rotation_factor: TRAILER_ROTATION_FACTOR,
            max_angle_deg: TRAILER_MAX_ANGLE,
            texture_offset_deg: TRAILER_TEXTURE_OFFSET,
            flip_budget_deg: TRAILER_FLIP_BUDGET,
            flip_rate_deg: TRAILER_FLIP_RATE,
            width: TRAILER_WIDTH,
            height: TRAILER_HEIGHT,
        }
    }
}

/// Time budgets and scoring weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionTuning {
    /// Budget for single-delivery missions.
    pub time_limit: f32,
    /// Budget for the time trial.
    pub time_trial_limit: f32,
    /// Budget for the multi-stop route.
    pub multi_stop_limit: f32,
    /// Base points per second remaining.
    pub points_per_second: f32,
    /// Points lost per collision.
    pub collision_penalty: i64,
    /// Elapsed seconds under which the speed bonus applies.
    pub speed_bonus_threshold: f32,
    /// Speed bonus per second under the threshold.
    pub speed_bonus_per_second: f32,
    /// Bonus for a collision-free run.
    pub perfect_delivery_bonus: i64,
    /// Share of the base score paid by the careful bonus.
    pub careful_bonus_ratio: f32,
    /// Collision allowance for the careful bonus.
    pub careful_max_collisions: u32,
    /// Bonus for finishing the multi-stop route.
    pub multi_stop_bonus: i64,
}

impl Default for MissionTuning {
    fn default() -> Self {
        Self {
            time_limit: MISSION_TIME_LIMIT,
            time_trial_limit: TIME_TRIAL_TIME_LIMIT,
            multi_stop_limit: MULTI_STOP_TIME_LIMIT,
            points_per_second: POINTS_PER_SECOND,
            collision_penalty: COLLISION_PENALTY,
            speed_bonus_threshold: SPEED_BONUS_THRESHOLD,
            speed_bonus_per_second: SPEED_BONUS_PER_SECOND,
            perfect_delivery_bonus: PERFECT_DELIVERY_BONUS,
            careful_bonus_ratio: CAREFUL_BONUS_RATIO,
            careful_max_collisions: CAREFUL_MAX_COLLISIONS,
            multi_stop_bonus: MULTI_STOP_BONUS,
        }
    }
}

/// Crush thresholds and scores per encounter category, plus population
/// density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterTuning {
    /// Truck speed above which traffic is crushed.
    pub traffic_lethal_speed: f32,
    /// Points per crushed traffic vehicle.
    pub traffic_crush_bonus: i64,
    /// Shove speed given to traffic by a slow truck.
    pub traffic_bump_speed: f32,
    /// Spin-out time of crushed traffic.
    pub traffic_crush_fade: f32,
    /// Distance past the map edge at which traffic wraps.
    pub traffic_wrap_margin: f32,
    /// Rate at which bumped traffic returns to its lane velocity.
    pub traffic_recovery_rate: f32,
    /// Multiplier on walker idle speed.
    pub wander_speed_scale: f32,
    /// Crush threshold for pedestrians.
    pub pedestrian_lethal_speed: f32,
    /// Crush threshold for flag carriers.
    pub flag_carrier_lethal_speed: f32,
    /// Crush threshold for wheelchair users.
    pub wheelchair_lethal_speed: f32,
    /// Crush threshold for wildlife.
    pub squirrel_lethal_speed: f32,
    /// Crush score for pedestrians.
    pub pedestrian_crush_score: i64,
    /// Crush score for flag carriers.
    pub flag_carrier_crush_score: i64,
    /// Crush score for wheelchair users.
    pub wheelchair_crush_score: i64,
    /// Crush score for wildlife.
    pub squirrel_crush_score: i64,
    /// Blood added per crush.
    pub crush_blood: f32,
    /// Decals kept before the oldest are recycled.
    pub max_decals: usize,
    /// Traffic per million square units.
    pub traffic_density: f32,
    /// Pedestrians per million square units.
    pub pedestrian_density: f32,
    /// Animals per million square units.
    pub wildlife_density: f32,
}

impl Default for EncounterTuning {
    fn default() -> Self {
        Self {
            traffic_lethal_speed: TRAFFIC_LETHAL_SPEED,
            traffic_crush_bonus: TRAFFIC_CRUSH_BONUS,
            traffic_bump_speed: TRAFFIC_BUMP_SPEED,
            traffic_crush_fade: TRAFFIC_CRUSH_FADE,
            traffic_wrap_margin: TRAFFIC_WRAP_MARGIN,
            traffic_recovery_rate: TRAFFIC_RECOVERY_RATE,
            wander_speed_scale: WANDER_SPEED_SCALE,
            pedestrian_lethal_speed: PEDESTRIAN_LETHAL_SPEED,
            flag_carrier_lethal_speed: FLAG_CARRIER_LETHAL_SPEED,
            wheelchair_lethal_speed: WHEELCHAIR_LETHAL_SPEED,
            squirrel_lethal_speed: SQUIRREL_LETHAL_SPEED,
            pedestrian_crush_score: PEDESTRIAN_CRUSH_SCORE,
            flag_carrier_crush_score: FLAG_CARRIER_CRUSH_SCORE,
            wheelchair_crush_score: WHEELCHAIR_CRUSH_SCORE,
            squirrel_crush_score: SQUIRREL_CRUSH_SCORE,
            crush_blood: CRUSH_BLOOD,
            max_decals: MAX_DECALS,
            traffic_density: TRAFFIC_DENSITY,
            pedestrian_density: PEDESTRIAN_DENSITY,
            wildlife_density: WILDLIFE_DENSITY,
        }
    }
}

/// Complete parameter set consumed by [`crate::Simulation`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Truck controller values.
    pub truck: TruckTuning,
    /// Trailer follower values.
    pub trailer: TrailerTuning,
    /// Mission budgets and scoring.
    pub mission: MissionTuning,
    /// Encounter thresholds, scores and density.
    pub encounter: EncounterTuning,
}

fn require(ok: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidTuning { field, reason })
    }
}

impl Tuning {
    /// Parses a (possibly partial) TOML document and validates the result.
    ///
    /// # Errors
    /// Returns [`ConfigError::Toml`] for malformed documents and
    /// [`ConfigError::InvalidTuning`] when a value is out of range.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let tuning: Self = toml::from_str(source)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reads and validates a TOML tuning file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise the
    /// same errors as [`Tuning::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let source = fs::read_to_string(file).map_err(|source| ConfigError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Rejects values the controllers cannot work with.
    ///
    /// # Errors
    /// Returns the first [`ConfigError::InvalidTuning`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let truck = &self.truck;
        require(truck.max_speed > 0.0, "truck.max_speed", "must be positive")?;
        require(
            truck.reverse_speed <= 0.0,
            "truck.reverse_speed",
            "must be zero or negative",
        )?;
        require(truck.acceleration > 0.0, "truck.acceleration", "must be positive")?;
        require(
            truck.friction > 0.0 && truck.friction <= 1.0,
            "truck.friction",
            "must be in (0, 1]",
        )?;
        require(
            truck.handbrake_factor > 0.0 && truck.handbrake_factor <= 1.0,
            "truck.handbrake_factor",
            "must be in (0, 1]",
        )?;
        require(
            (0.0..=1.0).contains(&truck.collision_scrub),
            "truck.collision_scrub",
            "must be in [0, 1]",
        )?;
        require(
            truck.width > 0.0 && truck.height > 0.0,
            "truck.width",
            "footprint must be positive",
        )?;

        let trailer = &self.trailer;
        require(
            trailer.max_angle_deg >= 0.0 && trailer.max_angle_deg <= 180.0,
            "trailer.max_angle_deg",
            "must be in [0, 180]",
        )?;
        require(
            trailer.smoothness_cap > 0.0 && trailer.smoothness_cap <= 1.0,
            "trailer.smoothness_cap",
            "must be in (0, 1]",
        )?;

        let mission = &self.mission;
        require(mission.time_limit > 0.0, "mission.time_limit", "must be positive")?;
        require(
            mission.time_trial_limit > 0.0,
            "mission.time_trial_limit",
            "must be positive",
        )?;
        require(
            mission.multi_stop_limit > 0.0,
            "mission.multi_stop_limit",
            "must be positive",
        )?;
        require(
            mission.collision_penalty >= 0,
            "mission.collision_penalty",
            "must not be negative",
        )?;

        let encounter = &self.encounter;
        require(
            encounter.traffic_lethal_speed >= 0.0,
            "encounter.traffic_lethal_speed",
            "must not be negative",
        )?;
        require(
            encounter.traffic_recovery_rate >= 0.0,
            "encounter.traffic_recovery_rate",
            "must not be negative",
        )?;
        require(
            encounter.wander_speed_scale > 0.0,
            "encounter.wander_speed_scale",
            "must be positive",
        )?;
        require(
            encounter.max_decals > 0,
            "encounter.max_decals",
            "must be positive",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
        assert!((Tuning::default().truck.speed_bound() - 300.0).abs() < f32::EPSILON);
    }

    #[rstest]
    fn partial_toml_keeps_defaults() {
        let tuning = Tuning::from_toml_str("[truck]\nmax_speed = 320.0\n")
            .expect("partial tuning parses");
        assert!((tuning.truck.max_speed - 320.0).abs() < f32::EPSILON);
        assert!((tuning.truck.acceleration - TRUCK_ACCELERATION).abs() < f32::EPSILON);
        assert_eq!(tuning.mission, MissionTuning::default());
    }

    #[rstest]
    #[case("[truck]\nmax_speed = 0.0\n", "truck.max_speed")]
    #[case("[truck]\nreverse_speed = 10.0\n", "truck.reverse_speed")]
    #[case("[truck]\nfriction = 1.5\n", "truck.friction")]
    #[case("[mission]\ntime_limit = -1.0\n", "mission.time_limit")]
    fn out_of_range_values_are_rejected(#[case] source: &str, #[case] expected: &str) {
        match Tuning::from_toml_str(source) {
            Err(ConfigError::InvalidTuning { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected InvalidTuning for {expected}, got {other:?}"),
        }
    }

    #[rstest]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            Tuning::from_toml_str("[truck\nmax_speed = "),
            Err(ConfigError::Toml(_))
        ));
    }

    #[rstest]
    fn missing_file_reports_path() {
        let err = Tuning::load("/definitely/not/here.toml").expect_err("missing file");
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
